//! Output sink for progress rendering. The renderer only emits text, line
//! breaks and status markers; how markers look is up to the writer.

use crate::errors::ProgressError;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::Write;

pub trait TerminalWriter {
    fn append(&mut self, text: &str) -> Result<(), ProgressError>;
    fn newline(&mut self) -> Result<(), ProgressError>;
    fn ok_status(&mut self) -> Result<(), ProgressError>;
    fn fail_status(&mut self) -> Result<(), ProgressError>;
    fn normal(&mut self) -> Result<(), ProgressError>;
}

/// Writes ANSI-styled output to any `Write`: green for ok, bold red for
/// failures.
pub struct AnsiTerminalWriter<W: Write> {
    out: W,
}

impl<W: Write> AnsiTerminalWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn flush(&mut self) -> Result<(), ProgressError> {
        self.out.flush().map_err(io_error)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn io_error(error: std::io::Error) -> ProgressError {
    ProgressError::Io(error.to_string())
}

impl<W: Write> TerminalWriter for AnsiTerminalWriter<W> {
    fn append(&mut self, text: &str) -> Result<(), ProgressError> {
        queue!(self.out, Print(text)).map_err(io_error)
    }

    fn newline(&mut self) -> Result<(), ProgressError> {
        queue!(self.out, Print("\n")).map_err(io_error)
    }

    fn ok_status(&mut self) -> Result<(), ProgressError> {
        queue!(self.out, SetForegroundColor(Color::Green)).map_err(io_error)
    }

    fn fail_status(&mut self) -> Result<(), ProgressError> {
        queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Red)
        )
        .map_err(io_error)
    }

    fn normal(&mut self) -> Result<(), ProgressError> {
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor).map_err(io_error)
    }
}

/// Collects plain text, dropping status markers.
#[derive(Debug, Clone, Default)]
pub struct StringTerminalWriter {
    written: String,
}

impl StringTerminalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> &str {
        &self.written
    }

    pub fn lines(&self) -> Vec<&str> {
        self.written.lines().collect()
    }

    pub fn into_string(self) -> String {
        self.written
    }
}

impl TerminalWriter for StringTerminalWriter {
    fn append(&mut self, text: &str) -> Result<(), ProgressError> {
        self.written.push_str(text);
        Ok(())
    }

    fn newline(&mut self) -> Result<(), ProgressError> {
        self.written.push('\n');
        Ok(())
    }

    fn ok_status(&mut self) -> Result<(), ProgressError> {
        Ok(())
    }

    fn fail_status(&mut self) -> Result<(), ProgressError> {
        Ok(())
    }

    fn normal(&mut self) -> Result<(), ProgressError> {
        Ok(())
    }
}
