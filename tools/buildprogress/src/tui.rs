use crate::errors::ProgressError;
use crate::terminal_writer::TerminalWriter;
use ratatui::backend::TestBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

/// Collects rendered progress as styled ratatui lines.
#[derive(Debug, Default)]
pub struct FrameWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style: Style,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_lines(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }

    fn flush_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }
}

impl TerminalWriter for FrameWriter {
    fn append(&mut self, text: &str) -> Result<(), ProgressError> {
        self.current.push(Span::styled(text.to_string(), self.style));
        Ok(())
    }

    fn newline(&mut self) -> Result<(), ProgressError> {
        self.flush_line();
        Ok(())
    }

    fn ok_status(&mut self) -> Result<(), ProgressError> {
        self.style = Style::default().fg(Color::Green);
        Ok(())
    }

    fn fail_status(&mut self) -> Result<(), ProgressError> {
        self.style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        Ok(())
    }

    fn normal(&mut self) -> Result<(), ProgressError> {
        self.style = Style::default();
        Ok(())
    }
}

/// Draws progress lines into a bordered frame and returns the frame's
/// character grid, one row per line.
pub fn render_frame(
    lines: Vec<Line<'static>>,
    width: u16,
    height: u16,
) -> Result<String, ProgressError> {
    if width == 0 || height == 0 {
        return Ok(String::new());
    }
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).map_err(|e| ProgressError::Render(e.to_string()))?;
    terminal
        .draw(|frame| {
            let body = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Progress"));
            frame.render_widget(body, frame.area());
        })
        .map_err(|e| ProgressError::Render(e.to_string()))?;

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{render_frame, FrameWriter};
    use crate::terminal_writer::TerminalWriter;
    use ratatui::style::Color;

    #[test]
    fn frame_writer_splits_lines_and_styles_status() {
        let mut writer = FrameWriter::new();
        writer.ok_status().expect("ok");
        writer.append("Building").expect("append");
        writer.normal().expect("normal");
        writer.append(" [0 done, 1 running]").expect("append");
        writer.newline().expect("newline");
        writer.append("    Compiling foo").expect("append");

        let lines = writer.into_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Green));
        assert_eq!(lines[0].spans[1].style.fg, None);
        assert_eq!(lines[1].spans[0].content, "    Compiling foo");
    }

    #[test]
    fn frame_contains_title_and_lines() {
        let mut writer = FrameWriter::new();
        writer.append("Idle; 1 / 2 tests").expect("append");
        let frame = render_frame(writer.into_lines(), 40, 4).expect("frame");
        assert!(frame.contains("Progress"));
        assert!(frame.contains("Idle; 1 / 2 tests"));
        assert_eq!(frame.lines().count(), 4);
    }

    #[test]
    fn zero_sized_frame_is_empty() {
        assert!(render_frame(Vec::new(), 0, 0).expect("frame").is_empty());
    }
}
