//! Full and short progress views over a tracker snapshot.
//!
//! Full view:
//!
//! ```text
//! Building [12 done, 31 running]; 1 / 2 tests
//!     Compiling src/main.cc; 2m 5s
//!     Linking bin/tool; 4s
//!     Generating docs
//!     ... 28 more
//! ```
//!
//! Short view:
//!
//! ```text
//! Building Compiling src/main.cc; 2m 5s ... (+30 more); 1 / 2 tests
//! ```

use crate::config::DisplayConfig;
use crate::errors::ProgressError;
use crate::selection::select_visible;
use crate::terminal_writer::TerminalWriter;
use crate::time_format::elapsed_suffix;
use crate::tracker::{StateTracker, TrackerSnapshot};
use crate::types::{RunningAction, TestCounters};

const INDENT: &str = "    ";
const ELLIPSIS: &str = "...";

pub fn write_progress_bar(
    tracker: &StateTracker,
    writer: &mut dyn TerminalWriter,
    now_nanos: u64,
    config: &DisplayConfig,
    short: bool,
) -> Result<(), ProgressError> {
    let snapshot = tracker.snapshot();
    if short {
        write_short(&snapshot, writer, now_nanos, config)
    } else {
        write_full(&snapshot, writer, now_nanos, config)
    }
}

pub fn render_full(
    tracker: &StateTracker,
    writer: &mut dyn TerminalWriter,
    now_nanos: u64,
    config: &DisplayConfig,
) -> Result<(), ProgressError> {
    write_progress_bar(tracker, writer, now_nanos, config, false)
}

pub fn render_short(
    tracker: &StateTracker,
    writer: &mut dyn TerminalWriter,
    now_nanos: u64,
    config: &DisplayConfig,
) -> Result<(), ProgressError> {
    write_progress_bar(tracker, writer, now_nanos, config, true)
}

pub fn write_full(
    snapshot: &TrackerSnapshot,
    writer: &mut dyn TerminalWriter,
    now_nanos: u64,
    config: &DisplayConfig,
) -> Result<(), ProgressError> {
    write_status(snapshot, writer)?;
    let running = snapshot.running.len();
    if running > 0 || snapshot.actions_completed > 0 {
        writer.append(&format!(
            " [{} done, {running} running]",
            snapshot.actions_completed
        ))?;
    }
    write_test_segment(&snapshot.tests, writer)?;

    let selection = select_visible(&snapshot.running, config.max_running_lines);
    for action in selection.shown {
        writer.newline()?;
        writer.append(INDENT)?;
        writer.append(&describe(action, now_nanos, config, None))?;
    }
    if selection.elided > 0 {
        writer.newline()?;
        writer.append(&format!("{INDENT}{ELLIPSIS} {} more", selection.elided))?;
    }
    Ok(())
}

pub fn write_short(
    snapshot: &TrackerSnapshot,
    writer: &mut dyn TerminalWriter,
    now_nanos: u64,
    config: &DisplayConfig,
) -> Result<(), ProgressError> {
    write_status(snapshot, writer)?;
    if let Some(oldest) = snapshot.oldest() {
        writer.append(" ")?;
        writer.append(&describe(
            oldest,
            now_nanos,
            config,
            Some(config.short_message_width),
        ))?;
        let others = snapshot.running.len() - 1;
        if others > 0 {
            writer.append(&format!(" {ELLIPSIS} (+{others} more)"))?;
        }
    }
    write_test_segment(&snapshot.tests, writer)
}

fn write_status(
    snapshot: &TrackerSnapshot,
    writer: &mut dyn TerminalWriter,
) -> Result<(), ProgressError> {
    let status = if snapshot.running.is_empty() {
        "Idle"
    } else {
        "Building"
    };
    writer.ok_status()?;
    writer.append(status)?;
    writer.normal()
}

fn write_test_segment(
    tests: &TestCounters,
    writer: &mut dyn TerminalWriter,
) -> Result<(), ProgressError> {
    match tests.visible() {
        Some((completed, total)) => writer.append(&format!("; {completed} / {total} tests")),
        None => Ok(()),
    }
}

fn describe(
    action: &RunningAction,
    now_nanos: u64,
    config: &DisplayConfig,
    width: Option<usize>,
) -> String {
    let description = single_line(action.description());
    let mut text = match width {
        Some(width) => truncate(&description, width),
        None => description,
    };
    if let Some(elapsed) = elapsed_suffix(action.age_nanos(now_nanos), config.show_time_after_secs)
    {
        text.push_str("; ");
        text.push_str(&elapsed);
    }
    text
}

/// Each item owns exactly one line of output, so embedded line breaks
/// become spaces.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut out = text.chars().take(keep).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}
