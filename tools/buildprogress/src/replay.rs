//! Drives a tracker from a recorded event stream, the way a build's event
//! bus would, and draws the progress display along the way.

use crate::config::AppConfig;
use crate::errors::ProgressError;
use crate::events::EventRecord;
use crate::logging::structured_fallback_line;
use crate::render::{write_full, write_progress_bar, write_short};
use crate::runtime::{Clock, FakeClock, Terminal};
use crate::terminal_writer::{AnsiTerminalWriter, StringTerminalWriter};
use crate::tracker::StateTracker;
use crate::tui::{render_frame, FrameWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub events: usize,
    pub frames: usize,
    pub last_event_nanos: u64,
}

/// Applies `records` in order. The clock follows event timestamps but never
/// moves backwards. With `replay.follow` set, a frame is drawn after every
/// event.
pub fn replay_events(
    records: &[EventRecord],
    tracker: &StateTracker,
    clock: &FakeClock,
    terminal: &dyn Terminal,
    cfg: &AppConfig,
) -> Result<ReplayOutcome, ProgressError> {
    let mut frames = 0usize;
    for record in records {
        if record.at_nanos > clock.now_nanos() {
            clock.set_nanos(record.at_nanos);
        }
        tracker.apply(&record.event);
        if cfg.replay.follow {
            draw_intermediate(tracker, terminal, clock.now_nanos(), cfg)?;
            frames += 1;
        }
    }
    Ok(ReplayOutcome {
        events: records.len(),
        frames,
        last_event_nanos: clock.now_nanos(),
    })
}

fn draw_intermediate(
    tracker: &StateTracker,
    terminal: &dyn Terminal,
    now_nanos: u64,
    cfg: &AppConfig,
) -> Result<(), ProgressError> {
    let snapshot = tracker.snapshot();
    if terminal.is_tty() {
        let mut writer = FrameWriter::new();
        write_full(&snapshot, &mut writer, now_nanos, &cfg.display)?;
        let frame = render_frame(
            writer.into_lines(),
            cfg.replay.frame_width,
            cfg.replay.frame_height,
        )?;
        terminal.draw(&frame)
    } else {
        let mut writer = StringTerminalWriter::new();
        write_short(&snapshot, &mut writer, now_nanos, &cfg.display)?;
        let status = if snapshot.running.is_empty() {
            "idle"
        } else {
            "building"
        };
        terminal.write_line(&structured_fallback_line(
            status,
            snapshot.running.len(),
            writer.written(),
        ))
    }
}

/// Writes the final progress view: ANSI-styled on a tty, plain otherwise.
pub fn write_final(
    tracker: &StateTracker,
    terminal: &dyn Terminal,
    now_nanos: u64,
    cfg: &AppConfig,
    short: bool,
) -> Result<(), ProgressError> {
    if terminal.is_tty() {
        let mut writer = AnsiTerminalWriter::new(Vec::new());
        write_progress_bar(tracker, &mut writer, now_nanos, &cfg.display, short)?;
        writer.flush()?;
        let text = String::from_utf8(writer.into_inner())
            .map_err(|e| ProgressError::Render(e.to_string()))?;
        terminal.write_line(&text)
    } else {
        let mut writer = StringTerminalWriter::new();
        write_progress_bar(tracker, &mut writer, now_nanos, &cfg.display, short)?;
        terminal.write_line(writer.written())
    }
}

#[cfg(test)]
mod tests {
    use super::{replay_events, write_final};
    use crate::config::AppConfig;
    use crate::events::parse_event_stream;
    use crate::runtime::{Clock, FakeClock, FakeTerminal};
    use crate::tracker::StateTracker;

    const STREAM: &str = r#"
{"at_nanos":2000000000,"type":"action_started","primary_output":"bin/foo","message":"Building foo","start_nanos":2000000000}
{"at_nanos":3000000000,"type":"action_started","primary_output":"bin/bar","message":"Building bar","start_nanos":3000000000}
{"at_nanos":1000000000,"type":"action_completion","primary_output":"bin/bar"}
"#;

    fn follow_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.replay.follow = true;
        cfg
    }

    #[test]
    fn clock_never_moves_backwards() {
        let records = parse_event_stream(STREAM).expect("parse");
        let tracker = StateTracker::new();
        let clock = FakeClock::default();
        let terminal = FakeTerminal::new(false);
        let outcome =
            replay_events(&records, &tracker, &clock, &terminal, &AppConfig::default())
                .expect("replay");

        assert_eq!(outcome.events, 3);
        assert_eq!(outcome.frames, 0);
        assert_eq!(outcome.last_event_nanos, 3_000_000_000);
        assert_eq!(clock.now_nanos(), 3_000_000_000);
        assert_eq!(tracker.running_count(), 1);
        assert!(terminal.written_lines().is_empty());
    }

    #[test]
    fn follow_writes_fallback_lines_without_tty() {
        let records = parse_event_stream(STREAM).expect("parse");
        let terminal = FakeTerminal::new(false);
        replay_events(
            &records,
            &StateTracker::new(),
            &FakeClock::default(),
            &terminal,
            &follow_config(),
        )
        .expect("replay");

        let lines = terminal.written_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "status=building running=1 message=Building Building foo");
        assert!(lines[1].contains("(+1 more)"));
        assert!(lines[2].starts_with("status=building running=1"));
    }

    #[test]
    fn follow_draws_frames_on_tty() {
        let records = parse_event_stream(STREAM).expect("parse");
        let terminal = FakeTerminal::new(true);
        let outcome = replay_events(
            &records,
            &StateTracker::new(),
            &FakeClock::default(),
            &terminal,
            &follow_config(),
        )
        .expect("replay");

        assert_eq!(outcome.frames, 3);
        let frames = terminal.drawn_frames();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].contains("Building bar"));
        assert!(frames[2].contains("Building foo"));
    }

    #[test]
    fn final_view_is_plain_without_tty() {
        let tracker = StateTracker::new();
        tracker.test_filtering_complete(2);
        tracker.test_summary();
        let terminal = FakeTerminal::new(false);
        write_final(&tracker, &terminal, 0, &AppConfig::default(), true).expect("final");
        assert_eq!(terminal.written_lines(), vec!["Idle; 1 / 2 tests".to_string()]);
    }

    #[test]
    fn final_view_is_styled_on_tty() {
        let terminal = FakeTerminal::new(true);
        write_final(&StateTracker::new(), &terminal, 0, &AppConfig::default(), false)
            .expect("final");
        let lines = terminal.written_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Idle"));
        assert!(lines[0].contains('\u{1b}'));
    }
}
