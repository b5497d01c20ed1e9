pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod render;
pub mod replay;
pub mod runtime;
pub mod selection;
pub mod terminal_writer;
pub mod time_format;
pub mod tracker;
pub mod tui;
pub mod types;

use clap::{error::ErrorKind, Parser};
use config::{load_config, AppConfig, CliOverrides};
use errors::ProgressError;
use events::parse_event_stream;
use logging::JsonlLogger;
use replay::{replay_events, write_final};
use runtime::{FakeClock, ProductionRuntime};
use serde_json::json;
use std::collections::BTreeMap;
use tracker::StateTracker;

#[derive(Debug, Clone, Parser)]
#[command(name = "buildprogress")]
#[command(about = "Replay build events and render the live progress display")]
pub struct Cli {
    /// JSON Lines event stream to replay.
    #[arg(long)]
    pub events: std::path::PathBuf,
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    /// Render the single-line view instead of the full view.
    #[arg(long, default_value_t = false)]
    pub short: bool,
    /// Draw the display after every event.
    #[arg(long, default_value_t = false)]
    pub follow: bool,
    #[arg(long)]
    pub max_lines: Option<usize>,
    #[arg(long = "show-time-after")]
    pub show_time_after_secs: Option<u64>,
    /// Monotonic time to render the final view at; defaults to the last event.
    #[arg(long)]
    pub now_nanos: Option<u64>,
    #[arg(long)]
    pub log: Option<std::path::PathBuf>,
}

pub fn run() -> Result<i32, ProgressError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let runtime = ProductionRuntime::new();
    run_with_runtime(&args, &runtime)
}

pub fn run_with_runtime(
    args: &[std::ffi::OsString],
    runtime: &ProductionRuntime,
) -> Result<i32, ProgressError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(ProgressError::Cli(error.to_string())),
        },
    };

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
        max_running_lines: cli.max_lines,
        show_time_after_secs: cli.show_time_after_secs,
        follow: cli.follow,
        log_path: cli.log.clone(),
    };
    let cfg = load_config(&overrides, runtime.file_system.as_ref())?;
    let logger = build_logger(&cfg);
    if let Some(logger) = &logger {
        logger.info(
            "config_loaded",
            json!({
                "max_running_lines": cfg.display.max_running_lines,
                "show_time_after_secs": cfg.display.show_time_after_secs,
                "follow": cfg.replay.follow,
            }),
        )?;
    }

    let text = runtime.file_system.read_to_string(&cli.events)?;
    let records = parse_event_stream(&text)?;
    if let Some(logger) = &logger {
        logger.info(
            "events_parsed",
            json!({
                "path": cli.events.display().to_string(),
                "count": records.len(),
                "kinds": count_kinds(&records),
            }),
        )?;
    }

    let started = runtime.clock.now_nanos();
    let tracker = StateTracker::new();
    let clock = FakeClock::default();
    let outcome = replay_events(
        &records,
        &tracker,
        &clock,
        runtime.terminal.as_ref(),
        &cfg,
    )?;
    let now_nanos = cli.now_nanos.unwrap_or(outcome.last_event_nanos);
    write_final(
        &tracker,
        runtime.terminal.as_ref(),
        now_nanos,
        &cfg,
        cli.short,
    )?;

    if let Some(logger) = &logger {
        logger.info(
            "replay_complete",
            json!({
                "events": outcome.events,
                "frames": outcome.frames,
                "running": tracker.running_count(),
                "time_dependent": tracker.is_time_dependent(),
                "now_nanos": now_nanos,
                "replay_wall_nanos": runtime.clock.now_nanos().saturating_sub(started),
            }),
        )?;
    }
    Ok(0)
}

fn count_kinds(records: &[events::EventRecord]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.event.kind()).or_insert(0) += 1;
    }
    counts
}

fn build_logger(cfg: &AppConfig) -> Option<JsonlLogger> {
    cfg.logging
        .path
        .as_ref()
        .map(|path| JsonlLogger::new(path).with_max_payload_bytes(cfg.logging.max_payload_bytes))
}
