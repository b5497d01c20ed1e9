use crate::errors::ProgressError;
use crate::runtime::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub max_running_lines: Option<usize>,
    pub show_time_after_secs: Option<u64>,
    pub follow: bool,
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Running actions listed in the full view; the elision line is extra.
    pub max_running_lines: usize,
    /// Elapsed time is shown once an action has run longer than this.
    pub show_time_after_secs: u64,
    /// Characters of the oldest action's description kept in the short view.
    pub short_message_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayConfig {
    pub follow: bool,
    pub frame_width: u16,
    pub frame_height: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub path: Option<PathBuf>,
    pub max_payload_bytes: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_running_lines: 3,
            show_time_after_secs: 3,
            short_message_width: 60,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            follow: false,
            frame_width: 100,
            frame_height: 12,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_payload_bytes: 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialAppConfig {
    display: Option<PartialDisplayConfig>,
    replay: Option<PartialReplayConfig>,
    logging: Option<PartialLoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialDisplayConfig {
    max_running_lines: Option<usize>,
    show_time_after_secs: Option<u64>,
    short_message_width: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialReplayConfig {
    follow: Option<bool>,
    frame_width: Option<u16>,
    frame_height: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialLoggingConfig {
    path: Option<PathBuf>,
    max_payload_bytes: Option<usize>,
}

pub fn load_config(
    overrides: &CliOverrides,
    fs: &dyn FileSystem,
) -> Result<AppConfig, ProgressError> {
    let mut cfg = AppConfig::default();

    if let Some(path) = &overrides.config_path {
        let file_contents = fs.read_to_string(path)?;
        let partial: PartialAppConfig = toml::from_str(&file_contents)
            .map_err(|e| ProgressError::ConfigParse(e.to_string()))?;
        merge_partial_config(&mut cfg, partial);
    }

    apply_cli_overrides(&mut cfg, overrides);
    validate_config(&cfg)?;
    Ok(cfg)
}

fn merge_partial_config(cfg: &mut AppConfig, partial: PartialAppConfig) {
    if let Some(display) = partial.display {
        if let Some(value) = display.max_running_lines {
            cfg.display.max_running_lines = value;
        }
        if let Some(value) = display.show_time_after_secs {
            cfg.display.show_time_after_secs = value;
        }
        if let Some(value) = display.short_message_width {
            cfg.display.short_message_width = value;
        }
    }

    if let Some(replay) = partial.replay {
        if let Some(value) = replay.follow {
            cfg.replay.follow = value;
        }
        if let Some(value) = replay.frame_width {
            cfg.replay.frame_width = value;
        }
        if let Some(value) = replay.frame_height {
            cfg.replay.frame_height = value;
        }
    }

    if let Some(logging) = partial.logging {
        if let Some(path) = logging.path {
            cfg.logging.path = Some(path);
        }
        if let Some(value) = logging.max_payload_bytes {
            cfg.logging.max_payload_bytes = value;
        }
    }
}

fn apply_cli_overrides(cfg: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(lines) = overrides.max_running_lines {
        cfg.display.max_running_lines = lines;
    }
    if let Some(secs) = overrides.show_time_after_secs {
        cfg.display.show_time_after_secs = secs;
    }
    if overrides.follow {
        cfg.replay.follow = true;
    }
    if let Some(path) = &overrides.log_path {
        cfg.logging.path = Some(path.clone());
    }
}

fn validate_config(cfg: &AppConfig) -> Result<(), ProgressError> {
    if cfg.display.max_running_lines == 0 {
        return Err(ProgressError::InvalidConfig(
            "display.max_running_lines must be greater than zero".to_string(),
        ));
    }

    if cfg.display.short_message_width < 8 {
        return Err(ProgressError::InvalidConfig(
            "display.short_message_width must be at least 8".to_string(),
        ));
    }

    if cfg.replay.frame_width < 20 || cfg.replay.frame_height < 3 {
        return Err(ProgressError::InvalidConfig(
            "replay frame must be at least 20x3".to_string(),
        ));
    }

    if cfg.logging.max_payload_bytes < 16 {
        return Err(ProgressError::InvalidConfig(
            "logging.max_payload_bytes must be at least 16".to_string(),
        ));
    }

    Ok(())
}
