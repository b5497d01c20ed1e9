use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cli error: {0}")]
    Cli(String),
    #[error("event stream line {line}: {message}")]
    EventParse { line: usize, message: String },
    #[error("render error: {0}")]
    Render(String),
}
