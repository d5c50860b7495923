use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io { path: PathBuf, source: std::io::Error },
    Decode { path: PathBuf, source: serde_json::Error },
    Encode(serde_json::Error),
    UnknownEngine(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io { path, source } => {
                write!(f, "unable to read {}: {}", path.display(), source)
            }
            AppError::Decode { path, source } => {
                write!(f, "invalid JSON in {}: {}", path.display(), source)
            }
            AppError::Encode(err) => write!(f, "unable to encode output: {}", err),
            AppError::UnknownEngine(name) => write!(f, "no scoring engine named '{}'", name),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io { source, .. } => Some(source),
            AppError::Decode { source, .. } => Some(source),
            AppError::Encode(err) => Some(err),
            AppError::UnknownEngine(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
