use std::env;
use std::fmt;

use crate::scoring::DEFAULT_ENGINE_NAME;

/// Distinguishes runtime behavior for different stages of the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the command line host.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let default_engine =
            env::var("RELEVANCE_ENGINE").unwrap_or_else(|_| DEFAULT_ENGINE_NAME.to_string());
        if default_engine.trim().is_empty() {
            return Err(ConfigError::EmptyEngineName);
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringConfig {
                default_engine: default_engine.trim().to_string(),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Selects which registered engine answers requests that do not name one.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub default_engine: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyEngineName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyEngineName => write!(f, "RELEVANCE_ENGINE must not be blank"),
        }
    }
}

impl std::error::Error for ConfigError {}
