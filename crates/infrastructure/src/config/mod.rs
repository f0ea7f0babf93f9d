//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `weather`: provider endpoints and credentials
//! - `aggregation`: tick interval, lookback, fetch timeout, prediction timezone
//! - `retention`: session pruning
//! - `telemetry`: log filtering
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then `STRATUS_*` environment variables with `__` between nested keys
//! (e.g. `STRATUS_SERVER__PORT=9000`).

mod aggregation;
mod database;
mod retention;
mod server;
mod telemetry;
mod weather;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use aggregation::AggregationAppConfig;
pub use database::DatabaseConfig;
pub use retention::{MAX_AGE_DAYS_LIMIT, RetentionAppConfig};
pub use server::ServerConfig;
pub use telemetry::TelemetryAppConfig;
pub use weather::WeatherAppConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "STRATUS";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Values loaded but are unusable
    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Aggregation loop configuration
    #[serde(default)]
    pub aggregation: AggregationAppConfig,

    /// Session retention configuration
    #[serde(default)]
    pub retention: RetentionAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required if given) and
    /// environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.server.port == 0 {
            problems.push("server.port must be non-zero".to_string());
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be at least 1".to_string());
        }
        if self.aggregation.tick_interval_ms == 0 {
            problems.push("aggregation.tick_interval_ms must be non-zero".to_string());
        }
        if self.aggregation.lookback_years == 0 {
            problems.push("aggregation.lookback_years must be at least 1".to_string());
        }
        if self.aggregation.fetch_timeout_secs == 0 {
            problems.push("aggregation.fetch_timeout_secs must be non-zero".to_string());
        }
        if let Err(e) = self.aggregation.timezone() {
            problems.push(format!("aggregation.prediction_timezone: {e}"));
        }
        if self.weather.timeout_secs == 0 {
            problems.push("weather.timeout_secs must be non-zero".to_string());
        }
        if self.retention.enabled {
            if self.retention.interval_secs == 0 {
                problems.push("retention.interval_secs must be non-zero".to_string());
            }
            if self.retention.max_age_days == 0 {
                problems.push("retention.max_age_days must be at least 1".to_string());
            }
            if self.retention.max_age_days > MAX_AGE_DAYS_LIMIT {
                problems.push(format!(
                    "retention.max_age_days must be at most {MAX_AGE_DAYS_LIMIT}"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
