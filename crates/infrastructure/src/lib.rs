//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: weather providers and
//! the archive over HTTP, location and session stores over SQLite, plus
//! configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AggregationAppConfig, AppConfig, ConfigError, DatabaseConfig, RetentionAppConfig,
    ServerConfig, TelemetryAppConfig, WeatherAppConfig,
};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteDatabaseHealth,
    SqliteLocationStore, SqliteSessionStore,
};
pub use telemetry::{LogFormat, TelemetryError, init_telemetry};
