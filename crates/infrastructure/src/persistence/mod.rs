//! Persistence module
//!
//! SQLite storage for the location catalog and weather sessions.

pub mod async_connection;
pub mod database_health;
pub mod error;
pub mod location_store;
pub mod session_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use location_store::SqliteLocationStore;
pub use session_store::SqliteSessionStore;
