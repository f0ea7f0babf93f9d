//! Stratus HTTP presentation layer
//!
//! Serves the location catalog, health probes and the websocket
//! subscription that streams aggregated ticks.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::{AppState, Ports};
pub use tasks::spawn_session_retention_task;
