//! Background tasks for the HTTP presentation layer

mod session_retention;

pub use session_retention::spawn_session_retention_task;
