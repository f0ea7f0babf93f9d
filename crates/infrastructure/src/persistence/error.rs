//! Shared error mapping for sqlx persistence layer

use application::error::ApplicationError;

/// Map a sqlx error to an application-layer error
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::RowNotFound => {
            ApplicationError::NotFound("Database record not found".to_string())
        },
        sqlx::Error::Database(db_err) => {
            ApplicationError::PersistenceFailure(format!("Database error: {db_err}"))
        },
        other => ApplicationError::PersistenceFailure(format!("Database error: {other}")),
    }
}

/// Map a JSON column encode/decode failure
pub fn map_json_error(column: &str, e: &serde_json::Error) -> ApplicationError {
    ApplicationError::PersistenceFailure(format!("Invalid JSON in column {column}: {e}"))
}

/// Format a timestamp column
///
/// Fixed precision and a `Z` suffix keep stored values ordered as text.
pub fn format_datetime(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Parse an RFC3339 timestamp column
pub fn parse_datetime(s: &str) -> Result<chrono::DateTime<chrono::Utc>, ApplicationError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| ApplicationError::PersistenceFailure(format!("Invalid timestamp {s}: {e}")))
}
