//! API error handling
//!
//! Maps application errors to HTTP status codes and a small JSON body.
//! The same `{error, message}` shape is sent over the websocket when a
//! subscription cannot start.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Body for an application error, with internals withheld
    pub fn from_application_error(err: &ApplicationError) -> Self {
        let message = match err {
            ApplicationError::PersistenceFailure(_)
            | ApplicationError::Configuration(_)
            | ApplicationError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };
        Self::new(error_code(err), message)
    }
}

/// Stable code for an application error
pub const fn error_code(err: &ApplicationError) -> &'static str {
    match err {
        ApplicationError::Domain(_) => "invalid_request",
        ApplicationError::NotFound(_) => "not_found",
        ApplicationError::InsufficientHistory(_) => "insufficient_history",
        ApplicationError::ProviderUnavailable(_) | ApplicationError::MalformedResponse(_) => {
            "provider_unavailable"
        },
        ApplicationError::DeliveryFailure(_) => "delivery_failure",
        ApplicationError::PersistenceFailure(_)
        | ApplicationError::Configuration(_)
        | ApplicationError::Internal(_) => "internal_error",
    }
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(msg) => ErrorResponse::new("bad_request", msg),
            Self::NotFound(msg) => ErrorResponse::new("not_found", msg),
            Self::ServiceUnavailable(msg) => ErrorResponse::new("service_unavailable", msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                ErrorResponse::new("internal_error", "An internal error occurred")
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::InsufficientHistory(msg)
            | ApplicationError::ProviderUnavailable(msg)
            | ApplicationError::MalformedResponse(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::PersistenceFailure(msg)
            | ApplicationError::DeliveryFailure(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ServiceUnavailable("x".into()).into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_error_is_bad_request() {
        let err: ApiError =
            ApplicationError::Domain(domain::DomainError::ValidationError("blank".into())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn persistence_failure_is_internal() {
        let err: ApiError = ApplicationError::PersistenceFailure("disk full".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn insufficient_history_is_unavailable() {
        let err: ApiError = ApplicationError::InsufficientHistory("0 years".into()).into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn error_body_withholds_internals() {
        let body = ErrorResponse::from_application_error(&ApplicationError::PersistenceFailure(
            "sqlite:/var/lib/stratus.db locked".into(),
        ));
        assert_eq!(body.error, "internal_error");
        assert!(!body.message.contains("sqlite"));
    }

    #[test]
    fn error_body_keeps_not_found_detail() {
        let body = ErrorResponse::from_application_error(&ApplicationError::NotFound(
            "location 42".into(),
        ));
        assert_eq!(body.error, "not_found");
        assert!(body.message.contains("location 42"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "not_found");
    }
}
