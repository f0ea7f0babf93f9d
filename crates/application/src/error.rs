//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A provider could not be reached or answered with a non-success status
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A provider answered with a body that could not be decoded
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// No archive year produced a usable record
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// A store read or write failed
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// The subscriber channel rejected a tick
    #[error("Delivery failure: {0}")]
    DeliveryFailure(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether this is a per-provider failure that a tick absorbs
    pub const fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::MalformedResponse(_)
        )
    }

    /// Whether an aggregation loop must stop on this error
    pub const fn is_fatal_to_loop(&self) -> bool {
        !self.is_provider_failure()
    }
}
