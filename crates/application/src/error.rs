//! Application-level errors

use domain::{DecodeError, DomainError};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Nothing matched the request
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DecodeError> for ApplicationError {
    fn from(err: DecodeError) -> Self {
        Self::Domain(DomainError::Decode(err))
    }
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// A rate-limited upstream is never retried.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }

    /// Check if upstream geometry could not be decoded
    pub const fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Domain(err) if err.is_decode_failure())
    }
}
