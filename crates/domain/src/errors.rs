//! Domain-level errors

use thiserror::Error;

use crate::services::DecodeError;
use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Geometry could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Coordinates outside the valid ranges
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Whether this error stems from malformed upstream geometry
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
