//! Upstream error types

use thiserror::Error;

/// Errors that can occur when talking to an upstream service
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection to the upstream service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying (if provided by the service)
        retry_after_secs: Option<u64>,
    },

    /// Service answered with a non-success status
    #[error("Upstream responded with HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse response from the upstream service
    #[error("Parse error: {0}")]
    Parse(String),

    /// Routing engine found no path between the points
    #[error("No route found")]
    NoRoute,

    /// Geocoder found nothing for the query
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl UpstreamError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::Status { status } => *status >= 500,
            Self::RateLimited { .. }
            | Self::Parse(_)
            | Self::NoRoute
            | Self::NotFound(_)
            | Self::Configuration(_) => false,
        }
    }

    /// Map a transport-level reqwest failure
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }

    /// Map a non-success response, reading `Retry-After` on 429
    pub(crate) fn from_status(response: &reqwest::Response) -> Self {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Self::RateLimited {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            };
        }
        Self::Status {
            status: status.as_u16(),
        }
    }
}
