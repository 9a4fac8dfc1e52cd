//! Fetch error types.

use quakefeed_core::FeedFailure;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL could not be built.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// HTTP request failed (connect, timeout, or body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a status other than 200.
    #[error("Unexpected status: HTTP {0}")]
    HttpStatus(u16),
}

impl FetchError {
    /// Maps this error onto the failure recorded in a load outcome.
    pub fn to_failure(&self) -> FeedFailure {
        match self {
            Self::MalformedRequest(detail) => FeedFailure::MalformedRequest {
                detail: detail.clone(),
            },
            Self::Http(err) if err.is_builder() => FeedFailure::MalformedRequest {
                detail: err.to_string(),
            },
            Self::Http(err) => FeedFailure::Network {
                detail: network_detail(err),
            },
            Self::HttpStatus(status) => FeedFailure::HttpStatus { status: *status },
        }
    }
}

fn network_detail(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else {
        err.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_request_failure() {
        let err = FetchError::MalformedRequest("relative URL without a base".to_string());
        assert_eq!(
            err.to_failure(),
            FeedFailure::MalformedRequest {
                detail: "relative URL without a base".to_string()
            }
        );
    }

    #[test]
    fn test_status_failure() {
        let err = FetchError::HttpStatus(503);
        assert_eq!(err.to_string(), "Unexpected status: HTTP 503");
        assert_eq!(err.to_failure(), FeedFailure::HttpStatus { status: 503 });
    }
}
