//! Authoring-service error types

use std::time::Duration;
use thiserror::Error;

/// Errors from the presentation-authoring service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid reply: {0}")]
    InvalidReply(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether a retry could plausibly succeed
    ///
    /// Note that retryable does not mean safe to retry: batch updates are
    /// not idempotent and the executor never resubmits them. This is only
    /// consulted for read calls.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::RateLimited { .. } => true,
            ServiceError::ApiError { status, .. } => *status >= 500,
            ServiceError::Network(_) => true,
            ServiceError::InvalidReply(_) => false,
            ServiceError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(
            ServiceError::RateLimited {
                retry_after: Duration::from_secs(30)
            }
            .is_retryable()
        );
        assert!(
            ServiceError::ApiError {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(
            !ServiceError::ApiError {
                status: 400,
                message: "bad request".to_string()
            }
            .is_retryable()
        );
        assert!(!ServiceError::InvalidReply("garbage".to_string()).is_retryable());
    }
}
