//! Error types for publishing.

use thiserror::Error;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing an artifact.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("GIPHY_API_KEY is not set")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Malformed upload response: {0}")]
    InvalidResponse(String),

    #[error("IO error reading artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let err = PublishError::RequestFailed {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_retryable());

        let err = PublishError::RequestFailed {
            status: 403,
            body: String::new(),
        };
        assert!(!err.is_retryable());

        assert!(!PublishError::MissingApiKey.is_retryable());
    }
}
