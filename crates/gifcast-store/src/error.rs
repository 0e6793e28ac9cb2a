//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the user store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A user with this token already exists")]
    DuplicateToken,

    #[error("Store backend error: {0}")]
    Backend(String),
}
