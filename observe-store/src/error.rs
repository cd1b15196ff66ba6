//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a store or link index can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id has no forks in this store.
    ///
    /// Export treats this as "absent", never as a failure.
    #[error("element not found: {0}")]
    NotFound(String),

    /// The backend could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document could not be interpreted.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true for the not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
