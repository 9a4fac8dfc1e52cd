//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Settings key is not recognised.
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// Settings value is not valid for its key.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// The setting being changed.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
