//! Core error types for `QuakeFeed`.

use thiserror::Error;

/// Core error type for `QuakeFeed` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data in a feed document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
