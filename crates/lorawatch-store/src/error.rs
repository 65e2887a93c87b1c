//! Error types for lorawatch-store.

use std::path::PathBuf;

/// Result type for lorawatch-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lorawatch-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to create the cache directory.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
