//! Storage error types.

use thiserror::Error;

use crate::core::security::KeySecurityError;

/// Result type for blob store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading or writing blobs.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key does not name a file inside the storage root.
    #[error("Invalid storage key: {0}")]
    InvalidKey(#[from] KeySecurityError),

    /// I/O failure for a specific key.
    #[error("I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on the storage root itself.
    #[error("I/O error on storage root: {0}")]
    Root(#[source] std::io::Error),
}

impl StorageError {
    /// Create an I/O error for a key.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}
