//! Storage error types.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted lists.
///
/// A failed write leaves the in-memory list authoritative; callers may
/// report or ignore it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused the write because it would exceed its quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Entries could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No platform data directory could be found.
    #[error("Storage directory resolution failed")]
    DirResolutionFailed,
}

impl StorageError {
    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }
}
