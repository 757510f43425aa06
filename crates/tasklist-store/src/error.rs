//! Error types for tasklist store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing the key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write would push the store past its byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Total size the store would have after the write.
        needed: usize,
        /// Configured limit.
        quota: usize,
    },

    /// The stored value is not a valid task list.
    #[error("Stored value under {key} is corrupt: {reason}")]
    Corrupt {
        /// Storage key that was read.
        key: String,
        /// Parser message.
        reason: String,
    },

    /// Failed to serialize the task list.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(String),

    /// Failed to acquire the backend lock.
    #[error("Storage lock error")]
    LockError,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other unclassified error.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<tempfile::PersistError> for StoreError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::IoError(err.error)
    }
}
