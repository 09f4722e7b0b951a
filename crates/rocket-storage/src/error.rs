//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using a store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Scope name cannot be used as a namespace.
    #[error("Invalid scope: {0:?}")]
    InvalidScope(String),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Filesystem error from a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
