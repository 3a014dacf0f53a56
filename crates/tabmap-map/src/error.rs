//! Error types for durable storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a [`crate::KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temp file could not be renamed over the target.
    #[error("failed to replace {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded.
    #[error("failed to serialize configuration snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}
