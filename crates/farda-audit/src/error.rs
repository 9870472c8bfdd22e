//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while recording or querying audit events.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to write to or read from the storage backend.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Failed to serialize an event.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
