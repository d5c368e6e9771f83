//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The hook payload was not a valid event object.
    #[error("{0}")]
    MalformedInput(#[source] serde_json::Error),

    /// Failed to serialize a structured field for storage.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Storage error (open, schema creation, insert or commit).
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

