//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The adapter was asked for an entity kind that is neither a registered
    /// content type nor a registered account role.
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A backend lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}
