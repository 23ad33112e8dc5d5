//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the realtime database.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// Key path is empty where a child is required, or contains a
    /// forbidden character.
    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The database cannot be reached.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// The database refused a write.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No value at the path when one was expected.
    #[error("No value at {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::Serialization(e.to_string())
    }
}
