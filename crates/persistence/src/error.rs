//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping IO and JSON errors.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid store document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn invalid_document(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for IO-level failures (disk full, permissions, ...)
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
