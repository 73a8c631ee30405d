//! Error handling module for pibackbone
//!
//! Provides the error taxonomy of the install engine using thiserror.
//! Glue code (menu, app flow, main) wraps these in `anyhow` and recovers
//! them with `downcast_ref` where the kind matters.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the install engine
#[derive(Error, Debug)]
pub enum PiBackboneError {
    /// Catalog directory failed the allow-list or suffix check
    #[error("Unsafe config directory {path:?}: {reason}")]
    UnsafePath { path: PathBuf, reason: String },

    /// Definition document absent or unreadable
    #[error("Unable to read definitions at {path:?}: {reason}")]
    CatalogMissing { path: PathBuf, reason: String },

    /// Definition document structurally invalid or referentially broken
    #[error("Invalid definitions: {0}")]
    CatalogMalformed(String),

    /// Menu answer matched neither the project nor the services shape
    #[error("Invalid choices in answer: {0}")]
    InvalidAnswer(String),

    /// Selection referenced a name absent from the catalog
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// IO errors outside the catalog read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for install engine operations
pub type Result<T> = std::result::Result<T, PiBackboneError>;

impl PiBackboneError {
    /// Create an unsafe path error
    pub fn unsafe_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsafePath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing catalog error
    pub fn catalog_missing(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CatalogMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed catalog error
    pub fn catalog_malformed(msg: impl Into<String>) -> Self {
        Self::CatalogMalformed(msg.into())
    }

    /// Create an invalid answer error
    pub fn invalid_answer(msg: impl Into<String>) -> Self {
        Self::InvalidAnswer(msg.into())
    }

    /// Create an unknown service error naming the offending key
    pub fn unknown_service(name: impl Into<String>) -> Self {
        Self::UnknownService(name.into())
    }
}
