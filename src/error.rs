//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = DictError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, IO, or state decoding.
#[derive(Debug, Error)]
pub enum DictError {
    /// Dictionary or ingest configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A persisted dictionary blob could not be decoded into a valid state.
    #[error("corrupt dictionary state: {0}")]
    CorruptState(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// Encoding a dictionary or multiset failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for DictError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl DictError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }

    /// Helper constructor for rejected persisted state.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptState(message.into())
    }
}
