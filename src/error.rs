//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A live entry already exists for the key
    #[error("Item {0} already exists")]
    AlreadyExists(String),

    /// No live entry exists for the key
    #[error("Item {0} does not exist")]
    NotFound(String),

    /// The snapshot codec could not serialize the stored entries
    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    /// The snapshot stream was malformed or truncated
    #[error("Snapshot decoding failed: {0}")]
    Decode(String),

    /// Underlying stream or file error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
