//! Error types for jsonkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for jsonkv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("no such key \"{key}\"")]
    NoSuchKey { key: String },

    // -------------------------------------------------------------------------
    // Value Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("Decoding error for key \"{key}\": {source}")]
    Decoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Pattern Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key pattern: {0}")]
    Pattern(#[from] regex::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// True for the one error callers are expected to handle routinely
    pub fn is_no_such_key(&self) -> bool {
        matches!(self, KvError::NoSuchKey { .. })
    }
}
