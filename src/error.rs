//! Error types for sats2range.

use thiserror::Error;

/// Error type for sats2range operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter or out-of-range argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Range input rejected by the writer
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Positional access outside a table
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid table file magic bytes
    #[error("invalid magic bytes: expected SATS2RNG header")]
    InvalidMagic,

    /// Unsupported table or header layout version
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// Checksum mismatch
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Invalid header size
    #[error("invalid header size: expected {expected}, got {actual}")]
    InvalidHeaderSize { expected: usize, actual: usize },

    /// Structurally invalid file contents
    #[error("corrupt file: {0}")]
    Corrupt(String),

    /// Malformed cell list input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON format config error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sats2range operations.
pub type Result<T> = std::result::Result<T, Error>;
