//! Unified error type for the decoder.
//!
//! Only failures that make the rest of a document unreadable travel through
//! this type. Record-level problems are logged and skipped by the parsers.
use thiserror::Error;

/// Main error type for decoding operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error occurred
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid file format (wrong magic or form type)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Corrupted or malformed record framing
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;
