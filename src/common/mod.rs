//! Common types and utilities shared by both dialects.

// Submodule declarations
pub mod binary;
pub mod encoding;
pub mod error;
pub mod options;

// Re-exports for convenience
pub use binary::{ByteReader, Endian};
pub use error::{Error, Result};
pub use options::ParseOptions;
