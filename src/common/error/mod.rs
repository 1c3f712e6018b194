//! Unified error types.
//!
//! Low-level short reads surface as [`crate::common::binary::BinaryError`] and
//! convert into [`Error`] at record boundaries.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
