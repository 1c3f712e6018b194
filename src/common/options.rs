/// Configuration for the record parsers.
///
/// The defaults are tuned for real-world files; tighten them when decoding
/// input from untrusted sources in memory-constrained environments.
///
/// # Examples
///
/// ```rust
/// use cdrkit::common::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_max_depth(16)
///     .with_max_inflated_size(1 << 20);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Deepest container nesting that is still walked; deeper containers are skipped
    pub max_depth: usize,
    /// Upper bound on the output of a single compressed record list, in bytes
    pub max_inflated_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_inflated_size: 64 * 1024 * 1024,
        }
    }
}

impl ParseOptions {
    /// Create a new `ParseOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container nesting cap.
    #[inline]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the decompression output cap.
    #[inline]
    pub fn with_max_inflated_size(mut self, size: usize) -> Self {
        self.max_inflated_size = size;
        self
    }
}
