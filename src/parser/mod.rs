//! Record parsers for both document dialects.
//!
//! [`parse_document`] sniffs the form type and runs the matching dialect
//! with a [`StylesCollector`]. Use [`CdrParser`] or [`CmxParser`] directly to
//! feed a custom [`Collector`](crate::collector::Collector) or to read the
//! parse statistics.

pub mod cdr;
pub mod cmx;
pub mod record;

pub use cdr::CdrParser;
pub use cmx::{CmxHeader, CmxParser};
pub use record::{FourCc, ParseStats, RecordVisitor, RecordWalker, RiffForm};

use crate::collector::{ParserState, StylesCollector};
use crate::common::error::{Error, Result};
use crate::common::options::ParseOptions;

/// Decode a complete document into a fresh [`ParserState`].
///
/// # Examples
///
/// ```
/// use cdrkit::common::ParseOptions;
/// use cdrkit::parser::parse_document;
///
/// let state = parse_document(b"RIFF\x04\x00\x00\x00CDRD", &ParseOptions::default()).unwrap();
/// assert!(state.is_empty());
/// assert!(parse_document(b"GIF89a", &ParseOptions::default()).is_err());
/// ```
pub fn parse_document(data: &[u8], options: &ParseOptions) -> Result<ParserState> {
    let mut state = ParserState::new();
    let mut collector = StylesCollector::new(&mut state);

    if CdrParser::<StylesCollector>::is_supported(data) {
        let mut parser = CdrParser::new(&mut collector, options.clone());
        parser.parse(data)?;
        log::debug!("Parsed CDR {}: {:?}", parser.version(), parser.stats());
    } else if CmxParser::<StylesCollector>::is_supported(data) {
        let mut parser = CmxParser::new(&mut collector, options.clone());
        parser.parse(data)?;
        log::debug!("Parsed CMX: {:?}", parser.stats());
    } else {
        return Err(Error::InvalidFormat(
            "Not a CDR or CMX document".to_string(),
        ));
    }

    Ok(state)
}
