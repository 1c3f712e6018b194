//! Page-oriented dialect (`CDR?` RIFF forms).
//!
//! The document is a little-endian RIFF form whose type carries the format
//! version in its last character. Style records are decoded as they are
//! met; object geometry is staged per `LIST obj ` and collected as a shape
//! when the list closes.
//!
//! # Examples
//!
//! ```
//! use cdrkit::collector::{ParserState, StylesCollector};
//! use cdrkit::common::ParseOptions;
//! use cdrkit::parser::cdr::CdrParser;
//!
//! let data = b"RIFF\x04\x00\x00\x00CDR9";
//! assert!(CdrParser::<StylesCollector>::is_supported(data));
//!
//! let mut state = ParserState::new();
//! let mut collector = StylesCollector::new(&mut state);
//! let mut parser = CdrParser::new(&mut collector, ParseOptions::default());
//! parser.parse(data).unwrap();
//! assert_eq!(parser.version(), 900);
//! ```

pub mod geometry;
pub mod styles;
pub mod units;

use super::record::{FourCc, ListAction, ParseStats, RecordVisitor, RecordWalker, RiffForm};
use crate::collector::{Collector, Shape};
use crate::common::binary::{ByteReader, Endian};
use crate::common::error::{Error, Result};
use crate::common::options::ParseOptions;
use crate::geometry::{Path, Transforms};
use std::io::Read;
use units::Units;

const LIST_PAGE: FourCc = FourCc::new(b"page");
const LIST_OBJECT: FourCc = FourCc::new(b"obj ");
const LIST_COMPRESSED: FourCc = FourCc::new(b"cmpr");

/// Read a u32 element count and make sure that many elements of
/// `element_size` bytes can still follow.
pub(crate) fn read_count(reader: &mut ByteReader<'_>, element_size: usize, what: &str) -> Result<usize> {
    let count = reader.read_u32()? as usize;
    match count.checked_mul(element_size) {
        Some(needed) if needed <= reader.remaining() => Ok(count),
        _ => Err(Error::ParseError(format!(
            "{count} {what} do not fit in {} bytes",
            reader.remaining()
        ))),
    }
}

/// Geometry and style references gathered inside one `LIST obj `
#[derive(Debug, Default)]
struct ObjectStage {
    path: Path,
    transforms: Transforms,
    fill_id: u32,
    outline_id: u32,
}

/// Decoder for the page-oriented dialect.
pub struct CdrParser<'c, C: Collector + ?Sized> {
    collector: &'c mut C,
    options: ParseOptions,
    units: Units,
    objects: Vec<ObjectStage>,
    /// Output sizes of the compressed lists currently being walked
    inflated: Vec<usize>,
    stats: ParseStats,
}

impl<'c, C: Collector + ?Sized> CdrParser<'c, C> {
    pub fn new(collector: &'c mut C, options: ParseOptions) -> Self {
        Self {
            collector,
            options,
            units: Units::new(0),
            objects: Vec::new(),
            inflated: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// Check for a RIFF form of type `CDR?`.
    pub fn is_supported(data: &[u8]) -> bool {
        matches!(
            RiffForm::peek(data),
            Some((FourCc::RIFF, form)) if form.as_bytes().starts_with(b"CDR")
        )
    }

    /// Format version of the last parsed document, e.g. 1300.
    pub fn version(&self) -> u32 {
        self.units.version
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Decode a whole document into the collector.
    ///
    /// Fails on a foreign header, an unknown version code or broken
    /// top-level framing. Records decoded before a framing error have
    /// already been collected.
    pub fn parse(&mut self, data: &[u8]) -> Result<()> {
        let form = RiffForm::read(data)?;
        let code = form.form_type.as_bytes();
        if form.endian != Endian::Little || !code.starts_with(b"CDR") {
            return Err(Error::InvalidFormat(format!(
                "Expected a little-endian CDR form, found {}",
                form.form_type
            )));
        }
        let version = Units::version_from_form(code[3]).ok_or_else(|| {
            Error::Unsupported(format!("Unknown version code in form type {}", form.form_type))
        })?;
        self.units = Units::new(version);
        self.objects.clear();
        self.inflated.clear();
        log::debug!("Parsing CDR version {version}");

        let mut walker = RecordWalker::new(self.options.clone(), form.endian);
        let result = walker.walk(form.body, 0, self);
        self.stats = walker.stats();
        result
    }

    /// Inflate a `cmpr` list: two u32 sizes, then a zlib stream of records.
    ///
    /// Enclosing compressed lists stay alive while their children are
    /// walked, so the limit is what `max_inflated_size` leaves after them.
    fn inflate(&self, children: &[u8]) -> Result<Vec<u8>> {
        let mut reader = ByteReader::new(children, Endian::Little);
        let compressed_size = reader.read_u32()? as usize;
        let uncompressed_size = reader.read_u32()? as usize;
        let live: usize = self.inflated.iter().sum();
        let limit = self.options.max_inflated_size.saturating_sub(live);
        if uncompressed_size > limit {
            return Err(Error::Unsupported(format!(
                "Compressed list declares {uncompressed_size} bytes, limit is {limit}"
            )));
        }

        let stream = reader.rest();
        let stream = &stream[..compressed_size.min(stream.len())];
        let mut decompressed = Vec::with_capacity(uncompressed_size);
        flate2::read::ZlibDecoder::new(stream)
            .take(limit as u64 + 1)
            .read_to_end(&mut decompressed)?;
        if decompressed.len() > limit {
            return Err(Error::Unsupported(format!(
                "Compressed list inflates past {limit} bytes"
            )));
        }
        Ok(decompressed)
    }

    fn read_object(&mut self, body: &[u8]) -> Result<bool> {
        let object = geometry::read_object(&self.units, body)?;
        let Some(stage) = self.objects.last_mut() else {
            return Ok(false);
        };
        if !object.path.is_empty() {
            stage.path = object.path;
        }
        if let Some(fill_id) = object.fill_id {
            stage.fill_id = fill_id;
        }
        if let Some(outline_id) = object.outline_id {
            stage.outline_id = outline_id;
        }
        Ok(true)
    }

    fn read_transforms(&mut self, body: &[u8]) -> Result<bool> {
        let transforms = geometry::read_transforms(&self.units, body)?;
        let Some(stage) = self.objects.last_mut() else {
            return Ok(false);
        };
        for transform in transforms.iter() {
            stage.transforms.push(*transform);
        }
        Ok(true)
    }

    fn read_page_size(&mut self, body: &[u8]) -> Result<bool> {
        let mut reader = ByteReader::new(body, Endian::Little);
        let width = self.units.read_coordinate(&mut reader)?;
        let height = self.units.read_coordinate(&mut reader)?;
        self.collector
            .collect_page_size(width, height, -width / 2.0, -height / 2.0);
        Ok(true)
    }
}

impl<C: Collector + ?Sized> RecordVisitor for CdrParser<'_, C> {
    fn enter_list(&mut self, list_type: FourCc, children: &[u8]) -> ListAction {
        match list_type {
            LIST_PAGE => {
                self.collector.collect_page();
                ListAction::Descend
            },
            LIST_OBJECT => {
                self.objects.push(ObjectStage::default());
                ListAction::Descend
            },
            LIST_COMPRESSED => match self.inflate(children) {
                Ok(records) => {
                    self.inflated.push(records.len());
                    ListAction::Replace(records)
                },
                Err(err) => {
                    log::warn!("Skipping compressed list: {err}");
                    ListAction::Skip
                },
            },
            _ => ListAction::Descend,
        }
    }

    fn exit_list(&mut self, list_type: FourCc) {
        if list_type == LIST_COMPRESSED {
            self.inflated.pop();
            return;
        }
        if list_type != LIST_OBJECT {
            return;
        }
        let Some(mut stage) = self.objects.pop() else {
            return;
        };
        if stage.path.is_empty() {
            return;
        }
        stage.path.transform_all(&stage.transforms);
        self.collector.collect_shape(Shape {
            page: 0,
            path: stage.path,
            fill_id: stage.fill_id,
            outline_id: stage.outline_id,
        });
    }

    fn leaf(&mut self, fourcc: FourCc, body: &[u8]) -> Result<bool> {
        match fourcc.as_bytes() {
            b"vrsn" => {
                let mut reader = ByteReader::new(body, Endian::Little);
                self.units = Units::new(reader.read_u16()? as u32);
                Ok(true)
            },
            b"mcfg" => self.read_page_size(body),
            b"fild" => styles::read_fill(&self.units, body, self.collector).map(|_| true),
            b"outl" => styles::read_outline(&self.units, body, self.collector).map(|_| true),
            b"bmp " => styles::read_bitmap(body, self.collector).map(|_| true),
            b"bmpf" => styles::read_pattern(body, self.collector).map(|_| true),
            b"font" => styles::read_font(&self.units, body, self.collector).map(|_| true),
            b"stlt" => styles::read_text_styles(&self.units, body, self.collector).map(|_| true),
            b"txsm" => styles::read_text(&self.units, body, self.collector).map(|_| true),
            b"iccd" => {
                self.collector.collect_color_profile(body);
                Ok(true)
            },
            b"loda" => self.read_object(body),
            b"trfd" => self.read_transforms(body),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{FillType, ParserState, StylesCollector};
    use crate::geometry::PathCommand;
    use crate::parser::cdr::geometry::tests::loda;
    use crate::parser::record::tests::{list, record, riff};
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    const INCH: i32 = 254_000;

    fn mcfg(width: i32, height: i32) -> Vec<u8> {
        let mut body = width.to_le_bytes().to_vec();
        body.extend_from_slice(&height.to_le_bytes());
        record(b"mcfg", &body)
    }

    fn solid_fill(id: u32, bgr: u32) -> Vec<u8> {
        let mut body = id.to_le_bytes().to_vec();
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(&0x05u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&bgr.to_le_bytes());
        record(b"fild", &body)
    }

    fn rectangle(width: i32, height: i32, fill_id: u32) -> Vec<u8> {
        let geometry: Vec<u8> = [width, height, 0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        record(b"loda", &loda(1, &geometry, fill_id, 0))
    }

    fn parse(data: &[u8], options: ParseOptions) -> (ParserState, Result<()>, ParseStats, u32) {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        let mut parser = CdrParser::new(&mut collector, options);
        let result = parser.parse(data);
        let (stats, version) = (parser.stats(), parser.version());
        (state, result, stats, version)
    }

    #[test]
    fn test_detection() {
        assert!(CdrParser::<StylesCollector>::is_supported(&riff(b"CDRD", &[])));
        assert!(!CdrParser::<StylesCollector>::is_supported(&riff(b"CMX1", &[])));
        assert!(!CdrParser::<StylesCollector>::is_supported(b"RIFF"));
    }

    #[test]
    fn test_page_and_fill() {
        let mut children = mcfg(2 * INCH, 3 * INCH);
        children.extend(list(b"page", &solid_fill(9, 0x0000FF)));
        let (state, result, stats, version) = parse(&riff(b"CDRD", &children), ParseOptions::new());
        result.unwrap();
        assert_eq!(version, 1300);
        assert_eq!(state.pages.len(), 1);
        let page = state.pages[0];
        assert_eq!((page.width, page.height), (2.0, 3.0));
        assert_eq!((page.offset_x, page.offset_y), (-1.0, -1.5));
        assert_eq!(state.fill_styles[&9].kind(), Some(FillType::Solid));
        assert_eq!(state.fill_styles[&9].color1.to_rgb(), 0x0000FF);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_version_record_overrides_form() {
        let mut children = record(b"vrsn", &500u16.to_le_bytes());
        let mut body = 1000i16.to_le_bytes().to_vec();
        body.extend_from_slice(&2000i16.to_le_bytes());
        children.extend(record(b"mcfg", &body));
        children.extend(list(b"page", &[]));
        let (state, result, _, version) = parse(&riff(b"CDRD", &children), ParseOptions::new());
        result.unwrap();
        assert_eq!(version, 500);
        assert_eq!((state.pages[0].width, state.pages[0].height), (1.0, 2.0));
    }

    #[test]
    fn test_unknown_version_code() {
        let (_, result, _, _) = parse(&riff(b"CDR!", &[]), ParseOptions::new());
        assert!(matches!(result, Err(Error::Unsupported(_))));
        let (_, result, _, _) = parse(&riff(b"WAVE", &[]), ParseOptions::new());
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_object_becomes_shape() {
        let mut object = rectangle(INCH, INCH, 4);
        let mut trfd = 1u32.to_le_bytes().to_vec();
        for value in [1.0f64, 0.0, 254_000.0, 0.0, 1.0, 0.0] {
            trfd.extend_from_slice(&value.to_le_bytes());
        }
        object.extend(record(b"trfd", &trfd));
        let page = list(b"page", &list(b"obj ", &object));
        let (state, result, _, _) = parse(&riff(b"CDRD", &page), ParseOptions::new());
        result.unwrap();

        assert_eq!(state.shapes.len(), 1);
        let shape = &state.shapes[0];
        assert_eq!(shape.page, 0);
        assert_eq!(shape.fill_id, 4);
        assert_eq!(shape.path.commands()[0], PathCommand::MoveTo { x: 1.0, y: 0.0 });
        assert_eq!(shape.path.commands()[2], PathCommand::LineTo { x: 2.0, y: 1.0 });
    }

    #[test]
    fn test_geometry_outside_object_is_skipped() {
        let children = list(b"page", &rectangle(INCH, INCH, 0));
        let (state, result, stats, _) = parse(&riff(b"CDRD", &children), ParseOptions::new());
        result.unwrap();
        assert!(state.shapes.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_compressed_list() {
        let inner = solid_fill(3, 0x00FF00);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&inner).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut body = (compressed.len() as u32).to_le_bytes().to_vec();
        body.extend_from_slice(&(inner.len() as u32).to_le_bytes());
        body.extend_from_slice(&compressed);
        let (state, result, _, _) = parse(&riff(b"CDRD", &list(b"cmpr", &body)), ParseOptions::new());
        result.unwrap();
        assert_eq!(state.fill_styles[&3].color1.to_rgb(), 0x00FF00);
    }

    #[test]
    fn test_compressed_list_over_limit_is_skipped() {
        let inner = solid_fill(3, 0x00FF00).repeat(8);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&inner).unwrap();
        let compressed = encoder.finish().unwrap();

        // Understated size, so only the streaming cap catches it
        let mut body = (compressed.len() as u32).to_le_bytes().to_vec();
        body.extend_from_slice(&16u32.to_le_bytes());
        body.extend_from_slice(&compressed);
        let options = ParseOptions::new().with_max_inflated_size(32);
        let (state, result, stats, _) = parse(&riff(b"CDRD", &list(b"cmpr", &body)), options);
        result.unwrap();
        assert!(state.fill_styles.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    fn compressed(inner: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(inner).unwrap();
        let stream = encoder.finish().unwrap();
        let mut body = (stream.len() as u32).to_le_bytes().to_vec();
        body.extend_from_slice(&(inner.len() as u32).to_le_bytes());
        body.extend_from_slice(&stream);
        list(b"cmpr", &body)
    }

    #[test]
    fn test_nested_compressed_lists_share_the_limit() {
        // Each level inflates to ~1000 bytes of padding plus the next level
        let padding = record(b"pad ", &[0; 1000]);
        let mut nested = solid_fill(5, 0);
        for _ in 0..4 {
            let mut inner = padding.clone();
            inner.extend(nested);
            nested = compressed(&inner);
        }
        let data = riff(b"CDRD", &nested);

        let options = ParseOptions::new().with_max_inflated_size(2500);
        let (state, result, stats, _) = parse(&data, options);
        result.unwrap();
        assert!(state.fill_styles.is_empty());
        assert_eq!(stats.skipped, 1 + 2);

        let options = ParseOptions::new().with_max_inflated_size(8000);
        let (state, result, _, _) = parse(&data, options);
        result.unwrap();
        assert!(state.fill_styles.contains_key(&5));
    }

    #[test]
    fn test_sibling_compressed_lists_release_their_budget() {
        let mut children = compressed(&solid_fill(1, 0).repeat(20));
        children.extend(compressed(&solid_fill(2, 0).repeat(20)));
        let options = ParseOptions::new().with_max_inflated_size(600);
        let (state, result, _, _) = parse(&riff(b"CDRD", &children), options);
        result.unwrap();
        assert!(state.fill_styles.contains_key(&1));
        assert!(state.fill_styles.contains_key(&2));
    }

    #[test]
    fn test_corrupt_compressed_list_is_skipped() {
        let mut body = 4u32.to_le_bytes().to_vec();
        body.extend_from_slice(&4u32.to_le_bytes());
        body.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let mut children = list(b"cmpr", &body);
        children.extend(solid_fill(1, 0));
        let (state, result, _, _) = parse(&riff(b"CDRD", &children), ParseOptions::new());
        result.unwrap();
        assert_eq!(state.fill_styles.len(), 1);
    }

    #[test]
    fn test_truncated_record_keeps_earlier_styles() {
        let mut children = solid_fill(1, 0);
        let mut broken = record(b"fild", &[0; 4]);
        broken[4..8].copy_from_slice(&64u32.to_le_bytes());
        children.extend(list(b"page", &broken));
        children.extend(solid_fill(2, 0));
        let (state, result, stats, _) = parse(&riff(b"CDRD", &children), ParseOptions::new());
        result.unwrap();
        assert_eq!(state.fill_styles.len(), 2);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_color_profile_bytes() {
        let children = record(b"iccd", b"prof");
        let (state, result, _, _) = parse(&riff(b"CDRD", &children), ParseOptions::new());
        result.unwrap();
        assert_eq!(state.color_profile.as_deref(), Some(&b"prof"[..]));
    }
}
