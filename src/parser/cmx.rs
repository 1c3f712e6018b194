// Exchange dialect (`CMX1` forms)
//
// The form may be RIFF or RIFX framed. Record payloads follow the byte order
// named in the `cont` preamble, which also sets the coordinate size and the
// scale of document units. Only the preamble, the color table and page
// boundaries are decoded.

use super::record::{FourCc, ListAction, ParseStats, RecordVisitor, RecordWalker, RiffForm};
use crate::collector::Collector;
use crate::color::Color;
use crate::common::binary::{BinaryResult, ByteReader, Endian};
use crate::common::error::{Error, Result};
use crate::common::options::ParseOptions;

const FORM_TYPE: FourCc = FourCc::new(b"CMX1");
const LIST_PAGE: FourCc = FourCc::new(b"page");
const METERS_PER_INCH: f64 = 0.0254;

/// Decoded `cont` preamble
#[derive(Debug, Clone, PartialEq)]
pub struct CmxHeader {
    /// Byte order of record payloads
    pub endian: Endian,
    /// Stored coordinate size in bytes, 2 or 4
    pub coordinate_size: usize,
    pub version: (u32, u32),
    pub unit: u16,
    /// Meters per document unit
    pub scale: f64,
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Default for CmxHeader {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            coordinate_size: 4,
            version: (0, 0),
            unit: 0,
            scale: 0.0,
            xmin: 0.0,
            ymin: 0.0,
            xmax: 0.0,
            ymax: 0.0,
        }
    }
}

impl CmxHeader {
    const ID_SIZE: usize = 32;
    const OS_SIZE: usize = 16;
    const RESERVED_SIZE: usize = 12;

    /// Decode a `cont` payload; the bounding box is converted to inches.
    pub fn read(body: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(body, Endian::Little);
        reader.skip(Self::ID_SIZE + Self::OS_SIZE)?;

        let endian = match reader.read_bytes(4)?.first() {
            Some(b'4') => Endian::Big,
            Some(b'2') => Endian::Little,
            other => {
                return Err(Error::ParseError(format!(
                    "Unknown byte order flag {other:?}"
                )));
            },
        };
        let coordinate_size = match reader.read_bytes(2)?.first() {
            Some(b'2') => 2,
            Some(b'4') => 4,
            other => {
                return Err(Error::ParseError(format!(
                    "Unknown coordinate size flag {other:?}"
                )));
            },
        };
        reader.set_endian(endian);

        let major = ascii_number(reader.read_bytes(4)?);
        let minor = ascii_number(reader.read_bytes(4)?);
        let unit = reader.read_u16()?;
        let scale = reader.read_f64()?;
        reader.skip(Self::RESERVED_SIZE)?;

        let mut header = Self {
            endian,
            coordinate_size,
            version: (major, minor),
            unit,
            scale,
            ..Self::default()
        };
        header.xmin = header.read_coordinate(&mut reader)?;
        header.ymin = header.read_coordinate(&mut reader)?;
        header.xmax = header.read_coordinate(&mut reader)?;
        header.ymax = header.read_coordinate(&mut reader)?;
        Ok(header)
    }

    /// Coordinate in inches.
    pub fn read_coordinate(&self, reader: &mut ByteReader<'_>) -> BinaryResult<f64> {
        let raw = if self.coordinate_size == 2 {
            reader.read_i16()? as f64
        } else {
            reader.read_i32()? as f64
        };
        Ok(raw * self.scale / METERS_PER_INCH)
    }

    pub fn width(&self) -> f64 {
        (self.xmax - self.xmin).abs()
    }

    pub fn height(&self) -> f64 {
        (self.ymax - self.ymin).abs()
    }
}

fn ascii_number(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as u32))
}

/// Decoder for the exchange dialect.
pub struct CmxParser<'c, C: Collector + ?Sized> {
    collector: &'c mut C,
    options: ParseOptions,
    header: CmxHeader,
    stats: ParseStats,
}

impl<'c, C: Collector + ?Sized> CmxParser<'c, C> {
    pub fn new(collector: &'c mut C, options: ParseOptions) -> Self {
        Self {
            collector,
            options,
            header: CmxHeader::default(),
            stats: ParseStats::default(),
        }
    }

    /// Check for a RIFF or RIFX form of type `CMX1`.
    pub fn is_supported(data: &[u8]) -> bool {
        matches!(
            RiffForm::peek(data),
            Some((FourCc::RIFF | FourCc::RIFX, FORM_TYPE))
        )
    }

    /// Preamble of the last parsed document.
    pub fn header(&self) -> &CmxHeader {
        &self.header
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn parse(&mut self, data: &[u8]) -> Result<()> {
        let form = RiffForm::read(data)?;
        if form.form_type != FORM_TYPE {
            return Err(Error::InvalidFormat(format!(
                "Expected a CMX1 form, found {}",
                form.form_type
            )));
        }
        // Until a preamble says otherwise, payloads follow the framing
        self.header = CmxHeader {
            endian: form.endian,
            ..CmxHeader::default()
        };

        let mut walker = RecordWalker::new(self.options.clone(), form.endian);
        let result = walker.walk(form.body, 0, self);
        self.stats = walker.stats();
        result
    }

    fn read_colors(&mut self, body: &[u8]) -> Result<()> {
        let mut reader = ByteReader::new(body, self.header.endian);
        let count = reader.read_u16()?;
        for index in 0..count as u32 {
            let model = reader.read_u8()?;
            let _palette = reader.read_u8()?;
            let value = reader.read_u32()?;
            self.collector
                .collect_palette_entry(index + 1, 0, Color::from_model(model as u16, value));
        }
        Ok(())
    }
}

impl<C: Collector + ?Sized> RecordVisitor for CmxParser<'_, C> {
    fn enter_list(&mut self, list_type: FourCc, _children: &[u8]) -> ListAction {
        if list_type == LIST_PAGE {
            self.collector.collect_page();
        }
        ListAction::Descend
    }

    fn leaf(&mut self, fourcc: FourCc, body: &[u8]) -> Result<bool> {
        match fourcc.as_bytes() {
            b"cont" => {
                self.header = CmxHeader::read(body)?;
                let header = &self.header;
                log::debug!(
                    "CMX {}.{}, {:?}, {}-byte coordinates",
                    header.version.0,
                    header.version.1,
                    header.endian,
                    header.coordinate_size
                );
                self.collector.collect_page_size(
                    header.width(),
                    header.height(),
                    header.xmin,
                    header.ymin,
                );
                Ok(true)
            },
            b"rclr" => self.read_colors(body).map(|_| true),
            _ => Ok(false),
        }
    }
}
