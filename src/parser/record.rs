// RIFF record framing
//
// Both dialects are RIFF-style streams: a four-character code, a 32-bit
// length and `length` payload bytes padded to an even size. `LIST` records
// nest a list type and further records. The walker below owns framing, the
// depth cap and the statistics; a `RecordVisitor` supplies the meaning.

use crate::common::binary::{BinaryResult, ByteReader, Endian};
use crate::common::error::{Error, Result};
use crate::common::options::ParseOptions;
use std::fmt;

/// Four-character record or list code
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const RIFF: FourCc = FourCc(*b"RIFF");
    pub const RIFX: FourCc = FourCc(*b"RIFX");
    pub const LIST: FourCc = FourCc(*b"LIST");

    pub const fn new(code: &[u8; 4]) -> Self {
        Self(*code)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}

/// Record header: code plus payload length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub fourcc: FourCc,
    pub length: u32,
}

impl RecordHeader {
    pub const SIZE: usize = 8;

    pub fn read(reader: &mut ByteReader<'_>) -> BinaryResult<Self> {
        let fourcc = FourCc(reader.read_fourcc()?);
        let length = reader.read_u32()?;
        Ok(Self { fourcc, length })
    }

    /// Payload length rounded up to the even boundary of the next record.
    pub fn padded_length(&self) -> usize {
        let length = self.length as usize;
        length + (length & 1)
    }
}

/// Outermost `RIFF`/`RIFX` record of a document
#[derive(Debug, Clone, Copy)]
pub struct RiffForm<'a> {
    /// Byte order of record lengths
    pub endian: Endian,
    pub form_type: FourCc,
    /// Records following the form type
    pub body: &'a [u8],
}

impl<'a> RiffForm<'a> {
    /// Read the outer record. Fails on a wrong magic or a length that
    /// overruns the input.
    pub fn read(data: &'a [u8]) -> Result<Self> {
        let endian = match data.get(..4) {
            Some(b"RIFF") => Endian::Little,
            Some(b"RIFX") => Endian::Big,
            _ => {
                return Err(Error::InvalidFormat(
                    "Missing RIFF or RIFX signature".to_string(),
                ));
            },
        };
        let mut reader = ByteReader::new(data, endian);
        let header = RecordHeader::read(&mut reader)?;
        if header.length < 4 {
            return Err(Error::InvalidFormat(format!(
                "{} record too short for a form type: {} bytes",
                header.fourcc, header.length
            )));
        }
        let payload = reader.read_bytes(header.length as usize).map_err(|_| {
            Error::CorruptedFile(format!(
                "{} record declares {} bytes, only {} available",
                header.fourcc,
                header.length,
                data.len() - RecordHeader::SIZE
            ))
        })?;
        let (form_type, body) = payload.split_at(4);
        Ok(Self {
            endian,
            form_type: FourCc([form_type[0], form_type[1], form_type[2], form_type[3]]),
            body,
        })
    }

    /// Cheap probe of the magic and form type, without validating lengths.
    pub fn peek(data: &[u8]) -> Option<(FourCc, FourCc)> {
        let magic = data.get(..4)?;
        let form = data.get(8..12)?;
        Some((
            FourCc([magic[0], magic[1], magic[2], magic[3]]),
            FourCc([form[0], form[1], form[2], form[3]]),
        ))
    }
}

/// What the walker should do with a `LIST` record
#[derive(Debug)]
pub enum ListAction {
    /// Walk the list's children
    Descend,
    /// Ignore the list entirely
    Skip,
    /// Walk the given bytes in place of the list's children
    Replace(Vec<u8>),
}

/// Counters describing how much of a stream was understood
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Records whose header was read, containers included
    pub records: usize,
    /// `LIST` records walked into
    pub containers: usize,
    /// Records skipped: unknown tags, lists over the depth cap or refused
    pub skipped: usize,
    /// Records whose payload failed to decode, or lists with broken framing
    pub failed: usize,
}

/// Dialect-specific record handling.
pub trait RecordVisitor {
    /// Called on entering a `LIST`; `children` follows the list type.
    fn enter_list(&mut self, _list_type: FourCc, _children: &[u8]) -> ListAction {
        ListAction::Descend
    }

    /// Called after the children of a walked list.
    fn exit_list(&mut self, _list_type: FourCc) {}

    /// Decode a leaf record. `Ok(false)` marks a tag the dialect ignores.
    fn leaf(&mut self, fourcc: FourCc, body: &[u8]) -> Result<bool>;
}

/// Walks nested records and dispatches them to a [`RecordVisitor`].
#[derive(Debug, Clone)]
pub struct RecordWalker {
    options: ParseOptions,
    endian: Endian,
    stats: ParseStats,
}

impl RecordWalker {
    pub fn new(options: ParseOptions, endian: Endian) -> Self {
        Self {
            options,
            endian,
            stats: ParseStats::default(),
        }
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Walk every record in `data`, a range at nesting level `depth`.
    ///
    /// A record whose length overruns `data` makes the rest of the range
    /// unreadable and is returned as [`Error::CorruptedFile`]. Fewer than
    /// eight trailing bytes are ignored.
    pub fn walk<V: RecordVisitor + ?Sized>(
        &mut self,
        data: &[u8],
        depth: usize,
        visitor: &mut V,
    ) -> Result<()> {
        let mut reader = ByteReader::new(data, self.endian);
        while reader.remaining() >= RecordHeader::SIZE {
            let offset = reader.position();
            let header = RecordHeader::read(&mut reader)?;
            let body = reader.read_bytes(header.length as usize).map_err(|_| {
                Error::CorruptedFile(format!(
                    "Record {} at offset {} declares {} bytes, {} left",
                    header.fourcc,
                    offset,
                    header.length,
                    data.len() - offset - RecordHeader::SIZE
                ))
            })?;
            if header.padded_length() > body.len() && !reader.at_end() {
                reader.skip(1)?;
            }
            self.stats.records += 1;

            if header.fourcc == FourCc::LIST {
                self.walk_list(body, depth, visitor);
            } else {
                self.visit_leaf(header.fourcc, body, offset, visitor);
            }
        }
        Ok(())
    }

    fn walk_list<V: RecordVisitor + ?Sized>(&mut self, body: &[u8], depth: usize, visitor: &mut V) {
        let Some((list_type, children)) = body.split_first_chunk::<4>() else {
            log::debug!("LIST record of {} bytes has no list type", body.len());
            self.stats.skipped += 1;
            return;
        };
        let list_type = FourCc(*list_type);
        if depth + 1 > self.options.max_depth {
            log::warn!(
                "Skipping LIST {list_type}: nesting deeper than {}",
                self.options.max_depth
            );
            self.stats.skipped += 1;
            return;
        }

        let replaced;
        let children = match visitor.enter_list(list_type, children) {
            ListAction::Skip => {
                self.stats.skipped += 1;
                return;
            },
            ListAction::Descend => children,
            ListAction::Replace(bytes) => {
                replaced = bytes;
                replaced.as_slice()
            },
        };
        self.stats.containers += 1;
        if let Err(err) = self.walk(children, depth + 1, visitor) {
            log::warn!("Abandoning rest of LIST {list_type}: {err}");
            self.stats.failed += 1;
        }
        visitor.exit_list(list_type);
    }

    fn visit_leaf<V: RecordVisitor + ?Sized>(
        &mut self,
        fourcc: FourCc,
        body: &[u8],
        offset: usize,
        visitor: &mut V,
    ) {
        match visitor.leaf(fourcc, body) {
            Ok(true) => {},
            Ok(false) => self.stats.skipped += 1,
            Err(err) => {
                log::debug!("Failed to decode {fourcc} record at offset {offset}: {err}");
                self.stats.failed += 1;
            },
        }
    }
}
