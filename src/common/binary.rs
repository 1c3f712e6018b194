//! Binary data parsing utilities shared by both dialects.
//!
//! [`ByteReader`] is a bounds-checked cursor over a byte slice. The byte order
//! is chosen at runtime because the chunk dialect announces it in its
//! preamble, so every multi-byte read goes through `zerocopy`'s little- or
//! big-endian wrappers depending on [`Endian`].

use zerocopy::{BE, F64, FromBytes, I16, I32, LE, U16, U32, U64};

/// Binary parsing error type
#[derive(Debug, Clone)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Byte order of multi-byte values in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

fn read_failed(name: &str) -> BinaryError {
    BinaryError::ParseError(format!("Failed to read {name}"))
}

macro_rules! read_ordered {
    ($self:ident, $ty:ident, $n:expr, $name:literal) => {{
        let bytes = $self.read_bytes($n)?;
        // The two byte orders have distinct error types
        match $self.endian {
            Endian::Little => $ty::<LE>::read_from_bytes(bytes)
                .map(|v| v.get())
                .map_err(|_| read_failed($name)),
            Endian::Big => $ty::<BE>::read_from_bytes(bytes)
                .map(|v| v.get())
                .map_err(|_| read_failed($name)),
        }
    }};
}

/// Cursor over a borrowed byte range.
///
/// # Examples
///
/// ```
/// use cdrkit::common::binary::{ByteReader, Endian};
///
/// let data = [0x34, 0x12, 0x12, 0x34];
/// let mut le = ByteReader::new(&data, Endian::Little);
/// assert_eq!(le.read_u16().unwrap(), 0x1234);
/// let mut be = ByteReader::new(&data[2..], Endian::Big);
/// assert_eq!(be.read_u16().unwrap(), 0x1234);
/// ```
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to an absolute position inside the range.
    pub fn seek(&mut self, pos: usize) -> BinaryResult<()> {
        if pos > self.data.len() {
            return Err(BinaryError::InsufficientData {
                expected: pos,
                available: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> BinaryResult<()> {
        self.seek(self.pos.saturating_add(n))
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> BinaryResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(BinaryError::InsufficientData {
                expected: self.pos.saturating_add(n),
                available: self.data.len(),
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Borrow the next `n` bytes as a new reader with the same byte order.
    pub fn sub_reader(&mut self, n: usize) -> BinaryResult<ByteReader<'a>> {
        let endian = self.endian;
        Ok(ByteReader::new(self.read_bytes(n)?, endian))
    }

    /// Everything from the cursor to the end, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    pub fn read_u8(&mut self) -> BinaryResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> BinaryResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> BinaryResult<u16> {
        read_ordered!(self, U16, 2, "u16")
    }

    pub fn read_i16(&mut self) -> BinaryResult<i16> {
        read_ordered!(self, I16, 2, "i16")
    }

    pub fn read_u32(&mut self) -> BinaryResult<u32> {
        read_ordered!(self, U32, 4, "u32")
    }

    pub fn read_i32(&mut self) -> BinaryResult<i32> {
        read_ordered!(self, I32, 4, "i32")
    }

    pub fn read_u64(&mut self) -> BinaryResult<u64> {
        read_ordered!(self, U64, 8, "u64")
    }

    pub fn read_f64(&mut self) -> BinaryResult<f64> {
        read_ordered!(self, F64, 8, "f64")
    }

    /// Read a four-character code. Byte order never applies to it.
    pub fn read_fourcc(&mut self) -> BinaryResult<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Peek at the next `n` bytes without advancing.
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        self.data.get(self.pos..end)
    }
}

/// Parse UTF-16LE string from binary data with null terminator handling.
///
/// Unpaired surrogates are replaced with U+FFFD.
///
/// # Examples
///
/// ```
/// use cdrkit::common::binary::parse_utf16le_string;
/// let data = vec![0x48, 0x00, 0x65, 0x00, 0x6C, 0x00, 0x6C, 0x00, 0x6F, 0x00, 0x00, 0x00];
/// assert_eq!(parse_utf16le_string(&data), "Hello");
/// ```
pub fn parse_utf16le_string(data: &[u8]) -> String {
    let units = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0);
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16_both_orders() {
        let data = [0x34, 0x12, 0x78, 0x56];
        let mut reader = ByteReader::new(&data, Endian::Little);
        assert!(reader.read_u16().is_ok_and(|v| v == 0x1234));
        assert!(reader.read_u16().is_ok_and(|v| v == 0x5678));
        assert!(reader.read_u16().is_err());

        let mut reader = ByteReader::new(&data, Endian::Big);
        assert!(reader.read_u16().is_ok_and(|v| v == 0x3412));
    }

    #[test]
    fn test_read_u32_short() {
        let data = [0x78, 0x56, 0x34];
        let mut reader = ByteReader::new(&data, Endian::Little);
        assert!(matches!(
            reader.read_u32(),
            Err(BinaryError::InsufficientData {
                expected: 4,
                available: 3
            })
        ));
        // A failed read does not advance.
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_every_width_in_both_orders() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut le = ByteReader::new(&data, Endian::Little);
        let mut be = ByteReader::new(&data, Endian::Big);
        assert_eq!(le.read_i16().unwrap(), 0x0201);
        assert_eq!(be.read_i16().unwrap(), 0x0102);
        assert_eq!(le.read_u32().unwrap(), 0x0605_0403);
        assert_eq!(be.read_i32().unwrap(), 0x0304_0506);
        assert_eq!(
            ByteReader::new(&data, Endian::Little).read_u64().unwrap(),
            0x0807_0605_0403_0201
        );
        assert_eq!(
            ByteReader::new(&data, Endian::Big).read_u64().unwrap(),
            0x0102_0304_0506_0708
        );
        assert_eq!(
            ByteReader::new(&(-2.25f64).to_le_bytes(), Endian::Little)
                .read_f64()
                .unwrap(),
            -2.25
        );
    }

    #[test]
    fn test_read_f64() {
        let data = 1.5f64.to_be_bytes();
        let mut reader = ByteReader::new(&data, Endian::Big);
        assert_eq!(reader.read_f64().unwrap(), 1.5);
    }

    #[test]
    fn test_sub_reader_is_bounded() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = ByteReader::new(&data, Endian::Little);
        let mut sub = reader.sub_reader(2).unwrap();
        assert_eq!(sub.read_u8().unwrap(), 1);
        assert_eq!(sub.read_u8().unwrap(), 2);
        assert!(sub.read_u8().is_err());
        assert_eq!(reader.read_u8().unwrap(), 3);
    }

    #[test]
    fn test_huge_skip_does_not_overflow() {
        let data = [0u8; 4];
        let mut reader = ByteReader::new(&data, Endian::Little);
        reader.skip(2).unwrap();
        assert!(reader.read_bytes(usize::MAX).is_err());
        assert!(reader.skip(usize::MAX).is_err());
    }

    #[test]
    fn test_parse_utf16le() {
        let data = vec![
            0x48, 0x00, // 'H'
            0x65, 0x00, // 'e'
            0x6C, 0x00, // 'l'
            0x6C, 0x00, // 'l'
            0x6F, 0x00, // 'o'
            0x00, 0x00, // null terminator
            0x41, 0x00,
        ];
        assert_eq!(parse_utf16le_string(&data), "Hello");
    }

    #[test]
    fn test_parse_utf16le_surrogate_pair() {
        // U+1F600 as a surrogate pair
        let data = [0x3D, 0xD8, 0x00, 0xDE];
        assert_eq!(parse_utf16le_string(&data), "\u{1F600}");
    }
}
