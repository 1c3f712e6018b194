//! Version-dependent value encodings of the page-oriented dialect.

use crate::color::Color;
use crate::common::binary::{BinaryResult, ByteReader};

/// First version that stores 32-bit coordinates and micro-degree angles
pub const WIDE_VALUES_VERSION: u32 = 600;
/// First version that stores font names as UTF-16
pub const UNICODE_VERSION: u32 = 1200;

/// Readers for coordinates, angles and colors at a given format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Units {
    pub version: u32,
}

impl Units {
    pub fn new(version: u32) -> Self {
        Self { version }
    }

    fn wide(&self) -> bool {
        self.version >= WIDE_VALUES_VERSION
    }

    /// Stored coordinate units per inch
    pub fn units_per_inch(&self) -> f64 {
        if self.wide() { 254_000.0 } else { 1000.0 }
    }

    /// Stored size of one coordinate, in bytes
    pub fn coordinate_size(&self) -> usize {
        if self.wide() { 4 } else { 2 }
    }

    /// Coordinate in inches.
    pub fn read_coordinate(&self, reader: &mut ByteReader<'_>) -> BinaryResult<f64> {
        let raw = if self.wide() {
            reader.read_i32()? as f64
        } else {
            reader.read_i16()? as f64
        };
        Ok(raw / self.units_per_inch())
    }

    /// Angle in radians.
    pub fn read_angle(&self, reader: &mut ByteReader<'_>) -> BinaryResult<f64> {
        let raw = reader.read_i32()? as f64;
        let degrees = if self.wide() { raw / 1_000_000.0 } else { raw / 10.0 };
        Ok(degrees.to_radians())
    }

    /// Color as color model, palette id and packed value.
    pub fn read_color(&self, reader: &mut ByteReader<'_>) -> BinaryResult<Color> {
        let model = reader.read_u16()?;
        let _palette = reader.read_u16()?;
        let value = reader.read_u32()?;
        Ok(Color::from_model(model, value))
    }

    /// Version from the form type's last character: `CDR9` is 900, `CDRC`
    /// is 1200.
    pub fn version_from_form(code: u8) -> Option<u32> {
        match code {
            b'0'..=b'9' => Some(100 * (code - b'0') as u32),
            b'A'..=b'Z' => Some(100 * ((code - b'A') as u32 + 10)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::binary::Endian;

    #[test]
    fn test_form_versions() {
        assert_eq!(Units::version_from_form(b'5'), Some(500));
        assert_eq!(Units::version_from_form(b'A'), Some(1000));
        assert_eq!(Units::version_from_form(b'C'), Some(1200));
        assert_eq!(Units::version_from_form(b'x'), None);
    }

    #[test]
    fn test_coordinates_by_version() {
        let data = 2000i16.to_le_bytes();
        let mut reader = ByteReader::new(&data, Endian::Little);
        assert_eq!(Units::new(500).read_coordinate(&mut reader).unwrap(), 2.0);

        let data = 508_000i32.to_le_bytes();
        let mut reader = ByteReader::new(&data, Endian::Little);
        assert_eq!(Units::new(1300).read_coordinate(&mut reader).unwrap(), 2.0);
    }

    #[test]
    fn test_angles_by_version() {
        let data = 900i32.to_le_bytes();
        let mut reader = ByteReader::new(&data, Endian::Little);
        let angle = Units::new(500).read_angle(&mut reader).unwrap();
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let data = 180_000_000i32.to_le_bytes();
        let mut reader = ByteReader::new(&data, Endian::Little);
        let angle = Units::new(900).read_angle(&mut reader).unwrap();
        assert!((angle - std::f64::consts::PI).abs() < 1e-12);
    }
}
