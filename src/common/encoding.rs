//! Character encoding utilities for text and font records.
//!
//! Text runs carry either UTF-16LE code units or single bytes in the legacy
//! character set declared by the active character style. Character sets are
//! Windows font charsets (`ANSI_CHARSET`, `SHIFTJIS_CHARSET`, ...), which map
//! onto Windows codepages and from there onto `encoding_rs` encodings.

use encoding_rs::Encoding;

/// Map a Windows font charset identifier to a Windows codepage.
///
/// Unknown charsets map to 1252, the codepage the format falls back to.
///
/// # Examples
/// ```
/// use cdrkit::common::encoding::charset_to_codepage;
///
/// assert_eq!(charset_to_codepage(0), 1252);
/// assert_eq!(charset_to_codepage(204), 1251);
/// ```
#[inline]
pub const fn charset_to_codepage(charset: u16) -> u32 {
    match charset {
        0x80 => 932,  // SHIFTJIS_CHARSET
        0x81 => 949,  // HANGUL_CHARSET
        0x86 => 936,  // GB2312_CHARSET
        0x88 => 950,  // CHINESEBIG5_CHARSET
        0xA1 => 1253, // GREEK_CHARSET
        0xA2 => 1254, // TURKISH_CHARSET
        0xA3 => 1258, // VIETNAMESE_CHARSET
        0xB1 => 1255, // HEBREW_CHARSET
        0xB2 => 1256, // ARABIC_CHARSET
        0xBA => 1257, // BALTIC_CHARSET
        0xCC => 1251, // RUSSIAN_CHARSET
        0xDE => 874,  // THAI_CHARSET
        0xEE => 1250, // EASTEUROPE_CHARSET
        _ => 1252,    // ANSI_CHARSET, DEFAULT_CHARSET, SYMBOL_CHARSET and the rest
    }
}

/// Map Windows codepage identifier to encoding_rs Encoding.
///
/// # Examples
/// ```
/// use cdrkit::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(936).unwrap();
/// assert_eq!(encoding.name(), "GBK");
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: u32) -> Option<&'static Encoding> {
    match codepage {
        874 => Some(encoding_rs::WINDOWS_874),   // Thai
        1250 => Some(encoding_rs::WINDOWS_1250), // Central European
        1251 => Some(encoding_rs::WINDOWS_1251), // Cyrillic
        1252 => Some(encoding_rs::WINDOWS_1252), // Western European
        1253 => Some(encoding_rs::WINDOWS_1253), // Greek
        1254 => Some(encoding_rs::WINDOWS_1254), // Turkish
        1255 => Some(encoding_rs::WINDOWS_1255), // Hebrew
        1256 => Some(encoding_rs::WINDOWS_1256), // Arabic
        1257 => Some(encoding_rs::WINDOWS_1257), // Baltic
        1258 => Some(encoding_rs::WINDOWS_1258), // Vietnamese

        932 => Some(encoding_rs::SHIFT_JIS), // Japanese Shift-JIS
        936 => Some(encoding_rs::GBK),       // Simplified Chinese
        949 => Some(encoding_rs::EUC_KR),    // Korean
        950 => Some(encoding_rs::BIG5),      // Traditional Chinese

        10000 => Some(encoding_rs::MACINTOSH), // Macintosh Roman
        1200 => Some(encoding_rs::UTF_16LE),
        65001 => Some(encoding_rs::UTF_8),

        _ => None,
    }
}

/// Decode UTF-16 LE bytes to a String.
///
/// A trailing odd byte is ignored and invalid sequences become U+FFFD.
/// Embedded NULs are kept, text runs are length-delimited.
///
/// # Examples
/// ```
/// use cdrkit::common::encoding::decode_utf16le;
///
/// let bytes = b"H\x00e\x00l\x00l\x00o\x00";
/// assert_eq!(decode_utf16le(bytes), "Hello");
/// ```
#[inline]
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Strip everything from the first NUL byte onwards.
#[inline]
pub fn strip_null_terminators(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Decode single-byte (or DBCS) text in the given font charset.
///
/// # Examples
/// ```
/// use cdrkit::common::encoding::decode_charset;
///
/// assert_eq!(decode_charset(b"caf\xe9", 0), "caf\u{e9}");
/// assert_eq!(decode_charset(b"\xcf\xf0\xe8", 204), "\u{41f}\u{440}\u{438}");
/// ```
pub fn decode_charset(bytes: &[u8], charset: u16) -> String {
    let encoding =
        codepage_to_encoding(charset_to_codepage(charset)).unwrap_or(encoding_rs::WINDOWS_1252);
    encoding.decode_without_bom_handling(bytes).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_charset_falls_back_to_1252() {
        assert_eq!(charset_to_codepage(2), 1252);
        assert_eq!(decode_charset(b"\x80", 2), "\u{20ac}");
    }

    #[test]
    fn test_shift_jis_charset() {
        // "テ" in Shift-JIS
        assert_eq!(decode_charset(b"\x83\x65", 0x80), "\u{30c6}");
    }

    #[test]
    fn test_decode_utf16le_keeps_odd_tail_out() {
        assert_eq!(decode_utf16le(b"A\x00B"), "A");
    }

    #[test]
    fn test_strip_null_terminators() {
        assert_eq!(strip_null_terminators(b"Arial\0junk"), b"Arial");
        assert_eq!(strip_null_terminators(b"Arial"), b"Arial");
    }
}
