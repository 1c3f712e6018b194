// Bitmap reconstruction
//
// Embedded images arrive as raw pixel rows in one of several layouts. They
// are rewritten as a 32-bit BMP file: the 14-byte file header, a 40-byte
// BITMAPINFOHEADER and then one little-endian 0x00RRGGBB word per pixel, rows
// in source order.

use crate::collector::ParserState;
use crate::color::{Color, model};

/// File header plus info header
pub const BMP_HEADER_SIZE: u32 = 14 + 40;
const INFO_HEADER_SIZE: u32 = 40;

/// Bitmap color-model codes as stored with pixel data
pub mod bitmap_model {
    pub const RGB: u32 = 1;
    pub const CMY: u32 = 2;
    pub const CMYK: u32 = 3;
    pub const HSB: u32 = 4;
    pub const GRAYSCALE: u32 = 5;
    pub const MONOCHROME: u32 = 6;
    pub const HLS: u32 = 7;
    pub const LAB: u32 = 10;
    pub const LAB_ALT: u32 = 11;
}

/// How the source bytes of one pixel are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelLayout {
    /// One bit per pixel, MSB first, set bits are white
    Monochrome,
    /// One gray byte per pixel
    Gray,
    /// One palette index byte per pixel
    Indexed,
    /// B, G, R
    Bgr24,
    /// B, G, R, X
    Bgrx32,
}

impl PixelLayout {
    fn detect(color_model: u32, bpp: u32, palette: &[u32]) -> Option<Self> {
        if color_model == bitmap_model::MONOCHROME {
            Some(Self::Monochrome)
        } else if color_model == bitmap_model::GRAYSCALE {
            Some(Self::Gray)
        } else if !palette.is_empty() {
            Some(Self::Indexed)
        } else {
            match bpp {
                24 => Some(Self::Bgr24),
                32 => Some(Self::Bgrx32),
                _ => None,
            }
        }
    }
}

/// Color of one pixel value under a bitmap color model.
pub fn pixel_color(color_model: u32, value: u32) -> Color {
    let code = match color_model {
        bitmap_model::CMY => model::CMY,
        bitmap_model::CMYK => model::CMYK255,
        bitmap_model::HSB => model::HSB,
        bitmap_model::GRAYSCALE => model::GRAYSCALE,
        bitmap_model::MONOCHROME => model::BLACK_WHITE,
        bitmap_model::HLS => model::HLS,
        bitmap_model::LAB | bitmap_model::LAB_ALT => model::LAB2,
        _ => model::BGR,
    };
    Color::from_model(code, value)
}

/// Build the 54-byte BMP header for a 32-bit image.
///
/// Returns `None` when the pixel count or any derived size does not fit in
/// 32 bits.
pub fn bmp_header(width: u32, height: u32) -> Option<[u8; BMP_HEADER_SIZE as usize]> {
    let pixel_count = width.checked_mul(height)?;
    let image_size = pixel_count.checked_mul(4)?;
    let file_size = image_size.checked_add(BMP_HEADER_SIZE)?;

    let mut header = Vec::with_capacity(BMP_HEADER_SIZE as usize);
    // BITMAPFILEHEADER
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&file_size.to_le_bytes());
    header.extend_from_slice(&[0u8; 4]); // Reserved
    header.extend_from_slice(&BMP_HEADER_SIZE.to_le_bytes());

    // BITMAPINFOHEADER
    header.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&width.to_le_bytes());
    header.extend_from_slice(&height.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // Planes
    header.extend_from_slice(&32u16.to_le_bytes()); // Bit count
    header.extend_from_slice(&0u32.to_le_bytes()); // Compression
    header.extend_from_slice(&image_size.to_le_bytes());
    header.extend_from_slice(&[0u8; 16]); // Resolution and palette counts

    header.try_into().ok()
}

/// Wrap raw pixel rows into a 32-bit BMP file.
///
/// The row stride is `raw.len() / height`. Returns `None` on size overflow,
/// an empty image, or a pixel layout that cannot be decoded.
///
/// Short rows are not padded: the pixel payload may be shorter than the
/// `width * height * 4` image size declared in the header.
///
/// # Examples
///
/// ```
/// use cdrkit::bitmap::decode_bitmap;
/// use cdrkit::collector::ParserState;
///
/// let state = ParserState::new();
/// let bmp = decode_bitmap(&state, 6, 8, 1, 1, &[], &[0b1000_0000]).unwrap();
/// assert_eq!(bmp.len(), 54 + 8 * 4);
/// assert!(decode_bitmap(&state, 6, 0xFFFF_FFFF, 2, 1, &[], &[0; 8]).is_none());
/// ```
pub fn decode_bitmap(
    state: &ParserState,
    color_model: u32,
    width: u32,
    height: u32,
    bpp: u32,
    palette: &[u32],
    raw: &[u8],
) -> Option<Vec<u8>> {
    if width == 0 || height == 0 {
        return None;
    }
    let header = bmp_header(width, height)?;
    let layout = PixelLayout::detect(color_model, bpp, palette)?;

    let width = width as usize;
    let stride = raw.len() / height as usize;
    let mut image = Vec::with_capacity(header.len() + raw.len().saturating_mul(4));
    image.extend_from_slice(&header);

    let mut put = |color: Color| {
        image.extend_from_slice(&state.bmp_color(&color).to_le_bytes());
    };

    if stride > 0 {
        for row in raw.chunks_exact(stride).take(height as usize) {
            match layout {
                PixelLayout::Monochrome => {
                    let bits = row
                        .iter()
                        .flat_map(|&byte| (0..8).map(move |bit| byte & (0x80 >> bit) != 0));
                    for set in bits.take(width) {
                        put(if set { Color::WHITE } else { Color::BLACK });
                    }
                },
                PixelLayout::Gray => {
                    for &value in row.iter().take(width) {
                        put(pixel_color(color_model, value as u32));
                    }
                },
                PixelLayout::Indexed => {
                    for &index in row.iter().take(width) {
                        let value = palette.get(index as usize).copied().unwrap_or(0);
                        put(pixel_color(color_model, value));
                    }
                },
                PixelLayout::Bgr24 => {
                    for px in row.chunks_exact(3).take(width) {
                        let value = u32::from_le_bytes([px[0], px[1], px[2], 0]);
                        put(pixel_color(color_model, value));
                    }
                },
                PixelLayout::Bgrx32 => {
                    for px in row.chunks_exact(4).take(width) {
                        let value = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
                        put(pixel_color(color_model, value));
                    }
                },
            }
        }
    }

    Some(image)
}
