// Style and resource records
//
// Fills, outlines, bitmaps, patterns, fonts, character styles and text.
// Each reader decodes one record payload and makes one collector call, or
// one per entry for character style tables. A short payload fails the record
// at the first missing field.

use super::read_count;
use super::units::{UNICODE_VERSION, Units};
use crate::collector::{
    CharacterStyle, Collector, FillType, Gradient, GradientStop, ImageFill,
};
use crate::color::Color;
use crate::common::binary::{ByteReader, Endian, parse_utf16le_string};
use crate::common::encoding::{decode_charset, strip_null_terminators};
use crate::common::error::Result;
use std::collections::HashMap;

fn reader(body: &[u8]) -> ByteReader<'_> {
    ByteReader::new(body, Endian::Little)
}

/// `fild`: fill style.
pub fn read_fill<C: Collector + ?Sized>(units: &Units, body: &[u8], collector: &mut C) -> Result<()> {
    let mut r = reader(body);
    let id = r.read_u32()?;
    let fill_type = r.read_u16()?;

    let mut color1 = Color::default();
    let mut color2 = Color::default();
    let mut gradient = Gradient::default();
    let mut image_fill = ImageFill::default();

    match FillType::from_u16(fill_type) {
        Some(FillType::None) => {},
        Some(FillType::Solid) => color1 = units.read_color(&mut r)?,
        Some(FillType::Gradient) => gradient = read_gradient(units, &mut r)?,
        Some(FillType::Pattern) => {
            image_fill = read_image_fill(units, &mut r)?;
            color1 = units.read_color(&mut r)?;
            color2 = units.read_color(&mut r)?;
        },
        Some(FillType::FullColorPattern | FillType::Bitmap | FillType::Texture) => {
            image_fill = read_image_fill(units, &mut r)?;
        },
        None => log::debug!("Fill {id} has unknown type {fill_type}"),
    }

    collector.collect_fill(id, fill_type, color1, color2, gradient, image_fill);
    Ok(())
}

fn read_gradient(units: &Units, r: &mut ByteReader<'_>) -> Result<Gradient> {
    let gradient_type = r.read_u8()?;
    let mode = r.read_u8()?;
    let angle = units.read_angle(r)?;
    let mid_point = r.read_u16()? as f64 / 100.0;
    let edge_offset = r.read_i16()? as i32;
    let center_x_offset = r.read_i32()?;
    let center_y_offset = r.read_i32()?;
    let count = r.read_u16()?;
    let mut stops = Vec::with_capacity((count as usize).min(r.remaining() / 10));
    for _ in 0..count {
        let color = units.read_color(r)?;
        let offset = r.read_u16()? as f64 / 100.0;
        stops.push(GradientStop { color, offset });
    }
    Ok(Gradient {
        gradient_type,
        mode,
        angle,
        mid_point,
        edge_offset,
        center_x_offset,
        center_y_offset,
        stops,
    })
}

fn read_image_fill(units: &Units, r: &mut ByteReader<'_>) -> Result<ImageFill> {
    Ok(ImageFill {
        id: r.read_u32()?,
        width: units.read_coordinate(r)?,
        height: units.read_coordinate(r)?,
        is_relative: r.read_u8()? != 0,
    })
}

/// `outl`: line style.
pub fn read_outline<C: Collector + ?Sized>(
    units: &Units,
    body: &[u8],
    collector: &mut C,
) -> Result<()> {
    let mut r = reader(body);
    let id = r.read_u32()?;
    let line_type = r.read_u16()?;
    let caps = r.read_u16()?;
    let join = r.read_u16()?;
    let width = units.read_coordinate(&mut r)?;
    let stretch = r.read_u16()? as f64 / 100.0;
    let angle = units.read_angle(&mut r)?;
    let color = units.read_color(&mut r)?;
    let dash_count = r.read_u16()?;
    let dash_array = (0..dash_count)
        .map(|_| r.read_u16())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let start_marker_id = r.read_u32()?;
    let end_marker_id = r.read_u32()?;

    collector.collect_outline(
        id,
        line_type,
        caps,
        join,
        width,
        stretch,
        angle,
        color,
        dash_array,
        start_marker_id,
        end_marker_id,
    );
    Ok(())
}

/// `bmp `: embedded image, either a complete BMP file or raw pixel rows.
pub fn read_bitmap<C: Collector + ?Sized>(body: &[u8], collector: &mut C) -> Result<()> {
    let mut r = reader(body);
    let id = r.read_u32()?;
    if r.peek(2) == Some(&b"BM"[..]) {
        collector.collect_bitmap_raw(id, r.rest());
        return Ok(());
    }

    let color_model = r.read_u32()?;
    let width = r.read_u32()?;
    let height = r.read_u32()?;
    let bpp = r.read_u32()?;
    let palette_size = read_count(&mut r, 3, "palette entries")?;
    let palette: Vec<u32> = r
        .read_bytes(palette_size * 3)?
        .chunks_exact(3)
        .map(|bgr| u32::from_le_bytes([bgr[0], bgr[1], bgr[2], 0]))
        .collect();
    let size = r.read_u32()? as usize;
    let pixels = r.read_bytes(size)?;

    collector.collect_bitmap_from_pixels(id, color_model, width, height, bpp, &palette, pixels);
    Ok(())
}

/// `bmpf`: monochrome fill pattern.
pub fn read_pattern<C: Collector + ?Sized>(body: &[u8], collector: &mut C) -> Result<()> {
    let mut r = reader(body);
    let id = r.read_u32()?;
    let width = r.read_u32()?;
    let height = r.read_u32()?;
    let size = r.read_u32()? as usize;
    let bytes = r.read_bytes(size)?;
    collector.collect_pattern(id, width, height, bytes);
    Ok(())
}

/// `font`: font name, UTF-16 from the Unicode versions on.
pub fn read_font<C: Collector + ?Sized>(units: &Units, body: &[u8], collector: &mut C) -> Result<()> {
    let mut r = reader(body);
    let id = r.read_u16()? as u32;
    let encoding = r.read_u16()?;
    let name = if units.version >= UNICODE_VERSION {
        parse_utf16le_string(r.rest())
    } else {
        decode_charset(strip_null_terminators(r.rest()), encoding)
    };
    collector.collect_font(id, encoding, &name);
    Ok(())
}

fn read_character_style(units: &Units, r: &mut ByteReader<'_>) -> Result<CharacterStyle> {
    Ok(CharacterStyle {
        charset: r.read_u16()?,
        font_id: r.read_u16()? as u32,
        font_size: units.read_coordinate(r)?,
    })
}

/// `stlt`: default character styles referenced by text records.
pub fn read_text_styles<C: Collector + ?Sized>(
    units: &Units,
    body: &[u8],
    collector: &mut C,
) -> Result<()> {
    let mut r = reader(body);
    let count = r.read_u32()?;
    for _ in 0..count {
        let id = r.read_u32()?;
        let style = read_character_style(units, &mut r)?;
        collector.collect_character_style(id, style);
    }
    Ok(())
}

/// `txsm`: one text object with its run descriptions and style overrides.
pub fn read_text<C: Collector + ?Sized>(units: &Units, body: &[u8], collector: &mut C) -> Result<()> {
    let mut r = reader(body);
    let text_id = r.read_u32()?;
    let style_id = r.read_u32()?;

    let override_count = r.read_u32()?;
    let mut overrides = HashMap::new();
    for _ in 0..override_count {
        let key = r.read_u32()?;
        let style = read_character_style(units, &mut r)?;
        overrides.insert(key, style);
    }

    let description_count = read_count(&mut r, 8, "character descriptions")?;
    let descriptions = (0..description_count)
        .map(|_| r.read_u64())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let size = r.read_u32()? as usize;
    let data = r.read_bytes(size)?;

    collector.collect_text(text_id, style_id, data, &descriptions, &overrides);
    Ok(())
}
