// Style and resource collection
//
// Dialect parsers decode records and hand the results to a `Collector`, one
// call per record. `StylesCollector` is the collector that fills a
// `ParserState`; other collectors can override only the calls they need.

pub mod state;
pub mod styles;
pub mod types;

use crate::color::Color;
use std::collections::HashMap;

pub use state::ParserState;
pub use styles::StylesCollector;
pub use types::{
    CharacterStyle, FillStyle, FillType, Font, Gradient, GradientStop, ImageFill, LineStyle, Page,
    Pattern, Shape,
};

/// Receiver of decoded records.
///
/// Every method defaults to a no-op. Implementations must accept any input:
/// degenerate values are stored as-is or dropped, never reported as errors.
pub trait Collector {
    fn collect_fill(
        &mut self,
        _id: u32,
        _fill_type: u16,
        _color1: Color,
        _color2: Color,
        _gradient: Gradient,
        _image_fill: ImageFill,
    ) {
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_outline(
        &mut self,
        _id: u32,
        _line_type: u16,
        _caps: u16,
        _join: u16,
        _width: f64,
        _stretch: f64,
        _angle: f64,
        _color: Color,
        _dash_array: Vec<u16>,
        _start_marker_id: u32,
        _end_marker_id: u32,
    ) {
    }

    /// Raw pixel rows to be wrapped into a BMP file.
    #[allow(clippy::too_many_arguments)]
    fn collect_bitmap_from_pixels(
        &mut self,
        _image_id: u32,
        _color_model: u32,
        _width: u32,
        _height: u32,
        _bpp: u32,
        _palette: &[u32],
        _raw: &[u8],
    ) {
    }

    /// A complete, already encoded bitmap file.
    fn collect_bitmap_raw(&mut self, _image_id: u32, _bytes: &[u8]) {}

    fn collect_page_size(&mut self, _width: f64, _height: f64, _offset_x: f64, _offset_y: f64) {}

    fn collect_page(&mut self) {}

    fn collect_pattern(&mut self, _pattern_id: u32, _width: u32, _height: u32, _bytes: &[u8]) {}

    fn collect_color_profile(&mut self, _profile: &[u8]) {}

    fn collect_palette_entry(&mut self, _color_id: u32, _user_id: u32, _color: Color) {}

    fn collect_font(&mut self, _font_id: u32, _encoding: u16, _name: &str) {}

    fn collect_character_style(&mut self, _style_id: u32, _style: CharacterStyle) {}

    fn collect_text(
        &mut self,
        _text_id: u32,
        _style_id: u32,
        _data: &[u8],
        _char_descriptions: &[u64],
        _style_overrides: &HashMap<u32, CharacterStyle>,
    ) {
    }

    fn collect_shape(&mut self, _shape: Shape) {}
}
