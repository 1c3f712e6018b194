// Document resource types
//
// Everything the collector stores in the per-document tables: fill and line
// styles, pages, patterns, fonts, character styles and finished shapes.

use crate::color::Color;
use crate::geometry::Path;

/// Fill kinds as stored in fill records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FillType {
    None = 0,
    Solid = 1,
    Gradient = 2,
    Pattern = 7,
    FullColorPattern = 9,
    Bitmap = 10,
    Texture = 11,
}

impl FillType {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Solid),
            2 => Some(Self::Gradient),
            7 => Some(Self::Pattern),
            9 => Some(Self::FullColorPattern),
            10 => Some(Self::Bitmap),
            11 => Some(Self::Texture),
            _ => None,
        }
    }

    /// Fill types whose payload is an image reference
    pub fn uses_image(&self) -> bool {
        matches!(self, Self::FullColorPattern | Self::Bitmap | Self::Texture)
    }
}

/// One gradient stop; `offset` is a fraction of the gradient length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Color,
    pub offset: f64,
}

/// Gradient parameters for gradient fills
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gradient {
    pub gradient_type: u8,
    pub mode: u8,
    /// Radians
    pub angle: f64,
    pub mid_point: f64,
    pub edge_offset: i32,
    pub center_x_offset: i32,
    pub center_y_offset: i32,
    pub stops: Vec<GradientStop>,
}

/// Reference to an image (or pattern) used as a fill, with its tile size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageFill {
    pub id: u32,
    pub width: f64,
    pub height: f64,
    pub is_relative: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillStyle {
    pub fill_type: u16,
    pub color1: Color,
    pub color2: Color,
    pub gradient: Gradient,
    pub image_fill: ImageFill,
}

impl FillStyle {
    pub fn kind(&self) -> Option<FillType> {
        FillType::from_u16(self.fill_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    pub line_type: u16,
    pub caps_type: u16,
    pub join_type: u16,
    /// Inches
    pub line_width: f64,
    pub stretch: f64,
    /// Radians
    pub angle: f64,
    pub color: Color,
    pub dash_array: Vec<u16>,
    pub start_marker_id: u32,
    pub end_marker_id: u32,
}

impl LineStyle {
    /// Line type bit that suppresses the outline entirely
    pub const NO_LINE: u16 = 0x01;

    pub fn is_visible(&self) -> bool {
        self.line_type & Self::NO_LINE == 0
    }
}

/// Page geometry in inches; the offset is the position of the page's
/// top-left corner relative to the document origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Page {
    pub fn new(width: f64, height: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            width,
            height,
            offset_x,
            offset_y,
        }
    }
}

impl Default for Page {
    /// US Letter, centred on the origin
    fn default() -> Self {
        Self::new(8.5, 11.0, -4.25, -5.5)
    }
}

/// Monochrome pattern bitmap, one bit per pixel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub width: u32,
    pub height: u32,
    pub pattern: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Font {
    pub name: String,
    pub encoding: u16,
}

/// Character attributes needed to decode text runs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterStyle {
    /// Windows font charset of single-byte runs
    pub charset: u16,
    pub font_id: u32,
    pub font_size: f64,
}

/// Finished page geometry with its style references
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Index into the committed pages at the time the shape was collected
    pub page: usize,
    pub path: Path,
    pub fill_id: u32,
    pub outline_id: u32,
}
