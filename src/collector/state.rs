// Per-document resource tables
//
// One `ParserState` lives for exactly one parse. Every table is keyed by the
// record's own ID and a later record with the same ID replaces the earlier
// one. Pages and shapes are append-only.

use super::types::{FillStyle, Font, LineStyle, Page, Pattern, Shape};
use crate::color::Color;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ParserState {
    pub fill_styles: HashMap<u32, FillStyle>,
    pub line_styles: HashMap<u32, LineStyle>,
    pub fonts: HashMap<u32, Font>,
    pub document_palette: HashMap<u32, Color>,
    pub patterns: HashMap<u32, Pattern>,
    /// Complete BMP files
    pub bitmaps: HashMap<u32, Vec<u8>>,
    pub texts: HashMap<u32, String>,
    pub pages: Vec<Page>,
    pub shapes: Vec<Shape>,
    /// Embedded ICC profile of the document, if any
    pub color_profile: Option<Vec<u8>>,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the document's color profile. Empty profiles are ignored.
    pub fn set_color_transform(&mut self, profile: &[u8]) {
        if profile.is_empty() {
            return;
        }
        self.color_profile = Some(profile.to_vec());
    }

    /// Canonical `0x00RRGGBB` value used for bitmap pixels.
    pub fn bmp_color(&self, color: &Color) -> u32 {
        color.to_rgb()
    }

    /// Shapes collected while the given page was current.
    pub fn page_shapes(&self, page: usize) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |shape| shape.page == page)
    }

    /// True when no table holds anything.
    pub fn is_empty(&self) -> bool {
        self.fill_styles.is_empty()
            && self.line_styles.is_empty()
            && self.fonts.is_empty()
            && self.document_palette.is_empty()
            && self.patterns.is_empty()
            && self.bitmaps.is_empty()
            && self.texts.is_empty()
            && self.pages.is_empty()
            && self.shapes.is_empty()
            && self.color_profile.is_none()
    }
}
