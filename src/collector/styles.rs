//! Collector that stores every decoded resource in a [`ParserState`].

use super::Collector;
use super::state::ParserState;
use super::types::{
    CharacterStyle, FillStyle, Font, Gradient, ImageFill, LineStyle, Page, Pattern, Shape,
};
use crate::bitmap::decode_bitmap;
use crate::color::Color;
use crate::common::encoding::{decode_charset, decode_utf16le};
use std::collections::HashMap;

/// Low bit of a character description: two bytes per character
const WIDE_CHARS: u32 = 0x01;
/// Bits of a character description that identify a run
const DESCRIPTION_MASK: u64 = 0x00ff_ffff;

/// Fills the borrowed [`ParserState`].
///
/// Owns the page being staged before the first commit and the table of
/// default character styles used while decoding text.
///
/// # Examples
///
/// ```
/// use cdrkit::collector::{Collector, ParserState, StylesCollector};
///
/// let mut state = ParserState::new();
/// let mut collector = StylesCollector::new(&mut state);
/// collector.collect_page_size(4.0, 6.0, -2.0, -3.0);
/// collector.collect_page();
/// assert_eq!(state.pages[0].width, 4.0);
/// ```
pub struct StylesCollector<'a> {
    state: &'a mut ParserState,
    page: Page,
    char_styles: HashMap<u32, CharacterStyle>,
}

impl<'a> StylesCollector<'a> {
    pub fn new(state: &'a mut ParserState) -> Self {
        Self {
            state,
            page: Page::default(),
            char_styles: HashMap::new(),
        }
    }

    /// The page that the next `collect_page` commits.
    pub fn staged_page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> &ParserState {
        &*self.state
    }

    fn current_page_index(&self) -> usize {
        self.state.pages.len().saturating_sub(1)
    }
}

impl Collector for StylesCollector<'_> {
    fn collect_fill(
        &mut self,
        id: u32,
        fill_type: u16,
        color1: Color,
        color2: Color,
        gradient: Gradient,
        image_fill: ImageFill,
    ) {
        self.state.fill_styles.insert(
            id,
            FillStyle {
                fill_type,
                color1,
                color2,
                gradient,
                image_fill,
            },
        );
    }

    fn collect_outline(
        &mut self,
        id: u32,
        line_type: u16,
        caps: u16,
        join: u16,
        width: f64,
        stretch: f64,
        angle: f64,
        color: Color,
        dash_array: Vec<u16>,
        start_marker_id: u32,
        end_marker_id: u32,
    ) {
        self.state.line_styles.insert(
            id,
            LineStyle {
                line_type,
                caps_type: caps,
                join_type: join,
                line_width: width,
                stretch,
                angle,
                color,
                dash_array,
                start_marker_id,
                end_marker_id,
            },
        );
    }

    fn collect_bitmap_from_pixels(
        &mut self,
        image_id: u32,
        color_model: u32,
        width: u32,
        height: u32,
        bpp: u32,
        palette: &[u32],
        raw: &[u8],
    ) {
        match decode_bitmap(&*self.state, color_model, width, height, bpp, palette, raw) {
            Some(image) => {
                self.state.bitmaps.insert(image_id, image);
            },
            None => log::debug!(
                "Dropping bitmap {image_id}: {width}x{height}, {bpp} bpp, color model {color_model}"
            ),
        }
    }

    fn collect_bitmap_raw(&mut self, image_id: u32, bytes: &[u8]) {
        self.state.bitmaps.insert(image_id, bytes.to_vec());
    }

    fn collect_page_size(&mut self, width: f64, height: f64, offset_x: f64, offset_y: f64) {
        let page = Page::new(width, height, offset_x, offset_y);
        match self.state.pages.last_mut() {
            Some(last) => *last = page,
            None => self.page = page,
        }
    }

    fn collect_page(&mut self) {
        self.state.pages.push(self.page);
    }

    fn collect_pattern(&mut self, pattern_id: u32, width: u32, height: u32, bytes: &[u8]) {
        self.state.patterns.insert(
            pattern_id,
            Pattern {
                width,
                height,
                pattern: bytes.to_vec(),
            },
        );
    }

    fn collect_color_profile(&mut self, profile: &[u8]) {
        if !profile.is_empty() {
            self.state.set_color_transform(profile);
        }
    }

    fn collect_palette_entry(&mut self, color_id: u32, _user_id: u32, color: Color) {
        self.state.document_palette.insert(color_id, color);
    }

    fn collect_font(&mut self, font_id: u32, encoding: u16, name: &str) {
        self.state.fonts.insert(
            font_id,
            Font {
                name: name.to_string(),
                encoding,
            },
        );
    }

    fn collect_character_style(&mut self, style_id: u32, style: CharacterStyle) {
        self.char_styles.insert(style_id, style);
    }

    fn collect_text(
        &mut self,
        text_id: u32,
        style_id: u32,
        data: &[u8],
        char_descriptions: &[u64],
        style_overrides: &HashMap<u32, CharacterStyle>,
    ) {
        if data.is_empty() || char_descriptions.is_empty() {
            return;
        }

        let default_style = self
            .char_styles
            .get(&style_id)
            .copied()
            .unwrap_or_default();
        let style_of = |description: u32| {
            style_overrides
                .get(&((description >> 16) & 0xff))
                .copied()
                .unwrap_or(default_style)
        };

        let mut text = String::new();
        let mut run: Vec<u8> = Vec::new();
        let mut run_description = 0u32;
        let mut pos = 0usize;

        for &description in char_descriptions {
            if pos >= data.len() {
                break;
            }
            let description = (description & DESCRIPTION_MASK) as u32;
            if description != run_description {
                append_run(&mut text, &run, run_description, &style_of(run_description));
                run.clear();
                run_description = description;
            }
            let width = if description & WIDE_CHARS != 0 { 2 } else { 1 };
            let Some(bytes) = data.get(pos..pos + width) else {
                log::debug!("Text {text_id} ends inside a character at offset {pos}");
                break;
            };
            run.extend_from_slice(bytes);
            pos += width;
        }
        append_run(&mut text, &run, run_description, &style_of(run_description));

        self.state.texts.insert(text_id, text);
    }

    fn collect_shape(&mut self, shape: Shape) {
        let shape = Shape {
            page: self.current_page_index(),
            ..shape
        };
        if self.state.shapes.last() == Some(&shape) {
            return;
        }
        self.state.shapes.push(shape);
    }
}

fn append_run(text: &mut String, run: &[u8], description: u32, style: &CharacterStyle) {
    if run.is_empty() {
        return;
    }
    if description & WIDE_CHARS != 0 {
        text.push_str(&decode_utf16le(run));
    } else {
        text.push_str(&decode_charset(run, style.charset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Path;

    #[test]
    fn test_fill_last_write_wins() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_fill(
            7,
            1,
            Color::rgb(0xff),
            Color::default(),
            Gradient::default(),
            ImageFill::default(),
        );
        collector.collect_fill(
            7,
            0,
            Color::rgb(0xff00),
            Color::default(),
            Gradient::default(),
            ImageFill::default(),
        );
        assert_eq!(state.fill_styles.len(), 1);
        assert_eq!(state.fill_styles[&7].fill_type, 0);
        assert_eq!(state.fill_styles[&7].color1, Color::rgb(0xff00));
    }

    #[test]
    fn test_page_size_before_commit_amends_staged_page() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        assert_eq!(*collector.staged_page(), Page::default());
        collector.collect_page_size(3.0, 4.0, -1.5, -2.0);
        assert_eq!(*collector.staged_page(), Page::new(3.0, 4.0, -1.5, -2.0));
        assert!(collector.state().pages.is_empty());
        collector.collect_page();
        assert_eq!(state.pages, vec![Page::new(3.0, 4.0, -1.5, -2.0)]);
    }

    #[test]
    fn test_page_size_after_commit_amends_last_page() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_page();
        collector.collect_page_size(1.0, 2.0, 0.0, 0.0);
        assert_eq!(*collector.staged_page(), Page::default());
        assert_eq!(collector.state().pages.len(), 1);
        collector.collect_page();
        assert_eq!(
            state.pages,
            vec![Page::new(1.0, 2.0, 0.0, 0.0), Page::default()]
        );
    }

    #[test]
    fn test_palette_ignores_user_id() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_palette_entry(1, 99, Color::WHITE);
        assert_eq!(state.document_palette.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_raw_bitmap_and_failed_bitmap() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_bitmap_raw(1, b"BM..");
        collector.collect_bitmap_from_pixels(2, 1, 0xFFFF_FFFF, 2, 24, &[], &[0; 16]);
        assert_eq!(state.bitmaps.len(), 1);
        assert_eq!(state.bitmaps[&1], b"BM..".to_vec());
    }

    #[test]
    fn test_text_single_byte_uses_default_style_charset() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_character_style(
            3,
            CharacterStyle {
                charset: 0xCC,
                ..Default::default()
            },
        );
        collector.collect_text(1, 3, b"\xcf\xf0\xe8", &[0, 0, 0], &HashMap::new());
        assert_eq!(state.texts[&1], "\u{41f}\u{440}\u{438}");
    }

    #[test]
    fn test_text_mixed_runs() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        let data = b"ab\x3a\x04\x3b\x04c";
        let descriptions = [0u64, 0, 1, 1, 0];
        collector.collect_text(9, 0, data, &descriptions, &HashMap::new());
        assert_eq!(state.texts[&9], "ab\u{43a}\u{43b}c");
    }

    #[test]
    fn test_text_override_selects_charset() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        let mut overrides = HashMap::new();
        overrides.insert(
            2,
            CharacterStyle {
                charset: 0xA1,
                ..Default::default()
            },
        );
        // 0xE1 is alpha in 1253 and a-acute in 1252
        collector.collect_text(1, 0, b"\xe1\xe1", &[0, 0x0002_0000], &overrides);
        assert_eq!(state.texts[&1], "\u{e1}\u{3b1}");
    }

    #[test]
    fn test_text_truncated_wide_char_stops() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_text(1, 0, b"A\x00B", &[1, 1], &HashMap::new());
        assert_eq!(state.texts[&1], "A");
    }

    #[test]
    fn test_text_empty_inputs_store_nothing() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        collector.collect_text(1, 0, b"", &[0], &HashMap::new());
        collector.collect_text(2, 0, b"x", &[], &HashMap::new());
        assert!(state.texts.is_empty());
    }

    #[test]
    fn test_shapes_are_tagged_and_deduplicated() {
        let mut state = ParserState::new();
        let mut collector = StylesCollector::new(&mut state);
        let mut path = Path::new();
        path.append_move_to(0.0, 0.0);
        path.append_line_to(1.0, 1.0);
        let shape = Shape {
            path,
            fill_id: 4,
            ..Default::default()
        };

        collector.collect_page();
        collector.collect_page();
        collector.collect_shape(shape.clone());
        collector.collect_shape(shape.clone());
        assert_eq!(collector.state().shapes.len(), 1);
        assert_eq!(collector.state().shapes[0].page, 1);

        collector.collect_page();
        collector.collect_shape(shape);
        assert_eq!(state.shapes.len(), 2);
        assert_eq!(state.shapes[1].page, 2);
    }
}
