//! cdrkit - A Rust library for decoding CorelDRAW vector-graphics records
//!
//! This library reads the record streams of the two RIFF-based CorelDRAW
//! dialects, the native page-oriented `CDR` format and the `CMX` exchange
//! format, and turns them into style tables and page geometry.
//!
//! # Features
//!
//! - **Record walker**: RIFF/RIFX framing with depth and decompression limits
//! - **Styles**: fills, outlines, fonts, character styles and document palettes
//! - **Geometry**: paths, affine transforms, polygons, stars and splines
//! - **Colors**: CMYK, CMY, RGB, HSB, HLS, grayscale and Lab models with tints
//! - **Bitmaps**: embedded pixel data re-encoded as 32-bit BMP files
//! - **Text**: mixed single-byte and UTF-16 runs with per-run styles
//!
//! # Example - Decoding a document
//!
//! ```no_run
//! use cdrkit::common::ParseOptions;
//! use cdrkit::parser::parse_document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("drawing.cdr")?;
//! let state = parse_document(&data, &ParseOptions::default())?;
//!
//! for (index, page) in state.pages.iter().enumerate() {
//!     println!("Page {index}: {} x {} in", page.width, page.height);
//!     for shape in state.page_shapes(index) {
//!         println!("  {} commands, fill {}", shape.path.len(), shape.fill_id);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - A custom collector
//!
//! ```
//! use cdrkit::collector::Collector;
//! use cdrkit::color::Color;
//! use cdrkit::common::ParseOptions;
//! use cdrkit::parser::CmxParser;
//!
//! #[derive(Default)]
//! struct PaletteOnly(Vec<Color>);
//!
//! impl Collector for PaletteOnly {
//!     fn collect_palette_entry(&mut self, _color_id: u32, _user_id: u32, color: Color) {
//!         self.0.push(color);
//!     }
//! }
//!
//! let mut palette = PaletteOnly::default();
//! let mut parser = CmxParser::new(&mut palette, ParseOptions::default());
//! parser.parse(b"RIFF\x04\x00\x00\x00CMX1").unwrap();
//! assert!(palette.0.is_empty());
//! ```

pub mod bitmap;
pub mod collector;
pub mod color;
pub mod common;
pub mod geometry;
pub mod parser;

pub use collector::{Collector, ParserState, StylesCollector};
pub use color::Color;
pub use common::{Error, ParseOptions, Result};
pub use geometry::{Path, PathCommand, Point, Transform, Transforms};
pub use parser::parse_document;
