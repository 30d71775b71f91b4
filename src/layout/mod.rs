//! Layout
//!
//! Places one glyph after another along a single baseline and collects the
//! resulting polylines into a [`Document`].
//!
//! # Module Organization
//!
//! - `document.rs` - Document, GlyphResult and the pen state
//! - `engine.rs` - The rebuild pass choosing traced, outline or placeholder glyphs

pub mod document;
pub mod engine;

pub use document::{
  Document, GlyphResult, GlyphSource, LayoutState, BASELINE_FRAC, CANVAS_HEIGHT, CANVAS_WIDTH,
  LEFT_MARGIN,
};
pub use engine::LayoutEngine;
