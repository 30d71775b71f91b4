//! Font handling and per-glyph measurement
//!
//! - `font_loader.rs` - Upload validation and parsed, shareable fonts
//! - `metrics.rs` - Advances and bounding boxes, with or without a font
//! - `glyph_path.rs` - Outline extraction for filling and sampling

pub mod font_loader;
pub mod glyph_path;
pub mod metrics;

pub use font_loader::{FontUpload, LoadedFont};
pub use metrics::{measure_glyph, GlyphMeasure};
