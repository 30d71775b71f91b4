//! Painting and rasterization
//!
//! Everything that touches pixels goes through tiny-skia:
//!
//! - **Glyph rasters**: a single glyph drawn white on black for tracers
//! - **Frames**: the document's polylines stroked onto the canvas

pub mod glyph_raster;
pub(crate) mod pixmap;
pub mod renderer;

pub use glyph_raster::{rasterize_glyph, BoolMask, GlyphRaster};
pub use renderer::{polyline_path, render_document, Frame};
