//! Single-glyph rasterization for skeleton tracing.
//!
//! Each glyph is drawn alone into a small offscreen surface: black background,
//! glyph filled white, origin at the left edge with the baseline at 80% of the
//! surface height. Tracers consume the surface directly, or a boolean mask
//! derived from it.

use crate::error::RenderError;
use crate::geometry::Rect;
use crate::paint::pixmap::new_pixmap_with_context;
use crate::text::font_loader::LoadedFont;
use crate::text::glyph_path::{build_char_path, glyph_transform};
use tiny_skia::{Color, FillRule, Paint, Pixmap};

/// Baseline position as a fraction of the surface height.
pub const RASTER_BASELINE_FRAC: f32 = 0.8;

/// Smallest surface edge, so tracers never see an empty image.
pub const MIN_RASTER_EDGE: u32 = 2;

/// Pixels "on" when `0.299R + 0.587G + 0.114B` exceeds this.
pub const DEFAULT_MASK_THRESHOLD: f32 = 127.0;

/// Red channel value above which a pixel counts as ink in diagnostics.
const INK_RED_THRESHOLD: u8 = 200;

/// A rendered glyph surface.
#[derive(Debug, Clone)]
pub struct GlyphRaster {
  pub ch: char,
  pixmap: Pixmap,
}

impl GlyphRaster {
  /// Wraps an existing surface; tracers and tests can build their own rasters.
  pub fn from_pixmap(ch: char, pixmap: Pixmap) -> Self {
    Self { ch, pixmap }
  }

  pub fn width(&self) -> u32 {
    self.pixmap.width()
  }

  pub fn height(&self) -> u32 {
    self.pixmap.height()
  }

  /// The raw surface, RGBA8 premultiplied, row-major.
  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }

  /// Number of pixels whose red channel exceeds 200.
  pub fn ink_count(&self) -> usize {
    self
      .pixmap
      .data()
      .chunks_exact(4)
      .filter(|px| px[0] > INK_RED_THRESHOLD)
      .count()
  }

  /// Converts the surface to a row-major `width × height` mask of 0/1 bytes.
  pub fn to_bool_mask(&self, threshold: f32) -> BoolMask {
    let mut data = Vec::with_capacity((self.width() * self.height()) as usize);
    let mut on_count = 0;
    for px in self.pixmap.data().chunks_exact(4) {
      let luminance = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
      let on = luminance > threshold;
      if on {
        on_count += 1;
      }
      data.push(on as u8);
    }
    BoolMask {
      width: self.width(),
      height: self.height(),
      data,
      on_count,
    }
  }
}

/// Binary image handed to boolean-array tracers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolMask {
  pub width: u32,
  pub height: u32,
  /// `width * height` bytes, 1 for "on"
  pub data: Vec<u8>,
  pub on_count: usize,
}

impl BoolMask {
  pub fn get(&self, x: u32, y: u32) -> bool {
    x < self.width && y < self.height && self.data[(y * self.width + x) as usize] != 0
  }
}

/// Surface size for a glyph with the given bounds.
pub fn raster_size(bounds: Rect) -> (u32, u32) {
  let edge = |v: f32| {
    if v.is_finite() && v > 0.0 {
      (v.ceil() as u32).max(MIN_RASTER_EDGE)
    } else {
      MIN_RASTER_EDGE
    }
  };
  (edge(bounds.width), edge(bounds.height))
}

/// Renders `ch` alone into a surface sized to `bounds`.
///
/// Without a font there is no outline to fill and the surface stays black.
pub fn rasterize_glyph(
  font: Option<&LoadedFont>,
  ch: char,
  bounds: Rect,
  size: f32,
) -> Result<GlyphRaster, RenderError> {
  let (width, height) = raster_size(bounds);
  let mut pixmap = new_pixmap_with_context(width, height, "glyph raster")?;
  pixmap.fill(Color::BLACK);

  if let Some(font) = font {
    if let Some(path) = build_char_path(font, ch) {
      let mut paint = Paint::default();
      paint.set_color(Color::WHITE);
      paint.anti_alias = true;
      let transform = glyph_transform(
        font.scale(size),
        0.0,
        height as f32 * RASTER_BASELINE_FRAC,
      );
      pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
  }

  Ok(GlyphRaster { ch, pixmap })
}
