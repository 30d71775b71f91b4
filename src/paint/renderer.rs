//! Frame rendering
//!
//! Clears the canvas to white and strokes every drawable polyline of a
//! document in black with no fill.

use crate::error::{Error, RenderError};
use crate::geometry::Polyline;
use crate::layout::{Document, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::paint::pixmap::new_pixmap_with_context;
use std::path::Path;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

/// A rendered canvas.
#[derive(Debug, Clone)]
pub struct Frame {
  pixmap: Pixmap,
  stroke_weight: f32,
  stroked: usize,
}

impl Frame {
  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }

  pub fn into_pixmap(self) -> Pixmap {
    self.pixmap
  }

  pub fn stroke_weight(&self) -> f32 {
    self.stroke_weight
  }

  /// Number of polylines actually stroked.
  pub fn stroked_count(&self) -> usize {
    self.stroked
  }

  pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
    self
      .pixmap
      .encode_png()
      .map_err(|err| RenderError::EncodeFailed {
        format: "png".to_string(),
        reason: err.to_string(),
      })
  }

  pub fn save_png(&self, path: impl AsRef<Path>) -> crate::Result<()> {
    let bytes = self.encode_png()?;
    std::fs::write(path.as_ref(), bytes).map_err(Error::Io)
  }
}

/// Builds an open stroke path; `None` for fewer than two points.
pub fn polyline_path(polyline: &Polyline) -> Option<tiny_skia::Path> {
  if !polyline.is_drawable() {
    return None;
  }
  let mut builder = PathBuilder::new();
  let mut points = polyline.points.iter();
  let first = points.next()?;
  builder.move_to(first.x, first.y);
  for p in points {
    builder.line_to(p.x, p.y);
  }
  builder.finish()
}

/// Renders `document` onto a fresh canvas.
pub fn render_document(document: &Document, stroke_weight: f32) -> Result<Frame, RenderError> {
  if !(stroke_weight.is_finite() && stroke_weight > 0.0) {
    return Err(RenderError::InvalidParameters {
      message: format!("stroke weight must be positive, got {stroke_weight}"),
    });
  }
  let mut pixmap = new_pixmap_with_context(CANVAS_WIDTH, CANVAS_HEIGHT, "canvas")?;
  pixmap.fill(Color::WHITE);

  let mut paint = Paint::default();
  paint.set_color(Color::BLACK);
  paint.anti_alias = true;
  let stroke = Stroke {
    width: stroke_weight,
    line_cap: LineCap::Round,
    line_join: LineJoin::Round,
    ..Default::default()
  };

  let mut stroked = 0;
  for glyph in &document.glyphs {
    for path in glyph.polylines.iter().filter_map(polyline_path) {
      pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
      stroked += 1;
    }
  }
  debug!(stroked, stroke_weight, "rendered frame");

  Ok(Frame {
    pixmap,
    stroke_weight,
    stroked,
  })
}
