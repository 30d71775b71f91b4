//! Shared glyph outline utilities.
//!
//! This module centralizes glyph outline building so rasterization and the
//! vector fallback read the same outline data. Paths are emitted in font design
//! units (y-up); callers apply [`glyph_transform`] at render time. Contours for
//! sampling are flattened directly into canvas space.

use crate::geometry::Point;
use crate::text::font_loader::LoadedFont;
use crate::text::metrics::glyph_id_for;
use tiny_skia::{Path, PathBuilder, Transform};

/// Line segments used to approximate each quadratic or cubic curve.
const CURVE_SUBDIVISIONS: usize = 16;

/// Records ttf-parser outline commands into a tiny-skia path, in design units.
struct PathSink(PathBuilder);

impl ttf_parser::OutlineBuilder for PathSink {
  fn move_to(&mut self, x: f32, y: f32) {
    self.0.move_to(x, y);
  }

  fn line_to(&mut self, x: f32, y: f32) {
    self.0.line_to(x, y);
  }

  fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
    self.0.quad_to(x1, y1, x, y);
  }

  fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
    self.0.cubic_to(x1, y1, x2, y2, x, y);
  }

  fn close(&mut self) {
    self.0.close();
  }
}

/// Builds the fillable path for `ch` in design units, or `None` for blank glyphs.
pub fn build_char_path(font: &LoadedFont, ch: char) -> Option<Path> {
  let face = font.as_ttf_face().ok()?;
  let glyph = glyph_id_for(&face, ch);
  let mut sink = PathSink(PathBuilder::new());
  face.outline_glyph(glyph, &mut sink)?;
  sink.0.finish()
}

/// Transform used for mapping font design units to device pixels.
///
/// `scale` converts design units to pixels; translation is applied after
/// scaling. The Y axis is flipped to match tiny-skia's Y-down system.
#[inline]
pub fn glyph_transform(scale: f32, x: f32, y: f32) -> Transform {
  Transform::from_row(scale, 0.0, 0.0, -scale, x, y)
}

/// Flattens outlines into closed point contours in canvas space.
///
/// Every contour starts at its `move_to` point and, on `close`, repeats that
/// point so the contour is explicitly closed.
pub struct ContourFlattener {
  scale: f32,
  origin: Point,
  contours: Vec<Vec<Point>>,
  current: Vec<Point>,
  last: Point,
}

impl ContourFlattener {
  /// `origin` is the glyph origin (pen x, baseline y) in canvas space.
  pub fn new(scale: f32, origin: Point) -> Self {
    Self {
      scale,
      origin,
      contours: Vec::new(),
      current: Vec::new(),
      last: Point::ZERO,
    }
  }

  fn map(&self, x: f32, y: f32) -> Point {
    Point::new(self.origin.x + x * self.scale, self.origin.y - y * self.scale)
  }

  fn push(&mut self, p: Point) {
    self.current.push(p);
    self.last = p;
  }

  fn flush(&mut self) {
    if !self.current.is_empty() {
      self.contours.push(std::mem::take(&mut self.current));
    }
  }

  pub fn finish(mut self) -> Vec<Vec<Point>> {
    self.flush();
    self.contours
  }
}

impl ttf_parser::OutlineBuilder for ContourFlattener {
  fn move_to(&mut self, x: f32, y: f32) {
    self.flush();
    let p = self.map(x, y);
    self.push(p);
  }

  fn line_to(&mut self, x: f32, y: f32) {
    let p = self.map(x, y);
    self.push(p);
  }

  fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
    let p0 = self.last;
    let c = self.map(x1, y1);
    let p1 = self.map(x, y);
    for step in 1..=CURVE_SUBDIVISIONS {
      let t = step as f32 / CURVE_SUBDIVISIONS as f32;
      let a = p0.lerp(c, t);
      let b = c.lerp(p1, t);
      self.push(a.lerp(b, t));
    }
  }

  fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
    let p0 = self.last;
    let c0 = self.map(x1, y1);
    let c1 = self.map(x2, y2);
    let p1 = self.map(x, y);
    for step in 1..=CURVE_SUBDIVISIONS {
      let t = step as f32 / CURVE_SUBDIVISIONS as f32;
      let a = p0.lerp(c0, t);
      let b = c0.lerp(c1, t);
      let c = c1.lerp(p1, t);
      let ab = a.lerp(b, t);
      let bc = b.lerp(c, t);
      self.push(ab.lerp(bc, t));
    }
  }

  fn close(&mut self) {
    if let Some(&first) = self.current.first() {
      if self.last != first {
        self.push(first);
      }
    }
    self.flush();
  }
}

/// Flattened contours of `ch` at `size`, positioned with its origin at `origin`.
pub fn char_contours(font: &LoadedFont, ch: char, origin: Point, size: f32) -> Vec<Vec<Point>> {
  let Ok(face) = font.as_ttf_face() else {
    return Vec::new();
  };
  let glyph = glyph_id_for(&face, ch);
  let mut flattener = ContourFlattener::new(font.scale(size), origin);
  if face.outline_glyph(glyph, &mut flattener).is_none() {
    return Vec::new();
  }
  flattener.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use ttf_parser::OutlineBuilder;

  const FIXTURE: &[u8] = include_bytes!("../../tests/fixtures/fonts/DejaVuSansMono.ttf");

  #[test]
  fn char_path_covers_the_glyph_box() {
    let font = LoadedFont::from_bytes("DejaVuSansMono.ttf", FIXTURE.to_vec()).expect("fixture");
    let path = build_char_path(&font, 'O').expect("O has an outline");
    let bounds = path.bounds();
    assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    // Design units, y-up: the bowl sits above the baseline.
    assert!(bounds.bottom() > 0.0);
    assert!(build_char_path(&font, ' ').is_none());
  }

  #[test]
  fn glyph_transform_flips_y() {
    let transform = glyph_transform(2.0, 10.0, 20.0);
    assert!((transform.sx - 2.0).abs() < 1e-6);
    assert!((transform.sy + 2.0).abs() < 1e-6);
    assert_eq!(transform.tx, 10.0);
    assert_eq!(transform.ty, 20.0);
  }

  #[test]
  fn flattener_maps_into_canvas_space_and_closes() {
    let mut flattener = ContourFlattener::new(0.5, Point::new(100.0, 200.0));
    OutlineBuilder::move_to(&mut flattener, 0.0, 0.0);
    OutlineBuilder::line_to(&mut flattener, 20.0, 0.0);
    OutlineBuilder::line_to(&mut flattener, 20.0, 40.0);
    OutlineBuilder::close(&mut flattener);
    let contours = flattener.finish();
    assert_eq!(contours.len(), 1);
    assert_eq!(
      contours[0],
      vec![
        Point::new(100.0, 200.0),
        Point::new(110.0, 200.0),
        Point::new(110.0, 180.0),
        Point::new(100.0, 200.0),
      ]
    );
  }

  #[test]
  fn flattener_subdivides_curves() {
    let mut flattener = ContourFlattener::new(1.0, Point::ZERO);
    OutlineBuilder::move_to(&mut flattener, 0.0, 0.0);
    OutlineBuilder::quad_to(&mut flattener, 5.0, 10.0, 10.0, 0.0);
    let contours = flattener.finish();
    assert_eq!(contours[0].len(), 1 + CURVE_SUBDIVISIONS);
    assert_eq!(*contours[0].last().unwrap(), Point::new(10.0, 0.0));
  }
}
