//! Vector fallback: glyph outlines sampled straight from the font.
//!
//! Used whenever tracing is unavailable or yields nothing. Every contour of
//! the glyph is walked by arc length and sampled at evenly spaced points; the
//! contours are concatenated into a single polyline in document coordinates.
//! With no font at all, the glyph's bounding box stands in as a closed
//! rectangle.

use crate::geometry::{Point, Polyline};
use crate::text::font_loader::LoadedFont;
use crate::text::glyph_path::char_contours;
use crate::text::metrics::measure_glyph;

const DENSITY_AT_REFERENCE: f32 = 0.08;
const REFERENCE_SIZE: f32 = 200.0;
const MIN_DENSITY: f32 = 0.02;
const MAX_DENSITY: f32 = 0.5;
/// Upper bound on points emitted for a single contour.
pub const MAX_CONTOUR_SAMPLES: usize = 4096;

/// Samples per pixel of outline length at `size`; inversely proportional to size.
pub fn sampling_density(size: f32) -> f32 {
  if size.is_nan() || size <= 0.0 {
    return MAX_DENSITY;
  }
  (DENSITY_AT_REFERENCE * REFERENCE_SIZE / size).clamp(MIN_DENSITY, MAX_DENSITY)
}

/// Returns exactly one polyline for `ch` with its origin at `(pen_x, baseline_y)`.
///
/// With a font the polyline is the sampled outline (empty for blank glyphs
/// such as space). Without one it is the 5-point bounding rectangle.
pub fn sample(
  font: Option<&LoadedFont>,
  ch: char,
  pen_x: f32,
  baseline_y: f32,
  size: f32,
) -> Vec<Polyline> {
  match font {
    Some(font) => vec![sample_outline(font, ch, Point::new(pen_x, baseline_y), size)],
    None => vec![placeholder(ch, pen_x, baseline_y, size)],
  }
}

/// The bounding-rectangle placeholder for `ch` measured without a font.
pub fn placeholder(ch: char, pen_x: f32, baseline_y: f32, size: f32) -> Polyline {
  Polyline::rect_outline(measure_glyph(None, ch, pen_x, baseline_y, size).bounds)
}

fn sample_outline(font: &LoadedFont, ch: char, origin: Point, size: f32) -> Polyline {
  let step = 1.0 / sampling_density(size);
  let points = char_contours(font, ch, origin, size)
    .iter()
    .flat_map(|contour| resample(contour, step))
    .collect();
  Polyline::new(points)
}

/// Evenly spaced points along `contour`, roughly `step` apart.
///
/// At most [`MAX_CONTOUR_SAMPLES`] points are produced; longer contours are
/// sampled more coarsely. A contour whose length is not finite collapses to
/// its first point.
fn resample(contour: &[Point], step: f32) -> Vec<Point> {
  let Some(&first) = contour.first() else {
    return Vec::new();
  };
  let length: f32 = contour.windows(2).map(|w| w[0].distance_to(w[1])).sum();
  if !length.is_finite() || length <= f32::EPSILON {
    return vec![first];
  }

  let wanted = length / step;
  let count = if wanted.is_finite() {
    (wanted.round() as usize).clamp(1, MAX_CONTOUR_SAMPLES)
  } else {
    MAX_CONTOUR_SAMPLES
  };
  let spacing = length / count as f32;
  let mut out = Vec::with_capacity(count);
  let mut segments = contour.windows(2);
  let mut current = segments.next();
  let mut walked = 0.0;

  for i in 0..count {
    let target = i as f32 * spacing;
    while let Some(seg) = current {
      let seg_len = seg[0].distance_to(seg[1]);
      if walked + seg_len >= target {
        let t = if seg_len > f32::EPSILON {
          (target - walked) / seg_len
        } else {
          0.0
        };
        out.push(seg[0].lerp(seg[1], t.clamp(0.0, 1.0)));
        break;
      }
      walked += seg_len;
      current = segments.next();
    }
    if current.is_none() {
      break;
    }
  }
  out
}
