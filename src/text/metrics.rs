//! Per-glyph measurement
//!
//! Two sources of truth exist. With a loaded font, advance widths come from
//! `hmtx` and bounds from the glyph's outline bounding box. Without one, an
//! approximate width class per character stands in for a real measurement and
//! the bounds are a box `size` tall whose top sits `0.8 × size` above the
//! baseline.

use crate::geometry::Rect;
use crate::text::font_loader::LoadedFont;
use ttf_parser::GlyphId;
use unicode_width::UnicodeWidthChar;

/// Fraction of the font size that the heuristic box extends above the baseline.
pub const HEURISTIC_ASCENT: f32 = 0.8;

/// Measurement of a single character at a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMeasure {
  /// Horizontal advance in pixels; what the pen moves by before spacing
  pub advance: f32,
  /// Bounding box in document coordinates for the pen position it was measured at
  pub bounds: Rect,
}

/// Measures `ch` at `size` with its origin at `(pen_x, baseline_y)`.
pub fn measure_glyph(
  font: Option<&LoadedFont>,
  ch: char,
  pen_x: f32,
  baseline_y: f32,
  size: f32,
) -> GlyphMeasure {
  if let Some(font) = font {
    if let Some(measure) = measure_with_font(font, ch, pen_x, baseline_y, size) {
      return measure;
    }
  }
  let advance = approximate_advance(ch, size);
  GlyphMeasure {
    advance,
    bounds: Rect::from_xywh(pen_x, baseline_y - size * HEURISTIC_ASCENT, advance, size),
  }
}

/// Maps a character to a glyph id, falling back to `.notdef`.
pub fn glyph_id_for(face: &ttf_parser::Face<'_>, ch: char) -> GlyphId {
  face.glyph_index(ch).unwrap_or(GlyphId(0))
}

fn measure_with_font(
  font: &LoadedFont,
  ch: char,
  pen_x: f32,
  baseline_y: f32,
  size: f32,
) -> Option<GlyphMeasure> {
  let face = font.as_ttf_face().ok()?;
  let glyph = glyph_id_for(&face, ch);
  let scale = font.scale(size);
  let advance = face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
  // Blank glyphs (space) have no outline; report an empty box on the baseline.
  let bounds = match face.glyph_bounding_box(glyph) {
    Some(bbox) => Rect::from_xywh(
      pen_x + bbox.x_min as f32 * scale,
      baseline_y - bbox.y_max as f32 * scale,
      (bbox.x_max - bbox.x_min) as f32 * scale,
      (bbox.y_max - bbox.y_min) as f32 * scale,
    ),
    None => Rect::from_xywh(pen_x, baseline_y, 0.0, 0.0),
  };
  Some(GlyphMeasure { advance, bounds })
}

/// Approximate advance of `ch` in a generic sans-serif face.
///
/// # Examples
///
/// ```
/// use textskel::text::metrics::approximate_advance;
///
/// assert!(approximate_advance('i', 100.0) < approximate_advance('m', 100.0));
/// assert_eq!(approximate_advance('\u{0301}', 100.0), 0.0);
/// ```
pub fn approximate_advance(ch: char, size: f32) -> f32 {
  let em = match ch {
    ' ' | 'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
    'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '"' => 0.36,
    'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
    'A'..='Z' => 0.68,
    'a'..='z' | '0'..='9' => 0.56,
    c if c.is_ascii() => 0.5,
    c => match c.width() {
      Some(0) | None => 0.0,
      Some(1) => 0.6,
      Some(_) => 1.0,
    },
  };
  em * size
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::text::font_loader::FontUpload;

  const FIXTURE: &[u8] = include_bytes!("../../tests/fixtures/fonts/DejaVuSansMono.ttf");

  fn fixture() -> LoadedFont {
    LoadedFont::from_upload(FontUpload::new("DejaVuSansMono.ttf", None, FIXTURE.to_vec()))
      .expect("fixture parses")
  }

  #[test]
  fn heuristic_box_sits_on_baseline() {
    let m = measure_glyph(None, 'H', 40.0, 420.0, 200.0);
    assert_eq!(m.advance, 0.68 * 200.0);
    assert_eq!(m.bounds, Rect::from_xywh(40.0, 260.0, 136.0, 200.0));
  }

  #[test]
  fn wide_characters_get_a_full_em() {
    assert_eq!(approximate_advance('漢', 100.0), 100.0);
  }

  #[test]
  fn font_advance_uses_hmtx() {
    let font = fixture();
    let m = measure_glyph(Some(&font), 'A', 0.0, 0.0, 2048.0);
    assert!((m.advance - 1233.0).abs() < 1e-3);
  }

  #[test]
  fn font_bounds_are_above_baseline() {
    let font = fixture();
    let m = measure_glyph(Some(&font), 'H', 40.0, 420.0, 200.0);
    assert!(m.bounds.width > 0.0);
    assert!(m.bounds.height > 0.0);
    assert!(m.bounds.y < 420.0);
    assert!(m.bounds.x >= 40.0);
  }

  #[test]
  fn space_has_advance_but_no_ink() {
    let font = fixture();
    let m = measure_glyph(Some(&font), ' ', 10.0, 100.0, 200.0);
    assert!(m.advance > 0.0);
    assert!(m.bounds.is_empty());
  }
}
