//! The laid-out document: one entry per placed character.

use crate::geometry::Polyline;

/// Canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1000;
/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 600;
/// Baseline position as a fraction of the canvas height.
pub const BASELINE_FRAC: f32 = 0.7;
/// Pen x at the start of every rebuild.
pub const LEFT_MARGIN: f32 = 40.0;

/// Which path produced a glyph's polylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphSource {
  /// Skeleton returned by the tracing capability.
  Traced,
  /// Outline sampled from the font.
  Outline,
  /// Bounding rectangle; no tracer result and no font.
  Placeholder,
}

impl GlyphSource {
  pub fn as_str(self) -> &'static str {
    match self {
      GlyphSource::Traced => "traced",
      GlyphSource::Outline => "outline",
      GlyphSource::Placeholder => "placeholder",
    }
  }
}

/// One laid-out character.
///
/// `polylines` are already placed in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphResult {
  pub ch: char,
  /// Pen x at which the glyph was placed.
  pub origin_x: f32,
  /// Measured advance, excluding letter spacing.
  pub advance: f32,
  pub source: GlyphSource,
  pub polylines: Vec<Polyline>,
}

impl GlyphResult {
  /// Polylines with at least two points.
  pub fn drawable(&self) -> impl Iterator<Item = &Polyline> {
    self.polylines.iter().filter(|p| p.is_drawable())
  }
}

/// Pen and typographic parameters threaded through a rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
  pub pen_x: f32,
  pub baseline_y: f32,
  pub font_size: f32,
  pub letter_spacing: f32,
}

impl LayoutState {
  pub fn new(font_size: f32, letter_spacing: f32) -> Self {
    Self {
      pen_x: LEFT_MARGIN,
      baseline_y: CANVAS_HEIGHT as f32 * BASELINE_FRAC,
      font_size,
      letter_spacing,
    }
  }

  /// Moves the pen past a glyph of the given advance.
  pub fn advance(&mut self, advance: f32) {
    self.pen_x += advance + self.letter_spacing;
  }
}

/// Result of a rebuild, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub glyphs: Vec<GlyphResult>,
  /// State after the last glyph; `pen_x` is where the next glyph would go.
  pub state: LayoutState,
}

impl Document {
  /// A document with no glyphs, as installed before the first rebuild.
  pub fn empty() -> Self {
    Self {
      glyphs: Vec::new(),
      state: LayoutState::new(0.0, 0.0),
    }
  }

  pub fn len(&self) -> usize {
    self.glyphs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.glyphs.is_empty()
  }

  pub fn polyline_count(&self) -> usize {
    self.glyphs.iter().map(|g| g.polylines.len()).sum()
  }

  pub fn drawable_count(&self) -> usize {
    self.glyphs.iter().map(|g| g.drawable().count()).sum()
  }
}

impl Default for Document {
  fn default() -> Self {
    Self::empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_starts_at_margin_and_baseline() {
    let state = LayoutState::new(200.0, 10.0);
    assert_eq!(state.pen_x, 40.0);
    assert_eq!(state.baseline_y, 420.0);
  }

  #[test]
  fn source_labels_are_lowercase() {
    assert_eq!(GlyphSource::Traced.as_str(), "traced");
    assert_eq!(GlyphSource::Outline.as_str(), "outline");
    assert_eq!(GlyphSource::Placeholder.as_str(), "placeholder");
  }

  #[test]
  fn advance_adds_spacing() {
    let mut state = LayoutState::new(100.0, 7.5);
    state.advance(20.0);
    state.advance(0.0);
    assert_eq!(state.pen_x, 40.0 + 27.5 + 7.5);
  }

  #[test]
  fn counts_skip_degenerate_polylines() {
    let glyph = GlyphResult {
      ch: 'a',
      origin_x: 0.0,
      advance: 1.0,
      source: GlyphSource::Outline,
      polylines: vec![
        Polyline::from(vec![(0.0, 0.0)]),
        Polyline::from(vec![(0.0, 0.0), (1.0, 0.0)]),
      ],
    };
    let doc = Document {
      glyphs: vec![glyph],
      state: LayoutState::new(1.0, 0.0),
    };
    assert_eq!(doc.polyline_count(), 2);
    assert_eq!(doc.drawable_count(), 1);
  }
}
