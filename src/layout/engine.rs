//! Layout Engine - turns text into placed skeleton polylines
//!
//! A rebuild walks the text left to right with a pen starting at the left
//! margin. Each character is measured, then produced by one of three paths:
//!
//! 1. **Traced**: rasterized alone and handed to the tracing capability; the
//!    returned polylines are shifted into document coordinates.
//! 2. **Outline**: sampled from the font outline when there is no tracer, or
//!    the tracer returned nothing.
//! 3. **Placeholder**: the bounding rectangle when there is no font either.
//!
//! The pen always advances by the measured width plus letter spacing, whichever
//! path ran. Newlines are skipped entirely.

use crate::debug::runtime::{runtime_toggles, RuntimeToggles, DISABLE_TRACER, LOG_INK};
use crate::geometry::Polyline;
use crate::layout::document::{Document, GlyphResult, GlyphSource, LayoutState};
use crate::paint::glyph_raster::rasterize_glyph;
use crate::text::font_loader::LoadedFont;
use crate::text::metrics::{measure_glyph, GlyphMeasure, HEURISTIC_ASCENT};
use crate::trace::fallback;
use crate::trace::{SkeletonAdapter, TracerHandle, TracerLocator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rebuilds documents against a shared tracer locator.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
  locator: Arc<TracerLocator>,
  toggles: Arc<RuntimeToggles>,
}

impl LayoutEngine {
  /// Creates an engine reading toggles from the active runtime configuration.
  pub fn new(locator: Arc<TracerLocator>) -> Self {
    Self {
      locator,
      toggles: runtime_toggles(),
    }
  }

  pub fn with_toggles(mut self, toggles: Arc<RuntimeToggles>) -> Self {
    self.toggles = toggles;
    self
  }

  pub fn locator(&self) -> &Arc<TracerLocator> {
    &self.locator
  }

  /// Lays out `text` from scratch.
  ///
  /// Suspends only while the tracer is being resolved. Never fails: every
  /// tracing problem degrades to the outline or placeholder path.
  pub async fn rebuild(
    &self,
    text: &str,
    font: Option<&LoadedFont>,
    size: f32,
    spacing: f32,
  ) -> Document {
    let tracer = if self.toggles.truthy(DISABLE_TRACER) {
      debug!("tracer disabled by {DISABLE_TRACER}");
      None
    } else {
      self.locator.resolve().await
    };
    let adapter = SkeletonAdapter::from_toggles(&self.toggles);
    let log_ink = self.toggles.truthy(LOG_INK);

    let mut state = LayoutState::new(size, spacing);
    let mut glyphs = Vec::with_capacity(text.len());

    for ch in text.chars() {
      if ch == '\n' {
        continue;
      }
      let measure = measure_glyph(font, ch, state.pen_x, state.baseline_y, size);
      let traced = tracer
        .as_ref()
        .and_then(|handle| trace_glyph(handle, &adapter, font, ch, &measure, &state, log_ink));
      let (source, polylines) = match traced {
        Some(polylines) => (GlyphSource::Traced, polylines),
        None => fallback_glyph(font, ch, &state),
      };
      debug!(
        %ch,
        source = source.as_str(),
        pen_x = state.pen_x,
        polylines = polylines.len(),
        "placed glyph"
      );

      glyphs.push(GlyphResult {
        ch,
        origin_x: state.pen_x,
        advance: measure.advance,
        source,
        polylines,
      });
      state.advance(measure.advance);
    }

    debug!(
      glyphs = glyphs.len(),
      traced = tracer.is_some(),
      font = font.map(|f| f.name.as_str()).unwrap_or("<none>"),
      size,
      spacing,
      "rebuilt document"
    );
    Document { glyphs, state }
  }
}

/// Rasterizes and traces one glyph, returning placed polylines.
fn trace_glyph(
  handle: &TracerHandle,
  adapter: &SkeletonAdapter,
  font: Option<&LoadedFont>,
  ch: char,
  measure: &GlyphMeasure,
  state: &LayoutState,
  log_ink: bool,
) -> Option<Vec<Polyline>> {
  let raster = match rasterize_glyph(font, ch, measure.bounds, state.font_size) {
    Ok(raster) => raster,
    Err(err) => {
      warn!(%ch, error = %err, "glyph rasterization failed");
      return None;
    }
  };
  if log_ink {
    info!(
      %ch,
      w = raster.width(),
      h = raster.height(),
      ink = raster.ink_count(),
      "glyph raster ink"
    );
  }

  let polylines = adapter.trace(handle, &raster)?;
  let dx = state.pen_x;
  let dy = state.baseline_y - HEURISTIC_ASCENT * state.font_size;
  Some(polylines.iter().map(|p| p.translated(dx, dy)).collect())
}

fn fallback_glyph(
  font: Option<&LoadedFont>,
  ch: char,
  state: &LayoutState,
) -> (GlyphSource, Vec<Polyline>) {
  let source = if font.is_some() {
    GlyphSource::Outline
  } else {
    GlyphSource::Placeholder
  };
  let polylines = fallback::sample(font, ch, state.pen_x, state.baseline_y, state.font_size);
  (source, polylines)
}
