//! Normalizes the tracer's call shapes into one polyline result.
//!
//! Raster entry points are tried first (`fromCanvas`, `trace`,
//! `traceSkeleton`), then the boolean-array entry point with each argument
//! ordering in turn. The first attempt yielding at least one polyline wins.
//! Failures are logged and the next strategy is tried; a nested default export
//! gets one more pass.

use crate::debug::runtime::{RuntimeToggles, LOG_TRACE_CALLS, MASK_THRESHOLD};
use crate::geometry::Polyline;
use crate::paint::glyph_raster::{GlyphRaster, DEFAULT_MASK_THRESHOLD};
use crate::trace::capability::{BoolArrayCall, RasterTrace, TraceResult, TracerHandle};
use tracing::{debug, warn};

type RasterAccessor = fn(&TracerHandle) -> Option<&dyn RasterTrace>;

/// Raster-based strategies in priority order.
const RASTER_STRATEGIES: [(&str, RasterAccessor); 3] = [
  ("fromCanvas", TracerHandle::from_canvas),
  ("trace", TracerHandle::trace),
  ("traceSkeleton", TracerHandle::trace_skeleton),
];

/// How many nested default exports are followed.
const MAX_NESTING: usize = 1;

#[derive(Debug, Clone)]
pub struct SkeletonAdapter {
  mask_threshold: f32,
  log_calls: bool,
}

impl Default for SkeletonAdapter {
  fn default() -> Self {
    Self {
      mask_threshold: DEFAULT_MASK_THRESHOLD,
      log_calls: false,
    }
  }
}

impl SkeletonAdapter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_toggles(toggles: &RuntimeToggles) -> Self {
    Self {
      mask_threshold: toggles
        .f64(MASK_THRESHOLD)
        .map(|v| v as f32)
        .unwrap_or(DEFAULT_MASK_THRESHOLD),
      log_calls: toggles.truthy(LOG_TRACE_CALLS),
    }
  }

  pub fn with_mask_threshold(mut self, threshold: f32) -> Self {
    self.mask_threshold = threshold;
    self
  }

  pub fn mask_threshold(&self) -> f32 {
    self.mask_threshold
  }

  /// Traces `raster` with `handle`; `None` means the caller should fall back.
  pub fn trace(&self, handle: &TracerHandle, raster: &GlyphRaster) -> Option<Vec<Polyline>> {
    self.trace_nested(handle, raster, 0)
  }

  fn trace_nested(
    &self,
    handle: &TracerHandle,
    raster: &GlyphRaster,
    depth: usize,
  ) -> Option<Vec<Polyline>> {
    for (name, accessor) in RASTER_STRATEGIES {
      if let Some(entry) = accessor(handle) {
        if self.log_calls {
          debug!(ch = %raster.ch, "calling tracer.{name}(raster)");
        }
        if let Some(polylines) = self.accept(name, raster.ch, entry.trace(raster)) {
          return Some(polylines);
        }
      }
    }

    if let Some(entry) = handle.from_bool_array() {
      let mask = raster.to_bool_mask(self.mask_threshold);
      debug!(
        ch = %raster.ch,
        w = mask.width,
        h = mask.height,
        len = mask.data.len(),
        count = mask.on_count,
        "built boolean mask for fromBoolArray"
      );
      for call in BoolArrayCall::orderings(&mask.data, mask.width, mask.height) {
        if self.log_calls {
          debug!(ch = %raster.ch, "calling tracer.fromBoolArray{}", call.describe());
        }
        if let Some(polylines) = self.accept("fromBoolArray", raster.ch, entry.trace(call)) {
          return Some(polylines);
        }
      }
    }

    if depth < MAX_NESTING {
      if let Some(nested) = handle.default_export() {
        return self.trace_nested(nested, raster, depth + 1);
      }
    }
    None
  }

  fn accept(&self, entry_point: &str, ch: char, result: TraceResult) -> Option<Vec<Polyline>> {
    match result {
      Ok(Some(skeleton)) if !skeleton.is_empty() => Some(skeleton.polylines),
      Ok(_) => {
        debug!(%ch, entry_point, "tracer returned no polylines");
        None
      }
      Err(err) => {
        warn!(%ch, entry_point, error = %err, "tracer call failed");
        None
      }
    }
  }
}
