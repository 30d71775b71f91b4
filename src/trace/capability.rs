//! Tracing capability shapes.
//!
//! Skeleton tracing itself lives outside this crate. A host hands in a
//! [`TracerHandle`] whose entry points mirror the call shapes tracing libraries
//! expose: raster-based (`fromCanvas`, `trace`, `traceSkeleton`), boolean-mask
//! based (`fromBoolArray`), an asynchronous `load` that yields the real
//! handle, and a nested `default` export.
//!
//! Plain closures implement every entry point trait, so a host can bind a
//! tracer with
//!
//! ```
//! use textskel::paint::GlyphRaster;
//! use textskel::trace::{Skeleton, TraceResult, TracerHandle};
//!
//! let handle = TracerHandle::new().with_from_canvas(|_raster: &GlyphRaster| -> TraceResult {
//!   Ok(Some(Skeleton::default()))
//! });
//! assert!(handle.has_from_canvas());
//! ```

use crate::error::TraceError;
use crate::geometry::Polyline;
use crate::paint::glyph_raster::GlyphRaster;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Polylines produced by a tracer, in the glyph raster's coordinate frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
  pub polylines: Vec<Polyline>,
}

impl Skeleton {
  pub fn new(polylines: Vec<Polyline>) -> Self {
    Self { polylines }
  }

  pub fn is_empty(&self) -> bool {
    self.polylines.is_empty()
  }
}

/// `Ok(None)` is a tracer returning nothing; `Err` is a tracer that threw.
pub type TraceResult = Result<Option<Skeleton>, TraceError>;

/// Raster-based entry point: receives the glyph surface as-is.
pub trait RasterTrace: Send + Sync {
  fn trace(&self, raster: &GlyphRaster) -> TraceResult;
}

impl<F> RasterTrace for F
where
  F: Fn(&GlyphRaster) -> TraceResult + Send + Sync,
{
  fn trace(&self, raster: &GlyphRaster) -> TraceResult {
    self(raster)
  }
}

/// Argument orderings attempted against a boolean-array entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolArrayCall<'a> {
  /// `(mask, width, height)`
  MaskWidthHeight {
    mask: &'a [u8],
    width: u32,
    height: u32,
  },
  /// `(width, height, mask)`
  WidthHeightMask {
    width: u32,
    height: u32,
    mask: &'a [u8],
  },
  /// `(mask)` alone
  MaskOnly { mask: &'a [u8] },
}

impl<'a> BoolArrayCall<'a> {
  /// All orderings in the order they are attempted.
  pub fn orderings(mask: &'a [u8], width: u32, height: u32) -> [BoolArrayCall<'a>; 3] {
    [
      BoolArrayCall::MaskWidthHeight {
        mask,
        width,
        height,
      },
      BoolArrayCall::WidthHeightMask {
        width,
        height,
        mask,
      },
      BoolArrayCall::MaskOnly { mask },
    ]
  }

  pub fn mask(&self) -> &'a [u8] {
    match *self {
      BoolArrayCall::MaskWidthHeight { mask, .. }
      | BoolArrayCall::WidthHeightMask { mask, .. }
      | BoolArrayCall::MaskOnly { mask } => mask,
    }
  }

  pub fn describe(&self) -> &'static str {
    match self {
      BoolArrayCall::MaskWidthHeight { .. } => "(mask, width, height)",
      BoolArrayCall::WidthHeightMask { .. } => "(width, height, mask)",
      BoolArrayCall::MaskOnly { .. } => "(mask)",
    }
  }
}

/// Boolean-array entry point; implementations reject orderings they don't accept.
pub trait BoolArrayTrace: Send + Sync {
  fn trace(&self, call: BoolArrayCall<'_>) -> TraceResult;
}

impl<F> BoolArrayTrace for F
where
  F: for<'a> Fn(BoolArrayCall<'a>) -> TraceResult + Send + Sync,
{
  fn trace(&self, call: BoolArrayCall<'_>) -> TraceResult {
    self(call)
  }
}

/// Asynchronous `load` entry point yielding the usable handle.
pub trait TracerLoader: Send + Sync {
  fn load(&self) -> BoxFuture<'static, Result<TracerHandle, TraceError>>;
}

impl<F, Fut> TracerLoader for F
where
  F: Fn() -> Fut + Send + Sync,
  Fut: Future<Output = Result<TracerHandle, TraceError>> + Send + 'static,
{
  fn load(&self) -> BoxFuture<'static, Result<TracerHandle, TraceError>> {
    self().boxed()
  }
}

/// An externally supplied tracing capability.
///
/// Every entry point is optional; the locator and the skeleton adapter probe
/// them in a fixed priority order.
#[derive(Clone, Default)]
pub struct TracerHandle {
  from_canvas: Option<Arc<dyn RasterTrace>>,
  trace: Option<Arc<dyn RasterTrace>>,
  trace_skeleton: Option<Arc<dyn RasterTrace>>,
  from_bool_array: Option<Arc<dyn BoolArrayTrace>>,
  load: Option<Arc<dyn TracerLoader>>,
  default_export: Option<Box<TracerHandle>>,
}

impl TracerHandle {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_from_canvas(mut self, entry: impl RasterTrace + 'static) -> Self {
    self.from_canvas = Some(Arc::new(entry));
    self
  }

  pub fn with_trace(mut self, entry: impl RasterTrace + 'static) -> Self {
    self.trace = Some(Arc::new(entry));
    self
  }

  pub fn with_trace_skeleton(mut self, entry: impl RasterTrace + 'static) -> Self {
    self.trace_skeleton = Some(Arc::new(entry));
    self
  }

  pub fn with_from_bool_array(mut self, entry: impl BoolArrayTrace + 'static) -> Self {
    self.from_bool_array = Some(Arc::new(entry));
    self
  }

  pub fn with_load(mut self, loader: impl TracerLoader + 'static) -> Self {
    self.load = Some(Arc::new(loader));
    self
  }

  pub fn with_default_export(mut self, nested: TracerHandle) -> Self {
    self.default_export = Some(Box::new(nested));
    self
  }

  pub fn from_canvas(&self) -> Option<&dyn RasterTrace> {
    self.from_canvas.as_deref()
  }

  pub fn trace(&self) -> Option<&dyn RasterTrace> {
    self.trace.as_deref()
  }

  pub fn trace_skeleton(&self) -> Option<&dyn RasterTrace> {
    self.trace_skeleton.as_deref()
  }

  pub fn from_bool_array(&self) -> Option<&dyn BoolArrayTrace> {
    self.from_bool_array.as_deref()
  }

  pub fn loader(&self) -> Option<&dyn TracerLoader> {
    self.load.as_deref()
  }

  pub fn default_export(&self) -> Option<&TracerHandle> {
    self.default_export.as_deref()
  }

  pub fn has_from_canvas(&self) -> bool {
    self.from_canvas.is_some()
  }

  /// `trace`, `fromBoolArray` or `traceSkeleton` present.
  pub fn has_generic_entry(&self) -> bool {
    self.trace.is_some() || self.from_bool_array.is_some() || self.trace_skeleton.is_some()
  }

  /// True when at least one tracing entry point exists here or in the default export.
  pub fn can_trace(&self) -> bool {
    self.has_from_canvas()
      || self.has_generic_entry()
      || self.default_export().is_some_and(TracerHandle::can_trace)
  }

  /// Names of the entry points present on this handle, for diagnostics.
  pub fn entry_points(&self) -> Vec<&'static str> {
    let mut names = Vec::new();
    if self.from_canvas.is_some() {
      names.push("fromCanvas");
    }
    if self.trace.is_some() {
      names.push("trace");
    }
    if self.trace_skeleton.is_some() {
      names.push("traceSkeleton");
    }
    if self.from_bool_array.is_some() {
      names.push("fromBoolArray");
    }
    if self.load.is_some() {
      names.push("load");
    }
    if self.default_export.is_some() {
      names.push("default");
    }
    names
  }
}

impl fmt::Debug for TracerHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TracerHandle")
      .field("entry_points", &self.entry_points())
      .field("default_export", &self.default_export)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn empty(_: &GlyphRaster) -> TraceResult {
    Ok(None)
  }

  #[test]
  fn empty_handle_cannot_trace() {
    let handle = TracerHandle::new();
    assert!(!handle.can_trace());
    assert!(handle.entry_points().is_empty());
  }

  #[test]
  fn nested_default_counts_as_traceable() {
    let handle = TracerHandle::new().with_default_export(TracerHandle::new().with_trace(empty));
    assert!(!handle.has_generic_entry());
    assert!(handle.can_trace());
    assert_eq!(handle.entry_points(), vec!["default"]);
  }

  #[test]
  fn loader_alone_is_not_traceable() {
    let handle = TracerHandle::new().with_load(|| async { Ok::<_, TraceError>(TracerHandle::new()) });
    assert!(!handle.can_trace());
    assert_eq!(handle.entry_points(), vec!["load"]);
  }

  #[test]
  fn bool_array_orderings_are_stable() {
    let mask = [1u8, 0, 0, 1];
    let calls = BoolArrayCall::orderings(&mask, 2, 2);
    let described: Vec<_> = calls.iter().map(BoolArrayCall::describe).collect();
    assert_eq!(
      described,
      vec!["(mask, width, height)", "(width, height, mask)", "(mask)"]
    );
    assert!(calls.iter().all(|c| c.mask() == &mask[..]));
  }
}
