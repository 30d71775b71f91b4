//! Skeleton tracing orchestration
//!
//! The tracing algorithm itself is an external capability. This module finds
//! it ([`TracerLocator`]), calls it in whichever shape it supports
//! ([`SkeletonAdapter`]), and degrades to outline sampling when it is absent
//! or returns nothing ([`fallback`]).

pub mod adapter;
pub mod capability;
pub mod fallback;
pub mod locator;

pub use adapter::SkeletonAdapter;
pub use capability::{
  BoolArrayCall, BoolArrayTrace, RasterTrace, Skeleton, TraceResult, TracerHandle, TracerLoader,
};
pub use locator::{
  is_tracer_name, CandidateSummary, ResolutionState, TracerBinding, TracerLocator, TracerRegistry,
  WELL_KNOWN_NAMES,
};
