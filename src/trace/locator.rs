//! Tracer discovery and caching.
//!
//! The host registers named bindings at startup in a [`TracerRegistry`]. The
//! [`TracerLocator`] walks the bindings whose names look tracing-related and
//! picks the first one that exposes a usable shape, in this priority order:
//!
//! 1. a direct `fromCanvas` entry point
//! 2. a nested `default` export carrying `fromCanvas`
//! 3. an asynchronous `load`, awaited, whose result is then tested again
//! 4. a generic `trace`, `fromBoolArray` or `traceSkeleton` entry point
//!
//! Bindings registered with [`TracerRegistry::bind_hidden`] are not listed when
//! the registry is enumerated but can still be looked up by name. When no
//! listed binding name matches, a fixed list of well-known names is looked up
//! directly and probed for shapes 1 and 3, which is how hidden tracers are
//! found. A successful resolution is cached for the lifetime of the locator; a
//! failed one is retried on the next call.

use crate::trace::capability::TracerHandle;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Names probed when no registered binding matches the name pattern.
pub const WELL_KNOWN_NAMES: [&str; 4] = [
  "TraceSkeleton",
  "traceSkeleton",
  "trace_skeleton",
  "skeletonTracing",
];

const CANONICAL_NAME: &str = "TraceSkeleton";

fn name_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)trace|skeleton").expect("tracer name regex compiles"))
}

/// Returns true when `name` looks like it could hold a tracer.
pub fn is_tracer_name(name: &str) -> bool {
  name_pattern().is_match(name)
}

/// A named slot in the registry; `value` is `None` for a binding that exists but is empty.
#[derive(Debug, Clone)]
pub struct TracerBinding {
  pub name: String,
  pub value: Option<TracerHandle>,
  /// False for bindings reachable only by name lookup.
  pub listed: bool,
}

/// One line of the startup candidate listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSummary {
  pub name: String,
  /// The most relevant entry point found, e.g. `fromCanvas`
  pub exposes: Option<&'static str>,
}

/// Ordered bindings supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct TracerRegistry {
  bindings: Vec<TracerBinding>,
}

impl TracerRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style [`TracerRegistry::bind`].
  pub fn with(mut self, name: impl Into<String>, handle: TracerHandle) -> Self {
    self.bind(name, handle);
    self
  }

  /// Binds `handle` under `name`, replacing an existing binding in place.
  pub fn bind(&mut self, name: impl Into<String>, handle: TracerHandle) -> &mut Self {
    self.insert(name.into(), Some(handle), true);
    self
  }

  /// Binds `handle` under `name` without listing it in [`TracerRegistry::candidates`].
  pub fn bind_hidden(&mut self, name: impl Into<String>, handle: TracerHandle) -> &mut Self {
    self.insert(name.into(), Some(handle), false);
    self
  }

  /// Registers a name that holds nothing.
  pub fn bind_empty(&mut self, name: impl Into<String>) -> &mut Self {
    self.insert(name.into(), None, true);
    self
  }

  fn insert(&mut self, name: String, value: Option<TracerHandle>, listed: bool) {
    match self.bindings.iter_mut().find(|b| b.name == name) {
      Some(existing) => {
        existing.value = value;
        existing.listed = listed;
      }
      None => self.bindings.push(TracerBinding {
        name,
        value,
        listed,
      }),
    }
  }

  pub fn get(&self, name: &str) -> Option<&TracerHandle> {
    self
      .bindings
      .iter()
      .find(|b| b.name == name)
      .and_then(|b| b.value.as_ref())
  }

  pub fn bindings(&self) -> &[TracerBinding] {
    &self.bindings
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// Listed bindings whose names match the tracer name pattern, in
  /// registration order.
  pub fn candidates(&self) -> impl Iterator<Item = &TracerBinding> {
    self
      .bindings
      .iter()
      .filter(|b| b.listed && is_tracer_name(&b.name))
  }

  /// Exposes the first of the alternate spellings as `TraceSkeleton` when that
  /// name is unbound. Returns the alias source, if any.
  pub fn create_common_aliases(&mut self) -> Option<&'static str> {
    if self.get(CANONICAL_NAME).is_some() {
      return None;
    }
    for alias in &WELL_KNOWN_NAMES[1..] {
      let Some(source) = self.bindings.iter().find(|b| b.name == *alias) else {
        continue;
      };
      let (Some(handle), listed) = (source.value.clone(), source.listed) else {
        continue;
      };
      // The alias is listed exactly when its source is.
      self.insert(CANONICAL_NAME.to_string(), Some(handle), listed);
      info!("aliased {alias} -> {CANONICAL_NAME}");
      return Some(*alias);
    }
    None
  }

  /// Candidate bindings sorted by name with their most relevant entry point.
  pub fn describe_candidates(&self) -> Vec<CandidateSummary> {
    let mut summaries: Vec<CandidateSummary> = self
      .candidates()
      .map(|binding| CandidateSummary {
        name: binding.name.clone(),
        exposes: binding.value.as_ref().and_then(primary_entry_point),
      })
      .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name));
    summaries
  }
}

fn primary_entry_point(handle: &TracerHandle) -> Option<&'static str> {
  if handle.has_from_canvas() {
    Some("fromCanvas")
  } else if handle.loader().is_some() {
    Some("load")
  } else if handle.trace().is_some() {
    Some("trace")
  } else if handle.from_bool_array().is_some() {
    Some("fromBoolArray")
  } else {
    None
  }
}

/// Lifecycle of the cached tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
  Unresolved,
  Resolving,
  Resolved,
}

#[derive(Debug)]
enum CacheSlot {
  Unresolved,
  /// Number of resolutions currently in flight.
  Resolving(usize),
  Resolved(TracerHandle),
}

/// Memoizing tracer lookup owned by the composition root.
#[derive(Debug)]
pub struct TracerLocator {
  registry: TracerRegistry,
  slot: Mutex<CacheSlot>,
}

impl TracerLocator {
  /// Creates a locator over `registry`, applying the common aliases first.
  pub fn new(mut registry: TracerRegistry) -> Self {
    registry.create_common_aliases();
    Self {
      registry,
      slot: Mutex::new(CacheSlot::Unresolved),
    }
  }

  /// A locator with nothing registered; every resolution yields `None`.
  pub fn absent() -> Self {
    Self::new(TracerRegistry::new())
  }

  pub fn registry(&self) -> &TracerRegistry {
    &self.registry
  }

  pub fn state(&self) -> ResolutionState {
    match *self.slot.lock() {
      CacheSlot::Unresolved => ResolutionState::Unresolved,
      CacheSlot::Resolving(_) => ResolutionState::Resolving,
      CacheSlot::Resolved(_) => ResolutionState::Resolved,
    }
  }

  /// The cached handle, without attempting resolution.
  pub fn cached(&self) -> Option<TracerHandle> {
    match &*self.slot.lock() {
      CacheSlot::Resolved(handle) => Some(handle.clone()),
      _ => None,
    }
  }

  /// Emits the candidate listing at debug level.
  pub fn log_candidates(&self) {
    let summaries = self.registry.describe_candidates();
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    debug!(?names, "registry bindings matching trace|skeleton");
    for summary in &summaries {
      debug!(
        name = %summary.name,
        exposes = summary.exposes.unwrap_or(""),
        "tracer candidate"
      );
    }
  }

  /// Returns the tracer, resolving it on first use.
  ///
  /// Suspends while awaiting asynchronous `load` entry points. `None` means no
  /// capability is available, which is a supported configuration. Overlapping
  /// calls each run their own discovery; the state stays `Resolving` until the
  /// last of them finishes or one succeeds.
  pub async fn resolve(&self) -> Option<TracerHandle> {
    {
      let mut slot = self.slot.lock();
      *slot = match &*slot {
        CacheSlot::Resolved(handle) => return Some(handle.clone()),
        CacheSlot::Resolving(active) => CacheSlot::Resolving(active + 1),
        CacheSlot::Unresolved => CacheSlot::Resolving(1),
      };
    }

    let found = self.discover().await;

    let mut slot = self.slot.lock();
    let active = match &*slot {
      // A concurrent resolution already won; keep its handle.
      CacheSlot::Resolved(existing) => return Some(existing.clone()),
      CacheSlot::Resolving(active) => *active,
      CacheSlot::Unresolved => 1,
    };
    match found {
      Some(handle) => {
        *slot = CacheSlot::Resolved(handle.clone());
        Some(handle)
      }
      None => {
        *slot = if active > 1 {
          CacheSlot::Resolving(active - 1)
        } else {
          CacheSlot::Unresolved
        };
        None
      }
    }
  }

  async fn discover(&self) -> Option<TracerHandle> {
    let mut matched_any = false;
    for binding in self.registry.candidates() {
      matched_any = true;
      let Some(candidate) = binding.value.as_ref() else {
        continue;
      };
      if let Some(handle) = probe_candidate(&binding.name, candidate).await {
        debug!(name = %binding.name, entry_points = ?handle.entry_points(), "resolved tracer");
        return Some(handle);
      }
    }

    if matched_any {
      return None;
    }

    for name in WELL_KNOWN_NAMES {
      let Some(candidate) = self.registry.get(name) else {
        continue;
      };
      if candidate.has_from_canvas() {
        debug!(name, "resolved tracer by well-known name");
        return Some(candidate.clone());
      }
      if let Some(loaded) = load_candidate(name, candidate).await {
        debug!(name, entry_points = ?loaded.entry_points(), "resolved tracer by well-known name");
        return Some(loaded);
      }
    }
    None
  }
}

async fn probe_candidate(name: &str, candidate: &TracerHandle) -> Option<TracerHandle> {
  if candidate.has_from_canvas() {
    return Some(candidate.clone());
  }
  if let Some(nested) = candidate.default_export() {
    if nested.has_from_canvas() {
      return Some(nested.clone());
    }
  }
  if let Some(loaded) = load_candidate(name, candidate).await {
    return Some(loaded);
  }
  if candidate.has_generic_entry() {
    return Some(candidate.clone());
  }
  None
}

/// Awaits the candidate's `load`, accepting the result if it exposes any
/// tracing entry point (`fromCanvas` preferred by the caller's ordering).
async fn load_candidate(name: &str, candidate: &TracerHandle) -> Option<TracerHandle> {
  let loader = candidate.loader()?;
  match loader.load().await {
    Ok(loaded) if loaded.can_trace() => Some(loaded),
    Ok(loaded) => {
      debug!(name, entry_points = ?loaded.entry_points(), "loaded tracer exposes no entry point");
      None
    }
    Err(err) => {
      warn!(name, error = %err, "tracer load failed");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::TraceError;
  use crate::paint::glyph_raster::GlyphRaster;
  use crate::trace::capability::TraceResult;
  use futures::channel::oneshot;
  use futures::executor::block_on;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn empty(_: &GlyphRaster) -> TraceResult {
    Ok(None)
  }

  fn canvas_tracer() -> TracerHandle {
    TracerHandle::new().with_from_canvas(empty)
  }

  #[test]
  fn name_pattern_is_case_insensitive() {
    assert!(is_tracer_name("TraceSkeleton"));
    assert!(is_tracer_name("my_SKELETON_lib"));
    assert!(is_tracer_name("retrace"));
    assert!(!is_tracer_name("fontLoader"));
  }

  #[test]
  fn empty_registry_resolves_to_none() {
    let locator = TracerLocator::absent();
    assert!(block_on(locator.resolve()).is_none());
    assert_eq!(locator.state(), ResolutionState::Unresolved);
  }

  #[test]
  fn first_matching_candidate_wins() {
    let registry = TracerRegistry::new()
      .with("traceGeneric", TracerHandle::new().with_trace(empty))
      .with("TraceSkeleton", canvas_tracer());
    let locator = TracerLocator::new(registry);
    let handle = block_on(locator.resolve()).expect("resolved");
    // First candidate in registration order already satisfies the generic shape.
    assert!(!handle.has_from_canvas());
    assert!(handle.trace().is_some());
  }

  #[test]
  fn nested_default_export_is_unwrapped() {
    let registry = TracerRegistry::new().with(
      "skeletonModule",
      TracerHandle::new().with_default_export(canvas_tracer()),
    );
    let handle = block_on(TracerLocator::new(registry).resolve()).expect("resolved");
    assert!(handle.has_from_canvas());
    assert!(handle.default_export().is_none());
  }

  #[test]
  fn async_load_is_awaited() {
    let registry = TracerRegistry::new().with(
      "TraceSkeleton",
      TracerHandle::new().with_load(|| async { Ok::<_, TraceError>(canvas_tracer()) }),
    );
    let handle = block_on(TracerLocator::new(registry).resolve()).expect("resolved");
    assert!(handle.has_from_canvas());
  }

  #[test]
  fn failed_load_moves_on_to_next_candidate() {
    let registry = TracerRegistry::new()
      .with(
        "traceA",
        TracerHandle::new().with_load(|| async {
          Err::<TracerHandle, _>(TraceError::LoadFailed {
            name: "traceA".into(),
            reason: "wasm fetch failed".into(),
          })
        }),
      )
      .with("traceB", canvas_tracer());
    let handle = block_on(TracerLocator::new(registry).resolve()).expect("resolved");
    assert!(handle.has_from_canvas());
  }

  #[test]
  fn non_matching_names_are_ignored() {
    let registry = TracerRegistry::new().with("renderer", canvas_tracer());
    assert!(block_on(TracerLocator::new(registry).resolve()).is_none());
  }

  #[test]
  fn empty_bindings_are_skipped() {
    let mut registry = TracerRegistry::new();
    registry.bind_empty("traceSkeletonStub");
    registry.bind("skeletonReal", canvas_tracer());
    assert!(block_on(TracerLocator::new(registry).resolve()).is_some());
  }

  #[test]
  fn success_is_cached_and_load_runs_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let registry = TracerRegistry::new().with(
      "TraceSkeleton",
      TracerHandle::new().with_load(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, TraceError>(canvas_tracer()) }
      }),
    );
    let locator = TracerLocator::new(registry);
    assert!(block_on(locator.resolve()).is_some());
    assert!(block_on(locator.resolve()).is_some());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(locator.state(), ResolutionState::Resolved);
    assert!(locator.cached().is_some());
  }

  #[test]
  fn failure_is_retried_lazily() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let registry = TracerRegistry::new().with(
      "traceSkeleton",
      TracerHandle::new().with_load(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, TraceError>(TracerHandle::new()) }
      }),
    );
    let locator = TracerLocator::new(registry);
    assert!(block_on(locator.resolve()).is_none());
    assert!(block_on(locator.resolve()).is_none());
    // The binding and its TraceSkeleton alias are both probed on each attempt.
    assert_eq!(loads.load(Ordering::SeqCst), 4);
    assert_eq!(locator.state(), ResolutionState::Unresolved);
  }

  #[test]
  fn hidden_binding_resolves_by_well_known_name() {
    let mut registry = TracerRegistry::new();
    registry.bind("renderer", canvas_tracer());
    registry.bind_hidden(
      "TraceSkeleton",
      TracerHandle::new().with_load(|| async { Ok::<_, TraceError>(canvas_tracer()) }),
    );
    assert_eq!(registry.candidates().count(), 0);
    assert!(registry.describe_candidates().is_empty());

    let locator = TracerLocator::new(registry);
    let handle = block_on(locator.resolve()).expect("resolved through the well-known names");
    assert!(handle.has_from_canvas());
    assert_eq!(locator.state(), ResolutionState::Resolved);
  }

  #[test]
  fn hidden_binding_needs_canvas_or_load() {
    let mut registry = TracerRegistry::new();
    // Generic entry points are not enough for a name-only lookup.
    registry.bind_hidden("traceSkeleton", TracerHandle::new().with_trace(empty));
    registry.bind_hidden("skeletonTracing", canvas_tracer());
    let locator = TracerLocator::new(registry);
    let handle = block_on(locator.resolve()).expect("resolved");
    assert!(handle.has_from_canvas());
  }

  #[test]
  fn overlapping_failure_keeps_state_resolving() {
    let (release, gate) = oneshot::channel::<()>();
    let gate = Arc::new(parking_lot::Mutex::new(Some(gate)));
    let registry = TracerRegistry::new().with(
      "TraceSkeleton",
      TracerHandle::new().with_load(move || {
        let gate = gate.lock().take();
        async move {
          match gate {
            // The first caller waits and then succeeds.
            Some(gate) => {
              gate.await.map_err(|_| TraceError::LoadFailed {
                name: "TraceSkeleton".into(),
                reason: "gate dropped".into(),
              })?;
              Ok::<_, TraceError>(canvas_tracer())
            }
            // Later callers load a handle with no entry points.
            None => Ok(TracerHandle::new()),
          }
        }
      }),
    );
    let locator = TracerLocator::new(registry);

    block_on(async {
      let mut first = Box::pin(locator.resolve());
      assert!(futures::poll!(first.as_mut()).is_pending());
      assert_eq!(locator.state(), ResolutionState::Resolving);

      assert!(locator.resolve().await.is_none());
      assert_eq!(locator.state(), ResolutionState::Resolving);

      release.send(()).expect("first resolution still waiting");
      assert!(first.await.is_some());
    });
    assert_eq!(locator.state(), ResolutionState::Resolved);
  }

  #[test]
  fn aliases_alternate_spellings() {
    let mut registry = TracerRegistry::new().with("trace_skeleton", canvas_tracer());
    assert_eq!(registry.create_common_aliases(), Some("trace_skeleton"));
    assert!(registry.get("TraceSkeleton").is_some());
    assert_eq!(registry.create_common_aliases(), None);
  }

  #[test]
  fn candidate_listing_is_sorted() {
    let registry = TracerRegistry::new()
      .with("traceZ", TracerHandle::new().with_trace(empty))
      .with("other", canvas_tracer())
      .with("SkeletonA", canvas_tracer());
    let summaries = registry.describe_candidates();
    assert_eq!(
      summaries,
      vec![
        CandidateSummary {
          name: "SkeletonA".into(),
          exposes: Some("fromCanvas"),
        },
        CandidateSummary {
          name: "traceZ".into(),
          exposes: Some("trace"),
        },
      ]
    );
  }
}
