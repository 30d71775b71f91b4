use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::RwLock;

/// Logs the per-glyph ink pixel count after rasterization.
pub const LOG_INK: &str = "TEXTSKEL_LOG_INK";
/// Logs every tracer entry point invocation, not only failures.
pub const LOG_TRACE_CALLS: &str = "TEXTSKEL_LOG_TRACE_CALLS";
/// Skips tracer resolution entirely, forcing the vector/placeholder paths.
pub const DISABLE_TRACER: &str = "TEXTSKEL_DISABLE_TRACER";
/// Overrides the luminance threshold used when building boolean masks.
pub const MASK_THRESHOLD: &str = "TEXTSKEL_MASK_THRESHOLD";

/// Parsed runtime debug/configuration toggles sourced from `TEXTSKEL_*` environment variables.
///
/// Values are captured once (via [`RuntimeToggles::from_env`]) and then reused throughout a
/// rebuild. Callers can also construct instances manually to override environment-derived
/// behavior when embedding the library.
#[derive(Debug, Clone, Default)]
pub struct RuntimeToggles {
  raw: HashMap<String, String>,
  config: DebugConfig,
}

impl RuntimeToggles {
  /// Parse all `TEXTSKEL_*` environment variables into a toggle map.
  pub fn from_env() -> Self {
    let raw = std::env::vars()
      .filter(|(k, _)| k.starts_with("TEXTSKEL_"))
      .collect::<HashMap<_, _>>();
    Self::from_map(raw)
  }

  /// Construct a toggle set from a provided map of key/value pairs.
  pub fn from_map(raw: HashMap<String, String>) -> Self {
    let config = DebugConfig::from_env_map(&raw);
    Self { raw, config }
  }

  /// Returns parsed, typed debug configuration derived from the environment.
  pub fn config(&self) -> &DebugConfig {
    &self.config
  }

  /// Returns the raw string value for a toggle, if set.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.raw.get(key).map(String::as_str)
  }

  /// Returns true when the toggle is present and truthy (`!= 0`/`false`/`off`).
  pub fn truthy(&self, key: &str) -> bool {
    self.truthy_with_default(key, false)
  }

  /// Returns true when the toggle is present and truthy, otherwise the provided default.
  pub fn truthy_with_default(&self, key: &str, default: bool) -> bool {
    if let Some(val) = self.config.bools.get(key) {
      *val
    } else {
      truthy(self.get(key), default)
    }
  }

  /// Parse a toggle as `f64`, returning `None` when unset or unparseable.
  pub fn f64(&self, key: &str) -> Option<f64> {
    if let Some(v) = self.config.f64s.get(key) {
      *v
    } else {
      self.get(key).and_then(|v| v.trim().parse::<f64>().ok())
    }
  }
}

fn truthy(value: Option<&str>, default: bool) -> bool {
  value
    .map(|v| !matches_ignore_case(v, &["0", "false", "off"]))
    .unwrap_or(default)
}

fn matches_ignore_case(value: &str, candidates: &[&str]) -> bool {
  let lower = value.trim().to_ascii_lowercase();
  candidates.iter().any(|c| lower == *c)
}

#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
  pub bools: HashMap<&'static str, bool>,
  pub f64s: HashMap<&'static str, Option<f64>>,
}

impl DebugConfig {
  pub fn from_env_map(raw: &HashMap<String, String>) -> Self {
    let mut config = DebugConfig::default();
    config.insert_bool(LOG_INK, truthy(raw.get(LOG_INK).map(String::as_str), false));
    config.insert_bool(LOG_TRACE_CALLS, truthy(raw.get(LOG_TRACE_CALLS).map(String::as_str), false));
    config.insert_bool(DISABLE_TRACER, truthy(raw.get(DISABLE_TRACER).map(String::as_str), false));
    config.f64s.insert(
      MASK_THRESHOLD,
      raw
        .get(MASK_THRESHOLD)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite()),
    );
    config
  }

  fn insert_bool(&mut self, key: &'static str, value: bool) {
    self.bools.insert(key, value);
  }
}

static DEFAULT_TOGGLES: OnceLock<Arc<RuntimeToggles>> = OnceLock::new();
static ACTIVE_TOGGLES: OnceLock<RwLock<Arc<RuntimeToggles>>> = OnceLock::new();

/// Returns the currently active runtime toggles.
///
/// Defaults to `RuntimeToggles::from_env()` if no overrides are installed.
pub fn runtime_toggles() -> Arc<RuntimeToggles> {
  let lock = ACTIVE_TOGGLES.get_or_init(|| RwLock::new(default_toggles()));
  match lock.read() {
    Ok(guard) => guard.clone(),
    Err(poisoned) => poisoned.into_inner().clone(),
  }
}

fn default_toggles() -> Arc<RuntimeToggles> {
  DEFAULT_TOGGLES
    .get_or_init(|| Arc::new(RuntimeToggles::from_env()))
    .clone()
}

/// Guard that restores the previous active toggles when dropped.
pub struct RuntimeTogglesGuard {
  previous: Arc<RuntimeToggles>,
}

impl Drop for RuntimeTogglesGuard {
  fn drop(&mut self) {
    if let Some(lock) = ACTIVE_TOGGLES.get() {
      if let Ok(mut guard) = lock.write() {
        *guard = self.previous.clone();
      }
    }
  }
}

/// Install the provided toggles as the active set for the duration of the returned guard.
pub fn set_runtime_toggles(toggles: Arc<RuntimeToggles>) -> RuntimeTogglesGuard {
  let lock = ACTIVE_TOGGLES.get_or_init(|| RwLock::new(default_toggles()));
  let mut guard = match lock.write() {
    Ok(guard) => guard,
    Err(poisoned) => poisoned.into_inner(),
  };
  let previous = std::mem::replace(&mut *guard, toggles);
  RuntimeTogglesGuard { previous }
}

/// Convenience helper to run a closure with a temporary toggles override.
pub fn with_runtime_toggles<T>(toggles: Arc<RuntimeToggles>, f: impl FnOnce() -> T) -> T {
  let guard = set_runtime_toggles(toggles);
  let result = f();
  drop(guard);
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  #[test]
  fn truthy_respects_false_spellings() {
    let toggles = RuntimeToggles::from_map(map(&[(LOG_INK, "off"), (DISABLE_TRACER, "1")]));
    assert!(!toggles.truthy(LOG_INK));
    assert!(toggles.truthy(DISABLE_TRACER));
    assert!(!toggles.truthy(LOG_TRACE_CALLS));
  }

  #[test]
  fn unknown_keys_fall_back_to_raw_values() {
    let toggles = RuntimeToggles::from_map(map(&[("TEXTSKEL_EXTRA", "yes")]));
    assert!(toggles.truthy("TEXTSKEL_EXTRA"));
    assert!(toggles.truthy_with_default("TEXTSKEL_MISSING", true));
  }

  #[test]
  fn threshold_parses_as_float() {
    let toggles = RuntimeToggles::from_map(map(&[(MASK_THRESHOLD, " 90.5 ")]));
    assert_eq!(toggles.f64(MASK_THRESHOLD), Some(90.5));
    let toggles = RuntimeToggles::from_map(map(&[(MASK_THRESHOLD, "bright")]));
    assert_eq!(toggles.f64(MASK_THRESHOLD), None);
  }

  #[test]
  fn override_guard_restores_previous_toggles() {
    let custom = Arc::new(RuntimeToggles::from_map(map(&[(
      "TEXTSKEL_GUARD_TEST",
      "1",
    )])));
    with_runtime_toggles(custom, || {
      assert!(runtime_toggles().truthy("TEXTSKEL_GUARD_TEST"));
    });
    assert!(!runtime_toggles().truthy("TEXTSKEL_GUARD_TEST"));
  }
}
