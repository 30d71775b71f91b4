//! Studio - the composition root
//!
//! Owns the controls, the optional user font, the shared tracer locator and
//! the currently installed [`Document`]. Every control change except stroke
//! weight triggers a full rebuild. A rebuild works on a snapshot of the
//! controls and installs its document atomically when it finishes; if two
//! rebuilds overlap, whichever finishes last wins.

use crate::debug::runtime::RuntimeToggles;
use crate::error::{ExportError, FontError, RenderError};
use crate::layout::{Document, LayoutEngine};
use crate::paint::{render_document, Frame};
use crate::svg;
use crate::text::font_loader::{FontUpload, LoadedFont};
use crate::trace::{TracerLocator, TracerRegistry};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Inclusive range and default of a numeric control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
  pub min: f32,
  pub max: f32,
  pub default: f32,
}

impl ControlRange {
  pub const fn new(min: f32, max: f32, default: f32) -> Self {
    Self { min, max, default }
  }

  /// Clamps into range; NaN maps to the default.
  pub fn clamp(&self, value: f32) -> f32 {
    if value.is_nan() {
      self.default
    } else {
      value.clamp(self.min, self.max)
    }
  }
}

pub const FONT_SIZE: ControlRange = ControlRange::new(40.0, 400.0, 200.0);
pub const LETTER_SPACING: ControlRange = ControlRange::new(0.0, 80.0, 10.0);
pub const STROKE_WEIGHT: ControlRange = ControlRange::new(1.0, 12.0, 3.0);
pub const DEFAULT_TEXT: &str = "Hello";

/// User-adjustable parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
  pub text: String,
  pub font_size: f32,
  pub letter_spacing: f32,
  pub stroke_weight: f32,
}

impl Default for Controls {
  fn default() -> Self {
    Self {
      text: DEFAULT_TEXT.to_string(),
      font_size: FONT_SIZE.default,
      letter_spacing: LETTER_SPACING.default,
      stroke_weight: STROKE_WEIGHT.default,
    }
  }
}

impl Controls {
  /// Returns a copy with every numeric control clamped into range.
  pub fn clamped(mut self) -> Self {
    self.font_size = FONT_SIZE.clamp(self.font_size);
    self.letter_spacing = LETTER_SPACING.clamp(self.letter_spacing);
    self.stroke_weight = STROKE_WEIGHT.clamp(self.stroke_weight);
    self
  }
}

/// What happened to an accepted font upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontStatus {
  /// The font parsed and is now in use.
  Loaded { name: String },
  /// The font failed to parse; no font is in use any more.
  Cleared { error: FontError },
}

#[derive(Debug, Default)]
struct Inputs {
  controls: Controls,
  font: Option<LoadedFont>,
}

/// Interactive session state.
#[derive(Debug)]
pub struct Studio {
  engine: LayoutEngine,
  inputs: Mutex<Inputs>,
  document: RwLock<Arc<Document>>,
}

impl Studio {
  /// Creates a studio over `registry` with default controls and no font.
  ///
  /// The initial document is empty until the first [`Studio::rebuild`].
  pub fn new(registry: TracerRegistry) -> Self {
    let locator = Arc::new(TracerLocator::new(registry));
    locator.log_candidates();
    Self::with_engine(LayoutEngine::new(locator))
  }

  pub fn with_engine(engine: LayoutEngine) -> Self {
    Self {
      engine,
      inputs: Mutex::new(Inputs::default()),
      document: RwLock::new(Arc::new(Document::empty())),
    }
  }

  /// Replaces the toggles the layout engine reads.
  pub fn with_toggles(self, toggles: Arc<RuntimeToggles>) -> Self {
    Self {
      engine: self.engine.with_toggles(toggles),
      ..self
    }
  }

  /// Replaces all controls at once, clamped. Does not rebuild.
  pub fn with_controls(self, controls: Controls) -> Self {
    self.inputs.lock().controls = controls.clamped();
    self
  }

  pub fn locator(&self) -> &Arc<TracerLocator> {
    self.engine.locator()
  }

  pub fn controls(&self) -> Controls {
    self.inputs.lock().controls.clone()
  }

  pub fn font(&self) -> Option<LoadedFont> {
    self.inputs.lock().font.clone()
  }

  /// The currently installed document.
  pub fn document(&self) -> Arc<Document> {
    self.document.read().clone()
  }

  /// Lays the current controls out again and installs the result.
  pub async fn rebuild(&self) -> Arc<Document> {
    let (controls, font) = {
      let inputs = self.inputs.lock();
      (inputs.controls.clone(), inputs.font.clone())
    };
    let document = Arc::new(
      self
        .engine
        .rebuild(
          &controls.text,
          font.as_ref(),
          controls.font_size,
          controls.letter_spacing,
        )
        .await,
    );
    *self.document.write() = document.clone();
    document
  }

  pub async fn set_text(&self, text: impl Into<String>) -> Arc<Document> {
    self.inputs.lock().controls.text = text.into();
    self.rebuild().await
  }

  pub async fn set_font_size(&self, size: f32) -> Arc<Document> {
    self.inputs.lock().controls.font_size = FONT_SIZE.clamp(size);
    self.rebuild().await
  }

  pub async fn set_letter_spacing(&self, spacing: f32) -> Arc<Document> {
    self.inputs.lock().controls.letter_spacing = LETTER_SPACING.clamp(spacing);
    self.rebuild().await
  }

  /// Only affects rendering and export; the document is left alone.
  pub fn set_stroke_weight(&self, weight: f32) -> f32 {
    let weight = STROKE_WEIGHT.clamp(weight);
    self.inputs.lock().controls.stroke_weight = weight;
    weight
  }

  /// Accepts a font upload.
  ///
  /// Rejected uploads (wrong extension and subtype, or no data) return the
  /// error and change nothing. Accepted uploads always rebuild: with the new
  /// font when it parses, otherwise with no font at all.
  pub async fn upload_font(
    &self,
    name: impl Into<String>,
    subtype: Option<&str>,
    data: Vec<u8>,
  ) -> Result<FontStatus, FontError> {
    let upload = FontUpload::new(name, subtype, data);
    upload.validate()?;

    let name = upload.name.clone();
    let status = match LoadedFont::from_upload(upload) {
      Ok(font) => {
        info!(%name, "font loaded");
        self.inputs.lock().font = Some(font);
        FontStatus::Loaded { name }
      }
      Err(error) => {
        warn!(%name, %error, "font failed to load; continuing without a font");
        self.inputs.lock().font = None;
        FontStatus::Cleared { error }
      }
    };
    self.rebuild().await;
    Ok(status)
  }

  /// Renders the installed document with the current stroke weight.
  pub fn render(&self) -> Result<Frame, RenderError> {
    let weight = self.inputs.lock().controls.stroke_weight;
    render_document(&self.document(), weight)
  }

  /// Serializes the installed document with the current stroke weight.
  pub fn export_svg(&self) -> Result<String, ExportError> {
    let weight = self.inputs.lock().controls.stroke_weight;
    svg::export_svg(&self.document(), weight)
  }

  /// Exports into `dir` as `text_skeleton.svg`.
  pub fn save_svg(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let text = self.export_svg()?;
    svg::save_svg(&text, dir)
  }
}
