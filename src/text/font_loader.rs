//! Font loading utilities
//!
//! Users supply their own font files. This module validates an upload by its
//! extension or declared subtype, parses it once with ttf-parser to make sure
//! it is usable, and keeps the bytes behind an `Arc` so every rebuild can
//! re-borrow a `ttf_parser::Face` cheaply.
//!
//! # Example
//!
//! ```rust,ignore
//! use textskel::text::font_loader::{FontUpload, LoadedFont};
//!
//! let bytes = std::fs::read("Inter.ttf")?;
//! let upload = FontUpload::new("Inter.ttf", None, bytes);
//! let font = LoadedFont::from_upload(upload)?;
//! println!("units per em: {}", font.units_per_em());
//! ```

use crate::error::FontError;
use std::path::Path;
use std::sync::Arc;

/// File extensions accepted for uploads (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["otf", "ttf"];

/// Declared subtypes accepted for uploads regardless of file name.
pub const ACCEPTED_SUBTYPES: &[&str] = &["opentype", "truetype"];

/// A user-supplied font file, as received from the controls surface.
#[derive(Debug, Clone)]
pub struct FontUpload {
  /// Original file name, used for extension validation and diagnostics
  pub name: String,
  /// Declared subtype (e.g. `truetype`), when the host knows it
  pub subtype: Option<String>,
  /// Raw file contents
  pub data: Vec<u8>,
}

impl FontUpload {
  pub fn new(name: impl Into<String>, subtype: Option<&str>, data: Vec<u8>) -> Self {
    Self {
      name: name.into(),
      subtype: subtype.map(str::to_string),
      data,
    }
  }

  /// Returns true when the name ends in `.otf`/`.ttf` or the subtype is
  /// `opentype`/`truetype`.
  ///
  /// # Examples
  ///
  /// ```
  /// use textskel::text::font_loader::FontUpload;
  ///
  /// assert!(FontUpload::new("Display.OTF", None, Vec::new()).is_accepted());
  /// assert!(FontUpload::new("blob", Some("truetype"), Vec::new()).is_accepted());
  /// assert!(!FontUpload::new("font.woff2", None, Vec::new()).is_accepted());
  /// ```
  pub fn is_accepted(&self) -> bool {
    let by_extension = Path::new(&self.name)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| {
        ACCEPTED_EXTENSIONS
          .iter()
          .any(|accepted| ext.eq_ignore_ascii_case(accepted))
      })
      .unwrap_or(false);
    let by_subtype = self
      .subtype
      .as_deref()
      .map(|subtype| ACCEPTED_SUBTYPES.contains(&subtype))
      .unwrap_or(false);
    by_extension || by_subtype
  }

  /// Rejects uploads that can never be a font; parsing happens later.
  pub fn validate(&self) -> Result<(), FontError> {
    if !self.is_accepted() {
      return Err(FontError::UnsupportedFormat {
        name: self.name.clone(),
      });
    }
    if self.data.is_empty() {
      return Err(FontError::EmptyData {
        name: self.name.clone(),
      });
    }
    Ok(())
  }
}

/// A parsed, shareable font.
#[derive(Debug, Clone)]
pub struct LoadedFont {
  /// Font binary data (shared via Arc for efficiency)
  pub data: Arc<Vec<u8>>,
  /// Font index within the file (for TTC font collections)
  pub index: u32,
  /// Name the font was loaded under
  pub name: String,
  units_per_em: u16,
}

impl LoadedFont {
  /// Validates and parses an upload.
  pub fn from_upload(upload: FontUpload) -> Result<Self, FontError> {
    upload.validate()?;
    Self::from_bytes(upload.name, upload.data)
  }

  /// Parses raw font bytes without extension checks.
  pub fn from_bytes(
    name: impl Into<String>,
    data: Vec<u8>,
  ) -> Result<Self, FontError> {
    let name = name.into();
    let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::LoadFailed {
      name: name.clone(),
      reason: format!("Failed to parse font: {:?}", e),
    })?;
    let units_per_em = face.units_per_em();
    Ok(Self {
      data: Arc::new(data),
      index: 0,
      name,
      units_per_em,
    })
  }

  pub fn units_per_em(&self) -> f32 {
    self.units_per_em as f32
  }

  /// Design-unit to pixel scale for the given font size.
  pub fn scale(&self, font_size: f32) -> f32 {
    font_size / self.units_per_em()
  }

  /// Get ttf-parser Face for glyph access
  pub fn as_ttf_face(&self) -> Result<ttf_parser::Face<'_>, FontError> {
    ttf_parser::Face::parse(&self.data, self.index).map_err(|e| FontError::LoadFailed {
      name: self.name.clone(),
      reason: format!("Failed to parse font: {:?}", e),
    })
  }
}
