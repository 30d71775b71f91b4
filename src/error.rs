//! Error types for textskel
//!
//! This module provides error types for each subsystem:
//! - Font errors (upload validation, parsing)
//! - Trace errors (external tracing capability failures)
//! - Render errors (pixmap allocation, paint parameters, PNG encoding)
//! - Export errors (SVG serialization and writing)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.
//!
//! Most of these never reach the user: the glyph pipeline logs trace failures
//! and degrades to the vector or placeholder path instead.

use thiserror::Error;

/// Result type alias for textskel operations
///
/// # Examples
///
/// ```
/// use textskel::Result;
///
/// fn export() -> Result<String> {
///     Ok(String::new())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for textskel
///
/// Each variant wraps a more specific error type for that subsystem.
#[derive(Error, Debug)]
pub enum Error {
  /// Font upload or parsing error
  #[error("Font error: {0}")]
  Font(#[from] FontError),

  /// Rendering or rasterization error
  #[error("Render error: {0}")]
  Render(#[from] RenderError),

  /// SVG export error
  #[error("Export error: {0}")]
  Export(#[from] ExportError),

  /// I/O error (font files, export files)
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors that occur while accepting a user-supplied font
///
/// # Examples
///
/// ```
/// use textskel::error::FontError;
///
/// let error = FontError::UnsupportedFormat {
///   name: "notes.txt".to_string(),
/// };
/// assert!(error.to_string().contains(".otf"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontError {
  /// Upload had neither an accepted extension nor an accepted subtype
  #[error("Unsupported font file '{name}': upload a .otf or .ttf file")]
  UnsupportedFormat { name: String },

  /// Upload carried no bytes
  #[error("Font file '{name}' is empty")]
  EmptyData { name: String },

  /// Font data could not be parsed
  #[error("Failed to load font '{name}': {reason}")]
  LoadFailed { name: String, reason: String },
}

/// Errors raised by an external tracing capability
///
/// These are caught and logged by the locator and the skeleton adapter; an
/// exhausted strategy list is treated as an empty trace, not as a failure.
/// They are never wrapped in [`Error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
  /// An entry point was invoked and reported a failure
  #[error("Tracer entry point '{entry_point}' failed: {reason}")]
  CallFailed { entry_point: String, reason: String },

  /// An entry point rejected the argument shape it was given
  #[error("Tracer entry point '{entry_point}' does not accept {shape}")]
  UnsupportedSignature { entry_point: String, shape: String },

  /// An asynchronous `load` entry point rejected
  #[error("Tracer binding '{name}' failed to load: {reason}")]
  LoadFailed { name: String, reason: String },
}

/// Errors that occur during rendering and rasterization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
  /// Invalid paint parameters
  #[error("Invalid paint parameters: {message}")]
  InvalidParameters { message: String },

  /// Image encoding failed
  #[error("Failed to encode image as {format}: {reason}")]
  EncodeFailed { format: String, reason: String },
}

/// Errors that occur while exporting the document as SVG
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
  /// Formatting the document failed
  #[error("Failed to serialize SVG: {reason}")]
  SerializeFailed { reason: String },

  /// Writing the export file failed
  #[error("Failed to write '{path}': {reason}")]
  WriteFailed { path: String, reason: String },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_font_error_unsupported_format() {
    let error = FontError::UnsupportedFormat {
      name: "photo.png".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("photo.png"));
    assert!(message.contains(".ttf"));
  }

  #[test]
  fn test_font_error_load_failed() {
    let error = FontError::LoadFailed {
      name: "broken.otf".to_string(),
      reason: "unknown magic".to_string(),
    };
    assert!(format!("{}", error).contains("unknown magic"));
  }

  #[test]
  fn test_trace_error_call_failed() {
    let error = TraceError::CallFailed {
      entry_point: "fromCanvas".to_string(),
      reason: "boom".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("fromCanvas"));
    assert!(message.contains("boom"));
  }

  #[test]
  fn test_error_from_font_error() {
    let font_error = FontError::EmptyData {
      name: "a.ttf".to_string(),
    };
    let error: Error = font_error.into();
    assert!(matches!(error, Error::Font(_)));
    assert!(format!("{}", error).starts_with("Font error"));
  }

  #[test]
  fn test_error_from_io_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error: Error = io_error.into();
    assert!(matches!(error, Error::Io(_)));
  }

  #[test]
  fn test_render_error_display() {
    let error = RenderError::InvalidParameters {
      message: "zero size".to_string(),
    };
    assert!(format!("{}", error).contains("zero size"));
  }
}
