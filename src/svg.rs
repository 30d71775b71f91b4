//! SVG export of a laid-out document.
//!
//! The output is one `<svg>` root sized to the canvas, a stroke-only group
//! carrying the stroke width, and a nested group per glyph with one open
//! `<path>` per drawable polyline.

use crate::error::ExportError;
use crate::geometry::Polyline;
use crate::layout::{Document, CANVAS_HEIGHT, CANVAS_WIDTH};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default file name for exported drawings.
pub const SVG_FILE_NAME: &str = "text_skeleton.svg";
/// MIME type of the exported document.
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Group id for the glyph at `index`: `char_` + the character and index with
/// anything outside `[A-Za-z0-9_-]` replaced by `_`.
pub fn glyph_group_id(ch: char, index: usize) -> String {
  let raw = format!("{ch}_{index}");
  let safe: String = raw
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
        c
      } else {
        '_'
      }
    })
    .collect();
  format!("char_{safe}")
}

/// Path data `M x,y L x,y ...`; `None` for polylines that are not drawable.
pub fn path_data(polyline: &Polyline) -> Option<String> {
  if !polyline.is_drawable() {
    return None;
  }
  let mut d = String::from("M ");
  for (i, p) in polyline.points.iter().enumerate() {
    if i > 0 {
      d.push_str(" L ");
    }
    let _ = write!(d, "{},{}", p.x, p.y);
  }
  Some(d)
}

/// Serializes `document` with the given stroke width.
pub fn export_svg(document: &Document, stroke_weight: f32) -> Result<String, ExportError> {
  if !stroke_weight.is_finite() {
    return Err(ExportError::SerializeFailed {
      reason: format!("stroke width {stroke_weight} is not finite"),
    });
  }
  let mut lines = Vec::with_capacity(document.len() * 2 + 3);
  lines.push(format!(
    r#"<svg xmlns="{SVG_NS}" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
    w = CANVAS_WIDTH,
    h = CANVAS_HEIGHT
  ));
  lines.push(format!(
    r#"<g fill="none" stroke="black" stroke-width="{stroke_weight}">"#
  ));
  for (index, glyph) in document.glyphs.iter().enumerate() {
    lines.push(format!(r#"<g id="{}">"#, glyph_group_id(glyph.ch, index)));
    for d in glyph.polylines.iter().filter_map(path_data) {
      lines.push(format!(r#"<path d="{d}" />"#));
    }
    lines.push("</g>".to_string());
  }
  lines.push("</g></svg>".to_string());
  Ok(lines.join("\n"))
}

/// Writes `svg` into `dir` under [`SVG_FILE_NAME`], returning the full path.
pub fn save_svg(svg: &str, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
  let path = dir.as_ref().join(SVG_FILE_NAME);
  write_svg(svg, &path)?;
  Ok(path)
}

/// Writes `svg` to exactly `path`.
pub fn write_svg(svg: &str, path: &Path) -> Result<(), ExportError> {
  std::fs::write(path, svg).map_err(|err| ExportError::WriteFailed {
    path: path.display().to_string(),
    reason: err.to_string(),
  })?;
  info!(path = %path.display(), bytes = svg.len(), mime = SVG_MIME_TYPE, "exported svg");
  Ok(())
}
