//! textskel renders text as skeleton stroke polylines.
//!
//! Each character is rasterized alone and handed to an externally supplied
//! skeleton tracer. When no tracer is bound, or it returns nothing, the glyph
//! outline is sampled from the font instead; with no font at all a bounding
//! rectangle stands in. The resulting document can be rendered to a pixmap or
//! exported as SVG.
//!
//! ```
//! use futures::executor::block_on;
//! use textskel::trace::TracerRegistry;
//! use textskel::Studio;
//!
//! let studio = Studio::new(TracerRegistry::new());
//! let document = block_on(studio.set_text("Hi"));
//! assert_eq!(document.len(), 2);
//! let svg = studio.export_svg().unwrap();
//! assert!(svg.contains(r#"id="char_H_0""#));
//! ```

pub mod debug;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod paint;
pub mod studio;
pub mod svg;
pub mod text;
pub mod trace;

pub use error::{Error, Result};
pub use geometry::{Point, Polyline, Rect};
pub use layout::{Document, GlyphResult, GlyphSource, LayoutEngine};
pub use studio::{Controls, FontStatus, Studio};
pub use text::LoadedFont;
pub use trace::{TracerHandle, TracerLocator, TracerRegistry};
