//! Render text as skeleton polylines and export the drawing.
//!
//! No tracing capability is bound from the command line, so glyphs come from
//! the font outline when `--font` is given and from placeholder boxes
//! otherwise.

use clap::Parser;
use futures::executor::block_on;
use std::fs;
use std::path::PathBuf;
use textskel::studio::{Controls, FontStatus, DEFAULT_TEXT, FONT_SIZE, LETTER_SPACING, STROKE_WEIGHT};
use textskel::svg::{write_svg, SVG_FILE_NAME};
use textskel::trace::TracerRegistry;
use textskel::Studio;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
  name = "textskel",
  version,
  about = "Render text as skeleton stroke polylines and export SVG"
)]
struct Cli {
  /// Text to draw; newlines are skipped
  #[arg(long, default_value = DEFAULT_TEXT)]
  text: String,

  /// Font file (.otf / .ttf)
  #[arg(long, value_name = "FILE")]
  font: Option<PathBuf>,

  /// Font size in px (40-400)
  #[arg(long, default_value_t = FONT_SIZE.default)]
  size: f32,

  /// Extra space between letters in px (0-80)
  #[arg(long, default_value_t = LETTER_SPACING.default)]
  spacing: f32,

  /// Stroke width in px (1-12)
  #[arg(long, default_value_t = STROKE_WEIGHT.default)]
  stroke_weight: f32,

  /// SVG output path
  #[arg(long, value_name = "FILE", default_value = SVG_FILE_NAME)]
  out: PathBuf,

  /// Also write the rendered canvas as PNG
  #[arg(long, value_name = "FILE")]
  png: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
    .init();

  let cli = Cli::parse();
  let controls = Controls {
    text: cli.text,
    font_size: cli.size,
    letter_spacing: cli.spacing,
    stroke_weight: cli.stroke_weight,
  };
  let studio = Studio::new(TracerRegistry::new()).with_controls(controls);

  // An accepted upload has already rebuilt the document.
  let mut rebuilt = false;
  if let Some(path) = cli.font.as_ref() {
    let data = fs::read(path)?;
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.display().to_string());
    rebuilt = match block_on(studio.upload_font(name, None, data)) {
      Ok(FontStatus::Loaded { name }) => {
        info!(%name, "using font");
        true
      }
      Ok(FontStatus::Cleared { error }) => {
        eprintln!("{error}; continuing without a font");
        true
      }
      Err(error) => {
        eprintln!("{error}");
        false
      }
    };
  }

  let document = if rebuilt {
    studio.document()
  } else {
    block_on(studio.rebuild())
  };
  info!(
    glyphs = document.len(),
    polylines = document.drawable_count(),
    "laid out text"
  );

  let svg = studio.export_svg()?;
  write_svg(&svg, &cli.out)?;
  println!("{}", cli.out.display());

  if let Some(png) = cli.png.as_ref() {
    studio.render()?.save_png(png)?;
    println!("{}", png.display());
  }
  Ok(())
}
