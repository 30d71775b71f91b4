use std::fs;
use std::process::Command;

const FIXTURE_FONT: &str = concat!(
  env!("CARGO_MANIFEST_DIR"),
  "/tests/fixtures/fonts/DejaVuSansMono.ttf"
);

#[test]
fn help_lists_controls() {
  let output = Command::new(env!("CARGO_BIN_EXE_textskel"))
    .arg("--help")
    .output()
    .expect("run textskel --help");
  assert!(output.status.success());
  let help = String::from_utf8_lossy(&output.stdout);
  for needle in [
    "--text",
    "--font",
    "--size",
    "--spacing",
    "--stroke-weight",
    "--out",
    "--png",
  ] {
    assert!(help.contains(needle), "help missing {needle}; got:\n{help}");
  }
}

#[test]
fn default_output_is_text_skeleton_svg() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  let status = Command::new(env!("CARGO_BIN_EXE_textskel"))
    .args(["--text", "Hi"])
    .current_dir(tmp.path())
    .status()
    .expect("run textskel");
  assert!(status.success());

  let svg = fs::read_to_string(tmp.path().join("text_skeleton.svg")).expect("svg written");
  assert!(svg.contains(r#"id="char_H_0""#));
  assert!(svg.contains(r#"id="char_i_1""#));
  assert!(svg.contains(r#"stroke-width="3""#));
}

#[test]
fn font_and_png_outputs() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  let svg_path = tmp.path().join("out.svg");
  let png_path = tmp.path().join("out.png");
  let status = Command::new(env!("CARGO_BIN_EXE_textskel"))
    .args([
      "--text",
      "ok",
      "--font",
      FIXTURE_FONT,
      "--stroke-weight",
      "50",
      "--out",
      svg_path.to_str().unwrap(),
      "--png",
      png_path.to_str().unwrap(),
    ])
    .status()
    .expect("run textskel");
  assert!(status.success());

  let svg = fs::read_to_string(&svg_path).expect("svg written");
  // Out-of-range stroke weight is clamped.
  assert!(svg.contains(r#"stroke-width="12""#));
  assert_eq!(svg.matches("<path").count(), 2);
  let png = fs::read(&png_path).expect("png written");
  assert_eq!(&png[..4], b"\x89PNG");
}

fn rebuild_count(args: &[&str], dir: &std::path::Path) -> usize {
  let output = Command::new(env!("CARGO_BIN_EXE_textskel"))
    .args(args)
    .current_dir(dir)
    .env("RUST_LOG", "textskel=debug")
    .env("NO_COLOR", "1")
    .output()
    .expect("run textskel");
  assert!(output.status.success());
  String::from_utf8_lossy(&output.stderr)
    .matches("rebuilt document")
    .count()
}

#[test]
fn lays_out_once_per_run() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  assert_eq!(rebuild_count(&["--text", "ab"], tmp.path()), 1);
  assert_eq!(
    rebuild_count(&["--text", "ab", "--font", FIXTURE_FONT], tmp.path()),
    1
  );

  // A rejected upload leaves the document unbuilt, so main lays it out.
  let notes = tmp.path().join("notes.txt");
  fs::write(&notes, b"not a font").expect("write notes");
  assert_eq!(
    rebuild_count(&["--text", "ab", "--font", notes.to_str().unwrap()], tmp.path()),
    1
  );
}
