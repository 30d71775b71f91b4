//! Core geometry types for glyph layout and stroking
//!
//! All units are canvas pixels. The coordinate system has its origin at the
//! top-left corner of the canvas:
//! - Positive X extends to the right
//! - Positive Y extends downward
//!
//! Glyph-local geometry (what a tracer returns) uses the same orientation with
//! the origin at the top-left corner of the glyph's raster surface.

use std::fmt;

/// A 2D point in canvas pixel space
///
/// # Examples
///
/// ```
/// use textskel::Point;
///
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::ZERO;
///
/// assert_eq!(p1.x, 10.0);
/// assert_eq!(p1.y, 20.0);
/// assert_eq!(p2, Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  /// X coordinate (horizontal position, increases to the right)
  pub x: f32,
  /// Y coordinate (vertical position, increases downward)
  pub y: f32,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

  /// Creates a new point at the given coordinates
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  /// Translates this point by the given offsets
  ///
  /// # Examples
  ///
  /// ```
  /// use textskel::Point;
  ///
  /// let p = Point::new(10.0, 20.0).translate(5.0, 3.0);
  /// assert_eq!(p, Point::new(15.0, 23.0));
  /// ```
  pub fn translate(self, dx: f32, dy: f32) -> Self {
    Self {
      x: self.x + dx,
      y: self.y + dy,
    }
  }

  /// Computes the distance to another point
  pub fn distance_to(self, other: Point) -> f32 {
    let dx = other.x - self.x;
    let dy = other.y - self.y;
    (dx * dx + dy * dy).sqrt()
  }

  /// Linear interpolation towards `other` by `t` in `[0, 1]`.
  pub fn lerp(self, other: Point, t: f32) -> Self {
    Self {
      x: self.x + (other.x - self.x) * t,
      y: self.y + (other.y - self.y) * t,
    }
  }
}

impl From<(f32, f32)> for Point {
  fn from((x, y): (f32, f32)) -> Self {
    Self { x, y }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// An axis-aligned rectangle in canvas pixel space
///
/// # Examples
///
/// ```
/// use textskel::Rect;
///
/// let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);
/// assert_eq!(rect.max_x(), 110.0);
/// assert_eq!(rect.max_y(), 70.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl Rect {
  /// A zero-sized rectangle at the origin
  pub const ZERO: Self = Self::from_xywh(0.0, 0.0, 0.0, 0.0);

  /// Creates a rectangle from x, y, width, height components
  pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Returns the x coordinate of the right edge
  pub fn max_x(self) -> f32 {
    self.x + self.width
  }

  /// Returns the y coordinate of the bottom edge
  pub fn max_y(self) -> f32 {
    self.y + self.height
  }

  /// Returns true if the rectangle has zero or negative area
  pub fn is_empty(self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Rect({}, {}, {}x{})",
      self.x, self.y, self.width, self.height
    )
  }
}

/// An ordered run of points forming connected line segments.
///
/// A polyline needs at least two points to be drawable; shorter ones are kept
/// in the document but skipped by the renderer and the SVG exporter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
  pub points: Vec<Point>,
}

impl Polyline {
  pub fn new(points: Vec<Point>) -> Self {
    Self { points }
  }

  /// Closed outline of `rect`: five points, the last repeating the first.
  ///
  /// # Examples
  ///
  /// ```
  /// use textskel::{Polyline, Rect};
  ///
  /// let outline = Polyline::rect_outline(Rect::from_xywh(0.0, 0.0, 4.0, 2.0));
  /// assert_eq!(outline.len(), 5);
  /// assert_eq!(outline.points.first(), outline.points.last());
  /// ```
  pub fn rect_outline(rect: Rect) -> Self {
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.max_x(), rect.max_y());
    Self::new(vec![
      Point::new(x0, y0),
      Point::new(x1, y0),
      Point::new(x1, y1),
      Point::new(x0, y1),
      Point::new(x0, y0),
    ])
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// True when the polyline has at least two points.
  pub fn is_drawable(&self) -> bool {
    self.points.len() >= 2
  }

  /// Returns a copy with every point shifted by `(dx, dy)`.
  pub fn translated(&self, dx: f32, dy: f32) -> Self {
    Self::new(self.points.iter().map(|p| p.translate(dx, dy)).collect())
  }
}

impl From<Vec<(f32, f32)>> for Polyline {
  fn from(points: Vec<(f32, f32)>) -> Self {
    Self::new(points.into_iter().map(Point::from).collect())
  }
}
