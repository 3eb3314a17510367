//! Plane geometry shared by the crop and preview code.
//!
//! Two coordinate spaces are in play:
//!
//! - **Source space**: pixel coordinates of the full-resolution working image.
//! - **Display space**: pixel coordinates of a uniformly downscaled preview.
//!
//! Origin is the top-left corner and the Y axis points down in both.

mod aspect;
mod mapper;

pub use aspect::{lock_rectangle, locked_corner, AspectRatio, AspectPreset, MIN_EXTENT};
pub use mapper::CoordinateMapper;

use serde::{Deserialize, Serialize};

/// A point in either display or source space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp both coordinates into `[0, width] x [0, height]`.
    pub fn clamp_to(self, width: f64, height: f64) -> Self {
        Self {
            x: self.x.clamp(0.0, width.max(0.0)),
            y: self.y.clamp(0.0, height.max(0.0)),
        }
    }
}

/// Axis-aligned rectangle, always normalized so `left <= right` and
/// `top <= bottom`.
///
/// A rectangle with `left == right` or `top == bottom` is degenerate. That is a
/// legal value; operations that need area report it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Build a rectangle from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_degenerate(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}
