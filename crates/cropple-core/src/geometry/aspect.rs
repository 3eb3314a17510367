//! Aspect-ratio constraints and ratio-locking math for drag rectangles.
//!
//! Ratios are `width / height`. A `Fixed` ratio is used exactly as given;
//! reduction by the greatest common divisor only matters for presentation.

use serde::{Deserialize, Serialize};

use super::Point;
use crate::error::{Result, TransformError};

/// Extent returned for a click with no drag, so a selection never has zero size.
pub const MIN_EXTENT: f64 = 1.0;

/// Target aspect ratio for cropping and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// A fixed `width:height` ratio.
    Fixed(u32, u32),
    /// Whatever ratio the current working image has.
    DeriveFromImage,
    /// Free selection, no locking.
    #[default]
    Unconstrained,
}

/// A named ratio offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectPreset {
    pub label: &'static str,
    pub ratio: AspectRatio,
}

impl AspectRatio {
    /// Presets in the order the product lists them.
    ///
    /// "1:1.91" is carried as the raw pair 100:191.
    pub const PRESETS: &'static [AspectPreset] = &[
        AspectPreset { label: "1:1", ratio: AspectRatio::Fixed(1, 1) },
        AspectPreset { label: "16:9", ratio: AspectRatio::Fixed(16, 9) },
        AspectPreset { label: "9:16", ratio: AspectRatio::Fixed(9, 16) },
        AspectPreset { label: "4:3", ratio: AspectRatio::Fixed(4, 3) },
        AspectPreset { label: "3:4", ratio: AspectRatio::Fixed(3, 4) },
        AspectPreset { label: "3:2", ratio: AspectRatio::Fixed(3, 2) },
        AspectPreset { label: "2:3", ratio: AspectRatio::Fixed(2, 3) },
        AspectPreset { label: "5:4", ratio: AspectRatio::Fixed(5, 4) },
        AspectPreset { label: "4:5", ratio: AspectRatio::Fixed(4, 5) },
        AspectPreset { label: "1:1.91", ratio: AspectRatio::Fixed(100, 191) },
    ];

    /// Parse user text of the form `"W:H"` into a `Fixed` ratio.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || TransformError::InvalidDimensions(format!("aspect ratio {:?}", text));
        let (w, h) = text.split_once(':').ok_or_else(invalid)?;
        let w: u32 = w.trim().parse().map_err(|_| invalid())?;
        let h: u32 = h.trim().parse().map_err(|_| invalid())?;
        if w == 0 || h == 0 {
            return Err(invalid());
        }
        Ok(AspectRatio::Fixed(w, h))
    }

    /// Numeric ratio used by the math, or `None` when unconstrained.
    ///
    /// `image_dims` is the current working image and only matters for
    /// `DeriveFromImage`.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if a ratio term or a needed image side is zero.
    pub fn ratio(&self, image_dims: (u32, u32)) -> Result<Option<f64>> {
        let (w, h) = match *self {
            AspectRatio::Fixed(w, h) => (w, h),
            AspectRatio::DeriveFromImage => image_dims,
            AspectRatio::Unconstrained => return Ok(None),
        };
        if w == 0 || h == 0 {
            return Err(TransformError::InvalidDimensions(format!(
                "ratio terms {}:{} must be non-zero",
                w, h
            )));
        }
        Ok(Some(w as f64 / h as f64))
    }

    /// The `(w, h)` pair to show the user, reduced by its gcd.
    ///
    /// Returns `None` for `Unconstrained` or when a term is zero.
    pub fn display_pair(&self, image_dims: (u32, u32)) -> Option<(u32, u32)> {
        let (w, h) = match *self {
            AspectRatio::Fixed(w, h) => (w, h),
            AspectRatio::DeriveFromImage => image_dims,
            AspectRatio::Unconstrained => return None,
        };
        if w == 0 || h == 0 {
            return None;
        }
        let d = gcd(w, h);
        Some((w / d, h / d))
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Lock a drag delta to `ratio`, returning the absolute `(width, height)`.
///
/// The result is the largest rectangle of the given ratio that fits inside the
/// drag box `|dx| x |dy|`: if the height-derived width fits, height is the
/// limiting side, otherwise width is. A zero delta yields
/// `(MIN_EXTENT, MIN_EXTENT)`.
pub fn lock_rectangle(delta: (f64, f64), ratio: f64) -> (f64, f64) {
    let (dx, dy) = delta;
    if dx == 0.0 && dy == 0.0 {
        return (MIN_EXTENT, MIN_EXTENT);
    }

    let w_from_h = dy.abs() * ratio;
    let h_from_w = dx.abs() / ratio;
    if w_from_h <= dx.abs() {
        (w_from_h, dy.abs())
    } else {
        (dx.abs(), h_from_w)
    }
}

/// Opposite corner of a ratio-locked rectangle anchored at `anchor`.
///
/// The drag direction is preserved: the corner lies in the same quadrant
/// relative to `anchor` as `drag`.
pub fn locked_corner(anchor: Point, drag: Point, ratio: f64) -> Point {
    let dx = drag.x - anchor.x;
    let dy = drag.y - anchor.y;
    let (w, h) = lock_rectangle((dx, dy), ratio);
    Point::new(anchor.x + w.copysign(dx), anchor.y + h.copysign(dy))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
