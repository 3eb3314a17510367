//! Mapping between a downscaled preview and the source image.

use tracing::debug;

use super::{Point, Rect};
use crate::error::{Result, TransformError};

/// Uniform scale between display space and source space.
///
/// The scale never exceeds 1.0: a preview is shrunk to fit its bounds but a
/// small image is never blown up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    source_width: u32,
    source_height: u32,
    scale: f64,
}

impl CoordinateMapper {
    /// Fit a `source_width x source_height` image into the given display bounds.
    ///
    /// `scale = min(max_w / src_w, max_h / src_h, 1.0)`.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if a source side is zero or a display bound is not
    /// a positive finite number.
    pub fn new(
        source_width: u32,
        source_height: u32,
        max_display_width: f64,
        max_display_height: f64,
    ) -> Result<Self> {
        if source_width == 0 || source_height == 0 {
            return Err(TransformError::InvalidDimensions(format!(
                "source {}x{} must be non-zero",
                source_width, source_height
            )));
        }
        let bounds_ok = |v: f64| v.is_finite() && v > 0.0;
        if !bounds_ok(max_display_width) || !bounds_ok(max_display_height) {
            return Err(TransformError::InvalidDimensions(format!(
                "display bounds {}x{} must be positive",
                max_display_width, max_display_height
            )));
        }

        let scale = (max_display_width / source_width as f64)
            .min(max_display_height / source_height as f64)
            .min(1.0);
        debug!(source_width, source_height, scale, "coordinate mapper");

        Ok(Self {
            source_width,
            source_height,
            scale,
        })
    }

    /// Mapper for a preview shown at full resolution.
    pub fn identity(source_width: u32, source_height: u32) -> Result<Self> {
        Self::new(
            source_width,
            source_height,
            source_width as f64,
            source_height as f64,
        )
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn source_size(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    /// Pixel size of the preview this mapper describes. Each side is at least 1.
    pub fn display_size(&self) -> (u32, u32) {
        let w = (self.source_width as f64 * self.scale).floor() as u32;
        let h = (self.source_height as f64 * self.scale).floor() as u32;
        (w.max(1), h.max(1))
    }

    /// Map a display point to source space, clamped to the source bounds.
    pub fn to_source(&self, point: Point) -> Point {
        Point::new(point.x / self.scale, point.y / self.scale)
            .clamp_to(self.source_width as f64, self.source_height as f64)
    }

    /// Map a display rectangle to source space, clamped to the source bounds.
    pub fn rect_to_source(&self, rect: Rect) -> Rect {
        Rect::from_corners(
            self.to_source(Point::new(rect.left, rect.top)),
            self.to_source(Point::new(rect.right, rect.bottom)),
        )
    }

    /// Map a source rectangle back to display space for drawing an overlay.
    pub fn to_display(&self, rect: Rect) -> Rect {
        Rect {
            left: rect.left * self.scale,
            top: rect.top * self.scale,
            right: rect.right * self.scale,
            bottom: rect.bottom * self.scale,
        }
    }
}
