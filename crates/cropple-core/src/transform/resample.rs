//! Resampling and blur on [`PixelBuffer`]s via the `image` crate.
//!
//! Both helpers round-trip through `DynamicImage`, which keeps the channel
//! layout, so the output mode always equals the input mode.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::buffer::PixelBuffer;
use crate::error::{Result, TransformError};

/// Filter used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor (fastest, blocky).
    Nearest,
    /// Bilinear (fast, soft).
    Bilinear,
    /// Lanczos3 (slowest, smooth area-class resampling).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize to exact dimensions.
///
/// # Errors
///
/// `InvalidDimensions` if `width` or `height` is zero.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions(format!(
            "resize target {}x{} must be non-zero",
            width, height
        )));
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    trace!(
        from_w = image.width(),
        from_h = image.height(),
        width,
        height,
        "resize"
    );
    let resized = image
        .to_dynamic()?
        .resize_exact(width, height, filter.to_image_filter());
    PixelBuffer::from_dynamic(resized)
}

/// Gaussian blur with standard deviation `sigma`. A non-positive sigma is a copy.
pub fn gaussian_blur(image: &PixelBuffer, sigma: f32) -> Result<PixelBuffer> {
    if sigma <= 0.0 {
        return Ok(image.clone());
    }
    trace!(width = image.width(), height = image.height(), sigma, "gaussian blur");
    PixelBuffer::from_dynamic(image.to_dynamic()?.blur(sigma))
}
