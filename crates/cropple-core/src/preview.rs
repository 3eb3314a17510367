//! Downscaled previews paired with the mapper that produced them.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::geometry::CoordinateMapper;
use crate::transform::{resize, FilterType};

/// A preview image and the mapping back to its source.
///
/// Crop gestures on `image` must be committed through `mapper`; mixing a
/// mapper from another preview would select the wrong pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub image: PixelBuffer,
    pub mapper: CoordinateMapper,
}

impl Preview {
    /// `(width, height)` of the preview as display-space bounds.
    pub fn display_bounds(&self) -> (f64, f64) {
        (self.image.width() as f64, self.image.height() as f64)
    }
}

/// Shrink `buffer` to fit `max_width x max_height`. Never enlarges.
///
/// # Errors
///
/// `InvalidDimensions` if a bound is zero.
pub fn render_preview(buffer: &PixelBuffer, max_width: u32, max_height: u32) -> Result<Preview> {
    let (src_w, src_h) = buffer.dimensions();
    let mapper = CoordinateMapper::new(src_w, src_h, max_width as f64, max_height as f64)?;
    let (width, height) = mapper.display_size();
    debug!(src_w, src_h, width, height, scale = mapper.scale(), "render preview");

    let image = resize(buffer, width, height, FilterType::Lanczos3)?;
    Ok(Preview { image, mapper })
}
