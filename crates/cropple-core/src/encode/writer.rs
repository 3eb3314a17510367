//! PNG and JPEG encoding for export.

use std::fmt;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::buffer::{PixelBuffer, PixelMode};

/// Default JPEG quality for export.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The format cannot store this channel layout (JPEG has no alpha).
    #[error("{format} cannot encode {mode:?} pixels; flatten the image first")]
    UnsupportedMode { format: OutputFormat, mode: PixelMode },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions and mode
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output container for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossless, keeps every mode including alpha.
    #[default]
    Png,
    /// Lossy, opaque modes only. Quality is clamped to 1..=100.
    Jpeg { quality: u8 },
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG"),
            OutputFormat::Jpeg { .. } => f.write_str("JPEG"),
        }
    }
}

/// Encode a buffer.
///
/// # Errors
///
/// `UnsupportedMode` for JPEG with an alpha-bearing buffer. Use
/// [`PixelBuffer::flatten`] first.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    encode_pixels(
        buffer.pixels(),
        buffer.width(),
        buffer.height(),
        buffer.mode(),
        format,
    )
}

/// Encode raw row-major samples in `mode`'s layout.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    mode: PixelMode,
    format: OutputFormat,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * mode.channels();
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Vec::new();
    match format {
        OutputFormat::Png => PngEncoder::new(&mut out)
            .write_image(pixels, width, height, mode.color_type())
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?,
        OutputFormat::Jpeg { quality } => {
            if mode.has_alpha() {
                return Err(EncodeError::UnsupportedMode { format, mode });
            }
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                .write_image(pixels, width, height, mode.color_type())
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?
        }
    }

    debug!(%format, width, height, ?mode, bytes = out.len(), "encoded image");
    Ok(out)
}
