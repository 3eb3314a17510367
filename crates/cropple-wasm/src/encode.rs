//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_jpeg } from '@cropple/wasm';
//!
//! const png = encode_png(image);
//! // JPEG has no alpha: flatten transparent images over white
//! const jpeg = encode_jpeg(image, 90, "#FFFFFF");
//! ```

use cropple_core::encode::{self, EncodeError, OutputFormat};
use cropple_core::transform::parse_hex_color;
use cropple_core::{Rgb, TransformError};
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::JsPixelBuffer;

/// Encode an image as PNG. Every channel layout is kept.
#[wasm_bindgen]
pub fn encode_png(image: &JsPixelBuffer) -> Result<Vec<u8>, JsValue> {
    let buffer = image.to_core().map_err(to_js_error)?;
    encode::encode(&buffer, OutputFormat::Png).map_err(to_js_error)
}

/// Encode an image as JPEG.
///
/// # Arguments
///
/// * `image` - Image to encode
/// * `quality` - JPEG quality (1-100, recommended: 90)
/// * `background` - `#RRGGBB` to flatten alpha over. Without it, images with
///   alpha are rejected.
#[wasm_bindgen]
pub fn encode_jpeg(
    image: &JsPixelBuffer,
    quality: u8,
    background: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    encode_jpeg_inner(image, quality, background.as_deref()).map_err(to_js_error)
}

/// Failure of the JPEG path, before conversion to a JS error.
#[derive(Debug)]
pub(crate) enum JpegError {
    Input(TransformError),
    Encode(EncodeError),
}

impl std::fmt::Display for JpegError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JpegError::Input(e) => e.fmt(f),
            JpegError::Encode(e) => e.fmt(f),
        }
    }
}

pub(crate) fn encode_jpeg_inner(
    image: &JsPixelBuffer,
    quality: u8,
    background: Option<&str>,
) -> Result<Vec<u8>, JpegError> {
    let mut buffer = image.to_core().map_err(JpegError::Input)?;
    if let Some(hex) = background {
        let color = parse_hex_color(hex).map_err(JpegError::Input)?;
        buffer = buffer.flatten(Rgb([color.0[0], color.0[1], color.0[2]]));
    }
    encode::encode(&buffer, OutputFormat::Jpeg { quality }).map_err(JpegError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_image() -> JsPixelBuffer {
        JsPixelBuffer::new(4, 4, 4, vec![100; 4 * 4 * 4])
    }

    #[test]
    fn test_encode_png() {
        let png = encode_png(&rgba_image()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_encode_jpeg_opaque() {
        let img = JsPixelBuffer::new(8, 8, 3, vec![128; 8 * 8 * 3]);
        let jpeg = encode_jpeg(&img, 90, None).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_alpha_needs_background() {
        assert!(matches!(
            encode_jpeg_inner(&rgba_image(), 90, None),
            Err(JpegError::Encode(EncodeError::UnsupportedMode { .. }))
        ));
        assert!(encode_jpeg_inner(&rgba_image(), 90, Some("#FFFFFF")).is_ok());
        assert!(matches!(
            encode_jpeg_inner(&rgba_image(), 90, Some("white")),
            Err(JpegError::Input(TransformError::InvalidFillColor(_)))
        ));
    }
}
