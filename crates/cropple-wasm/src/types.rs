//! WASM-compatible wrapper types for image data.
//!
//! These types hold core values inside WASM memory and hand copies to
//! JavaScript on request.

use cropple_core::{CoordinateMapper, PixelBuffer, PixelMode, Preview, TransformError};
use wasm_bindgen::prelude::*;

/// An 8-bit image for JavaScript.
///
/// `channels` is 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA). Pixels are
/// row-major with `channels` bytes each.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it into a
/// `Uint8Array`. Call the generated `free()` to release a large image early.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Wrap raw pixels. The size is checked when the buffer is first used.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> JsPixelBuffer {
        JsPixelBuffer {
            width,
            height,
            channels,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Whether the last channel is alpha (2 or 4 channels).
    #[wasm_bindgen(getter)]
    pub fn has_alpha(&self) -> bool {
        matches!(self.channels, 2 | 4)
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_core(buffer: PixelBuffer) -> Self {
        let (width, height) = buffer.dimensions();
        let channels = buffer.channels() as u8;
        Self {
            width,
            height,
            channels,
            pixels: buffer.into_pixels(),
        }
    }

    /// Validate and convert to a core buffer. Clones the pixel data.
    pub(crate) fn to_core(&self) -> Result<PixelBuffer, TransformError> {
        let mode = PixelMode::from_channels(self.channels as usize).ok_or_else(|| {
            TransformError::InvalidDimensions(format!(
                "{} channels per pixel is not supported",
                self.channels
            ))
        })?;
        PixelBuffer::new(self.width, self.height, mode, self.pixels.clone())
    }
}

/// A preview image plus the scale that maps it back to its source.
///
/// Keep the preview that is on screen and pass it to `crop_image`, so the
/// selection is mapped with the same scale it was drawn at.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsPreview {
    inner: Preview,
}

#[wasm_bindgen]
impl JsPreview {
    /// The downscaled image to draw.
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsPixelBuffer {
        JsPixelBuffer::from_core(self.inner.image.clone())
    }

    /// Display pixels per source pixel, at most 1.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.mapper.scale()
    }

    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> u32 {
        self.inner.image.width()
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> u32 {
        self.inner.image.height()
    }
}

impl JsPreview {
    pub(crate) fn from_core(inner: Preview) -> Self {
        Self { inner }
    }

    pub(crate) fn mapper(&self) -> &CoordinateMapper {
        &self.inner.mapper
    }

    pub(crate) fn display_bounds(&self) -> (f64, f64) {
        self.inner.display_bounds()
    }
}
