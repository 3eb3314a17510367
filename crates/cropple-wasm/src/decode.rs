//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, render_preview } from '@cropple/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = render_preview(image, 1280, 720);
//! ```

use cropple_core::decode;
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::JsPixelBuffer;

/// Decode a PNG or JPEG image from bytes.
///
/// EXIF orientation is applied, so the result is upright. Gray, gray + alpha,
/// RGB and RGBA images keep their channel layout.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_bytes(bytes)
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}
