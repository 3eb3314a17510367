//! Cropple WASM - WebAssembly bindings for Cropple
//!
//! This crate exposes the cropple-core geometry engine to a browser
//! front-end. It holds no image logic of its own: every function converts
//! JS values, calls the core and converts back.
//!
//! # Module Structure
//!
//! - `types` - `JsPixelBuffer` and `JsPreview` wrappers
//! - `decode` / `encode` - file bytes in and out
//! - `transform` - preview, crop, extend and rotate
//! - `settings` - edit settings as plain JS objects
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, default_settings, extend_image } from '@cropple/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const extended = extend_image(image, default_settings());
//! ```

use std::fmt::Display;

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod settings;
mod transform;
mod types;

pub use decode::decode_image;
pub use encode::{encode_jpeg, encode_png};
pub use settings::{aspect_presets, default_settings};
pub use transform::{
    compute_crop_rect, crop_image, extend_image, needs_extension, render_preview, rotate_image,
    rotate_quarter_turn,
};
pub use types::{JsPixelBuffer, JsPreview};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert any error into a JS `Error` carrying its message.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
