//! WASM bindings for crop, extend, rotate and preview.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const preview = render_preview(image, canvas.width, canvas.height);
//! // While dragging
//! const rect = compute_crop_rect(preview, x0, y0, x, y, settings, image.width, image.height);
//! // On commit
//! const cropped = crop_image(image, preview, rect.left, rect.top, rect.right, rect.bottom);
//! ```

use cropple_core::transform::{self as core_transform, QuarterTurn, RotationRequest};
use cropple_core::{
    compute_rect, extract, render_preview as core_preview, EditSettings, PixelBuffer, Point,
    Rect, Result as CoreResult,
};
use wasm_bindgen::prelude::*;

use crate::settings::{resolve_fill, settings_from_js};
use crate::to_js_error;
use crate::types::{JsPixelBuffer, JsPreview};

/// Downscale `image` to fit `max_width x max_height` for display.
///
/// Small images are not enlarged.
#[wasm_bindgen]
pub fn render_preview(
    image: &JsPixelBuffer,
    max_width: u32,
    max_height: u32,
) -> Result<JsPreview, JsValue> {
    let buffer = image.to_core().map_err(to_js_error)?;
    core_preview(&buffer, max_width, max_height)
        .map(JsPreview::from_core)
        .map_err(to_js_error)
}

/// Selection rectangle for a drag on `preview`, in display coordinates.
///
/// Returns a `{ left, top, right, bottom }` object. The ratio comes from
/// `settings.aspect_ratio`; `image_width`/`image_height` are the working
/// image's size, used when the ratio follows the image.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn compute_crop_rect(
    preview: &JsPreview,
    press_x: f64,
    press_y: f64,
    drag_x: f64,
    drag_y: f64,
    settings: JsValue,
    image_width: u32,
    image_height: u32,
) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    let rect = crop_rect_inner(
        preview,
        Point::new(press_x, press_y),
        Point::new(drag_x, drag_y),
        &settings,
        (image_width, image_height),
    )
    .map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&rect).map_err(to_js_error)
}

pub(crate) fn crop_rect_inner(
    preview: &JsPreview,
    press: Point,
    drag: Point,
    settings: &EditSettings,
    image_dims: (u32, u32),
) -> CoreResult<Rect> {
    compute_rect(
        press,
        drag,
        preview.display_bounds(),
        settings.aspect_ratio,
        image_dims,
    )
}

/// Crop `image` to a rectangle drawn on `preview`.
///
/// The rectangle is in display coordinates and is mapped to source pixels
/// with the preview's scale.
///
/// # Errors
///
/// Returns an error if the rectangle has no area or `preview` was rendered
/// from a different-sized image.
#[wasm_bindgen]
pub fn crop_image(
    image: &JsPixelBuffer,
    preview: &JsPreview,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
) -> Result<JsPixelBuffer, JsValue> {
    let rect = Rect {
        left,
        top,
        right,
        bottom,
    };
    crop_inner(image, preview, rect)
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}

pub(crate) fn crop_inner(
    image: &JsPixelBuffer,
    preview: &JsPreview,
    rect: Rect,
) -> CoreResult<PixelBuffer> {
    extract(&image.to_core()?, preview.mapper(), rect)
}

/// Whether `image` already has the ratio selected in `settings`.
///
/// When true, `extend_image` returns an unchanged copy.
#[wasm_bindgen]
pub fn needs_extension(image: &JsPixelBuffer, settings: JsValue) -> Result<bool, JsValue> {
    let settings = settings_from_js(settings)?;
    let ratio = settings
        .extension_ratio((image.width(), image.height()))
        .map_err(to_js_error)?;
    Ok(!core_transform::satisfies_ratio(
        image.width(),
        image.height(),
        ratio,
    ))
}

/// Extend the canvas to `settings.aspect_ratio` with blurred edge padding.
///
/// # Errors
///
/// Returns an error when no ratio is selected (free selection).
#[wasm_bindgen]
pub fn extend_image(image: &JsPixelBuffer, settings: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let settings = settings_from_js(settings)?;
    extend_inner(image, &settings)
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}

pub(crate) fn extend_inner(
    image: &JsPixelBuffer,
    settings: &EditSettings,
) -> CoreResult<PixelBuffer> {
    let buffer = image.to_core()?;
    let ratio = settings.extension_ratio(buffer.dimensions())?;
    core_transform::extend(
        &buffer,
        ratio,
        settings.anchor,
        settings.effective_blur_radius(),
    )
}

/// Rotate by `settings.angle_degrees` (positive = clockwise).
///
/// Returns `undefined` when the angle is too small to matter. An invalid
/// fill color is reported on the console and replaced by the default gray.
#[wasm_bindgen]
pub fn rotate_image(
    image: &JsPixelBuffer,
    settings: JsValue,
) -> Result<Option<JsPixelBuffer>, JsValue> {
    let settings = settings_from_js(settings)?;
    let (fill, warning) = resolve_fill(&settings);
    if let Some(message) = warning {
        web_sys::console::warn_1(&JsValue::from_str(&message));
    }
    let request = RotationRequest::new(settings.angle_degrees, fill);
    rotate_inner(image, &request).map_err(to_js_error)
}

pub(crate) fn rotate_inner(
    image: &JsPixelBuffer,
    request: &RotationRequest,
) -> CoreResult<Option<JsPixelBuffer>> {
    let buffer = image.to_core()?;
    Ok(core_transform::rotate(&buffer, request)?.map(JsPixelBuffer::from_core))
}

/// Rotate by exactly 90 degrees without resampling.
#[wasm_bindgen]
pub fn rotate_quarter_turn(
    image: &JsPixelBuffer,
    clockwise: bool,
) -> Result<JsPixelBuffer, JsValue> {
    let turn = if clockwise {
        QuarterTurn::Clockwise
    } else {
        QuarterTurn::CounterClockwise
    };
    image
        .to_core()
        .and_then(|buffer| core_transform::rotate_quarter(&buffer, turn))
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}
