//! Cropple Core - geometry engine for a single-image editor
//!
//! This crate provides the three geometry operations of Cropple plus the
//! plumbing around them:
//!
//! - **Crop** with an optional aspect-ratio lock, selected on a downscaled
//!   preview and committed on source pixels
//! - **Extend** the canvas to a target ratio, filling the new area with
//!   blurred, stretched edge content
//! - **Rotate** by an arbitrary angle with canvas expansion and a color or
//!   transparent fill, plus lossless quarter turns
//!
//! Every operation borrows a [`PixelBuffer`] and returns a new one. The
//! caller owns the "current working image" and decides when to replace it.
//!
//! Diagnostics go through `tracing`; no subscriber is installed here.

pub mod buffer;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod preview;
pub mod settings;
pub mod transform;

pub use buffer::{PixelBuffer, PixelMode};
pub use error::{Result, TransformError};
pub use geometry::{AspectPreset, AspectRatio, CoordinateMapper, Point, Rect};
pub use preview::{render_preview, Preview};
pub use settings::{EditSettings, FillMode};
pub use transform::{
    compute_canvas, compute_rect, compute_rotated_bounds, crop_source, extend, extract, place,
    rotate, rotate_quarter, satisfies_ratio, Anchor, FillPolicy, QuarterTurn, RotationRequest,
};

/// Color types that appear in the public API.
pub use image::{Rgb, Rgba};

#[cfg(test)]
mod tests {
    use super::*;

    /// Rgb image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 33]);
            }
        }
        PixelBuffer::new(width, height, PixelMode::Rgb, pixels).unwrap()
    }

    #[test]
    fn test_crop_then_extend_then_rotate() {
        let settings = EditSettings {
            aspect_ratio: AspectRatio::Fixed(1, 1),
            angle_degrees: 30.0,
            blur_radius: 2,
            ..Default::default()
        };
        let img = test_image(120, 80);

        // Free crop to 60x30
        let cropped = crop_source(
            &img,
            Rect {
                left: 10.0,
                top: 20.0,
                right: 70.0,
                bottom: 50.0,
            },
        )
        .unwrap();
        assert_eq!(cropped.dimensions(), (60, 30));

        // Extend to 1:1
        let ratio = settings.extension_ratio(cropped.dimensions()).unwrap();
        let extended = extend(&cropped, ratio, settings.anchor, settings.effective_blur_radius())
            .unwrap();
        assert_eq!(extended.dimensions(), (60, 60));
        assert_eq!(extended.pixel(0, 15), img.pixel(10, 20));

        // Rotate; corners take the default fill
        let rotated = rotate(&extended, &settings.rotation_request()).unwrap().unwrap();
        assert_eq!(rotated.dimensions(), compute_rotated_bounds(60, 60, 30.0));
        assert_eq!(rotated.pixel(0, 0), &[204, 204, 204]);
    }

    #[test]
    fn test_quarter_turns_cancel() {
        let img = test_image(9, 4);
        let once = rotate_quarter(&img, QuarterTurn::Clockwise).unwrap();
        let back = rotate_quarter(&once, QuarterTurn::CounterClockwise).unwrap();
        assert_eq!(back, img);
    }
}
