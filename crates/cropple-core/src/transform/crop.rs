//! Interactive rectangle selection and rectangular crop.
//!
//! The selection is built in display space from a press point and the current
//! drag point. On commit it is mapped to source space through the same
//! [`CoordinateMapper`] that produced the preview, then copied out pixel for
//! pixel. No resampling happens here.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::{Result, TransformError};
use crate::geometry::{locked_corner, AspectRatio, CoordinateMapper, Point, Rect};

/// Compute the selection rectangle for a drag gesture, in display space.
///
/// Both points are clamped to `[0, display_bounds]` first. With a ratio
/// constraint the drag point is replaced by the ratio-locked corner, which
/// never leaves the drag box. The minimum-extent corner of a click without a
/// drag is clamped too, so a click on the far border yields a degenerate rect.
///
/// # Errors
///
/// `InvalidDimensions` if either point has a NaN or infinite coordinate.
///
/// # Arguments
///
/// * `press` - Where the drag started
/// * `drag` - Current pointer position
/// * `display_bounds` - `(width, height)` of the displayed preview
/// * `constraint` - Target ratio, or `Unconstrained` for a free selection
/// * `ratio_basis` - Dimensions of the working image, used by `DeriveFromImage`
pub fn compute_rect(
    press: Point,
    drag: Point,
    display_bounds: (f64, f64),
    constraint: AspectRatio,
    ratio_basis: (u32, u32),
) -> Result<Rect> {
    if !press.is_finite() || !drag.is_finite() {
        return Err(TransformError::InvalidDimensions(format!(
            "selection points must be finite, got {press:?} and {drag:?}"
        )));
    }
    let (bw, bh) = display_bounds;
    let press = press.clamp_to(bw, bh);
    let drag = drag.clamp_to(bw, bh);

    let corner = match constraint.ratio(ratio_basis)? {
        Some(ratio) => locked_corner(press, drag, ratio).clamp_to(bw, bh),
        None => drag,
    };
    Ok(Rect::from_corners(press, corner))
}

/// Crop `buffer` to a selection made on the preview described by `mapper`.
///
/// # Errors
///
/// - `InvalidDimensions` if `mapper` was built for a different image size
/// - `DegenerateRegion` if the selection has no area after mapping; the
///   caller decides whether to fall back to the whole image
pub fn extract(
    buffer: &PixelBuffer,
    mapper: &CoordinateMapper,
    display_rect: Rect,
) -> Result<PixelBuffer> {
    if mapper.source_size() != buffer.dimensions() {
        let (mw, mh) = mapper.source_size();
        return Err(TransformError::InvalidDimensions(format!(
            "mapper built for {}x{}, buffer is {}x{}",
            mw,
            mh,
            buffer.width(),
            buffer.height()
        )));
    }
    crop_source(buffer, mapper.rect_to_source(display_rect))
}

/// Crop `buffer` to a rectangle already in source space.
///
/// Edges are clamped to the buffer and truncated toward zero, and the copied
/// region is `[left, right) x [top, bottom)`.
pub fn crop_source(buffer: &PixelBuffer, source_rect: Rect) -> Result<PixelBuffer> {
    let (w, h) = (buffer.width() as f64, buffer.height() as f64);
    let clamped = Rect {
        left: source_rect.left.clamp(0.0, w).trunc(),
        top: source_rect.top.clamp(0.0, h).trunc(),
        right: source_rect.right.clamp(0.0, w).trunc(),
        bottom: source_rect.bottom.clamp(0.0, h).trunc(),
    };
    if clamped.is_degenerate() {
        return Err(TransformError::DegenerateRegion { rect: clamped });
    }

    let (left, top) = (clamped.left as u32, clamped.top as u32);
    let (out_w, out_h) = (clamped.width() as u32, clamped.height() as u32);
    debug!(left, top, width = out_w, height = out_h, "crop");
    buffer.sub_image(left, top, out_w, out_h)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelMode;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep reasonable for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (4u32..=100, 4u32..=100)
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-50.0f64..600.0, -50.0f64..600.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn create_test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v);
                pixels.push(v);
                pixels.push(v);
            }
        }
        PixelBuffer::new(width, height, PixelMode::Rgb, pixels).unwrap()
    }

    proptest! {
        /// Property: the selection never leaves the display.
        #[test]
        fn prop_rect_within_display(
            press in point_strategy(),
            drag in point_strategy(),
            (rw, rh) in (1u32..=20, 1u32..=20),
        ) {
            let rect = compute_rect(
                press,
                drag,
                (500.0, 400.0),
                AspectRatio::Fixed(rw, rh),
                (1, 1),
            ).unwrap();

            prop_assert!(rect.left >= 0.0 && rect.top >= 0.0);
            prop_assert!(rect.right <= 500.0 + 1e-9);
            prop_assert!(rect.bottom <= 400.0 + 1e-9);
        }

        /// Property: a crop is never larger than its source.
        #[test]
        fn prop_output_bounded_by_input(
            (width, height) in dimensions_strategy(),
            a in point_strategy(),
            b in point_strategy(),
        ) {
            let img = create_test_image(width, height);
            if let Ok(result) = crop_source(&img, Rect::from_corners(a, b)) {
                prop_assert!(result.width() <= width);
                prop_assert!(result.height() <= height);
                prop_assert_eq!(
                    result.pixels().len(),
                    (result.width() * result.height() * 3) as usize
                );
            }
        }

        /// Property: cropping is a pure copy of the top-left source pixel.
        #[test]
        fn prop_first_pixel_from_source(
            (width, height) in (10u32..=50, 10u32..=50),
            (l, t) in (0u32..5, 0u32..5),
        ) {
            let img = create_test_image(width, height);
            let rect = Rect::from_corners(
                Point::new(l as f64, t as f64),
                Point::new(width as f64, height as f64),
            );
            let result = crop_source(&img, rect).unwrap();
            prop_assert_eq!(result.pixel(0, 0), img.pixel(l, t));
        }
    }
}
