//! Canvas extension to a target aspect ratio with synthesized padding.
//!
//! # Algorithm
//!
//! 1. Grow exactly one axis so the canvas reaches the target ratio.
//! 2. Place the source on the canvas according to the [`Anchor`].
//! 3. Fill each non-empty border with a padding strip: a sample of at most
//!    half the padding's thickness is cut from the nearest source edge,
//!    upscaled if the source is too thin to supply it, blurred, and stretched
//!    over the whole border.
//! 4. Paste the source last, so padding never covers original pixels.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::resample::{gaussian_blur, resize, FilterType};
use crate::buffer::PixelBuffer;
use crate::error::{Result, TransformError};
use crate::geometry::AspectRatio;

/// Ratios closer than this to the current one need no extension.
pub const RATIO_TOLERANCE: f64 = 1e-6;

/// Gray used for the (always overwritten) initial canvas of opaque images.
pub const NEUTRAL_GRAY: u8 = 200;

/// Largest blur radius the product offers.
pub const MAX_BLUR_RADIUS: u32 = 100;

/// Where the original content sits when the canvas grows.
///
/// Only the anchor on the grown axis matters; the other axis is centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

/// A border of the extended canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// Thickness of each padding border once the source is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    /// Borders left over after pasting `src` at `paste` on a `canvas`.
    pub fn around(canvas: (u32, u32), src: (u32, u32), paste: (u32, u32)) -> Self {
        Self {
            top: paste.1,
            bottom: canvas.1.saturating_sub(paste.1 + src.1),
            left: paste.0,
            right: canvas.0.saturating_sub(paste.0 + src.0),
        }
    }

    pub fn edges(&self) -> [(Edge, u32); 4] {
        [
            (Edge::Top, self.top),
            (Edge::Bottom, self.bottom),
            (Edge::Left, self.left),
            (Edge::Right, self.right),
        ]
    }
}

/// Whether a `src_w x src_h` image already has the target ratio.
///
/// True when the ratios agree within [`RATIO_TOLERANCE`], or when the image is
/// already the pixel-rounded canvas for the ratio on either axis. The second
/// case is what makes extending an extended image a no-op.
pub fn satisfies_ratio(src_w: u32, src_h: u32, ratio: f64) -> bool {
    if src_w == 0 || src_h == 0 || !ratio.is_finite() || ratio <= 0.0 {
        return false;
    }
    let (w, h) = (src_w as f64, src_h as f64);
    (ratio - w / h).abs() < RATIO_TOLERANCE || (h * ratio).round() == w || (w / ratio).round() == h
}

/// Canvas size that reaches `ratio` by growing one axis of the source.
///
/// Wider targets keep the height and grow the width to `round(h * ratio)`;
/// taller targets keep the width and grow the height to `round(w / ratio)`.
/// When the source already satisfies the ratio its own size is returned.
///
/// # Errors
///
/// - `InvalidDimensions` if a source side is zero
/// - `InvalidCanvas` if a side rounds below 1 or past `u32::MAX`, which
///   includes non-positive and non-finite ratios
pub fn compute_canvas(src_w: u32, src_h: u32, ratio: f64) -> Result<(u32, u32)> {
    if src_w == 0 || src_h == 0 {
        return Err(TransformError::InvalidDimensions(format!(
            "source {}x{} must be non-zero",
            src_w, src_h
        )));
    }
    if satisfies_ratio(src_w, src_h, ratio) {
        return Ok((src_w, src_h));
    }

    let (w, h) = (src_w as f64, src_h as f64);
    let (final_w, final_h) = if ratio > w / h {
        ((h * ratio).round(), h)
    } else {
        (w, (w / ratio).round())
    };

    let fits = |v: f64| v >= 1.0 && v <= u32::MAX as f64;
    if !fits(final_w) || !fits(final_h) {
        return Err(TransformError::InvalidCanvas {
            width: final_w,
            height: final_h,
            ratio,
        });
    }
    Ok((final_w as u32, final_h as u32))
}

/// Top-left paste position of the source on the extended canvas.
pub fn place(final_w: u32, final_h: u32, src_w: u32, src_h: u32, anchor: Anchor) -> (u32, u32) {
    let paste_x = if final_w > src_w {
        let slack = final_w - src_w;
        match anchor {
            Anchor::Left => 0,
            Anchor::Right => slack,
            Anchor::Center | Anchor::Top | Anchor::Bottom => slack / 2,
        }
    } else {
        0
    };

    let paste_y = if final_h > src_h {
        let slack = final_h - src_h;
        match anchor {
            Anchor::Top => 0,
            Anchor::Bottom => slack,
            Anchor::Center | Anchor::Left | Anchor::Right => slack / 2,
        }
    } else {
        0
    };

    (paste_x, paste_y)
}

/// Build the padding content for one border.
///
/// The result is `span x thickness` for top/bottom and `thickness x span` for
/// left/right, where `span` is the canvas length along the border.
///
/// The sample cut from the source is `min(source_depth, max(1, thickness / 2))`
/// pixels deep. When the source is shallower than that, the sample is first
/// stretched to the full depth so the blur does not band.
///
/// # Errors
///
/// `InvalidDimensions` if `thickness` or `span` is zero.
pub fn synthesize_padding(
    buffer: &PixelBuffer,
    edge: Edge,
    thickness: u32,
    span: u32,
    blur_radius: u32,
) -> Result<PixelBuffer> {
    if thickness == 0 || span == 0 {
        return Err(TransformError::InvalidDimensions(format!(
            "padding {}x{} must be non-zero",
            span, thickness
        )));
    }

    let (src_w, src_h) = buffer.dimensions();
    let desired = (thickness / 2).max(1);
    let depth = if edge.is_horizontal() { src_h } else { src_w };
    let sampled = depth.min(desired);
    trace!(?edge, thickness, span, desired, sampled, "padding strip");

    let mut strip = match edge {
        Edge::Top => buffer.sub_image(0, 0, src_w, sampled)?,
        Edge::Bottom => buffer.sub_image(0, src_h - sampled, src_w, sampled)?,
        Edge::Left => buffer.sub_image(0, 0, sampled, src_h)?,
        Edge::Right => buffer.sub_image(src_w - sampled, 0, sampled, src_h)?,
    };

    if sampled < desired {
        strip = if edge.is_horizontal() {
            resize(&strip, src_w, desired, FilterType::Lanczos3)?
        } else {
            resize(&strip, desired, src_h, FilterType::Lanczos3)?
        };
    }

    if blur_radius > 0 {
        strip = gaussian_blur(&strip, blur_radius as f32)?;
    }

    let (out_w, out_h) = if edge.is_horizontal() {
        (span, thickness)
    } else {
        (thickness, span)
    };
    resize(&strip, out_w, out_h, FilterType::Lanczos3)
}

/// Extend `buffer` to `ratio`, filling the new area with blurred edge padding.
///
/// Returns a copy of the input when it already satisfies the ratio; use
/// [`satisfies_ratio`] beforehand to tell the user nothing changed.
pub fn extend(
    buffer: &PixelBuffer,
    ratio: f64,
    anchor: Anchor,
    blur_radius: u32,
) -> Result<PixelBuffer> {
    let (src_w, src_h) = buffer.dimensions();
    let (final_w, final_h) = compute_canvas(src_w, src_h, ratio)?;
    if (final_w, final_h) == (src_w, src_h) {
        debug!(src_w, src_h, ratio, "extension not needed");
        return Ok(buffer.clone());
    }

    let (paste_x, paste_y) = place(final_w, final_h, src_w, src_h, anchor);
    let padding = Padding::around((final_w, final_h), (src_w, src_h), (paste_x, paste_y));
    debug!(
        src_w,
        src_h,
        final_w,
        final_h,
        paste_x,
        paste_y,
        ?anchor,
        blur_radius,
        "extend canvas"
    );

    let mode = buffer.mode();
    let initial = if mode.has_alpha() { 0 } else { NEUTRAL_GRAY };
    let mut canvas = PixelBuffer::filled(final_w, final_h, mode, &vec![initial; mode.channels()])?;

    for (edge, thickness) in padding.edges() {
        if thickness == 0 {
            continue;
        }
        let span = if edge.is_horizontal() { final_w } else { final_h };
        let strip = synthesize_padding(buffer, edge, thickness, span, blur_radius)?;
        let (x, y) = match edge {
            Edge::Top | Edge::Left => (0, 0),
            Edge::Bottom => (0, paste_y + src_h),
            Edge::Right => (paste_x + src_w, 0),
        };
        canvas.composite(&strip, x, y);
    }

    canvas.overwrite(buffer, paste_x, paste_y);
    Ok(canvas)
}

/// [`extend`] with the ratio taken from an [`AspectRatio`] setting.
///
/// # Errors
///
/// `UnconstrainedRatio` for `AspectRatio::Unconstrained`.
pub fn extend_to(
    buffer: &PixelBuffer,
    aspect: AspectRatio,
    anchor: Anchor,
    blur_radius: u32,
) -> Result<PixelBuffer> {
    let ratio = aspect
        .ratio(buffer.dimensions())?
        .ok_or(TransformError::UnconstrainedRatio)?;
    extend(buffer, ratio, anchor, blur_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelMode;

    /// Rgb image whose left half is dark and right half is bright.
    fn split_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 10 } else { 250 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(width, height, PixelMode::Rgb, pixels).unwrap()
    }

    /// Rgb image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 77]);
            }
        }
        PixelBuffer::new(width, height, PixelMode::Rgb, pixels).unwrap()
    }

    #[test]
    fn test_canvas_wider_target() {
        // 800x600 to 16:9: height fixed, width round(600 * 16/9) = 1067
        assert_eq!(compute_canvas(800, 600, 16.0 / 9.0).unwrap(), (1067, 600));
        assert_eq!(place(1067, 600, 800, 600, Anchor::Center), (133, 0));
    }

    #[test]
    fn test_canvas_already_at_ratio() {
        assert_eq!(compute_canvas(800, 600, 4.0 / 3.0).unwrap(), (800, 600));
        assert!(satisfies_ratio(800, 600, 4.0 / 3.0));
        assert!(!satisfies_ratio(800, 600, 16.0 / 9.0));
    }

    #[test]
    fn test_canvas_within_a_rounded_pixel_is_kept() {
        // round(1000 * 0.0996) = 100 already matches the width, so the height
        // is not grown to round(100 / 0.0996) = 1004
        assert!(satisfies_ratio(100, 1000, 0.0996));
        assert_eq!(compute_canvas(100, 1000, 0.0996).unwrap(), (100, 1000));
        // Same for a canvas that was produced at that ratio
        assert_eq!(compute_canvas(100, 1004, 0.0996).unwrap(), (100, 1004));
        // A real mismatch still grows
        assert!(!satisfies_ratio(100, 1000, 0.09));
        assert_eq!(compute_canvas(100, 1000, 0.09).unwrap(), (100, 1111));
    }

    #[test]
    fn test_canvas_taller_target() {
        assert_eq!(compute_canvas(800, 600, 1.0).unwrap(), (800, 800));
        assert_eq!(compute_canvas(1920, 1080, 9.0 / 16.0).unwrap(), (1920, 3413));
    }

    #[test]
    fn test_canvas_invalid_inputs() {
        assert!(matches!(
            compute_canvas(0, 600, 1.0),
            Err(TransformError::InvalidDimensions(_))
        ));
        assert!(matches!(
            compute_canvas(800, 600, 0.0),
            Err(TransformError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            compute_canvas(800, 600, -2.0),
            Err(TransformError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            compute_canvas(800, 600, f64::NAN),
            Err(TransformError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            compute_canvas(10, 10, 1e-12),
            Err(TransformError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_place_vertical_anchors() {
        // 800x600 -> 800x800, 200px of slack
        assert_eq!(place(800, 800, 800, 600, Anchor::Top), (0, 0));
        assert_eq!(place(800, 800, 800, 600, Anchor::Bottom), (0, 200));
        assert_eq!(place(800, 800, 800, 600, Anchor::Center), (0, 100));
        // Horizontal anchors center the vertical axis
        assert_eq!(place(800, 800, 800, 600, Anchor::Left), (0, 100));
        assert_eq!(place(800, 800, 800, 600, Anchor::Right), (0, 100));
    }

    #[test]
    fn test_place_horizontal_anchors() {
        assert_eq!(place(1067, 600, 800, 600, Anchor::Left), (0, 0));
        assert_eq!(place(1067, 600, 800, 600, Anchor::Right), (267, 0));
        assert_eq!(place(1067, 600, 800, 600, Anchor::Top), (133, 0));
        assert_eq!(place(1067, 600, 800, 600, Anchor::Bottom), (133, 0));
    }

    #[test]
    fn test_padding_around() {
        let pad = Padding::around((1067, 600), (800, 600), (133, 0));
        assert_eq!(
            pad,
            Padding {
                top: 0,
                bottom: 0,
                left: 133,
                right: 134
            }
        );
    }

    #[test]
    fn test_strip_starvation_upscales() {
        // Source edge only 10px deep, padding 400px: sample 10, stretch to 200.
        let img = test_image(40, 10);
        let strip = synthesize_padding(&img, Edge::Top, 400, 60, 0).unwrap();
        assert_eq!(strip.dimensions(), (60, 400));

        let blurred = synthesize_padding(&img, Edge::Bottom, 400, 60, 3).unwrap();
        assert_eq!(blurred.dimensions(), (60, 400));
    }

    #[test]
    fn test_strip_vertical_edges() {
        let img = test_image(30, 20);
        let left = synthesize_padding(&img, Edge::Left, 7, 20, 2).unwrap();
        assert_eq!(left.dimensions(), (7, 20));

        let right = synthesize_padding(&img, Edge::Right, 1, 20, 0).unwrap();
        assert_eq!(right.dimensions(), (1, 20));
    }

    #[test]
    fn test_strip_rejects_empty() {
        let img = test_image(10, 10);
        assert!(synthesize_padding(&img, Edge::Top, 0, 10, 0).is_err());
        assert!(synthesize_padding(&img, Edge::Top, 10, 0, 0).is_err());
    }

    #[test]
    fn test_extend_preserves_original_pixels() {
        let img = test_image(40, 30);
        let out = extend(&img, 2.0, Anchor::Center, 2).unwrap();

        assert_eq!(out.dimensions(), (60, 30));
        for y in 0..30 {
            for x in 0..40 {
                assert_eq!(out.pixel(x + 10, y), img.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_extend_padding_comes_from_nearest_edge() {
        let img = split_image(40, 30);
        let out = extend(&img, 2.0, Anchor::Center, 0).unwrap();

        // Left border derives from the dark side, right border from the bright one.
        for y in 0..30 {
            assert!((out.pixel(3, y)[0] as i32 - 10).abs() <= 3);
            assert!((out.pixel(56, y)[0] as i32 - 250).abs() <= 3);
        }
    }

    #[test]
    fn test_extend_anchor_left_pads_right_only() {
        let img = split_image(40, 30);
        let out = extend(&img, 2.0, Anchor::Left, 0).unwrap();
        assert_eq!(out.dimensions(), (60, 30));
        assert_eq!(out.pixel(0, 0), img.pixel(0, 0));
        assert!((out.pixel(59, 15)[0] as i32 - 250).abs() <= 3);
    }

    #[test]
    fn test_extend_vertical() {
        let img = test_image(30, 20);
        let out = extend(&img, 1.0, Anchor::Bottom, 1).unwrap();
        assert_eq!(out.dimensions(), (30, 30));
        // Anchored to the bottom: source occupies rows 10..30
        assert_eq!(out.pixel(5, 10), img.pixel(5, 0));
        assert_eq!(out.pixel(29, 29), img.pixel(29, 19));
    }

    #[test]
    fn test_extend_noop_returns_copy() {
        let img = test_image(80, 60);
        let out = extend(&img, 4.0 / 3.0, Anchor::Center, 70).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_extend_keeps_alpha_and_source_exact() {
        let mut pixels = Vec::new();
        for i in 0..(20 * 10) {
            pixels.extend_from_slice(&[200, 100, 50, (i % 256) as u8]);
        }
        let img = PixelBuffer::new(20, 10, PixelMode::Rgba, pixels).unwrap();
        let out = extend(&img, 1.0, Anchor::Center, 2).unwrap();

        assert_eq!(out.mode(), PixelMode::Rgba);
        assert_eq!(out.dimensions(), (20, 20));
        for y in 0..10 {
            for x in 0..20 {
                assert_eq!(out.pixel(x, y + 5), img.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_extend_luma() {
        let img = PixelBuffer::filled(16, 9, PixelMode::Luma, &[60]).unwrap();
        let out = extend(&img, 1.0, Anchor::Top, 0).unwrap();
        assert_eq!(out.dimensions(), (16, 16));
        assert_eq!(out.mode(), PixelMode::Luma);
        assert!((out.pixel(8, 15)[0] as i32 - 60).abs() <= 2);
    }

    #[test]
    fn test_extend_to_requires_ratio() {
        let img = test_image(10, 10);
        assert_eq!(
            extend_to(&img, AspectRatio::Unconstrained, Anchor::Center, 0),
            Err(TransformError::UnconstrainedRatio)
        );
        let out = extend_to(&img, AspectRatio::Fixed(2, 1), Anchor::Center, 0).unwrap();
        assert_eq!(out.dimensions(), (20, 10));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelMode;
    use proptest::prelude::*;

    fn anchor_strategy() -> impl Strategy<Value = Anchor> {
        prop_oneof![
            Just(Anchor::Center),
            Just(Anchor::Top),
            Just(Anchor::Bottom),
            Just(Anchor::Left),
            Just(Anchor::Right),
        ]
    }

    fn create_test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 7 % 256) as u8, (y * 13 % 256) as u8, 90]);
            }
        }
        PixelBuffer::new(width, height, PixelMode::Rgb, pixels).unwrap()
    }

    proptest! {
        /// Property: the canvas never shrinks and grows at most one axis.
        #[test]
        fn prop_canvas_never_shrinks(
            (src_w, src_h) in (1u32..=4000, 1u32..=4000),
            (tw, th) in (1u32..=30, 1u32..=30),
        ) {
            let (w, h) = compute_canvas(src_w, src_h, tw as f64 / th as f64).unwrap();
            prop_assert!(w >= src_w);
            prop_assert!(h >= src_h);
            prop_assert!(w == src_w || h == src_h);
        }

        /// Property: the paste position keeps the source inside the canvas.
        #[test]
        fn prop_place_inside_canvas(
            (src_w, src_h) in (1u32..=4000, 1u32..=4000),
            (tw, th) in (1u32..=30, 1u32..=30),
            anchor in anchor_strategy(),
        ) {
            let (w, h) = compute_canvas(src_w, src_h, tw as f64 / th as f64).unwrap();
            let (x, y) = place(w, h, src_w, src_h, anchor);
            prop_assert!(x + src_w <= w);
            prop_assert!(y + src_h <= h);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: extending an extended image changes nothing.
        #[test]
        fn prop_extend_idempotent(
            (src_w, src_h) in (2u32..=24, 2u32..=24),
            (tw, th) in (1u32..=5, 1u32..=5),
            anchor in anchor_strategy(),
        ) {
            let img = create_test_image(src_w, src_h);
            let ratio = tw as f64 / th as f64;

            let once = extend(&img, ratio, anchor, 0).unwrap();
            let twice = extend(&once, ratio, anchor, 0).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: padding strips come out exactly the requested size.
        #[test]
        fn prop_strip_exact_size(
            (src_w, src_h) in (1u32..=20, 1u32..=20),
            thickness in 1u32..=120,
            span in 1u32..=80,
        ) {
            let img = create_test_image(src_w, src_h);
            let top = synthesize_padding(&img, Edge::Top, thickness, span, 0).unwrap();
            prop_assert_eq!(top.dimensions(), (span, thickness));
            let right = synthesize_padding(&img, Edge::Right, thickness, span, 0).unwrap();
            prop_assert_eq!(right.dimensions(), (thickness, span));
        }
    }
}
