//! Arbitrary-angle rotation with canvas expansion and a fill policy.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each output pixel center we find
//! the source position it came from and interpolate there. Positive angles
//! turn the content clockwise as seen on screen (y grows downward), so the
//! inverse transform relative to the two image centers is:
//!
//! ```text
//! src_x = src_cx + dx * cos(θ) + dy * sin(θ)
//! src_y = src_cy - dx * sin(θ) + dy * cos(θ)
//! ```
//!
//! Output pixels whose source position falls outside the image take the
//! fill color.

use std::borrow::Cow;

use image::Rgba;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::error::{Result, TransformError};

/// Angles smaller than this (in degrees) leave the image untouched.
pub const MIN_ROTATION_DEGREES: f64 = 0.1;

/// Fill used when a configured hex color cannot be parsed.
pub const DEFAULT_FILL: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Fill color offered to the user before they pick one.
pub const DEFAULT_FILL_HEX: &str = "#CCCCCC";

/// Interpolation filter for rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// 2x2 neighborhood. Fast, slightly soft.
    Bilinear,
    /// 4x4 cubic convolution.
    #[default]
    Bicubic,
    /// 6x6 windowed sinc. Sharpest.
    Lanczos3,
}

impl InterpolationFilter {
    /// Tap offsets around the floor of the sample position.
    fn support(self) -> (i64, i64) {
        match self {
            InterpolationFilter::Bilinear => (0, 1),
            InterpolationFilter::Bicubic => (-1, 2),
            InterpolationFilter::Lanczos3 => (-2, 3),
        }
    }

    fn weight(self, distance: f64) -> f64 {
        match self {
            InterpolationFilter::Bilinear => (1.0 - distance.abs()).max(0.0),
            InterpolationFilter::Bicubic => cubic_weight(distance),
            InterpolationFilter::Lanczos3 => lanczos_weight(distance, 3.0),
        }
    }
}

/// What the uncovered corners of a rotated canvas are painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Paint with a fixed color. Its alpha component is ignored: the fill is
    /// always fully opaque.
    Opaque(Rgba<u8>),
    /// Leave corners fully transparent. Opaque images gain an alpha channel.
    Transparent,
}

impl Default for FillPolicy {
    fn default() -> Self {
        FillPolicy::Opaque(DEFAULT_FILL)
    }
}

impl FillPolicy {
    /// Opaque fill from a `#RRGGBB` string.
    pub fn from_hex(text: &str) -> Result<Self> {
        parse_hex_color(text).map(FillPolicy::Opaque)
    }

    /// Opaque fill from a `#RRGGBB` string, falling back to [`DEFAULT_FILL`].
    pub fn from_hex_or_default(text: &str) -> Self {
        match Self::from_hex(text) {
            Ok(policy) => policy,
            Err(err) => {
                warn!(%err, "using default rotation fill");
                FillPolicy::Opaque(DEFAULT_FILL)
            }
        }
    }

    /// This fill expressed in `buffer`'s channel layout.
    fn pixel_for(self, buffer: &PixelBuffer) -> Vec<u8> {
        match self {
            FillPolicy::Opaque(Rgba([r, g, b, _])) => {
                buffer.mode().encode_color(Rgba([r, g, b, 255]))
            }
            FillPolicy::Transparent => vec![0; buffer.channels()],
        }
    }
}

/// Parse `#RRGGBB` (the `#` is optional) into an opaque color.
///
/// # Errors
///
/// `InvalidFillColor` unless the text is exactly six hex digits.
pub fn parse_hex_color(text: &str) -> Result<Rgba<u8>> {
    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TransformError::InvalidFillColor(text.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| TransformError::InvalidFillColor(text.to_string()))
    };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

/// A rotation to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationRequest {
    /// Degrees, positive turns clockwise on screen.
    pub angle_degrees: f64,
    pub fill: FillPolicy,
}

impl RotationRequest {
    pub fn new(angle_degrees: f64, fill: FillPolicy) -> Self {
        Self {
            angle_degrees,
            fill,
        }
    }
}

/// Whether rotating by `angle_degrees` should be skipped.
///
/// Non-finite angles are treated as no rotation.
#[inline]
pub fn is_noop_angle(angle_degrees: f64) -> bool {
    !angle_degrees.is_finite() || angle_degrees.abs() < MIN_ROTATION_DEGREES
}

/// Size of the smallest canvas holding a `width x height` image rotated by
/// `angle_degrees`.
///
/// Multiples of 90 degrees are exact. Other angles round the real extents up,
/// with a small tolerance so float noise does not add a pixel.
///
/// # Example
///
/// ```
/// use cropple_core::transform::compute_rotated_bounds;
///
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
/// assert_eq!(compute_rotated_bounds(100, 50, 30.0), (112, 94));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let normalized = (angle_degrees % 360.0).abs();

    // Fast path: quarter turns
    let quarter = normalized / 90.0;
    if (quarter - quarter.round()).abs() * 90.0 < 1e-3 {
        return if quarter.round() as i64 % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (width as f64, height as f64);

    let new_w = (w * cos + h * sin - 1e-9).ceil() as u32;
    let new_h = (w * sin + h * cos - 1e-9).ceil() as u32;
    (new_w.max(1), new_h.max(1))
}

/// Rotate with bicubic interpolation.
///
/// Returns `Ok(None)` when the angle is below [`MIN_ROTATION_DEGREES`] or not
/// finite; the caller keeps its current image.
pub fn rotate(buffer: &PixelBuffer, request: &RotationRequest) -> Result<Option<PixelBuffer>> {
    rotate_with_filter(buffer, request, InterpolationFilter::Bicubic)
}

/// Rotate with an explicit interpolation filter. See [`rotate`].
pub fn rotate_with_filter(
    buffer: &PixelBuffer,
    request: &RotationRequest,
    filter: InterpolationFilter,
) -> Result<Option<PixelBuffer>> {
    let angle = request.angle_degrees;
    if is_noop_angle(angle) {
        debug!(angle, "rotation below threshold, skipped");
        return Ok(None);
    }

    let source: Cow<'_, PixelBuffer> = match request.fill {
        FillPolicy::Transparent if !buffer.mode().has_alpha() => {
            Cow::Owned(buffer.promote_to_alpha())
        }
        _ => Cow::Borrowed(buffer),
    };
    let fill = request.fill.pixel_for(&source);

    let (src_w, src_h) = source.dimensions();
    let (dst_w, dst_h) = compute_rotated_bounds(src_w, src_h, angle);
    debug!(angle, src_w, src_h, dst_w, dst_h, ?filter, "rotate");

    let (sin, cos) = angle.to_radians().sin_cos();
    let (src_cx, src_cy) = (src_w as f64 / 2.0, src_h as f64 / 2.0);
    let (dst_cx, dst_cy) = (dst_w as f64 / 2.0, dst_h as f64 / 2.0);

    let channels = source.channels();
    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * channels);
    let mut sample = vec![0u8; channels];

    for dst_y in 0..dst_h {
        let dy = dst_y as f64 + 0.5 - dst_cy;
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let src_x = src_cx + dx * cos + dy * sin;
            let src_y = src_cy - dx * sin + dy * cos;

            if src_x < 0.0 || src_x >= src_w as f64 || src_y < 0.0 || src_y >= src_h as f64 {
                output.extend_from_slice(&fill);
            } else {
                sample_at(&source, src_x, src_y, filter, &mut sample);
                output.extend_from_slice(&sample);
            }
        }
    }

    PixelBuffer::new(dst_w, dst_h, source.mode(), output).map(Some)
}

/// A lossless quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarterTurn {
    Clockwise,
    CounterClockwise,
}

/// Rotate by exactly 90 degrees. Width and height swap, no pixels are lost.
pub fn rotate_quarter(buffer: &PixelBuffer, turn: QuarterTurn) -> Result<PixelBuffer> {
    let img = buffer.to_dynamic()?;
    let turned = match turn {
        QuarterTurn::Clockwise => img.rotate90(),
        QuarterTurn::CounterClockwise => img.rotate270(),
    };
    PixelBuffer::from_dynamic(turned)
}

/// Filter taps along one axis: source indices (edge-clamped) and weights.
struct Taps {
    index: [usize; 6],
    weight: [f64; 6],
    len: usize,
}

fn taps(filter: InterpolationFilter, coord: f64, extent: u32) -> Taps {
    // Pixel centers sit at half-integers
    let center = coord - 0.5;
    let base = center.floor();
    let (lo, hi) = filter.support();
    let last = extent as i64 - 1;

    let mut taps = Taps {
        index: [0; 6],
        weight: [0.0; 6],
        len: 0,
    };
    let mut total = 0.0;
    for k in lo..=hi {
        let pos = base + k as f64;
        let weight = filter.weight(center - pos);
        taps.index[taps.len] = (pos as i64).clamp(0, last) as usize;
        taps.weight[taps.len] = weight;
        taps.len += 1;
        total += weight;
    }
    if total.abs() > f64::EPSILON {
        for weight in &mut taps.weight[..taps.len] {
            *weight /= total;
        }
    }
    taps
}

/// Interpolate every channel at `(x, y)` into `out`.
fn sample_at(image: &PixelBuffer, x: f64, y: f64, filter: InterpolationFilter, out: &mut [u8]) {
    let xs = taps(filter, x, image.width());
    let ys = taps(filter, y, image.height());
    let channels = image.channels();
    let stride = image.width() as usize * channels;
    let pixels = image.pixels();

    for (c, value) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for j in 0..ys.len {
            let row = ys.index[j] * stride;
            let mut row_sum = 0.0;
            for i in 0..xs.len {
                row_sum += pixels[row + xs.index[i] * channels + c] as f64 * xs.weight[i];
            }
            sum += row_sum * ys.weight[j];
        }
        *value = sum.clamp(0.0, 255.0).round() as u8;
    }
}

/// Cubic convolution kernel with `a = -0.5`.
fn cubic_weight(x: f64) -> f64 {
    const A: f64 = -0.5;
    let x = x.abs();
    if x < 1.0 {
        ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        (((x - 5.0) * x + 8.0) * x - 4.0) * A
    } else {
        0.0
    }
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelMode;
    use proptest::prelude::*;

    proptest! {
        /// Property: bounds depend only on the angle's magnitude.
        #[test]
        fn prop_bounds_symmetric(
            (w, h) in (1u32..=2000, 1u32..=2000),
            angle in 0.1f64..360.0,
        ) {
            prop_assert_eq!(
                compute_rotated_bounds(w, h, angle),
                compute_rotated_bounds(w, h, -angle)
            );
        }

        /// Property: off quarter turns, each side is the rotated extent on
        /// that axis rounded up, `ceil(w|cos| + h|sin|)` by `ceil(w|sin| + h|cos|)`.
        #[test]
        fn prop_bounds_are_rounded_up_extents(
            (w, h) in (1u32..=2000, 1u32..=2000),
            angle in -180.0f64..180.0,
        ) {
            let quarter = angle / 90.0;
            prop_assume!((quarter - quarter.round()).abs() * 90.0 >= 1e-3);

            let (bw, bh) = compute_rotated_bounds(w, h, angle);
            let (sin, cos) = angle.to_radians().sin_cos();
            let (sin, cos) = (sin.abs(), cos.abs());
            let (w, h) = (w as f64, h as f64);
            let extent_w = w * cos + h * sin;
            let extent_h = w * sin + h * cos;

            prop_assert!(bw as f64 >= extent_w - 1e-6);
            prop_assert!((bw as f64) < extent_w + 1.0);
            prop_assert!(bh as f64 >= extent_h - 1e-6);
            prop_assert!((bh as f64) < extent_h + 1.0);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: rotated output matches the computed bounds and mode.
        #[test]
        fn prop_rotate_dimensions(
            (w, h) in (1u32..=24, 1u32..=24),
            angle in 0.1f64..359.0,
            transparent in any::<bool>(),
        ) {
            let img = PixelBuffer::filled(w, h, PixelMode::Rgb, &[1, 2, 3]).unwrap();
            let fill = if transparent { FillPolicy::Transparent } else { FillPolicy::default() };
            let out = rotate(&img, &RotationRequest::new(angle, fill)).unwrap().unwrap();

            prop_assert_eq!(out.dimensions(), compute_rotated_bounds(w, h, angle));
            let expected = if transparent { PixelMode::Rgba } else { PixelMode::Rgb };
            prop_assert_eq!(out.mode(), expected);
        }
    }
}
