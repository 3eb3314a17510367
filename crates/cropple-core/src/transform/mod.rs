//! Image transformation operations: crop, extend, rotate, resample.
//!
//! Every operation borrows its input and returns a new [`PixelBuffer`], so the
//! caller decides when the working image is replaced.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Crop rectangles arrive in display space and are mapped to source pixels
//! - Rotation angles are in degrees, positive = clockwise on screen
//!
//! [`PixelBuffer`]: crate::buffer::PixelBuffer

mod crop;
mod extend;
mod resample;
mod rotation;

pub use crop::{compute_rect, crop_source, extract};
pub use extend::{
    compute_canvas, extend, extend_to, place, satisfies_ratio, synthesize_padding, Anchor, Edge,
    Padding, MAX_BLUR_RADIUS, NEUTRAL_GRAY, RATIO_TOLERANCE,
};
pub use resample::{gaussian_blur, resize, FilterType};
pub use rotation::{
    compute_rotated_bounds, is_noop_angle, parse_hex_color, rotate, rotate_quarter,
    rotate_with_filter, FillPolicy, InterpolationFilter, QuarterTurn, RotationRequest,
    DEFAULT_FILL, DEFAULT_FILL_HEX, MIN_ROTATION_DEGREES,
};
