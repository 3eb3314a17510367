//! Per-call edit options exchanged with the front-end.
//!
//! Nothing here is persisted by the library. Missing fields deserialize to
//! the product defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};
use crate::geometry::AspectRatio;
use crate::transform::{
    Anchor, FillPolicy, RotationRequest, DEFAULT_FILL_HEX, MAX_BLUR_RADIUS,
};

/// Blur radius the product starts with.
pub const DEFAULT_BLUR_RADIUS: u32 = 70;

/// How rotation fills the uncovered corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Solid `fill_color`.
    #[default]
    Color,
    /// Transparent corners; opaque images gain alpha.
    Transparent,
}

/// Options for crop, extend and rotate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    pub aspect_ratio: AspectRatio,
    pub anchor: Anchor,
    /// Gaussian radius for extension padding, 0..=100.
    pub blur_radius: u32,
    pub fill_mode: FillMode,
    /// `#RRGGBB`
    pub fill_color: String,
    /// Degrees, positive = clockwise.
    pub angle_degrees: f64,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Fixed(16, 9),
            anchor: Anchor::Center,
            blur_radius: DEFAULT_BLUR_RADIUS,
            fill_mode: FillMode::Color,
            fill_color: DEFAULT_FILL_HEX.to_string(),
            angle_degrees: 0.0,
        }
    }
}

impl EditSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blur radius clamped to the supported range.
    pub fn effective_blur_radius(&self) -> u32 {
        self.blur_radius.min(MAX_BLUR_RADIUS)
    }

    /// Fill policy, failing on a malformed color.
    pub fn try_fill_policy(&self) -> Result<FillPolicy> {
        match self.fill_mode {
            FillMode::Transparent => Ok(FillPolicy::Transparent),
            FillMode::Color => FillPolicy::from_hex(&self.fill_color),
        }
    }

    /// Fill policy; a malformed color falls back to the default gray.
    pub fn fill_policy(&self) -> FillPolicy {
        match self.fill_mode {
            FillMode::Transparent => FillPolicy::Transparent,
            FillMode::Color => FillPolicy::from_hex_or_default(&self.fill_color),
        }
    }

    pub fn rotation_request(&self) -> RotationRequest {
        RotationRequest::new(self.angle_degrees, self.fill_policy())
    }

    /// Numeric target ratio for extending an image of `image_dims`.
    ///
    /// # Errors
    ///
    /// `UnconstrainedRatio` when no ratio is selected.
    pub fn extension_ratio(&self, image_dims: (u32, u32)) -> Result<f64> {
        self.aspect_ratio
            .ratio(image_dims)?
            .ok_or(TransformError::UnconstrainedRatio)
    }
}
