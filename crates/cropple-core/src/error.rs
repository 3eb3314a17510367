//! Error type shared by the geometry and transform engines.

use thiserror::Error;

use crate::geometry::Rect;

/// Errors returned by crop, extension and rotation operations.
///
/// Geometry failures are always handed back to the caller; none of them is
/// coerced into a fallback inside the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A width, height, ratio term or display bound was zero or negative.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The crop rectangle collapsed to zero area after clamping.
    #[error("Crop region has no area after clamping: {rect:?}")]
    DegenerateRegion { rect: Rect },

    /// The extension target rounds to a non-positive or unrepresentable size.
    #[error("Invalid extension canvas {width}x{height} for ratio {ratio}")]
    InvalidCanvas { width: f64, height: f64, ratio: f64 },

    /// A fill color string could not be parsed as `#RRGGBB`.
    #[error("Invalid fill color: {0:?}")]
    InvalidFillColor(String),

    /// Extension needs a concrete target ratio.
    #[error("Canvas extension requires a fixed or derived aspect ratio")]
    UnconstrainedRatio,

    /// Sample count does not match `width * height * channels`.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, TransformError>;
