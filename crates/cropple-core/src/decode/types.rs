//! Decode errors and the EXIF orientation tag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a file could not become a [`crate::PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Empty input, or magic bytes that match no enabled codec.
    #[error("Unrecognized image format")]
    InvalidFormat,

    /// Known format, unreadable payload. Carries the codec's message.
    #[error("Image data could not be decoded: {0}")]
    CorruptedFile(String),

    #[error("Could not read image: {0}")]
    IoError(String),
}

/// Value of the EXIF `Orientation` tag.
///
/// Variant names describe the correction that makes the image upright.
/// Discriminants are the raw tag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirror across the main diagonal.
    Transpose = 5,
    Rotate90CW = 6,
    /// Mirror across the anti-diagonal.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    /// Tag values outside `1..=8` are treated as upright.
    fn from(tag: u32) -> Self {
        const TABLE: [Orientation; 8] = [
            Orientation::Normal,
            Orientation::FlipHorizontal,
            Orientation::Rotate180,
            Orientation::FlipVertical,
            Orientation::Transpose,
            Orientation::Rotate90CW,
            Orientation::Transverse,
            Orientation::Rotate270CW,
        ];
        tag.checked_sub(1)
            .and_then(|i| TABLE.get(i as usize).copied())
            .unwrap_or_default()
    }
}
