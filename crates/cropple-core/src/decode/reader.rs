//! Decoding from memory or disk with EXIF orientation correction.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use tracing::debug;

use super::{DecodeError, Orientation};
use crate::buffer::PixelBuffer;

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is guessed from the content. Channels are narrowed to 8 bits
/// and mapped to the closest [`PixelMode`](crate::buffer::PixelMode).
///
/// # Errors
///
/// - `InvalidFormat` if the bytes are empty or not a known image format
/// - `CorruptedFile` if the format is known but decoding fails
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(e.to_string()))?;
    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let orientation = get_orientation(bytes);
    debug!(
        ?format,
        width = img.width(),
        height = img.height(),
        ?orientation,
        "decoded image"
    );

    PixelBuffer::from_dynamic(apply_orientation(img, orientation))
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Read and decode an image file. See [`decode_bytes`].
///
/// # Errors
///
/// `IoError` if the file cannot be read, otherwise as [`decode_bytes`].
pub fn decode_path(path: &Path) -> Result<PixelBuffer, DecodeError> {
    let bytes = std::fs::read(path)
        .map_err(|e| DecodeError::IoError(format!("{}: {}", path.display(), e)))?;
    decode_bytes(&bytes)
}

/// EXIF orientation of an encoded image.
///
/// Returns `Orientation::Normal` if there is no EXIF data or no orientation
/// tag.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

/// Undo the camera orientation so pixels appear upright.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
