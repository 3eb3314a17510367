//! Image decoding for the editor.
//!
//! Any format the `image` crate was built with (JPEG and PNG here) is
//! accepted. EXIF orientation is applied so the returned pixels are upright,
//! which matters because every geometry operation works on raw pixel
//! coordinates.

mod reader;
mod types;

pub use reader::{decode_bytes, decode_path, get_orientation};
pub use types::{DecodeError, Orientation};
