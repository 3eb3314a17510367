//! Image encoding for export.
//!
//! PNG keeps every channel mode. JPEG needs an opaque buffer, so alpha
//! images are flattened by the caller before export.

mod writer;

pub use writer::{encode, encode_pixels, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
