//! Owned 8-bit pixel buffers.
//!
//! Every transform borrows a [`PixelBuffer`] and returns a new one; nothing
//! mutates a buffer the caller still holds.

use image::{ColorType, DynamicImage, ExtendedColorType, ImageBuffer, Pixel, Rgb, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelMode {
    /// Opaque grayscale, 1 byte per pixel.
    Luma,
    /// Grayscale with alpha, 2 bytes per pixel.
    LumaAlpha,
    /// Opaque RGB, 3 bytes per pixel.
    Rgb,
    /// RGB with alpha, 4 bytes per pixel.
    Rgba,
}

impl PixelMode {
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelMode::Luma => 1,
            PixelMode::LumaAlpha => 2,
            PixelMode::Rgb => 3,
            PixelMode::Rgba => 4,
        }
    }

    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelMode::LumaAlpha | PixelMode::Rgba)
    }

    /// Mode for a given channel count, if there is one.
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(PixelMode::Luma),
            2 => Some(PixelMode::LumaAlpha),
            3 => Some(PixelMode::Rgb),
            4 => Some(PixelMode::Rgba),
            _ => None,
        }
    }

    pub(crate) fn color_type(self) -> ExtendedColorType {
        match self {
            PixelMode::Luma => ExtendedColorType::L8,
            PixelMode::LumaAlpha => ExtendedColorType::La8,
            PixelMode::Rgb => ExtendedColorType::Rgb8,
            PixelMode::Rgba => ExtendedColorType::Rgba8,
        }
    }

    /// Express an RGBA color in this mode's channel layout.
    ///
    /// Gray modes take the color's luma. Alpha modes keep the color's alpha.
    pub fn encode_color(self, color: Rgba<u8>) -> Vec<u8> {
        let Rgba([r, g, b, a]) = color;
        let luma = Rgb([r, g, b]).to_luma().0[0];
        match self {
            PixelMode::Luma => vec![luma],
            PixelMode::LumaAlpha => vec![luma, a],
            PixelMode::Rgb => vec![r, g, b],
            PixelMode::Rgba => vec![r, g, b, a],
        }
    }
}

/// A row-major 8-bit image with a known channel layout.
///
/// Invariant: `width > 0`, `height > 0` and
/// `pixels.len() == width * height * mode.channels()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    mode: PixelMode,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw samples, checking the size invariant.
    pub fn new(width: u32, height: u32, mode: PixelMode, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidDimensions(format!(
                "buffer {}x{} must be non-zero",
                width, height
            )));
        }
        let expected = width as usize * height as usize * mode.channels();
        if pixels.len() != expected {
            return Err(TransformError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mode,
            pixels,
        })
    }

    /// A buffer where every pixel equals `pixel` (given in `mode`'s layout).
    pub fn filled(width: u32, height: u32, mode: PixelMode, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != mode.channels() {
            return Err(TransformError::BufferSizeMismatch {
                expected: mode.channels(),
                actual: pixel.len(),
            });
        }
        let count = width as usize * height as usize;
        let pixels = pixel.repeat(count);
        Self::new(width, height, mode, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Samples of the pixel at `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels();
        let idx = (y as usize * self.width as usize + x as usize) * c;
        &self.pixels[idx..idx + c]
    }

    #[inline]
    fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Copy the rectangle `[x, x + width) x [y, y + height)`.
    ///
    /// The region is intersected with the buffer; an empty intersection is an
    /// `InvalidDimensions` error.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        let right = x.saturating_add(width).min(self.width);
        let bottom = y.saturating_add(height).min(self.height);
        if x >= right || y >= bottom {
            return Err(TransformError::InvalidDimensions(format!(
                "region {}x{} at ({}, {}) lies outside {}x{}",
                width, height, x, y, self.width, self.height
            )));
        }

        let c = self.channels();
        let out_w = right - x;
        let out_h = bottom - y;
        let mut out = Vec::with_capacity(out_w as usize * out_h as usize * c);
        for row in y..bottom {
            let src = self.row(row);
            out.extend_from_slice(&src[x as usize * c..right as usize * c]);
        }
        Self::new(out_w, out_h, self.mode, out)
    }

    /// Overwrite pixels with `src` placed at `(x, y)`, clipped to this buffer.
    ///
    /// Both buffers must share a mode.
    pub fn overwrite(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        debug_assert_eq!(self.mode, src.mode, "overwrite requires matching modes");
        let c = self.channels();
        let w = src.width.min(self.width.saturating_sub(x)) as usize;
        if w == 0 {
            return;
        }
        let dst_w = self.width as usize;
        for sy in 0..src.height {
            let dy = y as usize + sy as usize;
            if dy >= self.height as usize {
                break;
            }
            let dst_start = (dy * dst_w + x as usize) * c;
            let src_row = &src.row(sy)[..w * c];
            self.pixels[dst_start..dst_start + w * c].copy_from_slice(src_row);
        }
    }

    /// Paste `src` at `(x, y)` using its own alpha as the mask.
    ///
    /// Every channel, alpha included, becomes `src * a + dst * (1 - a)`.
    /// Opaque sources degrade to [`overwrite`](Self::overwrite).
    pub fn composite(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        if !src.mode.has_alpha() {
            self.overwrite(src, x, y);
            return;
        }
        debug_assert_eq!(self.mode, src.mode, "composite requires matching modes");

        let c = self.channels();
        let w = src.width.min(self.width.saturating_sub(x));
        let dst_w = self.width as usize;
        for sy in 0..src.height {
            let dy = y as usize + sy as usize;
            if dy >= self.height as usize {
                break;
            }
            for sx in 0..w {
                let s = src.pixel(sx, sy);
                let mask = s[c - 1] as u32;
                let dst_idx = (dy * dst_w + x as usize + sx as usize) * c;
                for (i, &sv) in s.iter().enumerate() {
                    let dv = self.pixels[dst_idx + i] as u32;
                    self.pixels[dst_idx + i] =
                        ((sv as u32 * mask + dv * (255 - mask) + 127) / 255) as u8;
                }
            }
        }
    }

    /// Convert to RGBA; gray is replicated and opaque modes get alpha 255.
    pub fn promote_to_alpha(&self) -> Self {
        let out: Vec<u8> = match self.mode {
            PixelMode::Rgba => return self.clone(),
            PixelMode::Rgb => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            PixelMode::Luma => self.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
            PixelMode::LumaAlpha => self
                .pixels
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
        };
        Self {
            width: self.width,
            height: self.height,
            mode: PixelMode::Rgba,
            pixels: out,
        }
    }

    /// Composite over an opaque background, dropping the alpha channel.
    ///
    /// `Rgba` becomes `Rgb` and `LumaAlpha` becomes `Luma`. Opaque buffers
    /// are returned as a copy.
    pub fn flatten(&self, background: Rgb<u8>) -> Self {
        let blend = |v: u8, bg: u8, a: u8| -> u8 {
            let a = a as u32;
            ((v as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
        };
        let (mode, out): (PixelMode, Vec<u8>) = match self.mode {
            PixelMode::Luma | PixelMode::Rgb => return self.clone(),
            PixelMode::Rgba => (
                PixelMode::Rgb,
                self.pixels
                    .chunks_exact(4)
                    .flat_map(|p| {
                        [
                            blend(p[0], background.0[0], p[3]),
                            blend(p[1], background.0[1], p[3]),
                            blend(p[2], background.0[2], p[3]),
                        ]
                    })
                    .collect(),
            ),
            PixelMode::LumaAlpha => {
                let bg = background.to_luma().0[0];
                (
                    PixelMode::Luma,
                    self.pixels
                        .chunks_exact(2)
                        .map(|p| blend(p[0], bg, p[1]))
                        .collect(),
                )
            }
        };
        Self {
            width: self.width,
            height: self.height,
            mode,
            pixels: out,
        }
    }

    /// Convert to an `image::DynamicImage` for resampling and filtering.
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let data = self.pixels.clone();
        let img = match self.mode {
            PixelMode::Luma => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
            PixelMode::LumaAlpha => {
                ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageLumaA8)
            }
            PixelMode::Rgb => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
            PixelMode::Rgba => ImageBuffer::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        };
        img.ok_or(TransformError::BufferSizeMismatch {
            expected: w as usize * h as usize * self.channels(),
            actual: self.pixels.len(),
        })
    }

    /// Build from an `image::DynamicImage`, narrowing to 8 bits per channel.
    ///
    /// Gray stays gray and alpha stays alpha; every other layout lands in
    /// `Rgb` or `Rgba`.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        let (mode, pixels) = match img.color() {
            ColorType::L8 | ColorType::L16 => (PixelMode::Luma, img.into_luma8().into_raw()),
            ColorType::La8 | ColorType::La16 => {
                (PixelMode::LumaAlpha, img.into_luma_alpha8().into_raw())
            }
            color if color.has_alpha() => (PixelMode::Rgba, img.into_rgba8().into_raw()),
            _ => (PixelMode::Rgb, img.into_rgb8().into_raw()),
        };
        Self::new(width, height, mode, pixels)
    }
}
