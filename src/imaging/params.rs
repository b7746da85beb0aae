//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations) (which decides what to
//! write where) and the [`backend`](super::backend) (which does the pixel work),
//! so tests can swap in a mock backend without touching operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`Encoding`]: Output encoder and its settings, chosen from the file extension.
//! - [`ResizeParams`]: Source, output, exact target dimensions, encoding.
//! - [`CompressParams`]: Source, output, encoding (no geometry change).

use crate::config::PngCompression;
use image::ImageFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// How an output image is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Baseline JPEG. Alpha is dropped.
    Jpeg { quality: Quality },
    /// Lossless PNG with adaptive row filtering.
    Png { compression: PngCompression },
    /// Lossless WebP (the only WebP encoder the `image` crate ships).
    WebpLossless,
    /// The format's default encoder (GIF, TIFF, BMP).
    Native(ImageFormat),
}

impl Encoding {
    /// Whether re-encoding a source of this format at its own size is worth
    /// doing. Lossless WebP would inflate lossy sources and the native
    /// encoders have no size knobs, so only JPEG and PNG qualify.
    pub fn recompresses(self) -> bool {
        matches!(self, Encoding::Jpeg { .. } | Encoding::Png { .. })
    }
}

/// Parameters for a resize: cover `width`x`height`, center-cropping overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
}

/// Parameters for a same-size re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub encoding: Encoding,
}
