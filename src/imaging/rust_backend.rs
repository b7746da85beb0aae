//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF, TIFF, BMP) | `image::ImageReader` with content sniffing |
//! | Resize (cover + center crop) | `image::DynamicImage::resize_to_fill`, `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → PNG | `image::codecs::png::PngEncoder::new_with_quality`, adaptive filter |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder::new_lossless` |
//! | Encode → GIF, TIFF, BMP | `image::DynamicImage::write_to` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{CompressParams, Encoding, ResizeParams};
use crate::config::PngCompression;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content
/// when the extension lies.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn png_compression(level: PngCompression) -> png::CompressionType {
    match level {
        PngCompression::Fast => png::CompressionType::Fast,
        PngCompression::Default => png::CompressionType::Default,
        PngCompression::Best => png::CompressionType::Best,
    }
}

/// Encode `img` to `path` with the given encoding.
fn save_image(img: &DynamicImage, path: &Path, encoding: Encoding) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);

    let result = match encoding {
        Encoding::Jpeg { quality } => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        Encoding::Png { compression } => {
            let encoder = PngEncoder::new_with_quality(
                &mut writer,
                png_compression(compression),
                png::FilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
        }
        Encoding::WebpLossless => {
            let encoder = WebPEncoder::new_lossless(&mut writer);
            let eight_bit = if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            };
            eight_bit.write_with_encoder(encoder)
        }
        Encoding::Native(format) => img.write_to(&mut writer, format),
    };

    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })?;
    writer.flush()?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        // Cover the target box, then center-crop the overflow.
        let resized = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.encoding)
    }

    fn compress(&self, params: &CompressParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_image(&img, &params.output, params.encoding)
    }
}
