//! High-level image operations.
//!
//! These functions turn paths plus [`ImagesConfig`] into backend parameters
//! and call the backend. Planning is kept separate from execution so the
//! parameter choice can be tested without encoding anything.

use super::backend::{BackendError, ImageBackend};
use super::params::{CompressParams, Encoding, Quality, ResizeParams};
use crate::config::ImagesConfig;
use image::ImageFormat;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Pick the encoder for an output path from its extension.
///
/// Returns `None` for anything the backend cannot both decode and encode
/// (SVG, ICO, AVIF, unknown extensions).
pub fn encoding_for(path: &Path, config: &ImagesConfig) -> Option<Encoding> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let encoding = match ext.as_str() {
        "jpg" | "jpeg" => Encoding::Jpeg {
            quality: Quality::new(config.jpeg_quality),
        },
        "png" => Encoding::Png {
            compression: config.png_compression,
        },
        "webp" => Encoding::WebpLossless,
        "gif" => Encoding::Native(ImageFormat::Gif),
        "tif" | "tiff" => Encoding::Native(ImageFormat::Tiff),
        "bmp" => Encoding::Native(ImageFormat::Bmp),
        _ => return None,
    };
    Some(encoding)
}

/// Plan a resize from `source` to `output`, keeping the source's format.
///
/// Returns `None` when the format is not supported.
pub fn plan_resize(
    source: &Path,
    output: &Path,
    width: u32,
    height: u32,
    config: &ImagesConfig,
) -> Option<ResizeParams> {
    Some(ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        encoding: encoding_for(source, config)?,
    })
}

/// Plan a same-size re-encode.
///
/// Returns `None` when re-encoding this format would not shrink it; the
/// caller copies those files verbatim.
pub fn plan_compress(source: &Path, output: &Path, config: &ImagesConfig) -> Option<CompressParams> {
    let encoding = encoding_for(source, config).filter(|e| e.recompresses())?;
    Some(CompressParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        encoding,
    })
}

/// Execute a planned resize.
pub fn resize_image(backend: &impl ImageBackend, params: &ResizeParams) -> Result<()> {
    backend.resize(params)
}

/// Execute a planned re-encode.
pub fn compress_image(backend: &impl ImageBackend, params: &CompressParams) -> Result<()> {
    backend.compress(params)
}
