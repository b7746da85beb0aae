//! Image resizing and compression.
//!
//! Two build steps live here:
//!
//! - [`resize_referenced`]: every `<img>` that carries `width` and `height`
//!   gets a copy of its source at exactly that size, written to the same
//!   relative path under the output directory and encoded in the source's
//!   own format.
//! - [`compress_remaining`]: every other file in the images directory is
//!   re-encoded (JPEG, PNG) or copied verbatim (everything else).
//!
//! ## Output Structure
//!
//! ```text
//! src/                           dist/
//! ├── index.html                 ├── index.html
//! └── images/                    └── images/
//!     ├── hero.jpg  (4000x3000)      ├── hero.jpg   (800x600, resized)
//!     ├── logo.png                   ├── logo.png   (re-encoded)
//!     └── icon.svg                   └── icon.svg   (copied)
//! ```
//!
//! Images are processed one at a time, in order.

use crate::config::{ImagesConfig, is_contained_relative};
use crate::imaging::{
    BackendError, ImageBackend, RustBackend, compress_image, get_dimensions, plan_compress,
    plan_resize, resize_image,
};
use crate::types::{ImageAction, ImageOutcome, ImageRef, SkipReason, SkippedImage};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result of the resize step.
#[derive(Debug, Default)]
pub struct ResizeResult {
    pub outcomes: Vec<ImageOutcome>,
    pub skipped: Vec<SkippedImage>,
}

impl ResizeResult {
    /// Output paths (relative) this step wrote, so later steps leave them alone.
    pub fn handled(&self) -> HashSet<PathBuf> {
        self.outcomes.iter().map(|o| PathBuf::from(&o.path)).collect()
    }
}

/// Render a relative path with `/` separators for logs and reports.
pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn file_len(path: &Path) -> Result<u64, std::io::Error> {
    Ok(fs::metadata(path)?.len())
}

/// Copy `source` to `output`, creating parent directories.
pub(crate) fn copy_file(source: &Path, output: &Path) -> Result<u64, std::io::Error> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, output)
}

/// Locate the source file for a reference.
///
/// Fails with [`SkipReason::OutsideSource`] when the path climbs out of
/// `source_root` and [`SkipReason::Missing`] when no such file exists.
pub fn resolve_ref(image: &ImageRef, source_root: &Path) -> Result<PathBuf, SkipReason> {
    if !is_contained_relative(Path::new(&image.src)) {
        return Err(SkipReason::OutsideSource);
    }
    let source = source_root.join(&image.src);
    if !source.is_file() {
        return Err(SkipReason::Missing);
    }
    Ok(source)
}

pub fn resize_referenced(
    refs: &[ImageRef],
    source_root: &Path,
    output_root: &Path,
    config: &ImagesConfig,
) -> Result<ResizeResult, ProcessError> {
    resize_referenced_with_backend(&RustBackend::new(), refs, source_root, output_root, config)
}

/// Resize referenced images using a specific backend (allows testing with mock).
///
/// References whose source is missing, unsupported, or outside the source
/// directory are skipped with a warning. Refs are expected to be unique by
/// `src`; see [`crate::scan::dedupe_refs`].
pub fn resize_referenced_with_backend(
    backend: &impl ImageBackend,
    refs: &[ImageRef],
    source_root: &Path,
    output_root: &Path,
    config: &ImagesConfig,
) -> Result<ResizeResult, ProcessError> {
    let mut result = ResizeResult::default();

    for image in refs {
        let skip = |reason: SkipReason| {
            tracing::warn!("Skipping {}: {}", image.src, reason.describe());
            SkippedImage {
                path: image.src.clone(),
                reason,
            }
        };

        let source = match resolve_ref(image, source_root) {
            Ok(source) => source,
            Err(reason) => {
                result.skipped.push(skip(reason));
                continue;
            }
        };

        let output = output_root.join(&image.src);
        let Some(params) = plan_resize(&source, &output, image.width, image.height, config) else {
            result.skipped.push(skip(SkipReason::Unsupported));
            continue;
        };

        let from = get_dimensions(backend, &source)?;
        tracing::info!(
            "Resizing and compressing {} to {}x{}",
            image.src,
            image.width,
            image.height
        );
        resize_image(backend, &params)?;

        result.outcomes.push(ImageOutcome {
            path: image.src.clone(),
            action: ImageAction::Resized {
                from,
                to: (image.width, image.height),
            },
            source_bytes: file_len(&source)?,
            output_bytes: file_len(&output)?,
        });
    }

    Ok(result)
}

pub fn compress_remaining(
    images_dir: &str,
    source_root: &Path,
    output_root: &Path,
    handled: &HashSet<PathBuf>,
    config: &ImagesConfig,
) -> Result<Vec<ImageOutcome>, ProcessError> {
    compress_remaining_with_backend(
        &RustBackend::new(),
        images_dir,
        source_root,
        output_root,
        handled,
        config,
    )
}

/// Compress the images directory using a specific backend.
///
/// Walks `<source_root>/<images_dir>` recursively in file-name order. Files in
/// `handled` (relative to `source_root`) were already written by the resize
/// step and are left alone. A re-encode that fails or comes out larger than
/// its source falls back to a verbatim copy.
pub fn compress_remaining_with_backend(
    backend: &impl ImageBackend,
    images_dir: &str,
    source_root: &Path,
    output_root: &Path,
    handled: &HashSet<PathBuf>,
    config: &ImagesConfig,
) -> Result<Vec<ImageOutcome>, ProcessError> {
    let dir = source_root.join(images_dir);
    if !dir.is_dir() {
        tracing::debug!("No images directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut outcomes = Vec::new();

    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let source = entry.path();
        let Ok(rel) = source.strip_prefix(source_root) else {
            continue;
        };
        if handled.contains(rel) {
            tracing::debug!("{} already resized", slash_path(rel));
            continue;
        }

        let name = slash_path(rel);
        let output = output_root.join(rel);
        let source_bytes = file_len(source)?;

        let plan = if config.compress_unreferenced {
            plan_compress(source, &output, config)
        } else {
            None
        };

        let action = match plan {
            Some(params) => {
                tracing::info!("Compressing {}", name);
                match compress_image(backend, &params) {
                    Ok(()) if file_len(&output)? <= source_bytes => ImageAction::Compressed,
                    Ok(()) => {
                        tracing::debug!("{} grew when re-encoded; keeping the original", name);
                        copy_file(source, &output)?;
                        ImageAction::Copied
                    }
                    Err(e) => {
                        tracing::warn!("Could not compress {}: {}; copying as-is", name, e);
                        copy_file(source, &output)?;
                        ImageAction::Copied
                    }
                }
            }
            None => {
                tracing::debug!("Copying {}", name);
                copy_file(source, &output)?;
                ImageAction::Copied
            }
        };

        outcomes.push(ImageOutcome {
            path: name,
            action,
            source_bytes,
            output_bytes: file_len(&output)?,
        });
    }

    Ok(outcomes)
}
