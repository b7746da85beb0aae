//! Verbatim asset copying.
//!
//! Copies the assets directory tree and the configured root files (by default
//! `styles.css` and `script.js`) from the source to the output directory.
//! Minification of these files is out of scope; they are written byte-for-byte.

use crate::config::{BuildConfig, is_contained_relative};
use crate::process::{copy_file, slash_path};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Copy assets and root files, returning the relative paths written.
///
/// Files in `handled` (relative paths already produced by the resize step)
/// are not overwritten. Missing assets directories and root files are
/// skipped silently.
pub fn copy_assets(
    config: &BuildConfig,
    handled: &HashSet<PathBuf>,
) -> Result<Vec<String>, AssetError> {
    let source_root = config.source.as_path();
    let output_root = config.output.as_path();
    let mut copied = Vec::new();

    let assets_src = source_root.join(&config.assets_dir);
    if assets_src.is_dir() {
        let before = copied.len();
        copy_tree(&assets_src, source_root, output_root, handled, &mut copied)?;
        tracing::info!(
            "Copied {} files from {} to {}",
            copied.len() - before,
            assets_src.display(),
            output_root.join(&config.assets_dir).display()
        );
    }

    for file in &config.root_files {
        let rel = Path::new(file);
        if !is_contained_relative(rel) {
            tracing::warn!("Skipping root file {}: outside the source directory", file);
            continue;
        }
        let source = source_root.join(rel);
        if !source.is_file() || handled.contains(rel) {
            continue;
        }
        copy_file(&source, &output_root.join(rel))?;
        tracing::info!("Copied {} to {}", file, output_root.display());
        copied.push(slash_path(rel));
    }

    Ok(copied)
}

fn copy_tree(
    dir: &Path,
    source_root: &Path,
    output_root: &Path,
    handled: &HashSet<PathBuf>,
    copied: &mut Vec<String>,
) -> Result<(), AssetError> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        if handled.contains(rel) {
            tracing::debug!("{} already resized, not overwriting", slash_path(rel));
            continue;
        }
        copy_file(entry.path(), &output_root.join(rel))?;
        copied.push(slash_path(rel));
    }
    Ok(())
}
