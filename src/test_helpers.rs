//! Shared test utilities for the sitebake test suite.
//!
//! Provides a throwaway site fixture and synthetic image writers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new()
//!     .file("index.html", r#"<img src="images/a.jpg" width="10" height="10">"#);
//! create_test_jpeg(&site.config.source.join("images/a.jpg"), 40, 40);
//!
//! let report = build(&site.config, &BuildOptions::default()).unwrap();
//! ```

use crate::config::BuildConfig;
use image::{ImageEncoder, RgbImage, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Site fixture
// =========================================================================

/// A temp directory laid out as `<tmp>/src` and `<tmp>/dist`, with a default
/// config pointing at both.
pub struct SiteFixture {
    tmp: TempDir,
    pub config: BuildConfig,
}

impl SiteFixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let config = BuildConfig {
            source: tmp.path().join("src"),
            output: tmp.path().join("dist"),
            ..BuildConfig::default()
        };
        fs::create_dir_all(&config.source).unwrap();
        Self { tmp, config }
    }

    /// Write a text file under the source directory.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.config.source.join(rel);
        ensure_parent(&path);
        fs::write(path, contents).unwrap();
        self
    }

    /// The temp directory holding both `src` and `dist`.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a gradient JPEG at the encoder's default quality.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    create_test_jpeg_with_quality(path, width, height, 75);
}

/// Write a gradient JPEG at the given quality.
pub fn create_test_jpeg_with_quality(path: &Path, width: u32, height: u32, quality: u8) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    ensure_parent(path);
    let writer = std::io::BufWriter::new(fs::File::create(path).unwrap());
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write an RGBA PNG with a transparent left half.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 200, alpha])
    });
    ensure_parent(path);
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}
