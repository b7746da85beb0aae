//! Build configuration.
//!
//! Handles loading, validating, and merging `sitebake.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to override.
//!
//! ## Config File Location
//!
//! `sitebake.toml` is looked up in the working directory unless `--config`
//! names a file explicitly. Paths inside it are relative to the working
//! directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source = "src"                 # Site sources
//! output = "dist"                # Build output
//! pages = ["index.html"]         # Root documents, relative to source
//! components_dir = "components"  # <component src="..."> lookups
//! assets_dir = "assets"          # Copied verbatim
//! images_dir = "images"          # Re-encoded unless already resized
//! root_files = ["styles.css", "script.js"]
//!
//! [minify]
//! enabled = true
//! minify_css = true              # Inline <style> and style="" attributes
//! minify_js = true               # Inline <script>
//! keep_comments = false
//!
//! [images]
//! jpeg_quality = 75              # 1-100
//! png_compression = "best"       # fast | default | best
//! compress_unreferenced = true   # Re-encode images_dir files not resized
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name looked up when no explicit `--config` is given.
pub const CONFIG_FILE_NAME: &str = "sitebake.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `sitebake.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory holding the site sources.
    pub source: PathBuf,
    /// Directory the build writes into.
    pub output: PathBuf,
    /// Root HTML documents to compose, relative to `source`.
    pub pages: Vec<String>,
    /// Directory (under `source`) that component fragments are read from.
    pub components_dir: String,
    /// Directory (under `source`) copied verbatim.
    pub assets_dir: String,
    /// Directory (under `source`) whose images are compressed.
    pub images_dir: String,
    /// Individual files at the source root copied verbatim.
    pub root_files: Vec<String>,
    pub minify: MinifyConfig,
    pub images: ImagesConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src"),
            output: PathBuf::from("dist"),
            pages: vec!["index.html".to_string()],
            components_dir: "components".to_string(),
            assets_dir: "assets".to_string(),
            images_dir: "images".to_string(),
            root_files: vec!["styles.css".to_string(), "script.js".to_string()],
            minify: MinifyConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages.is_empty() {
            return Err(ConfigError::Validation("pages must not be empty".into()));
        }
        for page in &self.pages {
            if !is_contained_relative(Path::new(page)) {
                return Err(ConfigError::Validation(format!(
                    "page '{page}' must be a relative path inside the source directory"
                )));
            }
        }
        for (key, dir) in [
            ("components_dir", &self.components_dir),
            ("assets_dir", &self.assets_dir),
            ("images_dir", &self.images_dir),
        ] {
            if !is_contained_relative(Path::new(dir)) {
                return Err(ConfigError::Validation(format!(
                    "{key} '{dir}' must be a relative path inside the source directory"
                )));
            }
        }
        self.validate_output_location()?;
        self.images.validate()
    }

    /// The output must be neither the source directory nor inside one of the
    /// directories the build reads from while writing.
    fn validate_output_location(&self) -> Result<(), ConfigError> {
        let source = resolve_path(&self.source);
        let output = resolve_path(&self.output);
        if source == output {
            return Err(ConfigError::Validation(
                "source and output must be different directories".into(),
            ));
        }
        for (key, dir) in [
            ("components_dir", &self.components_dir),
            ("assets_dir", &self.assets_dir),
            ("images_dir", &self.images_dir),
        ] {
            if output.starts_with(resolve_path(&self.source.join(dir))) {
                return Err(ConfigError::Validation(format!(
                    "output must not be inside the source {key} '{dir}'"
                )));
            }
        }
        Ok(())
    }
}

/// HTML minification settings, forwarded to `minify_html::Cfg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinifyConfig {
    /// When false, composed markup is written unchanged.
    pub enabled: bool,
    /// Minify `<style>` contents and `style` attributes.
    pub minify_css: bool,
    /// Minify `<script>` contents.
    pub minify_js: bool,
    pub keep_comments: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minify_css: true,
            minify_js: true,
            keep_comments: false,
        }
    }
}

/// PNG encoder effort. PNG is lossless, so this trades build time for size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

/// Image encoding settings.
///
/// Only JPEG and PNG sources are re-encoded by the compression step; other
/// formats are copied verbatim unless a page asks for a resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
    pub png_compression: PngCompression,
    /// Re-encode images in `images_dir` that were not resized. When false they
    /// are copied verbatim.
    pub compress_unreferenced: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 75,
            png_compression: PngCompression::Best,
            compress_unreferenced: true,
        }
    }
}

impl ImagesConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(
                "images.jpeg_quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// True when `path` is relative and never climbs above its base.
pub(crate) fn is_contained_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Drop `.` components and fold `..` into its parent, without touching the
/// filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let after_name = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if after_name {
                    out.pop();
                } else if !at_root {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Absolute, normalized form of `path` with symlinks resolved as far as the
/// path exists. Missing trailing components are appended as written.
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let normal = normalize_lexically(&absolute);

    let mut existing = normal.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return normal,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BuildConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. The file must exist.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `sitebake.toml` from `dir`, falling back to stock defaults when absent.
pub fn load_config_or_default(dir: &Path) -> Result<BuildConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        load_config(&path)
    } else {
        resolve_config(None)
    }
}

/// Returns a fully-commented stock `sitebake.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitebake configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Directory holding the site sources.
source = "src"

# Directory the build writes into.
output = "dist"

# Root HTML documents, relative to `source`. Each one has its
# <component src="..."></component> placeholders inlined, is minified,
# and is scanned for <img> tags carrying width and height.
pages = ["index.html"]

# Component fragments are read from here (relative to `source`).
components_dir = "components"

# Copied verbatim to the same path under `output`.
assets_dir = "assets"

# Every image in here is re-encoded unless a page already resized it.
images_dir = "images"

# Loose files at the source root that are copied verbatim.
root_files = ["styles.css", "script.js"]

# ---------------------------------------------------------------------------
# HTML minification
# ---------------------------------------------------------------------------
[minify]
enabled = true

# Minify inline <style> blocks and style="" attributes.
minify_css = true

# Minify inline <script> blocks.
minify_js = true

keep_comments = false

# ---------------------------------------------------------------------------
# Image encoding
# ---------------------------------------------------------------------------
[images]
# JPEG quality (1 = worst, 100 = best).
jpeg_quality = 75

# PNG is lossless; this only trades build time for file size.
# One of: "fast", "default", "best".
png_compression = "best"

# Re-encode images that no page resized. When false they are copied as-is.
compress_unreferenced = true
"##
}
