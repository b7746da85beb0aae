//! # sitebake
//!
//! Asset build for small hand-written static sites. One HTML page (or a few),
//! a directory of reusable fragments, and a pile of images go in; a minified,
//! self-contained `dist/` comes out.
//!
//! # Architecture: One Pass, Five Steps
//!
//! ```text
//! 1. Compose   index.html + components/  →  one HTML document
//! 2. Minify    HTML                      →  smaller HTML
//! 3. Resize    <img width height>        →  dist/<src> at exactly that size
//! 4. Assets    assets/, styles.css, ...  →  dist/ (verbatim)
//! 5. Compress  images/                   →  dist/images/ (re-encoded)
//! ```
//!
//! The steps run in order inside [`pipeline::build`]. The resize step hands
//! the set of paths it wrote to the later steps, which leave those files
//! alone; a resized image is never replaced by its full-size original.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Runs the steps in order; `build` and `check` entry points |
//! | [`compose`] | Replaces `<component src>` placeholders with fragment files |
//! | [`minify`] | HTML minification via `minify-html` |
//! | [`scan`] | Finds `<img>` tags that carry both `width` and `height` |
//! | [`process`] | Resize step and compress step over an [`imaging::ImageBackend`] |
//! | [`imaging`] | Pure-Rust image operations: identify, resize, re-encode |
//! | [`assets`] | Verbatim copying of the assets directory and root files |
//! | [`config`] | `sitebake.toml` loading, stock defaults, validation |
//! | [`types`] | Report types shared between steps |
//! | [`output`] | CLI output formatting |
//! | [`logger`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Dimensions Come From the Markup
//!
//! The page is the source of truth for how large an image is displayed. An
//! `<img src="images/hero.jpg" width="800" height="600">` produces a
//! `dist/images/hero.jpg` that is exactly 800x600, cropped from the center
//! when the aspect ratio differs. There is no separate size manifest to keep
//! in sync with the HTML.
//!
//! ## Scan After Minifying
//!
//! Images are found in the minified document, which is exactly what ships.
//! The tag scanner therefore accepts unquoted attribute values and any
//! attribute order, since the minifier drops quotes where it can.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling and the
//! built-in JPEG/PNG encoders). No system libraries are needed, so the
//! binary runs anywhere it compiles.

pub mod assets;
pub mod compose;
pub mod config;
pub mod imaging;
pub mod logger;
pub mod minify;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
