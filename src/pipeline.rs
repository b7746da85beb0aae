//! The build, end to end.
//!
//! ```text
//! 1. Compose   pages + components/  →  composed HTML
//! 2. Minify    composed HTML        →  minified HTML
//! 3. Resize    <img width height>   →  dist/<src> at that size; pages written
//! 4. Assets    assets/, root files  →  dist/ (verbatim)
//! 5. Compress  images/              →  dist/images/ (what step 3 left)
//! ```
//!
//! Every step runs once, in order, in-process. Nothing is cached between
//! runs; a file written by an earlier step is never overwritten by a later one
//! in the same run.

use crate::assets::{AssetError, copy_assets};
use crate::compose::{ComposeError, compose_page};
use crate::config::BuildConfig;
use crate::imaging::{ImageBackend, RustBackend, encoding_for};
use crate::minify::minify_html;
use crate::process::{
    ProcessError, compress_remaining_with_backend, resize_referenced_with_backend, resolve_ref,
};
use crate::scan::{dedupe_refs, find_sized_images};
use crate::types::{ImageOutcome, ImageRef, SkipReason, SkippedImage};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("page {} not found", .0.display())]
    PageNotFound(PathBuf),
    #[error("{page}: {source}")]
    Compose {
        page: String,
        #[source]
        source: ComposeError,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("refusing to clean {}: it contains the source directory", .0.display())]
    UnsafeClean(PathBuf),
}

/// Per-run switches that do not belong in the config file.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Remove the output directory before building.
    pub clean: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page: String,
    /// Component names in document order.
    pub components: Vec<String>,
    pub composed_bytes: u64,
    pub output_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    /// Images resized to the dimensions a page asked for.
    pub resized: Vec<ImageOutcome>,
    /// References that could not be resized.
    pub skipped: Vec<SkippedImage>,
    /// Asset and root files copied verbatim.
    pub assets: Vec<String>,
    /// Images directory files compressed or copied.
    pub images: Vec<ImageOutcome>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub pages: Vec<PageReport>,
    /// Unique sized-image references across all pages.
    pub images: Vec<ImageRef>,
    /// References a build would skip.
    pub problems: Vec<SkippedImage>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// A composed and minified page, not yet written.
struct RenderedPage {
    report: PageReport,
    html: String,
}

fn render_pages(config: &BuildConfig) -> Result<Vec<RenderedPage>, BuildError> {
    let components_dir = config.source.join(&config.components_dir);
    let mut rendered = Vec::with_capacity(config.pages.len());

    for page in &config.pages {
        let path = config.source.join(page);
        if !path.is_file() {
            return Err(BuildError::PageNotFound(path));
        }
        let html = fs::read_to_string(&path)?;

        let composed = compose_page(&html, &components_dir).map_err(|source| {
            BuildError::Compose {
                page: page.clone(),
                source,
            }
        })?;
        let minified = minify_html(&composed.html, &config.minify);
        tracing::debug!(
            "{}: {} components, {} -> {} bytes",
            page,
            composed.components.len(),
            composed.html.len(),
            minified.len()
        );

        rendered.push(RenderedPage {
            report: PageReport {
                page: page.clone(),
                components: composed.components,
                composed_bytes: composed.html.len() as u64,
                output_bytes: minified.len() as u64,
            },
            html: minified,
        });
    }

    Ok(rendered)
}

fn sized_images(pages: &[RenderedPage]) -> Vec<ImageRef> {
    dedupe_refs(pages.iter().flat_map(|p| find_sized_images(&p.html)))
}

/// Remove the output directory, refusing when that would take the sources
/// with it.
fn clean_output(config: &BuildConfig) -> Result<(), BuildError> {
    if !config.output.exists() {
        return Ok(());
    }
    let output = config.output.canonicalize()?;
    let source = config.source.canonicalize()?;
    if source.starts_with(&output) {
        return Err(BuildError::UnsafeClean(config.output.clone()));
    }
    tracing::info!("Cleaning {}", config.output.display());
    fs::remove_dir_all(&output)?;
    Ok(())
}

fn write_page(output_root: &Path, page: &str, html: &str) -> Result<(), std::io::Error> {
    let path = output_root.join(page);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, html)
}

pub fn build(config: &BuildConfig, options: &BuildOptions) -> Result<BuildReport, BuildError> {
    build_with_backend(&RustBackend::new(), config, options)
}

/// Run the full build using a specific image backend.
pub fn build_with_backend(
    backend: &impl ImageBackend,
    config: &BuildConfig,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    if options.clean {
        clean_output(config)?;
    }
    fs::create_dir_all(&config.output)?;

    let pages = render_pages(config)?;
    let refs = sized_images(&pages);

    let resized = resize_referenced_with_backend(
        backend,
        &refs,
        &config.source,
        &config.output,
        &config.images,
    )?;
    for page in &pages {
        write_page(&config.output, &page.report.page, &page.html)?;
    }

    let handled = resized.handled();
    let assets = copy_assets(config, &handled)?;
    let images = compress_remaining_with_backend(
        backend,
        &config.images_dir,
        &config.source,
        &config.output,
        &handled,
        &config.images,
    )?;

    Ok(BuildReport {
        pages: pages.into_iter().map(|p| p.report).collect(),
        resized: resized.outcomes,
        skipped: resized.skipped,
        assets,
        images,
    })
}

/// Compose, minify, and scan every page without writing anything.
///
/// Missing pages and components are errors, as in a build. Image references
/// a build would skip are collected as problems.
pub fn check(config: &BuildConfig) -> Result<CheckReport, BuildError> {
    let pages = render_pages(config)?;
    let images = sized_images(&pages);

    let problems = images
        .iter()
        .filter_map(|image| {
            let reason = match resolve_ref(image, &config.source) {
                Err(reason) => reason,
                Ok(source) if encoding_for(&source, &config.images).is_none() => {
                    SkipReason::Unsupported
                }
                Ok(_) => return None,
            };
            Some(SkippedImage {
                path: image.src.clone(),
                reason,
            })
        })
        .collect();

    Ok(CheckReport {
        pages: pages.into_iter().map(|p| p.report).collect(),
        images,
        problems,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::Dimensions;
    use crate::test_helpers::{SiteFixture, create_test_jpeg};
    use crate::types::ImageAction;

    fn mock_with(count: usize) -> MockBackend {
        MockBackend::with_dimensions(vec![
            Dimensions {
                width: 400,
                height: 300
            };
            count
        ])
    }

    #[test]
    fn build_runs_every_step() {
        let site = SiteFixture::new()
            .file(
                "index.html",
                r#"<html><body>
                    <component src="header.html"></component>
                    <img src="images/hero.jpg" width="200" height="100" alt="hero">
                </body></html>"#,
            )
            .file("components/header.html", "<header>  <!-- c -->  Site </header>")
            .file("images/hero.jpg", "jpeg-bytes")
            .file("images/other.jpg", "other-jpeg-bytes")
            .file("assets/font.woff2", "font")
            .file("styles.css", "body{}");
        let backend = mock_with(1);

        let report =
            build_with_backend(&backend, &site.config, &BuildOptions::default()).unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].components, vec!["header.html"]);
        assert!(report.pages[0].output_bytes < report.pages[0].composed_bytes);

        assert_eq!(report.resized.len(), 1);
        assert_eq!(report.resized[0].path, "images/hero.jpg");
        assert!(matches!(
            report.resized[0].action,
            ImageAction::Resized { to: (200, 100), .. }
        ));

        assert_eq!(report.assets, vec!["assets/font.woff2", "styles.css"]);

        // hero.jpg was resized, so only other.jpg goes through compression
        let compressed: Vec<&str> = report.images.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(compressed, vec!["images/other.jpg"]);

        let html = fs::read_to_string(site.config.output.join("index.html")).unwrap();
        assert!(html.contains("<header>"));
        assert!(!html.contains("component"));
        assert!(!html.contains("<!--"));

        let ops = backend.get_operations();
        assert!(matches!(&ops[1], RecordedOp::Resize { width: 200, height: 100, .. }));
        assert!(matches!(&ops[2], RecordedOp::Compress { source, .. } if source.ends_with("other.jpg")));
    }

    #[test]
    fn build_with_multiple_pages_dedupes_images() {
        let site = SiteFixture::new()
            .file("index.html", r#"<img src="images/a.jpg" width="10" height="10">"#)
            .file("about/index.html", r#"<img src="/images/a.jpg" width="10" height="10">"#)
            .file("images/a.jpg", "jpeg");
        let mut config = site.config.clone();
        config.pages = vec!["index.html".into(), "about/index.html".into()];
        let backend = mock_with(2);

        let report = build_with_backend(&backend, &config, &BuildOptions::default()).unwrap();

        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.resized.len(), 1);
        assert!(config.output.join("about/index.html").is_file());
    }

    #[test]
    fn build_reports_missing_images_without_failing() {
        let site = SiteFixture::new()
            .file("index.html", r#"<img src="images/nope.jpg" width="10" height="10">"#);
        let backend = MockBackend::new();

        let report =
            build_with_backend(&backend, &site.config, &BuildOptions::default()).unwrap();

        assert!(report.resized.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::Missing);
    }

    #[test]
    fn missing_page_is_error() {
        let site = SiteFixture::new();
        let result = build_with_backend(&MockBackend::new(), &site.config, &BuildOptions::default());
        assert!(matches!(result, Err(BuildError::PageNotFound(_))));
    }

    #[test]
    fn missing_component_names_the_page() {
        let site =
            SiteFixture::new().file("index.html", r#"<component src="gone.html"></component>"#);
        let result = build_with_backend(&MockBackend::new(), &site.config, &BuildOptions::default());

        match result {
            Err(BuildError::Compose { page, .. }) => assert_eq!(page, "index.html"),
            other => panic!("expected compose error, got {other:?}"),
        }
    }

    #[test]
    fn clean_removes_stale_output() {
        let site = SiteFixture::new().file("index.html", "<p>hi</p>");
        let stale = site.config.output.join("old.html");
        fs::create_dir_all(&site.config.output).unwrap();
        fs::write(&stale, "stale").unwrap();

        build_with_backend(
            &MockBackend::new(),
            &site.config,
            &BuildOptions { clean: true },
        )
        .unwrap();

        assert!(!stale.exists());
        assert!(site.config.output.join("index.html").is_file());
    }

    #[test]
    fn clean_refuses_output_containing_source() {
        let site = SiteFixture::new().file("index.html", "<p>hi</p>");
        let mut config = site.config.clone();
        config.output = site.root().to_path_buf();

        let result = build_with_backend(&MockBackend::new(), &config, &BuildOptions { clean: true });
        assert!(matches!(result, Err(BuildError::UnsafeClean(_))));
        assert!(config.source.join("index.html").is_file());
    }

    #[test]
    fn dot_and_escaped_sources_keep_their_resized_output() {
        let site = SiteFixture::new().file(
            "index.html",
            concat!(
                r#"<img src="./images/hero.jpg" width="20" height="10">"#,
                r#"<img src="images/./thumb.jpg" width="8" height="8">"#,
                r#"<img src="images/my%20photo.jpg" width="12" height="6">"#,
            ),
        );
        for name in ["hero.jpg", "thumb.jpg", "my photo.jpg"] {
            create_test_jpeg(&site.config.source.join("images").join(name), 200, 100);
        }

        let report = build(&site.config, &BuildOptions::default()).unwrap();

        let resized: Vec<&str> = report.resized.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(
            resized,
            vec!["images/hero.jpg", "images/thumb.jpg", "images/my photo.jpg"]
        );
        assert!(report.skipped.is_empty());
        // Nothing left for the compress step to overwrite
        assert!(report.images.is_empty());

        let dist = &site.config.output;
        assert_eq!(image::image_dimensions(dist.join("images/hero.jpg")).unwrap(), (20, 10));
        assert_eq!(image::image_dimensions(dist.join("images/thumb.jpg")).unwrap(), (8, 8));
        assert_eq!(
            image::image_dimensions(dist.join("images/my photo.jpg")).unwrap(),
            (12, 6)
        );
    }

    #[test]
    fn check_reports_problems_without_writing() {
        let site = SiteFixture::new()
            .file(
                "index.html",
                concat!(
                    r#"<img src="images/ok.jpg" width="10" height="10">"#,
                    r#"<img src="images/missing.jpg" width="10" height="10">"#,
                    r#"<img src="images/logo.svg" width="10" height="10">"#,
                ),
            )
            .file("images/logo.svg", "<svg/>");
        create_test_jpeg(&site.config.source.join("images/ok.jpg"), 20, 20);

        let report = check(&site.config).unwrap();

        assert_eq!(report.images.len(), 3);
        let problems: Vec<(&str, SkipReason)> = report
            .problems
            .iter()
            .map(|p| (p.path.as_str(), p.reason))
            .collect();
        assert_eq!(
            problems,
            vec![
                ("images/missing.jpg", SkipReason::Missing),
                ("images/logo.svg", SkipReason::Unsupported),
            ]
        );
        assert!(!report.is_clean());
        assert!(!site.config.output.exists());
    }
}
