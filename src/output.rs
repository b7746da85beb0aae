//! CLI output formatting for the build and check commands.
//!
//! Output is grouped by what the build produced, with each entity on a
//! numbered header line and its details on indented lines below it.
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 index.html (1.9 KB → 1.2 KB)
//!     Components: header.html, footer.html
//!
//! Images
//! 001 images/hero.jpg: resized 4000x3000 → 800x600 (2.1 MB → 96.4 KB)
//! 002 images/logo.png: compressed (12.0 KB → 9.3 KB)
//! 003 images/icon.svg: copied
//!
//! Assets
//!     assets/fonts/inter.woff2
//!     styles.css
//!
//! Skipped
//!     images/old.jpg: not found
//!
//! Built 1 page, 3 images, 2 assets
//! ```
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 index.html (1.9 KB → 1.2 KB)
//!
//! Images
//! 001 images/hero.jpg at 800x600
//! 002 images/old.jpg at 64x64
//!     Problem: not found
//!
//! Checked 1 page, 2 images, 1 problem
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::pipeline::{BuildReport, CheckReport, PageReport};
use crate::types::{ImageAction, ImageOutcome};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count, binary units, one decimal place above bytes.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn size_change(before: u64, after: u64) -> String {
    format!("{} \u{2192} {}", format_bytes(before), format_bytes(after))
}

/// `"1 page"` / `"2 pages"`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn page_lines(pages: &[PageReport], lines: &mut Vec<String>) {
    lines.push("Pages".to_string());
    for (i, page) in pages.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            page.page,
            size_change(page.composed_bytes, page.output_bytes)
        ));
        if !page.components.is_empty() {
            lines.push(format!(
                "{}Components: {}",
                indent(1),
                page.components.join(", ")
            ));
        }
    }
}

fn image_line(index: usize, outcome: &ImageOutcome) -> String {
    let detail = match &outcome.action {
        ImageAction::Resized { from, to } => format!(
            "resized {}x{} \u{2192} {}x{} ({})",
            from.0,
            from.1,
            to.0,
            to.1,
            size_change(outcome.source_bytes, outcome.output_bytes)
        ),
        ImageAction::Compressed => format!(
            "compressed ({})",
            size_change(outcome.source_bytes, outcome.output_bytes)
        ),
        ImageAction::Copied => "copied".to_string(),
    };
    format!("{} {}: {}", format_index(index), outcome.path, detail)
}

pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    page_lines(&report.pages, &mut lines);

    let images: Vec<&ImageOutcome> = report.resized.iter().chain(&report.images).collect();
    if !images.is_empty() {
        lines.push(String::new());
        lines.push("Images".to_string());
        for (i, outcome) in images.iter().enumerate() {
            lines.push(image_line(i + 1, outcome));
        }
    }

    if !report.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &report.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                skipped.path,
                skipped.reason.describe()
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {}",
        plural(report.pages.len(), "page"),
        plural(images.len(), "image"),
        plural(report.assets.len(), "asset")
    ));

    lines
}

/// Print build output to stdout.
pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    page_lines(&report.pages, &mut lines);

    if !report.images.is_empty() {
        lines.push(String::new());
        lines.push("Images".to_string());
        for (i, image) in report.images.iter().enumerate() {
            lines.push(format!(
                "{} {} at {}x{}",
                format_index(i + 1),
                image.src,
                image.width,
                image.height
            ));
            if let Some(problem) = report.problems.iter().find(|p| p.path == image.src) {
                lines.push(format!("{}Problem: {}", indent(1), problem.reason.describe()));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {}, {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.images.len(), "image"),
        plural(report.problems.len(), "problem")
    ));

    lines
}

/// Print check output to stdout.
pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageRef, SkipReason, SkippedImage};

    fn page(name: &str, components: &[&str]) -> PageReport {
        PageReport {
            page: name.to_string(),
            components: components.iter().map(|c| c.to_string()).collect(),
            composed_bytes: 2048,
            output_bytes: 1536,
        }
    }

    fn outcome(path: &str, action: ImageAction, source: u64, output: u64) -> ImageOutcome {
        ImageOutcome {
            path: path.to_string(),
            action,
            source_bytes: source,
            output_bytes: output,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0, "page"), "0 pages");
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(3, "asset"), "3 assets");
    }

    // =========================================================================
    // Build
    // =========================================================================

    #[test]
    fn build_report_sections() {
        let report = BuildReport {
            pages: vec![page("index.html", &["header.html", "footer.html"])],
            resized: vec![outcome(
                "images/hero.jpg",
                ImageAction::Resized {
                    from: (4000, 3000),
                    to: (800, 600),
                },
                2 * 1024 * 1024,
                100 * 1024,
            )],
            skipped: vec![SkippedImage {
                path: "images/old.jpg".into(),
                reason: SkipReason::Missing,
            }],
            assets: vec!["styles.css".into()],
            images: vec![
                outcome("images/logo.png", ImageAction::Compressed, 2048, 1024),
                outcome("images/icon.svg", ImageAction::Copied, 10, 10),
            ],
        };

        let lines = format_build_report(&report);

        assert_eq!(
            lines,
            vec![
                "Pages",
                "001 index.html (2.0 KB \u{2192} 1.5 KB)",
                "    Components: header.html, footer.html",
                "",
                "Images",
                "001 images/hero.jpg: resized 4000x3000 \u{2192} 800x600 (2.0 MB \u{2192} 100.0 KB)",
                "002 images/logo.png: compressed (2.0 KB \u{2192} 1.0 KB)",
                "003 images/icon.svg: copied",
                "",
                "Assets",
                "    styles.css",
                "",
                "Skipped",
                "    images/old.jpg: not found",
                "",
                "Built 1 page, 3 images, 1 asset",
            ]
        );
    }

    #[test]
    fn build_report_omits_empty_sections() {
        let report = BuildReport {
            pages: vec![page("index.html", &[])],
            ..BuildReport::default()
        };

        let lines = format_build_report(&report);

        assert_eq!(
            lines,
            vec![
                "Pages",
                "001 index.html (2.0 KB \u{2192} 1.5 KB)",
                "",
                "Built 1 page, 0 images, 0 assets",
            ]
        );
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_report_marks_problems_under_their_image() {
        let report = CheckReport {
            pages: vec![page("index.html", &[])],
            images: vec![
                ImageRef {
                    src: "images/hero.jpg".into(),
                    width: 800,
                    height: 600,
                },
                ImageRef {
                    src: "images/old.jpg".into(),
                    width: 64,
                    height: 64,
                },
            ],
            problems: vec![SkippedImage {
                path: "images/old.jpg".into(),
                reason: SkipReason::Missing,
            }],
        };

        let lines = format_check_report(&report);

        assert_eq!(
            lines[3..],
            [
                "Images",
                "001 images/hero.jpg at 800x600",
                "002 images/old.jpg at 64x64",
                "    Problem: not found",
                "",
                "Checked 1 page, 2 images, 1 problem",
            ]
        );
    }
}
