//! Types shared by the build steps and the report they produce.
//!
//! Everything here serializes to the JSON build report, so paths are kept as
//! `/`-separated strings relative to the source (or output) root.

use serde::Serialize;

/// An `<img>` that asks for a specific rendered size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageRef {
    /// Site-root relative path, query and fragment stripped.
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// What happened to one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageAction {
    /// Resized to the dimensions a page asked for.
    Resized {
        from: (u32, u32),
        to: (u32, u32),
    },
    /// Re-encoded at its own size.
    Compressed,
    /// Written byte-for-byte, either because the format is not re-encoded or
    /// because re-encoding came out larger.
    Copied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutcome {
    pub path: String,
    pub action: ImageAction,
    pub source_bytes: u64,
    pub output_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Referenced by a page but not present under the source directory.
    Missing,
    /// Not a format the backend can decode and encode.
    Unsupported,
    /// Resolves outside the source directory.
    OutsideSource,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::Missing => "not found",
            SkipReason::Unsupported => "unsupported image format",
            SkipReason::OutsideSource => "outside the source directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub path: String,
    pub reason: SkipReason,
}
