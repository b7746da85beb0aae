//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the build needs:
//! identify, resize, and compress. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{CompressParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Implementations write the output file themselves and create its parent
/// directory when missing.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize to exactly the requested dimensions and encode.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Re-encode without changing dimensions.
    fn compress(&self, params: &CompressParams) -> Result<(), BackendError>;
}
