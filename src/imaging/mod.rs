//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | `resize_to_fill` + Lanczos3, re-encoded in the source format |
//! | **Compress** | decode + re-encode (JPEG quality, PNG effort) |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Planning from paths and config, plus execution

pub mod backend;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use rust_backend::RustBackend;
pub use operations::{
    compress_image, encoding_for, get_dimensions, plan_compress, plan_resize, resize_image,
};
pub use params::{CompressParams, Encoding, Quality, ResizeParams};
