//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations that touch the
//! filesystem: decoding an image into an RGBA raster and encoding a raster to
//! disk. Everything in between (resize, placement, paste) is pure pixel work in
//! [`operations`](super::operations) and does not go through the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests swap in a mock that
//! serves in-memory images and injects failures.

use super::params::OutputFormat;
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("{width}x{height} image exceeds the {limit} pixel limit")]
    TooLarge { width: u32, height: u32, limit: u64 },
}

/// Trait for image I/O backends.
///
/// `Sync` so a backend can be shared across the worker pool.
pub trait ImageBackend: Sync {
    /// Decode an image file into an RGBA raster.
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode `image` to `path` in `format`.
    ///
    /// Formats without alpha support receive a flattened copy; callers never
    /// need to strip alpha themselves.
    fn save(&self, image: &RgbaImage, path: &Path, format: OutputFormat)
    -> Result<(), BackendError>;
}
