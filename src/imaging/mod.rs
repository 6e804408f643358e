//! Image compositing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` → RGBA8 |
//! | **Canvas resize** | `imageops::resize` (Catmull-Rom) |
//! | **Foreground resize** | `imageops::resize` (Lanczos3) |
//! | **Paste** | `imageops::overlay` (alpha-masked, crops at the edges) |
//! | **Encode** | PNG / WebP lossless keep alpha; JPEG is flattened to RGB |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for size and position math (unit testable)
//! - **Parameters**: Value types describing a composite
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] for file I/O
//! - **Operations**: Pixel work combining calculations with `imageops`

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    MAX_PIXELS, calculate_scaled_dimensions, compute_position, resolve_size, within_pixel_budget,
};
pub use operations::{composite, flatten_for, prepare_canvas, render, resize_relative};
pub use params::{Alignment, OutputFormat, OutputSize, Scale, SizePreset};
pub use rust_backend::{RustBackend, has_supported_extension, supported_input_extensions};
