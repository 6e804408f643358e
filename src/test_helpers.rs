//! Shared test utilities for the snapback test suite.
//!
//! Synthetic fixtures only: every image is generated on the fly inside a
//! `TempDir`, so tests never depend on checked-in binaries.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_png(&tmp.path().join("bg.png"), 100, 80, Rgba([0, 0, 255, 255]));
//! create_corrupt_file(&tmp.path().join("broken.jpg"));
//! ```

use image::{ImageEncoder, Rgba, RgbImage, RgbaImage};
use std::path::Path;

// =========================================================================
// Fixture writers
// =========================================================================

/// Write a solid-color RGBA PNG.
pub fn create_test_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    ensure_parent(path);
    RgbaImage::from_pixel(width, height, color)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a gradient RGB JPEG.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a file with an image extension but garbage content.
pub fn create_corrupt_file(path: &Path) {
    ensure_parent(path);
    std::fs::write(path, b"this is definitely not an image").unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

// =========================================================================
// Directory inspection
// =========================================================================

/// Sorted file names in a directory. Panics if the directory is unreadable.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
