//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, quality 90, RGB |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless, RGBA) |

use super::backend::{BackendError, ImageBackend};
use super::operations::flatten_for;
use super::params::{OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Extensions accepted as composite inputs and backgrounds.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("webp", ImageFormat::WebP),
];

/// Returns the image file extensions accepted as inputs.
pub fn supported_input_extensions() -> impl Iterator<Item = &'static str> {
    INPUT_CANDIDATES.iter().map(|(ext, _)| *ext)
}

/// Whether `path` has one of the supported input extensions (case-insensitive).
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| supported_input_extensions().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    jpeg_quality: Quality,
}

impl RustBackend {
    pub fn new() -> Self {
        Self {
            jpeg_quality: Quality::default(),
        }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn encode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Encode {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        let img = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| decode_error(path, e))?;
        Ok(img.into_rgba8())
    }

    fn save(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), BackendError> {
        let pixels = flatten_for(format, image);
        let writer = BufWriter::new(File::create(path)?);

        let encoded = match format {
            OutputFormat::Png => pixels.write_with_encoder(PngEncoder::new(writer)),
            OutputFormat::Jpg | OutputFormat::Jpeg => pixels.write_with_encoder(
                JpegEncoder::new_with_quality(writer, self.jpeg_quality.value()),
            ),
            OutputFormat::Webp => pixels.write_with_encoder(WebPEncoder::new_lossless(writer)),
        };

        encoded.map_err(|e| {
            // Do not leave a truncated file claiming the output name
            let _ = std::fs::remove_file(path);
            encode_error(path, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_corrupt_file, create_test_jpeg, create_test_png};
    use image::Rgba;

    #[test]
    fn supported_extensions_cover_ui_formats() {
        let exts: Vec<&str> = supported_input_extensions().collect();
        assert_eq!(exts, vec!["png", "jpg", "jpeg", "webp"]);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_supported_extension(Path::new("a/B.PNG")));
        assert!(has_supported_extension(Path::new("photo.JpEg")));
        assert!(!has_supported_extension(Path::new("notes.txt")));
        assert!(!has_supported_extension(Path::new("noext")));
    }

    #[test]
    fn load_png_as_rgba() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fg.png");
        create_test_png(&path, 20, 10, Rgba([10, 20, 30, 128]));

        let img = RustBackend::new().load(&path).unwrap();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(3, 3), &Rgba([10, 20, 30, 128]));
    }

    #[test]
    fn load_jpeg_gets_opaque_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bg.jpg");
        create_test_jpeg(&path, 32, 24);

        let img = RustBackend::new().load(&path).unwrap();
        assert_eq!(img.dimensions(), (32, 24));
        assert!(img.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn load_corrupt_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        create_corrupt_file(&path);

        let err = RustBackend::new().load(&path).unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[test]
    fn load_nonexistent_file_errors() {
        let result = RustBackend::new().load(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn save_png_preserves_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 2, Rgba([200, 100, 50, 77]));

        let backend = RustBackend::new();
        backend.save(&img, &path, OutputFormat::Png).unwrap();

        let back = backend.load(&path).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn save_webp_preserves_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.webp");
        let mut img = RgbaImage::from_pixel(6, 5, Rgba([255, 255, 255, 0]));
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(5, 4, Rgba([90, 80, 70, 200]));

        let backend = RustBackend::new();
        backend.save(&img, &path, OutputFormat::Webp).unwrap();

        let back = backend.load(&path).unwrap();
        assert_eq!(back.get_pixel(0, 0)[3], 4);
        assert_eq!(back.get_pixel(5, 4), &Rgba([90, 80, 70, 200]));
        assert_eq!(back.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn save_jpeg_with_alpha_succeeds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = RustBackend::new();
        let img = RgbaImage::from_pixel(16, 16, Rgba([10, 200, 30, 40]));

        for (name, format) in [("a.jpg", OutputFormat::Jpg), ("b.jpeg", OutputFormat::Jpeg)] {
            let path = tmp.path().join(name);
            backend.save(&img, &path, format).unwrap();
            let back = backend.load(&path).unwrap();
            assert_eq!(back.dimensions(), (16, 16));
            assert!(back.pixels().all(|p| p[3] == 255));
        }
    }

    #[test]
    fn save_into_missing_directory_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("missing/out.png");
        let result = RustBackend::new().save(&RgbaImage::new(1, 1), &path, OutputFormat::Png);
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
