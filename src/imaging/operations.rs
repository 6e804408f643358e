//! High-level image operations.
//!
//! These functions combine calculations with pixel work. Every operation
//! returns a new raster; inputs are never modified in place, so a prepared
//! canvas can be reused for any number of composites.
//!
//! Resizes are checked against [`MAX_PIXELS`] before anything is allocated.
//! An oversized target is a [`BackendError::TooLarge`], never an allocation
//! failure.

use super::backend::BackendError;
use super::calculations::{
    MAX_PIXELS, calculate_scaled_dimensions, compute_position, within_pixel_budget,
};
use super::params::{Alignment, OutputFormat, OutputSize, Scale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Resampling filter for foregrounds.
const FOREGROUND_FILTER: FilterType = FilterType::Lanczos3;

/// Resampling filter for stretching the background to the canvas size.
const CANVAS_FILTER: FilterType = FilterType::CatmullRom;

/// Produce a copy of `image` scaled by `scale` relative to its own size.
///
/// An identity scale returns an exact copy.
pub fn resize_relative(image: &RgbaImage, scale: Scale) -> Result<RgbaImage, BackendError> {
    let (w, h) = calculate_scaled_dimensions(image.dimensions(), scale);
    if (w, h) == image.dimensions() {
        return Ok(image.clone());
    }
    check_budget((w, h))?;
    Ok(imageops::resize(image, w, h, FOREGROUND_FILTER))
}

/// Resize the background to the output canvas size.
///
/// Returns a copy at native size for [`SizePreset::SameAsBackground`](super::SizePreset)
/// or whenever the resolved size equals the native one.
pub fn prepare_canvas(
    background: &RgbaImage,
    size: &OutputSize,
) -> Result<RgbaImage, BackendError> {
    let (w, h) = size.resolve(background.dimensions());
    if (w, h) == background.dimensions() {
        return Ok(background.clone());
    }
    check_budget((w, h))?;
    Ok(imageops::resize(background, w, h, CANVAS_FILTER))
}

fn check_budget((width, height): (u32, u32)) -> Result<(), BackendError> {
    if within_pixel_budget((width, height)) {
        Ok(())
    } else {
        Err(BackendError::TooLarge {
            width,
            height,
            limit: MAX_PIXELS,
        })
    }
}

/// Paste `foreground` onto a copy of `canvas` at the aligned position.
///
/// The foreground's alpha is used as the paste mask. Parts that fall outside
/// the canvas are cropped silently.
pub fn composite(canvas: &RgbaImage, foreground: &RgbaImage, alignment: Alignment) -> RgbaImage {
    let (x, y) = compute_position(canvas.dimensions(), foreground.dimensions(), alignment);
    let mut out = canvas.clone();
    imageops::overlay(&mut out, foreground, x, y);
    out
}

/// Scale a foreground and paste it onto a copy of the canvas.
pub fn render(
    canvas: &RgbaImage,
    foreground: &RgbaImage,
    scale: Scale,
    alignment: Alignment,
) -> Result<RgbaImage, BackendError> {
    let scaled = resize_relative(foreground, scale)?;
    Ok(composite(canvas, &scaled, alignment))
}

/// Convert a composite into the pixel layout `format` can store.
///
/// Formats without alpha get an opaque RGB copy (alpha is dropped, not
/// blended against a matte); the rest keep RGBA.
pub fn flatten_for(format: OutputFormat, image: &RgbaImage) -> DynamicImage {
    let dynamic = DynamicImage::ImageRgba8(image.clone());
    if format.supports_alpha() {
        dynamic
    } else {
        DynamicImage::ImageRgb8(dynamic.into_rgb8())
    }
}
