//! Pure calculation functions for canvas size and foreground placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Alignment, Scale, SizePreset};

/// Resolve the output canvas size for a preset.
///
/// Never fails: an unusable custom size degrades to the background's native size.
///
/// # Arguments
/// * `preset` - Chosen size preset
/// * `custom_width`, `custom_height` - Raw text of the custom dimensions (only read for `Custom`)
/// * `background` - Native background dimensions (width, height)
///
/// # Examples
/// ```
/// # use snapback::imaging::{SizePreset, resolve_size};
/// assert_eq!(resolve_size(SizePreset::FullHd, "", "", (800, 600)), (1920, 1080));
/// assert_eq!(resolve_size(SizePreset::Custom, "640", "480", (800, 600)), (640, 480));
/// assert_eq!(resolve_size(SizePreset::Custom, "640", "-1", (800, 600)), (800, 600));
/// ```
pub fn resolve_size(
    preset: SizePreset,
    custom_width: &str,
    custom_height: &str,
    background: (u32, u32),
) -> (u32, u32) {
    match preset {
        SizePreset::SameAsBackground => background,
        SizePreset::FullHd | SizePreset::FullHdTall => {
            preset.fixed_dimensions().unwrap_or(background)
        }
        SizePreset::Custom => match (
            parse_dimension(custom_width),
            parse_dimension(custom_height),
        ) {
            (Some(w), Some(h)) => (w, h),
            _ => background,
        },
    }
}

/// Parse one custom dimension: a strictly positive integer that fits in `u32`.
fn parse_dimension(text: &str) -> Option<u32> {
    let value: i64 = text.trim().parse().ok()?;
    if value > 0 {
        u32::try_from(value).ok()
    } else {
        None
    }
}

/// Compute the top-left offset of the foreground on the canvas.
///
/// Offsets are signed and unclamped: a foreground larger than the canvas gets
/// negative offsets and is cropped when pasted.
///
/// # Examples
/// ```
/// # use snapback::imaging::{Alignment, compute_position};
/// assert_eq!(compute_position((1000, 800), (500, 400), Alignment::Center), (250, 200));
/// assert_eq!(compute_position((1000, 800), (500, 400), Alignment::BottomRight), (500, 400));
/// assert_eq!(compute_position((100, 100), (300, 300), Alignment::Center), (-100, -100));
/// ```
pub fn compute_position(
    canvas: (u32, u32),
    foreground: (u32, u32),
    alignment: Alignment,
) -> (i64, i64) {
    let (cw, ch) = (i64::from(canvas.0), i64::from(canvas.1));
    let (fw, fh) = (i64::from(foreground.0), i64::from(foreground.1));

    match alignment {
        // Floor division, so odd negative gaps round toward -inf
        Alignment::Center => ((cw - fw).div_euclid(2), (ch - fh).div_euclid(2)),
        Alignment::TopLeft => (0, 0),
        Alignment::TopRight => (cw - fw, 0),
        Alignment::BottomLeft => (0, ch - fh),
        Alignment::BottomRight => (cw - fw, ch - fh),
    }
}

/// Largest raster the pipeline allocates, in pixels (16384 × 16384).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Whether a raster of `dimensions` stays within [`MAX_PIXELS`].
///
/// # Examples
/// ```
/// # use snapback::imaging::within_pixel_budget;
/// assert!(within_pixel_budget((16384, 16384)));
/// assert!(!within_pixel_budget((100_000, 100_000)));
/// ```
pub fn within_pixel_budget(dimensions: (u32, u32)) -> bool {
    u64::from(dimensions.0) * u64::from(dimensions.1) <= MAX_PIXELS
}

/// Calculate foreground dimensions after relative scaling.
///
/// Each edge is `floor(edge * scale)`, never smaller than one pixel.
///
/// # Examples
/// ```
/// # use snapback::imaging::{Scale, calculate_scaled_dimensions};
/// assert_eq!(calculate_scaled_dimensions((400, 300), Scale::new(0.5)), (200, 150));
/// assert_eq!(calculate_scaled_dimensions((333, 101), Scale::new(0.9)), (299, 90));
/// ```
pub fn calculate_scaled_dimensions(original: (u32, u32), scale: Scale) -> (u32, u32) {
    if scale.is_identity() {
        return original;
    }
    let (w, h) = original;
    let scaled = |edge: u32| -> u32 {
        let value = (f64::from(edge) * scale.factor()).floor();
        if value >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            (value as u32).max(1)
        }
    };
    (scaled(w), scaled(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // resolve_size tests
    // =========================================================================

    #[test]
    fn same_as_background_returns_native() {
        assert_eq!(
            resolve_size(SizePreset::SameAsBackground, "10", "10", (1000, 800)),
            (1000, 800)
        );
    }

    #[test]
    fn fixed_presets_return_constants() {
        assert_eq!(
            resolve_size(SizePreset::FullHd, "", "", (10, 10)),
            (1920, 1080)
        );
        assert_eq!(
            resolve_size(SizePreset::FullHdTall, "", "", (10, 10)),
            (1920, 1280)
        );
    }

    #[test]
    fn custom_valid_dimensions() {
        assert_eq!(
            resolve_size(SizePreset::Custom, "1280", " 720 ", (1000, 800)),
            (1280, 720)
        );
        assert_eq!(
            resolve_size(SizePreset::Custom, "+64", "1", (1000, 800)),
            (64, 1)
        );
    }

    #[test]
    fn custom_invalid_dimensions_fall_back_to_native() {
        let native = (1000, 800);
        let cases = [
            ("", ""),
            ("0", "100"),
            ("100", "0"),
            ("-5", "100"),
            ("abc", "100"),
            ("100", "12.5"),
            ("100", ""),
            ("99999999999", "100"),
        ];
        for (w, h) in cases {
            assert_eq!(
                resolve_size(SizePreset::Custom, w, h, native),
                native,
                "expected fallback for ({w:?}, {h:?})"
            );
        }
    }

    // =========================================================================
    // compute_position tests
    // =========================================================================

    #[test]
    fn position_closed_forms() {
        let canvas = (1000, 800);
        let fg = (301, 201);
        assert_eq!(compute_position(canvas, fg, Alignment::Center), (349, 299));
        assert_eq!(compute_position(canvas, fg, Alignment::TopLeft), (0, 0));
        assert_eq!(compute_position(canvas, fg, Alignment::TopRight), (699, 0));
        assert_eq!(compute_position(canvas, fg, Alignment::BottomLeft), (0, 599));
        assert_eq!(
            compute_position(canvas, fg, Alignment::BottomRight),
            (699, 599)
        );
    }

    #[test]
    fn position_matches_formula_over_grid() {
        for cw in [1u32, 7, 100, 1920] {
            for fw in [1u32, 8, 99, 2500] {
                let canvas = (cw, cw + 3);
                let fg = (fw, fw + 1);
                let dx = i64::from(cw) - i64::from(fw);
                let dy = i64::from(cw + 3) - i64::from(fw + 1);
                assert_eq!(
                    compute_position(canvas, fg, Alignment::Center),
                    (dx.div_euclid(2), dy.div_euclid(2))
                );
                assert_eq!(compute_position(canvas, fg, Alignment::TopRight), (dx, 0));
                assert_eq!(compute_position(canvas, fg, Alignment::BottomLeft), (0, dy));
                assert_eq!(
                    compute_position(canvas, fg, Alignment::BottomRight),
                    (dx, dy)
                );
            }
        }
    }

    #[test]
    fn position_can_be_negative() {
        assert_eq!(
            compute_position((100, 100), (201, 150), Alignment::Center),
            (-51, -25)
        );
        assert_eq!(
            compute_position((100, 100), (200, 150), Alignment::BottomRight),
            (-100, -50)
        );
    }

    #[test]
    fn unrecognized_label_is_origin() {
        let alignment = Alignment::from_label("somewhere");
        assert_eq!(compute_position((1000, 800), (10, 10), alignment), (0, 0));
        let alignment = Alignment::from_label("Bottom-right");
        assert_eq!(compute_position((1000, 800), (10, 10), alignment), (990, 790));
    }

    // =========================================================================
    // within_pixel_budget tests
    // =========================================================================

    #[test]
    fn pixel_budget_boundaries() {
        assert!(within_pixel_budget((1, 1)));
        assert!(within_pixel_budget((1 << 14, 1 << 14)));
        assert!(!within_pixel_budget(((1 << 14) + 1, 1 << 14)));
        assert!(!within_pixel_budget((u32::MAX, u32::MAX)));
    }

    // =========================================================================
    // calculate_scaled_dimensions tests
    // =========================================================================

    #[test]
    fn identity_scale_preserves_dimensions() {
        assert_eq!(
            calculate_scaled_dimensions((1234, 567), Scale::IDENTITY),
            (1234, 567)
        );
    }

    #[test]
    fn scaling_truncates() {
        assert_eq!(
            calculate_scaled_dimensions((101, 51), Scale::new(0.5)),
            (50, 25)
        );
        assert_eq!(
            calculate_scaled_dimensions((100, 80), Scale::new(1.1)),
            (110, 88)
        );
    }

    #[test]
    fn scaling_never_reaches_zero() {
        assert_eq!(
            calculate_scaled_dimensions((10, 3), Scale::new(0.01)),
            (1, 1)
        );
    }
}
