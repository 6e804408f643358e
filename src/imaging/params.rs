//! Value types describing a composite.
//!
//! These types describe *what* to produce, not *how*. They sit between the
//! user-facing settings (free-form strings typed into a form or passed on the
//! command line) and the pixel work in [`operations`](super::operations).
//!
//! ## Types
//!
//! - [`Alignment`]: where the foreground lands on the canvas (center or a corner).
//! - [`SizePreset`]: which canvas size to produce; [`OutputSize`] pairs it with
//!   the custom width/height text.
//! - [`Scale`]: relative foreground scale; parsed from a percentage string with
//!   a silent fallback to 100%.
//! - [`OutputFormat`]: file format of written composites; decides whether alpha
//!   survives.
//! - [`Quality`]: lossy encoding quality (1-100, default 90).
//!
//! Label parsing is forgiving: case, spaces and underscores are ignored so that
//! `"Bottom-right"`, `"bottom right"` and `"BOTTOM_RIGHT"` all resolve the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase a label and fold spaces/underscores into dashes.
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            '×' => 'x',
            other => other,
        })
        .collect()
}

/// Placement of the foreground relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Alignment {
    pub const ALL: [Alignment; 5] = [
        Alignment::Center,
        Alignment::TopLeft,
        Alignment::TopRight,
        Alignment::BottomLeft,
        Alignment::BottomRight,
    ];

    /// Parse a label, returning `None` for anything unrecognized.
    pub fn parse(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "center" | "centre" => Some(Self::Center),
            "top-left" => Some(Self::TopLeft),
            "top-right" => Some(Self::TopRight),
            "bottom-left" => Some(Self::BottomLeft),
            "bottom-right" => Some(Self::BottomRight),
            _ => None,
        }
    }

    /// Parse a label, mapping unrecognized values to the origin corner.
    ///
    /// The origin corner places the foreground at `(0, 0)`, which is the
    /// documented offset for unknown alignments.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or(Self::TopLeft)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown alignment '{s}' (expected center, top-left, top-right, bottom-left or bottom-right)")
        })
    }
}

/// Output canvas size choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizePreset {
    #[default]
    #[serde(rename = "same-as-background")]
    SameAsBackground,
    #[serde(rename = "1920x1080")]
    FullHd,
    #[serde(rename = "1920x1280")]
    FullHdTall,
    #[serde(rename = "custom")]
    Custom,
}

impl SizePreset {
    /// Literal dimensions for the fixed presets.
    pub fn fixed_dimensions(self) -> Option<(u32, u32)> {
        match self {
            Self::FullHd => Some((1920, 1080)),
            Self::FullHdTall => Some((1920, 1280)),
            Self::SameAsBackground | Self::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SameAsBackground => "same-as-background",
            Self::FullHd => "1920x1080",
            Self::FullHdTall => "1920x1280",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "same-as-background" | "background" | "native" => Ok(Self::SameAsBackground),
            "1920x1080" => Ok(Self::FullHd),
            "1920x1280" => Ok(Self::FullHdTall),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "unknown size preset '{s}' (expected same-as-background, 1920x1080, 1920x1280 or custom)"
            )),
        }
    }
}

/// A size preset together with the custom dimensions as the user typed them.
///
/// The custom text is only consulted for [`SizePreset::Custom`] and is parsed
/// lazily by [`resolve_size`](super::calculations::resolve_size).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputSize {
    pub preset: SizePreset,
    pub custom_width: String,
    pub custom_height: String,
}

impl OutputSize {
    pub fn preset(preset: SizePreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    pub fn custom(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            preset: SizePreset::Custom,
            custom_width: width.into(),
            custom_height: height.into(),
        }
    }

    /// Concrete canvas size for a background of the given native size.
    pub fn resolve(&self, background: (u32, u32)) -> (u32, u32) {
        super::calculations::resolve_size(
            self.preset,
            &self.custom_width,
            &self.custom_height,
            background,
        )
    }
}

/// Relative foreground scale (1.0 = original size). Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(f64);

impl Scale {
    pub const IDENTITY: Scale = Scale(1.0);

    /// Build from a factor; non-positive or non-finite values fall back to 1.0.
    pub fn new(factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self(factor)
        } else {
            Self::IDENTITY
        }
    }

    /// Parse a percentage string such as `"90"` or `"12.5"`.
    ///
    /// Unparsable, non-positive and non-finite input falls back to 100%.
    pub fn from_percent(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(percent) if percent.is_finite() && percent > 0.0 => Self(percent / 100.0),
            _ => Self::IDENTITY,
        }
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 1.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// File format of written composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// File extension written for this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    /// Whether the encoder can store an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpg | Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).trim_start_matches('.') {
            "png" => Ok(Self::Png),
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            _ => Err(format!(
                "unknown output format '{s}' (expected png, jpg, jpeg or webp)"
            )),
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_parses_ui_labels() {
        assert_eq!(Alignment::parse("Center"), Some(Alignment::Center));
        assert_eq!(Alignment::parse("Top-left"), Some(Alignment::TopLeft));
        assert_eq!(Alignment::parse("top right"), Some(Alignment::TopRight));
        assert_eq!(Alignment::parse("BOTTOM_LEFT"), Some(Alignment::BottomLeft));
        assert_eq!(
            Alignment::parse("  Bottom-right "),
            Some(Alignment::BottomRight)
        );
    }

    #[test]
    fn alignment_unknown_label() {
        assert_eq!(Alignment::parse("diagonal"), None);
        assert_eq!(Alignment::from_label("diagonal"), Alignment::TopLeft);
        assert!("middle".parse::<Alignment>().is_err());
    }

    #[test]
    fn alignment_label_roundtrips() {
        for a in Alignment::ALL {
            assert_eq!(a.label().parse::<Alignment>().unwrap(), a);
        }
    }

    #[test]
    fn size_preset_parses_multiplication_sign() {
        assert_eq!("1920×1080".parse::<SizePreset>().unwrap(), SizePreset::FullHd);
        assert_eq!(
            "1920x1280".parse::<SizePreset>().unwrap(),
            SizePreset::FullHdTall
        );
        assert_eq!(
            "Same as background".parse::<SizePreset>().unwrap(),
            SizePreset::SameAsBackground
        );
        assert!("4k".parse::<SizePreset>().is_err());
    }

    #[test]
    fn size_preset_fixed_dimensions() {
        assert_eq!(SizePreset::FullHd.fixed_dimensions(), Some((1920, 1080)));
        assert_eq!(SizePreset::FullHdTall.fixed_dimensions(), Some((1920, 1280)));
        assert_eq!(SizePreset::Custom.fixed_dimensions(), None);
        assert_eq!(SizePreset::SameAsBackground.fixed_dimensions(), None);
    }

    #[test]
    fn scale_from_percent() {
        assert_eq!(Scale::from_percent("50").factor(), 0.5);
        assert_eq!(Scale::from_percent(" 90 ").factor(), 0.9);
        assert_eq!(Scale::from_percent("250").factor(), 2.5);
    }

    #[test]
    fn scale_invalid_falls_back_to_identity() {
        for text in ["", "abc", "0", "-20", "NaN", "inf", "-inf", "12%"] {
            assert_eq!(
                Scale::from_percent(text),
                Scale::IDENTITY,
                "expected fallback for {text:?}"
            );
        }
        assert_eq!(Scale::new(0.0), Scale::IDENTITY);
        assert_eq!(Scale::new(-1.5), Scale::IDENTITY);
        assert_eq!(Scale::new(f64::NAN), Scale::IDENTITY);
    }

    #[test]
    fn output_format_alpha_support() {
        assert!(OutputFormat::Png.supports_alpha());
        assert!(OutputFormat::Webp.supports_alpha());
        assert!(!OutputFormat::Jpg.supports_alpha());
        assert!(!OutputFormat::Jpeg.supports_alpha());
    }

    #[test]
    fn output_format_parses_case_insensitive() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!(".jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("WebP".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn quality_defaults_to_ninety() {
        assert_eq!(Quality::default().value(), 90);
    }
}
