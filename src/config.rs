//! User settings.
//!
//! Handles loading and saving `settings.toml`, the only state that outlives a
//! session. The file lives at [`AppPaths::settings_file`] and is written when
//! the user closes the tool (or explicitly saves from the command line).
//!
//! ## Settings File
//!
//! ```toml
//! # All keys are optional - defaults shown below
//!
//! background_path = "/home/me/Pictures/backdrop.png"  # no default
//! output_folder = "same-as-input"   # same-as-input | desktop | custom
//! custom_output_path = "/tmp/out"   # only used with output_folder = "custom"
//! filename_postfix = "_composited"  # appended to each input's base name
//! output_format = "png"             # png | jpg | jpeg | webp
//! size_preset = "same-as-background" # same-as-background | 1920x1080 | 1920x1280 | custom
//! custom_width = ""                 # text, only used with size_preset = "custom"
//! custom_height = ""
//! alignment = "center"              # center | top-left | top-right | bottom-left | bottom-right
//! resize_scale = "90"               # foreground scale in percent
//! window_geometry = "900x700"
//! # max_processes = 4               # cap parallel workers (omit for auto)
//! ```
//!
//! ## Forgiving Loading
//!
//! Settings are never a reason to refuse to start:
//!
//! - a missing key falls back to its default, the rest of the file still applies;
//! - an unrecognized choice (`output_format = "gif"`) falls back for that key
//!   alone; an unknown alignment means top-left, the `(0, 0)` placement;
//! - a missing file yields the defaults;
//! - an unreadable or malformed file yields the defaults and logs a warning.
//!
//! Choice labels are matched loosely, so `alignment = "Bottom-right"` and
//! `size_preset = "1920×1080"` are understood.
//!
//! Free-form values (`resize_scale`, `custom_width`, `custom_height`) are kept
//! as text and only interpreted when a composite is built, where invalid text
//! falls back silently (scale → 100%, custom size → background size). Bare
//! numbers (`resize_scale = 50`) are accepted as their text.
//!
//! The current input (file or folder) is deliberately not persisted: every
//! session starts with an empty folder selection.

use crate::imaging::{Alignment, OutputFormat, OutputSize, Scale, SizePreset};
use crate::naming::{DEFAULT_POSTFIX, OutputNaming};
use crate::paths::AppPaths;
use crate::scan::InputSource;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where composites are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFolder {
    /// Next to the input: the folder itself, or the file's parent.
    #[default]
    SameAsInput,
    /// The user's desktop.
    Desktop,
    /// `custom_output_path`.
    Custom,
}

impl OutputFolder {
    pub fn label(self) -> &'static str {
        match self {
            Self::SameAsInput => "same-as-input",
            Self::Desktop => "desktop",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for OutputFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OutputFolder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "same-as-input" | "input" => Ok(Self::SameAsInput),
            "desktop" => Ok(Self::Desktop),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "unknown output folder '{s}' (expected same-as-input, desktop or custom)"
            )),
        }
    }
}

/// Persisted user settings.
///
/// All fields have defaults; a settings file needs only the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background image. `None` until one is chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_path: Option<PathBuf>,
    #[serde(deserialize_with = "choice_or_default")]
    pub output_folder: OutputFolder,
    /// Target for [`OutputFolder::Custom`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_output_path: Option<PathBuf>,
    /// Appended to each input's base name; blank means `_composited`.
    pub filename_postfix: String,
    #[serde(deserialize_with = "choice_or_default")]
    pub output_format: OutputFormat,
    #[serde(deserialize_with = "choice_or_default")]
    pub size_preset: SizePreset,
    /// Custom canvas width as typed.
    #[serde(deserialize_with = "typed_text")]
    pub custom_width: String,
    /// Custom canvas height as typed.
    #[serde(deserialize_with = "typed_text")]
    pub custom_height: String,
    #[serde(deserialize_with = "alignment_label")]
    pub alignment: Alignment,
    /// Foreground scale in percent, as typed.
    #[serde(deserialize_with = "typed_text")]
    pub resize_scale: String,
    /// Last window size, `WIDTHxHEIGHT`.
    pub window_geometry: String,
    /// Maximum number of parallel workers. `None` means one per CPU core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_path: None,
            output_folder: OutputFolder::default(),
            custom_output_path: None,
            filename_postfix: DEFAULT_POSTFIX.to_string(),
            output_format: OutputFormat::default(),
            size_preset: SizePreset::default(),
            custom_width: String::new(),
            custom_height: String::new(),
            alignment: Alignment::default(),
            resize_scale: "90".to_string(),
            window_geometry: "900x700".to_string(),
            max_processes: None,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults on any problem.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    /// Load settings, reporting problems.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn try_load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    /// Write settings, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Write settings; failures are logged and otherwise ignored.
    pub fn save_or_log(&self, path: &Path) -> bool {
        match self.save(path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not save settings");
                false
            }
        }
    }

    /// Effective foreground scale (100% on invalid text).
    pub fn scale(&self) -> Scale {
        Scale::from_percent(&self.resize_scale)
    }

    /// Canvas size choice together with the custom dimension text.
    pub fn output_size(&self) -> OutputSize {
        OutputSize {
            preset: self.size_preset,
            custom_width: self.custom_width.clone(),
            custom_height: self.custom_height.clone(),
        }
    }

    /// Output naming strategy (postfix + format).
    pub fn naming(&self) -> OutputNaming {
        OutputNaming::new(&self.filename_postfix, self.output_format)
    }

    /// Resolve the output directory for an input selection.
    ///
    /// Returns `None` when the choice cannot produce a directory (no input
    /// selected for "same as input", empty custom path).
    pub fn resolve_output_dir(&self, input: &InputSource, paths: &AppPaths) -> Option<PathBuf> {
        let dir = match self.output_folder {
            OutputFolder::SameAsInput => match input {
                InputSource::File(file) => file.parent().map(Path::to_path_buf)?,
                InputSource::Folder(dir) => dir.clone(),
                InputSource::Staged { origin, .. } => origin.clone(),
            },
            OutputFolder::Desktop => paths.desktop_dir.clone(),
            OutputFolder::Custom => self.custom_output_path.clone()?,
        };
        if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir)
        }
    }
}

/// Read a choice by label; anything unrecognized becomes the default choice.
fn choice_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = toml::Value::deserialize(deserializer)?;
    match value.as_str().map(str::parse::<T>) {
        Some(Ok(choice)) => Ok(choice),
        _ => {
            warn!(value = %value, "unrecognized setting, using its default");
            Ok(T::default())
        }
    }
}

/// Read an alignment label; unknown labels mean the top-left corner.
fn alignment_label<'de, D>(deserializer: D) -> Result<Alignment, D::Error>
where
    D: Deserializer<'de>,
{
    let value = toml::Value::deserialize(deserializer)?;
    let label = value.as_str().unwrap_or_default();
    if Alignment::parse(label).is_none() {
        warn!(alignment = %value, "unknown alignment, using top-left");
    }
    Ok(Alignment::from_label(label))
}

/// Read a free-form value as text, whether it was written quoted or not.
fn typed_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match toml::Value::deserialize(deserializer)? {
        toml::Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Render the stock settings file with every key documented.
pub fn stock_settings_toml() -> &'static str {
    r#"# snapback settings
# All keys are optional; missing keys use the defaults shown here.

# Background image every foreground is pasted onto.
# background_path = "/path/to/background.png"

# Where composites go: "same-as-input", "desktop" or "custom".
output_folder = "same-as-input"

# Used when output_folder = "custom".
# custom_output_path = "/path/to/output"

# Appended to each input's base name. Blank means "_composited".
filename_postfix = "_composited"

# "png", "jpg", "jpeg" or "webp". JPEG output drops transparency.
output_format = "png"

# Canvas size: "same-as-background", "1920x1080", "1920x1280" or "custom".
size_preset = "same-as-background"

# Used when size_preset = "custom". Invalid or non-positive values fall
# back to the background's own size.
custom_width = ""
custom_height = ""

# "center", "top-left", "top-right", "bottom-left" or "bottom-right".
alignment = "center"

# Foreground scale in percent of its own size. Invalid or non-positive
# values mean 100.
resize_scale = "90"

window_geometry = "900x700"

# Cap on parallel workers (omit for one per CPU core).
# max_processes = 4
"#
}

/// Resolve the effective worker count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(max_processes: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}
