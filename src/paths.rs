//! Per-user filesystem locations.
//!
//! All locations are resolved once at startup into an [`AppPaths`] value and
//! passed to whatever needs them. Nothing else in the crate looks up home or
//! config directories on its own, which lets tests point everything at a
//! temporary directory with [`AppPaths::under`].
//!
//! # Default Locations
//!
//! | Path | Linux | macOS | Windows |
//! |---|---|---|---|
//! | settings | `~/.config/snapback/settings.toml` | `~/Library/Application Support/snapback/settings.toml` | `%APPDATA%\snapback\settings.toml` |
//! | staging | `~/.local/share/snapback/Dropped Inputs` | `~/Library/Application Support/snapback/Dropped Inputs` | `%APPDATA%\snapback\Dropped Inputs` |
//! | desktop | `~/Desktop` | `~/Desktop` | `%USERPROFILE%\Desktop` |

use std::path::{Path, PathBuf};

/// Application directory name under the platform config/data dirs.
pub const APP_NAME: &str = "snapback";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Name of the staging directory for multi-file drops.
pub const STAGING_DIR: &str = "Dropped Inputs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Persisted settings file.
    pub settings_file: PathBuf,
    /// Staging directory collecting multi-file drops into one batch input.
    pub staging_dir: PathBuf,
    /// Target of the "Desktop" output folder choice.
    pub desktop_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the platform locations.
    ///
    /// Falls back to the home directory, then the working directory, when a
    /// platform directory cannot be determined.
    pub fn discover() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join(APP_NAME);
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| home.join(".local/share"))
            .join(APP_NAME);
        let desktop_dir = dirs::desktop_dir().unwrap_or_else(|| home.join("Desktop"));

        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            staging_dir: data_dir.join(STAGING_DIR),
            desktop_dir,
        }
    }

    /// All locations under a single root (tests, portable installs).
    pub fn under(root: &Path) -> Self {
        Self {
            settings_file: root.join("config").join(SETTINGS_FILE),
            staging_dir: root.join("data").join(STAGING_DIR),
            desktop_dir: root.join("Desktop"),
        }
    }

    /// Replace the settings file location, keeping the others.
    pub fn with_settings_file(mut self, path: PathBuf) -> Self {
        self.settings_file = path;
        self
    }

    /// Whether `dir` is the staging directory.
    ///
    /// Compares canonical paths when both exist so `./x` and `x` match.
    pub fn is_staging_dir(&self, dir: &Path) -> bool {
        if dir == self.staging_dir {
            return true;
        }
        match (dir.canonicalize(), self.staging_dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
