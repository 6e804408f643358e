//! Input discovery.
//!
//! Turns the current input selection into the ordered list of foreground
//! images a batch will process. An input is either a single file, a folder,
//! or the staging folder filled by a multi-file drop.
//!
//! ## Ordering
//!
//! Folder listings are non-recursive and sorted by file name. The order is
//! load-bearing: collision numbering (`foo_composited(1).png`, …) follows the
//! order in which inputs are processed, so a stable listing keeps output names
//! reproducible across runs.
//!
//! ## Filtering
//!
//! Only regular files with a supported extension (`png`, `jpg`, `jpeg`,
//! `webp`, case-insensitive) are listed. Hidden files are skipped. Nothing is
//! decoded here; a corrupt file with the right extension is listed and fails
//! later, inside the batch, where the failure is isolated.

use crate::imaging::has_supported_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where foreground images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// One image file.
    File(PathBuf),
    /// Every supported image directly inside a folder.
    Folder(PathBuf),
    /// The staging folder holding copies of dropped files.
    ///
    /// `origin` is the folder the first dropped file came from; it stands in
    /// for "the input folder" when outputs go next to the inputs.
    Staged { dir: PathBuf, origin: PathBuf },
}

impl Default for InputSource {
    /// Every session starts with an empty folder selection.
    fn default() -> Self {
        Self::Folder(PathBuf::new())
    }
}

impl InputSource {
    /// The selected path (file or folder), as shown in an input field.
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Folder(path) => path,
            Self::Staged { dir, .. } => dir,
        }
    }

    /// Whether nothing has been selected yet.
    pub fn is_empty(&self) -> bool {
        self.path().as_os_str().is_empty()
    }

    /// The folder whose contents are processed, if the input is folder-like.
    pub fn folder(&self) -> Option<&Path> {
        match self {
            Self::File(_) => None,
            Self::Folder(dir) | Self::Staged { dir, .. } => Some(dir),
        }
    }

    /// Ordered list of images to process.
    pub fn images(&self) -> Vec<PathBuf> {
        match self {
            Self::File(path) => vec![path.clone()],
            Self::Folder(dir) | Self::Staged { dir, .. } => list_images(dir),
        }
    }

    /// The image a preview is rendered from.
    ///
    /// A file input is used as-is (even without a recognized extension); a
    /// folder input yields its first supported image.
    pub fn sample(&self) -> Option<PathBuf> {
        match self {
            Self::File(path) => Some(path.clone()),
            Self::Folder(dir) | Self::Staged { dir, .. } => first_image(dir),
        }
    }
}

/// List supported images directly inside `dir`, sorted by file name.
///
/// Returns an empty list when `dir` is not a readable directory.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .map(|e| e.into_path())
        .filter(|p| has_supported_extension(p))
        .collect()
}

/// First supported image in `dir` by name order.
pub fn first_image(dir: &Path) -> Option<PathBuf> {
    list_images(dir).into_iter().next()
}

/// Human-readable summary of the current input, as shown under the input field.
pub fn image_count_message(input: &InputSource) -> String {
    match input {
        InputSource::File(_) => "1 image selected.".to_string(),
        InputSource::Folder(dir) | InputSource::Staged { dir, .. } => {
            if !dir.is_dir() {
                return "No input folder selected.".to_string();
            }
            format!("{} image(s) found.", list_images(dir).len())
        }
    }
}
