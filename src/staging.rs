//! Drag-and-drop handling and the staging directory.
//!
//! Dropped paths are turned into selections the same way regardless of the
//! front end that received them:
//!
//! | Dropped | Result |
//! |---|---|
//! | a directory (first one wins) | [`InputSource::Folder`] on that directory |
//! | exactly one file | [`InputSource::File`] |
//! | several files | copied into the staging directory → [`InputSource::Staged`] |
//!
//! Staged copies overwrite files of the same name already in staging. The
//! staging directory is removed after a batch that used it and again on exit
//! if it still exists.

use crate::imaging::has_supported_extension;
use crate::paths::AppPaths;
use crate::scan::InputSource;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to stage {path}: {source}")]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pick the background from dropped paths.
///
/// The first existing file with a supported image extension wins; folders
/// and other files are ignored.
pub fn background_from_drop(paths: &[PathBuf]) -> Option<PathBuf> {
    paths
        .iter()
        .find(|p| p.is_file() && has_supported_extension(p))
        .cloned()
}

/// Turn dropped paths into an input selection.
///
/// Returns `Ok(None)` when nothing usable was dropped (no directories, no
/// existing files). A directory anywhere in the list takes precedence over
/// files, matching the order in which paths are inspected.
pub fn input_from_drop(
    paths: &[PathBuf],
    app_paths: &AppPaths,
) -> Result<Option<InputSource>, StagingError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            debug!(dir = %path.display(), "dropped folder becomes input");
            return Ok(Some(InputSource::Folder(path.clone())));
        }
        if path.is_file() {
            files.push(path.clone());
        }
    }

    match files.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(InputSource::File(single.clone()))),
        many => stage_files(many, &app_paths.staging_dir).map(Some),
    }
}

/// Copy `files` into `staging_dir`, overwriting same-named entries.
fn stage_files(files: &[PathBuf], staging_dir: &Path) -> Result<InputSource, StagingError> {
    fs::create_dir_all(staging_dir).map_err(|source| StagingError::CreateDir {
        path: staging_dir.to_path_buf(),
        source,
    })?;

    for file in files {
        let Some(name) = file.file_name() else {
            continue;
        };
        fs::copy(file, staging_dir.join(name)).map_err(|source| StagingError::Copy {
            path: file.clone(),
            source,
        })?;
    }
    info!(
        count = files.len(),
        dir = %staging_dir.display(),
        "staged dropped files"
    );

    let origin = files[0]
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(InputSource::Staged {
        dir: staging_dir.to_path_buf(),
        origin,
    })
}

/// Remove the staging directory and everything in it.
///
/// Missing directories are fine. Failures are logged, never returned: a
/// leftover staging folder is retried on the next cleanup.
pub fn cleanup_staging(app_paths: &AppPaths) -> bool {
    remove_staging_dir(&app_paths.staging_dir)
}

/// Run `session`, then remove the staging directory whatever it returned.
///
/// Batches clean up after their own loop; this catches drops that never got
/// that far, such as a batch refused for an unreadable background.
pub fn with_exit_cleanup<T>(app_paths: &AppPaths, session: impl FnOnce() -> T) -> T {
    let result = session();
    cleanup_staging(app_paths);
    result
}

/// Remove `dir` if it is the staging directory; other directories are left alone.
pub fn cleanup_if_staging(dir: &Path, app_paths: &AppPaths) -> bool {
    if app_paths.is_staging_dir(dir) {
        remove_staging_dir(dir)
    } else {
        false
    }
}

fn remove_staging_dir(dir: &Path) -> bool {
    if !dir.exists() {
        return false;
    }
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "removed staging directory");
            true
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not remove staging directory");
            false
        }
    }
}
