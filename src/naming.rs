//! Output file naming for composites.
//!
//! Every composite is written as `<input stem><postfix>.<ext>`. When that name
//! is already taken in the output directory, a counter is inserted before the
//! extension until a free name is found:
//!
//! ```text
//! sunset_composited.png
//! sunset_composited(1).png
//! sunset_composited(2).png
//! ```
//!
//! Existing files are never overwritten. Numbering restarts from `(1)` for
//! every name and only depends on what is on disk, so processing the same
//! inputs in the same order always yields the same names.

use crate::imaging::OutputFormat;
use std::path::{Path, PathBuf};

/// Postfix used when the configured one is blank.
pub const DEFAULT_POSTFIX: &str = "_composited";

/// Trim the configured postfix, substituting [`DEFAULT_POSTFIX`] when blank.
pub fn effective_postfix(postfix: &str) -> &str {
    let trimmed = postfix.trim();
    if trimmed.is_empty() {
        DEFAULT_POSTFIX
    } else {
        trimmed
    }
}

/// Naming strategy for one batch: postfix plus output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    postfix: String,
    pub format: OutputFormat,
}

impl OutputNaming {
    pub fn new(postfix: &str, format: OutputFormat) -> Self {
        Self {
            postfix: effective_postfix(postfix).to_string(),
            format,
        }
    }

    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    /// File name for an input stem with the given collision counter.
    ///
    /// Counter `0` is the plain name; `n > 0` appends `(n)`.
    pub fn file_name(&self, stem: &str, counter: u32) -> String {
        let ext = self.format.extension();
        if counter == 0 {
            format!("{stem}{}.{ext}", self.postfix)
        } else {
            format!("{stem}{}({counter}).{ext}", self.postfix)
        }
    }

    /// First free output path in `dir` for `input`.
    ///
    /// Returns `None` when `input` has no usable file stem.
    pub fn unique_path(&self, dir: &Path, input: &Path) -> Option<PathBuf> {
        let stem = input.file_stem()?.to_string_lossy();
        if stem.is_empty() {
            return None;
        }
        (0..=u32::MAX)
            .map(|counter| dir.join(self.file_name(&stem, counter)))
            .find(|candidate| !candidate.exists())
    }
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self::new(DEFAULT_POSTFIX, OutputFormat::default())
    }
}
