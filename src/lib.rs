//! # SnapBack
//!
//! Composites foreground images onto a single background. Pick a background,
//! point at a folder (or a single image, or a handful of dropped files), choose
//! a scale and an alignment, and every input is written back out pasted onto
//! the background.
//!
//! # Architecture: One Pipeline, Thin Front Ends
//!
//! All compositing goes through one pipeline:
//!
//! ```text
//! 1. Resolve   settings + input  →  BatchRequest      (validation, no I/O on pixels)
//! 2. Canvas    background        →  resized canvas    (once per batch)
//! 3. Render    each input        →  scaled + pasted   (parallel, per-item isolation)
//! 4. Write     each composite    →  <stem>_composited.png  (collision-safe, in order)
//! ```
//!
//! The pipeline parameters live in plain value objects ([`process::BatchRequest`],
//! [`process::CompositeRequest`]) that know nothing about widgets or flags.
//! Front ends only build those objects and display results, which keeps the
//! pipeline testable without any UI present.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Size resolution, placement math, resize/paste, image decode/encode |
//! | [`naming`] | Output file names with `(n)` collision suffixes |
//! | [`scan`] | Input selection and the ordered list of images it yields |
//! | [`staging`] | Drag-and-drop handling: background drop, multi-file staging, cleanup |
//! | [`paths`] | Per-user locations, resolved once and passed explicitly |
//! | [`config`] | Persisted `settings.toml`, forgiving load, non-fatal save |
//! | [`process`] | Preview and batch runs, per-item outcomes, progress events |
//! | [`output`] | Terminal formatting of progress, summaries and settings |
//!
//! # Design Decisions
//!
//! ## Forgiving Inputs
//!
//! Settings are typed by people. An unparsable scale means 100%, a bad custom
//! size means the background's own size, and an unknown alignment means the
//! top-left corner. None of these are errors. Only missing selections
//! (no background, no input, no output folder) stop an operation, and they do
//! so before any file is touched.
//!
//! ## Partial Success Is a Result
//!
//! A batch never aborts because of one input. Every input yields an
//! [`process::ItemOutcome`], and the batch returns all of them. A run where
//! two of three images were written is a successful call with one failure in
//! it.
//!
//! ## Deterministic Names Under Parallelism
//!
//! Rendering runs on a [rayon](https://docs.rs/rayon) pool, but output names are
//! claimed and files written on one thread in input order. The same inputs in
//! the same order always produce the same `(1)`, `(2)` suffixes.
//!
//! ## Explicit Paths
//!
//! There are no process-wide path constants in use at runtime. The settings
//! file, staging directory and desktop are resolved once into
//! [`paths::AppPaths`] and handed to whatever needs them.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod paths;
pub mod process;
pub mod scan;
pub mod staging;

#[cfg(test)]
pub(crate) mod test_helpers;
