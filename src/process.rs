//! Preview and batch compositing.
//!
//! This is where the pipeline runs end to end: load the background once,
//! resize it to the output canvas, then scale and paste every foreground onto
//! a fresh copy of that canvas and write the result under a collision-safe
//! name.
//!
//! ## Failure Isolation
//!
//! A batch fails as a whole only before the first input is touched (missing
//! selections, unreadable background, uncreatable output directory). After
//! that, every input gets its own [`ItemOutcome`]: a corrupt foreground or a
//! failed write is recorded and the batch moves on. Partial success is a
//! normal, reported result.
//!
//! ## Parallel Rendering
//!
//! Inputs are decoded, scaled and composited in parallel chunks on the
//! [rayon](https://docs.rs/rayon) pool. Naming and saving stay on the calling
//! thread in input order, so collision numbering (`foo_composited(1).png`)
//! does not depend on which worker finishes first.
//!
//! ## Progress
//!
//! Callers that want live progress pass a channel sender. One
//! [`ProcessEvent::ItemFinished`] is sent per input, success or failure.
//!
//! ## Staging Cleanup
//!
//! When the inputs came from the staging directory, it is removed once the
//! loop has run, however many items failed.

use crate::config::Settings;
use crate::imaging::{
    Alignment, BackendError, ImageBackend, OutputSize, RustBackend, Scale, prepare_canvas, render,
};
use crate::naming::OutputNaming;
use crate::paths::AppPaths;
use crate::scan::InputSource;
use crate::staging::cleanup_if_staging;
use image::RgbaImage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("{0}")]
    Validation(String),
    #[error("No valid input images found.")]
    NoImages,
    #[error("No valid sample image found for preview.")]
    NoSample,
}

/// Everything needed to produce one composite.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRequest {
    pub background: PathBuf,
    pub foreground: PathBuf,
    pub scale: Scale,
    pub alignment: Alignment,
    pub output_size: OutputSize,
}

impl CompositeRequest {
    /// Build the preview request for the current selection.
    ///
    /// The foreground is the input file itself, or the first supported image
    /// of the input folder.
    pub fn for_preview(settings: &Settings, input: &InputSource) -> Result<Self, ProcessError> {
        let background = require_background(settings)?;
        if input.is_empty() {
            return Err(ProcessError::Validation(
                "Please select an input folder or image.".to_string(),
            ));
        }
        let foreground = input.sample().ok_or(ProcessError::NoSample)?;

        Ok(Self {
            background,
            foreground,
            scale: settings.scale(),
            alignment: settings.alignment,
            output_size: settings.output_size(),
        })
    }
}

/// Parameters of one batch run, independent of how they were chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub background: PathBuf,
    /// Foregrounds in processing order.
    pub inputs: Vec<PathBuf>,
    pub scale: Scale,
    pub alignment: Alignment,
    pub output_size: OutputSize,
    pub output_dir: PathBuf,
    pub naming: OutputNaming,
    /// Folder the inputs were listed from, if any. Removed after the run when
    /// it is the staging directory.
    pub source_dir: Option<PathBuf>,
}

impl BatchRequest {
    /// Validate the current selection and settings into a batch.
    ///
    /// Checks run in the order a user would fix them: background, input,
    /// output folder, then whether the input holds any images at all.
    pub fn from_settings(
        settings: &Settings,
        input: &InputSource,
        paths: &AppPaths,
    ) -> Result<Self, ProcessError> {
        let background = require_background(settings)?;
        if input.is_empty() || !input.path().exists() {
            return Err(ProcessError::Validation(
                "Please select a valid input folder or image.".to_string(),
            ));
        }
        let output_dir = settings.resolve_output_dir(input, paths).ok_or_else(|| {
            ProcessError::Validation("Please select an output folder.".to_string())
        })?;

        let inputs = input.images();
        if inputs.is_empty() {
            return Err(ProcessError::NoImages);
        }

        Ok(Self {
            background,
            inputs,
            scale: settings.scale(),
            alignment: settings.alignment,
            output_size: settings.output_size(),
            output_dir,
            naming: settings.naming(),
            source_dir: input.folder().map(Path::to_path_buf),
        })
    }
}

fn require_background(settings: &Settings) -> Result<PathBuf, ProcessError> {
    match &settings.background_path {
        Some(path) if path.is_file() => Ok(path.clone()),
        _ => Err(ProcessError::Validation(
            "Please select a valid background image.".to_string(),
        )),
    }
}

/// Result for a single input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Written { input: PathBuf, output: PathBuf },
    Failed { input: PathBuf, error: String },
}

impl ItemOutcome {
    pub fn input(&self) -> &Path {
        match self {
            Self::Written { input, .. } | Self::Failed { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Aggregate of one batch run. Outcomes are in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchResult {
    fn from_outcomes(outcomes: Vec<ItemOutcome>) -> Self {
        Self {
            attempted: outcomes.len(),
            succeeded: outcomes.iter().filter(|o| o.is_success()).count(),
            outcomes,
        }
    }

    /// Failed inputs with their error messages, in input order.
    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Failed { input, error } => Some((input.as_path(), error.as_str())),
                ItemOutcome::Written { .. } => None,
            })
            .collect()
    }

    /// Written output files, in input order.
    pub fn outputs(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Written { output, .. } => Some(output.as_path()),
                ItemOutcome::Failed { .. } => None,
            })
            .collect()
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted { total: usize, output_dir: PathBuf },
    /// `index` is 1-based.
    ItemFinished {
        index: usize,
        total: usize,
        outcome: ItemOutcome,
    },
}

/// Render a preview with the production backend.
pub fn preview(request: &CompositeRequest) -> Result<RgbaImage, ProcessError> {
    preview_with_backend(&RustBackend::new(), request)
}

/// Render one composite without saving it.
pub fn preview_with_backend(
    backend: &impl ImageBackend,
    request: &CompositeRequest,
) -> Result<RgbaImage, ProcessError> {
    let background = backend.load(&request.background)?;
    let canvas = prepare_canvas(&background, &request.output_size).map_err(oversized_canvas)?;
    let foreground = backend.load(&request.foreground)?;
    Ok(render(&canvas, &foreground, request.scale, request.alignment)?)
}

/// Run a batch with the production backend.
pub fn run_batch(
    request: &BatchRequest,
    paths: &AppPaths,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchResult, ProcessError> {
    run_batch_with_backend(&RustBackend::new(), request, paths, progress)
}

/// Run a batch using a specific backend (allows testing with mock).
pub fn run_batch_with_backend(
    backend: &impl ImageBackend,
    request: &BatchRequest,
    paths: &AppPaths,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchResult, ProcessError> {
    let background = backend.load(&request.background)?;
    let canvas = prepare_canvas(&background, &request.output_size).map_err(oversized_canvas)?;
    std::fs::create_dir_all(&request.output_dir)?;

    let total = request.inputs.len();
    info!(
        total,
        canvas_width = canvas.width(),
        canvas_height = canvas.height(),
        output_dir = %request.output_dir.display(),
        "starting batch"
    );
    send(
        &progress,
        ProcessEvent::BatchStarted {
            total,
            output_dir: request.output_dir.clone(),
        },
    );

    let chunk_size = rayon::current_num_threads().max(1);
    let mut outcomes = Vec::with_capacity(total);

    for chunk in request.inputs.chunks(chunk_size) {
        let rendered: Vec<Result<RgbaImage, BackendError>> = chunk
            .par_iter()
            .map(|input| -> Result<RgbaImage, BackendError> {
                let foreground = backend.load(input)?;
                render(&canvas, &foreground, request.scale, request.alignment)
            })
            .collect();

        for (input, result) in chunk.iter().zip(rendered) {
            let saved = result.and_then(|image| save_composite(backend, request, input, &image));
            let outcome = match saved {
                Ok(output) => {
                    debug!(input = %input.display(), output = %output.display(), "wrote composite");
                    ItemOutcome::Written {
                        input: input.clone(),
                        output,
                    }
                }
                Err(e) => {
                    warn!(input = %input.display(), error = %e, "skipping input");
                    ItemOutcome::Failed {
                        input: input.clone(),
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome.clone());
            send(
                &progress,
                ProcessEvent::ItemFinished {
                    index: outcomes.len(),
                    total,
                    outcome,
                },
            );
        }
    }

    if let Some(dir) = &request.source_dir {
        cleanup_if_staging(dir, paths);
    }

    let result = BatchResult::from_outcomes(outcomes);
    info!(
        attempted = result.attempted,
        succeeded = result.succeeded,
        "batch finished"
    );
    Ok(result)
}

/// A canvas over the pixel budget is a settings problem, not an item failure.
fn oversized_canvas(error: BackendError) -> ProcessError {
    ProcessError::Validation(format!("Please choose a smaller output size ({error})."))
}

/// Claim the first free output name for `input` and write `image` there.
fn save_composite(
    backend: &impl ImageBackend,
    request: &BatchRequest,
    input: &Path,
    image: &RgbaImage,
) -> Result<PathBuf, BackendError> {
    let output = request
        .naming
        .unique_path(&request.output_dir, input)
        .ok_or_else(|| {
            BackendError::ProcessingFailed(format!("no usable file name in {}", input.display()))
        })?;
    backend.save(image, &output, request.naming.format)?;
    Ok(output)
}

fn send(progress: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching
        let _ = tx.send(event);
    }
}
