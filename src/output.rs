//! Terminal output for batches and previews.
//!
//! # Information-First Display
//!
//! Each input is shown by its positional index and file name, with the full
//! path as indented context. The output reads as an inventory of what was
//! produced while still letting users trace every line back to a file.
//!
//! # Output Format
//!
//! ## Batch progress
//!
//! ```text
//! Compositing 3 images → /home/me/Pictures/out
//!     001 beach.png → beach_composited.png
//!     002 broken.jpg: failed
//!         Error: Failed to decode /home/me/in/broken.jpg: ...
//!     003 city.webp → city_composited.png
//! ```
//!
//! ## Batch summary
//!
//! ```text
//! Batch complete: 2 of 3 succeeded, 1 failed
//! Failed
//!     001 broken.jpg
//!         Source: /home/me/in/broken.jpg
//!         Error: Failed to decode /home/me/in/broken.jpg: ...
//! ```
//!
//! # Architecture
//!
//! Each entity has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::Settings;
use crate::process::{BatchResult, ItemOutcome, ProcessEvent};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of a path, or the whole path when it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// Batch progress
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted { total, output_dir } => vec![format!(
            "Compositing {} → {}",
            plural(*total, "image"),
            output_dir.display()
        )],
        ProcessEvent::ItemFinished { index, outcome, .. } => match outcome {
            ItemOutcome::Written { input, output } => vec![format!(
                "{}{} {} → {}",
                indent(1),
                format_index(*index),
                display_name(input),
                display_name(output)
            )],
            ItemOutcome::Failed { input, error } => vec![
                format!(
                    "{}{} {}: failed",
                    indent(1),
                    format_index(*index),
                    display_name(input)
                ),
                format!("{}Error: {}", indent(2), error),
            ],
        },
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch summary
// ============================================================================

/// Format the end-of-batch summary: counts, then each failed input.
///
/// Failure indices are positions in the batch, so they match the progress
/// lines printed while the batch ran.
pub fn format_batch_summary(result: &BatchResult) -> Vec<String> {
    let failed = result.attempted - result.succeeded;
    let mut lines = vec![format!(
        "Batch complete: {} of {} succeeded, {} failed",
        result.succeeded, result.attempted, failed
    )];

    if failed > 0 {
        lines.push("Failed".to_string());
        for (i, outcome) in result.outcomes.iter().enumerate() {
            if let ItemOutcome::Failed { input, error } = outcome {
                lines.push(format!(
                    "{}{} {}",
                    indent(1),
                    format_index(i + 1),
                    display_name(input)
                ));
                lines.push(format!("{}Source: {}", indent(2), input.display()));
                lines.push(format!("{}Error: {}", indent(2), error));
            }
        }
    }
    lines
}

/// Print the batch summary to stdout.
pub fn print_batch_summary(result: &BatchResult) {
    for line in format_batch_summary(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Format the effective settings as aligned `key: value` lines.
pub fn format_settings(settings: &Settings, settings_file: &Path) -> Vec<String> {
    let unset = "(not set)".to_string();
    let path_or_unset = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| unset.clone())
    };
    let text_or_unset = |s: &str| {
        if s.trim().is_empty() {
            unset.clone()
        } else {
            s.to_string()
        }
    };

    let rows = [
        ("Background", path_or_unset(&settings.background_path)),
        ("Output folder", settings.output_folder.to_string()),
        ("Custom output", path_or_unset(&settings.custom_output_path)),
        ("Postfix", text_or_unset(&settings.filename_postfix)),
        ("Format", settings.output_format.to_string()),
        ("Size", settings.size_preset.to_string()),
        ("Custom width", text_or_unset(&settings.custom_width)),
        ("Custom height", text_or_unset(&settings.custom_height)),
        ("Alignment", settings.alignment.to_string()),
        ("Scale", format!("{}%", settings.resize_scale.trim())),
        (
            "Workers",
            settings
                .max_processes
                .map(|n| n.to_string())
                .unwrap_or_else(|| "auto".to_string()),
        ),
    ];

    let mut lines = vec![format!("Settings ({})", settings_file.display())];
    for (key, value) in rows {
        lines.push(format!("{}{:<16}{}", indent(1), format!("{key}:"), value));
    }
    lines
}

/// Print the effective settings to stdout.
pub fn print_settings(settings: &Settings, settings_file: &Path) {
    for line in format_settings(settings, settings_file) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn written(input: &str, output: &str) -> ItemOutcome {
        ItemOutcome::Written {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        }
    }

    fn failed(input: &str, error: &str) -> ItemOutcome {
        ItemOutcome::Failed {
            input: PathBuf::from(input),
            error: error.to_string(),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn display_name_falls_back_to_path() {
        assert_eq!(display_name(Path::new("/in/a.png")), "a.png");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
        assert_eq!(plural(3, "image"), "3 images");
    }

    // =========================================================================
    // Process event formatting tests
    // =========================================================================

    #[test]
    fn format_batch_started() {
        let event = ProcessEvent::BatchStarted {
            total: 3,
            output_dir: PathBuf::from("/out"),
        };
        assert_eq!(format_process_event(&event), vec!["Compositing 3 images → /out"]);
    }

    #[test]
    fn format_item_written() {
        let event = ProcessEvent::ItemFinished {
            index: 2,
            total: 3,
            outcome: written("/in/beach.png", "/out/beach_composited.png"),
        };
        assert_eq!(
            format_process_event(&event),
            vec!["    002 beach.png → beach_composited.png"]
        );
    }

    #[test]
    fn format_item_failed() {
        let event = ProcessEvent::ItemFinished {
            index: 1,
            total: 1,
            outcome: failed("/in/broken.jpg", "cannot decode"),
        };
        assert_eq!(
            format_process_event(&event),
            vec!["    001 broken.jpg: failed", "        Error: cannot decode"]
        );
    }

    // =========================================================================
    // Summary formatting tests
    // =========================================================================

    #[test]
    fn summary_all_succeeded() {
        let result = sample_result(vec![
            written("/in/a.png", "/out/a_composited.png"),
            written("/in/b.png", "/out/b_composited.png"),
        ]);
        assert_eq!(
            format_batch_summary(&result),
            vec!["Batch complete: 2 of 2 succeeded, 0 failed"]
        );
    }

    #[test]
    fn summary_lists_failures_with_batch_position() {
        let result = sample_result(vec![
            written("/in/a.png", "/out/a_composited.png"),
            failed("/in/broken.jpg", "cannot decode"),
            written("/in/c.png", "/out/c_composited.png"),
        ]);
        assert_eq!(
            format_batch_summary(&result),
            vec![
                "Batch complete: 2 of 3 succeeded, 1 failed",
                "Failed",
                "    002 broken.jpg",
                "        Source: /in/broken.jpg",
                "        Error: cannot decode",
            ]
        );
    }

    fn sample_result(outcomes: Vec<ItemOutcome>) -> BatchResult {
        BatchResult {
            attempted: outcomes.len(),
            succeeded: outcomes.iter().filter(|o| o.is_success()).count(),
            outcomes,
        }
    }

    // =========================================================================
    // Settings formatting tests
    // =========================================================================

    #[test]
    fn settings_show_defaults() {
        let lines = format_settings(&Settings::default(), Path::new("/cfg/settings.toml"));
        assert_eq!(lines[0], "Settings (/cfg/settings.toml)");
        assert!(lines.contains(&"    Background:     (not set)".to_string()));
        assert!(lines.contains(&"    Postfix:        _composited".to_string()));
        assert!(lines.contains(&"    Alignment:      center".to_string()));
        assert!(lines.contains(&"    Scale:          90%".to_string()));
        assert!(lines.contains(&"    Workers:        auto".to_string()));
    }
}
