use clap::{ArgAction, Parser, Subcommand};
use snapback::config::{self, OutputFolder, Settings};
use snapback::imaging::{Alignment, ImageBackend, OutputFormat, RustBackend, SizePreset};
use snapback::paths::AppPaths;
use snapback::process::{self, BatchRequest, CompositeRequest, ProcessError};
use snapback::scan::{InputSource, image_count_message};
use snapback::{output, staging};
use std::path::{Path, PathBuf};
use tracing::warn;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "snapback")]
#[command(about = "Composite foreground images onto a background")]
#[command(long_about = "\
Composite foreground images onto a background

Every input image is scaled relative to its own size, aligned on the
(optionally resized) background and written next to the inputs, on the
desktop or into a folder of your choice.

Inputs are given the way they would be dropped onto a window:

  snapback batch photos/                 # every png/jpg/jpeg/webp in the folder
  snapback batch photos/one.jpg          # a single image
  snapback batch a.png b.jpg c.webp      # several files, staged into one batch

Output names are <name>_composited.<ext>; existing files are never
overwritten, a (1), (2), ... suffix is added instead. Unreadable inputs are
reported and skipped, the rest of the batch still runs.

Settings persist in settings.toml (see 'snapback config path'). Flags
override them for one run; add --save to keep the result.
Run 'snapback gen-config' to print a documented settings file.")]
#[command(version = version_string())]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file to use instead of the per-user one
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Per-run overrides of the stored settings.
#[derive(clap::Args)]
struct Overrides {
    /// Background image
    #[arg(long, short = 'b')]
    background: Option<PathBuf>,

    /// Foreground scale in percent of its own size (invalid values mean 100)
    #[arg(long, short = 's')]
    scale: Option<String>,

    /// center, top-left, top-right, bottom-left or bottom-right
    #[arg(long, short = 'a')]
    align: Option<String>,

    /// same-as-background, 1920x1080, 1920x1280 or custom
    #[arg(long)]
    size: Option<SizePreset>,

    /// Canvas width for --size custom
    #[arg(long)]
    width: Option<String>,

    /// Canvas height for --size custom
    #[arg(long)]
    height: Option<String>,

    /// png, jpg, jpeg or webp
    #[arg(long, short = 'f')]
    format: Option<OutputFormat>,

    /// Appended to each output's base name
    #[arg(long)]
    postfix: Option<String>,

    /// same-as-input, desktop or custom
    #[arg(long)]
    output_folder: Option<OutputFolder>,

    /// Write outputs here (implies --output-folder custom)
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Cap on parallel workers
    #[arg(long)]
    max_processes: Option<usize>,
}

impl Overrides {
    fn apply(&self, settings: &mut Settings) -> Result<(), ProcessError> {
        if let Some(background) = &self.background {
            let picked = staging::background_from_drop(std::slice::from_ref(background));
            settings.background_path = Some(picked.ok_or_else(|| {
                ProcessError::Validation(format!(
                    "{} is not a supported background image.",
                    background.display()
                ))
            })?);
        }
        if let Some(scale) = &self.scale {
            settings.resize_scale = scale.clone();
        }
        if let Some(align) = &self.align {
            if Alignment::parse(align).is_none() {
                warn!(alignment = %align, "unknown alignment, using top-left");
            }
            settings.alignment = Alignment::from_label(align);
        }
        if let Some(size) = self.size {
            settings.size_preset = size;
        }
        if let Some(width) = &self.width {
            settings.custom_width = width.clone();
        }
        if let Some(height) = &self.height {
            settings.custom_height = height.clone();
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if let Some(postfix) = &self.postfix {
            settings.filename_postfix = postfix.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.custom_output_path = Some(dir.clone());
            settings.output_folder = OutputFolder::Custom;
        }
        if let Some(folder) = self.output_folder {
            settings.output_folder = folder;
        }
        if let Some(n) = self.max_processes {
            settings.max_processes = Some(n);
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Composite every input onto the background and write the results
    Batch {
        /// Input folder, a single image, or several images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,

        /// Print the batch result as JSON instead of progress lines
        #[arg(long)]
        json: bool,

        /// Persist the effective settings after the run
        #[arg(long)]
        save: bool,
    },
    /// Render one composite from the first input image without a batch
    Preview {
        /// Input folder, a single image, or several images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Where to write the preview (format from the extension, png otherwise)
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Persist the effective settings after the run
        #[arg(long)]
        save: bool,
    },
    /// Inspect or change the stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print a stock settings.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Print the settings file location
    Path,
    /// Restore the default settings
    Reset,
    /// Change stored settings
    Set(Overrides),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);

    let mut paths = AppPaths::discover();
    if let Some(settings_file) = &cli.settings {
        paths = paths.with_settings_file(settings_file.clone());
    }

    // Staged drops never outlive the process
    staging::with_exit_cleanup(&paths, || run(cli.command, &paths))
}

fn run(command: Command, paths: &AppPaths) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Batch {
            inputs,
            overrides,
            json,
            save,
        } => {
            let mut settings = Settings::load(&paths.settings_file);
            overrides.apply(&mut settings)?;
            init_thread_pool(settings.max_processes);

            let input = resolve_input(&inputs, paths)?;
            let request = BatchRequest::from_settings(&settings, &input, paths)?;

            if json {
                let result = process::run_batch(&request, paths, None)?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", image_count_message(&input));
                let (tx, rx) = std::sync::mpsc::channel();
                let printer = std::thread::spawn(move || {
                    for event in rx {
                        output::print_process_event(&event);
                    }
                });
                let result = process::run_batch(&request, paths, Some(tx));
                printer
                    .join()
                    .map_err(|_| "progress printer panicked")?;
                output::print_batch_summary(&result?);
            }

            if save {
                settings.save_or_log(&paths.settings_file);
            }
        }
        Command::Preview {
            inputs,
            out,
            overrides,
            save,
        } => {
            let mut settings = Settings::load(&paths.settings_file);
            overrides.apply(&mut settings)?;

            let input = resolve_input(&inputs, paths)?;
            let request = CompositeRequest::for_preview(&settings, &input)?;
            let image = process::preview(&request)?;

            let format = out
                .extension()
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse::<OutputFormat>().ok())
                .unwrap_or_default();
            RustBackend::new().save(&image, &out, format)?;
            println!(
                "Preview {}x{} from {} → {}",
                image.width(),
                image.height(),
                request.foreground.display(),
                out.display()
            );

            if save {
                settings.save_or_log(&paths.settings_file);
            }
        }
        Command::Config { action } => run_config(action, &paths.settings_file)?,
        Command::GenConfig => {
            print!("{}", config::stock_settings_toml());
        }
    }

    Ok(())
}

fn run_config(action: ConfigAction, settings_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            output::print_settings(&Settings::load(settings_file), settings_file);
        }
        ConfigAction::Path => {
            println!("{}", settings_file.display());
        }
        ConfigAction::Reset => {
            Settings::default().save(settings_file)?;
            println!("Settings reset: {}", settings_file.display());
        }
        ConfigAction::Set(overrides) => {
            let mut settings = Settings::load(settings_file);
            overrides.apply(&mut settings)?;
            settings.save(settings_file)?;
            output::print_settings(&settings, settings_file);
        }
    }
    Ok(())
}

/// Treat command-line paths like a drop onto the input field.
fn resolve_input(inputs: &[PathBuf], paths: &AppPaths) -> Result<InputSource, ProcessError> {
    let dropped = staging::input_from_drop(inputs, paths)
        .map_err(|e| ProcessError::Validation(e.to_string()))?;
    dropped.ok_or_else(|| {
        ProcessError::Validation("Please select a valid input folder or image.".to_string())
    })
}

/// Initialize the rayon thread pool from `max_processes`.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(max_processes: Option<usize>) {
    let threads = config::effective_threads(max_processes);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
