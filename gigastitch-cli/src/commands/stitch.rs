//! Stitch command - download one panorama and compose it.

use std::path::PathBuf;
use std::sync::Arc;

use gigastitch::acquisition::AcquisitionResult;
use gigastitch::config::{clamp_parallel_downloads, expand_tilde, ConfigFile};
use gigastitch::pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::CompositorArg;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Number of failed coordinates listed in the summary.
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the stitch command.
#[derive(Debug, Clone, Default)]
pub struct StitchArgs {
    pub photo_id: u64,
    pub level: i64,
    pub output: Option<PathBuf>,
    pub parallel: Option<usize>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub compositor: Option<CompositorArg>,
    pub magick_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub config: Option<PathBuf>,
    pub debug: bool,
    pub quiet: bool,
}

/// Run the stitch command.
pub fn run(args: StitchArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug, args.quiet)?;
    runner.log_startup("stitch");

    let config = resolve_config(runner.config(), &args);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;
    let _guard = runtime.enter();

    let client = Arc::new(runner.create_client(config.download.timeout())?);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        if !interrupt.is_cancelled() {
            warn!("Interrupt received, finishing tiles in progress");
            interrupt.cancel();
        }
    })
    .map_err(|e| CliError::Runtime(format!("Failed to set signal handler: {}", e)))?;

    info!(
        photo_id = args.photo_id,
        level = args.level,
        output = %config.output_dir.display(),
        compositor = %config.assembly.compositor(),
        "Processing panorama"
    );

    let pipeline = Pipeline::new(client, config);
    let outcome = runtime.block_on(pipeline.run(args.photo_id, args.level, &cancel))?;

    report(&outcome)
}

/// Applies command-line overrides on top of the config file.
fn resolve_config(file: &ConfigFile, args: &StitchArgs) -> PipelineConfig {
    let mut config = PipelineConfig::from_config_file(file);

    if let Some(output) = &args.output {
        config.output_dir = expand_tilde(&output.to_string_lossy());
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(parallel) = args.parallel {
        config.download = config
            .download
            .with_parallel_downloads(clamp_parallel_downloads(parallel));
    }
    if let Some(timeout) = args.timeout {
        config.download = config.download.with_timeout_secs(timeout);
    }
    if let Some(retries) = args.retries {
        config.download = config.download.with_max_retries(retries);
    }
    if let Some(compositor) = args.compositor {
        config.assembly = config.assembly.with_compositor(compositor.into());
    }
    if let Some(path) = &args.magick_path {
        config.assembly = config.assembly.with_magick_path(path.clone());
    }

    config
}

fn report(outcome: &PipelineOutcome) -> Result<(), CliError> {
    let grid = outcome.grid();
    let acquisition = outcome.acquisition();

    println!();
    println!(
        "Level {} of {}: {}x{} pixels, {} x {} tiles",
        grid.level, grid.max_level, grid.width, grid.height, grid.tile_columns, grid.tile_rows
    );
    println!(
        "Tiles: {} downloaded ({:.2} MB), {} reused",
        acquisition.downloaded,
        acquisition.bytes as f64 / 1_048_576.0,
        acquisition.reused
    );

    match outcome {
        PipelineOutcome::Completed { artifact, .. } => {
            println!("Done: {}", artifact.display());
            Ok(())
        }
        PipelineOutcome::Incomplete { acquisition, .. } => {
            for line in failure_lines(acquisition) {
                println!("{}", line);
            }
            Err(CliError::Incomplete {
                failed: acquisition.failed,
                cancelled: acquisition.cancelled,
            })
        }
    }
}

/// Lists the first failed coordinates of an incomplete run.
fn failure_lines(acquisition: &AcquisitionResult) -> Vec<String> {
    let mut lines = Vec::new();
    if acquisition.failed_coordinates.is_empty() {
        return lines;
    }

    lines.push("Failed tiles (row, col):".to_string());
    lines.extend(
        acquisition
            .failed_coordinates
            .iter()
            .take(MAX_LISTED_FAILURES)
            .map(|coord| format!("  {}", coord)),
    );
    let remaining = acquisition
        .failed_coordinates
        .len()
        .saturating_sub(MAX_LISTED_FAILURES);
    if remaining > 0 {
        lines.push(format!("  ... and {} more", remaining));
    }
    lines
}
