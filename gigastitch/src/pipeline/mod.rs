//! Pipeline orchestration
//!
//! [`Pipeline::run`] drives one panorama through every stage:
//!
//! 1. resolve metadata from the host,
//! 2. compute the grid for the requested level,
//! 3. open the tile store under `<output>/<photo_id>/`,
//! 4. acquire missing tiles,
//! 5. assemble the panorama, only if no tile is missing.
//!
//! Failures in steps 1-3 are fatal [`PipelineError`]s. Tile failures are
//! not: they produce [`PipelineOutcome::Incomplete`], and a later run resumes
//! from the tiles already on disk.

mod orchestrator;
mod outcome;

pub use orchestrator::Pipeline;
pub use outcome::{PipelineError, PipelineOutcome};

use crate::config::{AssemblyConfig, ConfigFile, DownloadConfig};
use crate::source::DEFAULT_BASE_URL;
use std::path::PathBuf;

/// Settings for a [`Pipeline`], resolved once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tile host base URL
    pub base_url: String,
    /// Directory receiving tile folders and final images
    pub output_dir: PathBuf,
    pub download: DownloadConfig,
    pub assembly: AssemblyConfig,
}

impl PipelineConfig {
    /// Default settings writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: output_dir.into(),
            download: DownloadConfig::default(),
            assembly: AssemblyConfig::default(),
        }
    }

    /// Settings from a loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            base_url: config.source.base_url.clone(),
            output_dir: config.output.directory.clone(),
            download: DownloadConfig::from_settings(&config.download),
            assembly: AssemblyConfig::from_settings(&config.assembly),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_download(mut self, download: DownloadConfig) -> Self {
        self.download = download;
        self
    }

    pub fn with_assembly(mut self, assembly: AssemblyConfig) -> Self {
        self.assembly = assembly;
        self
    }
}
