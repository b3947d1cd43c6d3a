//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing logic.

use super::CompositorKind;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Tile host settings
    pub source: SourceSettings,
    /// Download settings
    pub download: DownloadSettings,
    /// Image assembly settings
    pub assembly: AssemblySettings,
    /// Output location
    pub output: OutputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile host configuration.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Base URL of the tile pyramid host
    pub base_url: String,
}

/// Download configuration.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// Timeout in seconds for each HTTP request
    pub timeout: u64,
    /// Maximum number of tiles fetched concurrently (1 = sequential)
    pub parallel_downloads: usize,
    /// Retry attempts per failed tile within one run (0 = no retry)
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff between retries
    pub retry_base_delay_ms: u64,
}

/// Image assembly configuration.
#[derive(Debug, Clone)]
pub struct AssemblySettings {
    /// Which composition backend to use
    pub compositor: CompositorKind,
    /// ImageMagick executable, used by the `magick` compositor
    pub magick_path: PathBuf,
    /// Per-channel tolerance when trimming uniform borders
    pub trim_fuzz: u8,
    /// JPEG quality for composed images (1-100)
    pub jpeg_quality: u8,
    /// Maximum number of rows composed concurrently
    pub parallel_rows: usize,
}

/// Output configuration.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Directory receiving tile folders and final images
    pub directory: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
