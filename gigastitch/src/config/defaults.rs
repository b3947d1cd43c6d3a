//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use super::CompositorKind;
use crate::source::DEFAULT_BASE_URL;

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Default HTTP request timeout in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent tile fetches.
///
/// The host is a single community server; a handful of connections is
/// already several times faster than fetching one tile at a time.
pub const DEFAULT_PARALLEL_DOWNLOADS: usize = 8;

/// Minimum concurrent tile fetches (strictly sequential).
pub const MIN_PARALLEL_DOWNLOADS: usize = 1;

/// Maximum concurrent tile fetches.
pub const MAX_PARALLEL_DOWNLOADS: usize = 64;

/// Default retry attempts per tile. Failed tiles are picked up by the next run.
pub const DEFAULT_MAX_RETRIES: u32 = 0;

/// Default base delay for retry backoff in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 100;

/// Default per-channel trim tolerance.
///
/// Padding is black in the source tiles but JPEG noise lifts it slightly.
pub const DEFAULT_TRIM_FUZZ: u8 = 10;

/// Default JPEG quality for composed images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default number of rows composed concurrently.
pub fn default_parallel_rows() -> usize {
    num_cpus()
}

/// Default ImageMagick executable for the current platform.
pub fn default_magick_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\Program Files\\ImageMagick-7.1.1-Q16-HDRI\\magick.exe")
    } else {
        PathBuf::from("/usr/bin/magick")
    }
}

/// Clamps download concurrency to the valid range and logs a warning if clamped.
pub fn clamp_parallel_downloads(value: usize) -> usize {
    if value < MIN_PARALLEL_DOWNLOADS {
        tracing::warn!(
            requested = value,
            min = MIN_PARALLEL_DOWNLOADS,
            "parallel_downloads below minimum, clamping to {}",
            MIN_PARALLEL_DOWNLOADS
        );
        MIN_PARALLEL_DOWNLOADS
    } else if value > MAX_PARALLEL_DOWNLOADS {
        tracing::warn!(
            requested = value,
            max = MAX_PARALLEL_DOWNLOADS,
            "parallel_downloads above maximum, clamping to {} (prevents host rate limiting)",
            MAX_PARALLEL_DOWNLOADS
        );
        MAX_PARALLEL_DOWNLOADS
    } else {
        value
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            source: SourceSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            download: DownloadSettings {
                timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
                parallel_downloads: DEFAULT_PARALLEL_DOWNLOADS,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            },
            assembly: AssemblySettings {
                compositor: CompositorKind::Raster,
                magick_path: default_magick_path(),
                trim_fuzz: DEFAULT_TRIM_FUZZ,
                jpeg_quality: DEFAULT_JPEG_QUALITY,
                parallel_rows: default_parallel_rows(),
            },
            output: OutputSettings {
                directory: PathBuf::from("."),
            },
            logging: LoggingSettings {
                file: config_dir.join("gigastitch.log"),
            },
        }
    }
}
