//! Tile download configuration.

use std::time::Duration;

use super::defaults::{
    DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_PARALLEL_DOWNLOADS,
    DEFAULT_RETRY_BASE_DELAY_MS,
};
use super::settings::DownloadSettings;

/// Configuration for tile acquisition.
///
/// # Example
///
/// ```
/// use gigastitch::config::DownloadConfig;
///
/// // Using defaults
/// let config = DownloadConfig::default();
/// assert_eq!(config.timeout_secs(), 30);
/// assert_eq!(config.max_retries(), 0);
/// assert_eq!(config.parallel_downloads(), 8);
///
/// // Custom configuration
/// let config = DownloadConfig::new()
///     .with_timeout_secs(60)
///     .with_max_retries(2)
///     .with_parallel_downloads(4);
/// assert_eq!(config.parallel_downloads(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Maximum time to spend on one tile request (in seconds)
    timeout_secs: u64,
    /// Number of retry attempts per failed tile
    max_retries: u32,
    /// Maximum number of concurrent tile fetches
    parallel_downloads: usize,
    /// Base delay for exponential backoff between retries
    retry_base_delay_ms: u64,
}

impl DownloadConfig {
    /// Create a new download configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[download]` section of the config file.
    pub fn from_settings(settings: &DownloadSettings) -> Self {
        Self::new()
            .with_timeout_secs(settings.timeout)
            .with_max_retries(settings.max_retries)
            .with_parallel_downloads(settings.parallel_downloads)
            .with_retry_base_delay_ms(settings.retry_base_delay_ms)
    }

    /// Set the request timeout in seconds. Default: 30 seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Set the maximum number of retry attempts per tile.
    ///
    /// A failed tile is retried up to this many times within one run
    /// before being reported as failed. Default: 0 (no retry).
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the maximum number of parallel tile fetches.
    ///
    /// Values below 1 are raised to 1 (sequential).
    pub fn with_parallel_downloads(mut self, parallel: usize) -> Self {
        self.parallel_downloads = parallel.max(1);
        self
    }

    /// Set the base delay for retry backoff in milliseconds.
    pub fn with_retry_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.retry_base_delay_ms = delay_ms;
        self
    }

    /// Get the request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Get the request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the maximum number of retry attempts.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the maximum number of parallel tile fetches.
    pub fn parallel_downloads(&self) -> usize {
        self.parallel_downloads
    }

    /// Delay before retry number `attempt` (1-based): base * 2^(attempt-1).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(factor))
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            parallel_downloads: DEFAULT_PARALLEL_DOWNLOADS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}
