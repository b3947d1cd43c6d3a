//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and client creation.

use crate::error::CliError;
use gigastitch::config::ConfigFile;
use gigastitch::logging::{init_logging, split_log_path, LoggingGuard};
use gigastitch::provider::AsyncReqwestClient;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to use instead of `~/.gigastitch/config.ini`
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    /// * `quiet` - When true, log only to the log file
    pub fn new(config_path: Option<&Path>, debug_mode: bool, quiet: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file '{}' does not exist",
                        path.display()
                    )));
                }
                ConfigFile::load_from(path)?
            }
            None => ConfigFile::load()?,
        };

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, !quiet, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("gigastitch v{}", gigastitch::VERSION);
        info!(
            log_file = %self.config.logging.file.display(),
            "gigastitch CLI: {} command",
            command
        );
    }

    /// Create the HTTP client used for metadata and tiles.
    pub fn create_client(&self, timeout: Duration) -> Result<AsyncReqwestClient, CliError> {
        AsyncReqwestClient::with_timeout(timeout).map_err(CliError::HttpClient)
    }
}
