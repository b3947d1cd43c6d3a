//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use gigastitch::config::ConfigFileError;
use gigastitch::metadata::MetadataError;
use gigastitch::pipeline::PipelineError;
use gigastitch::provider::ProviderError;
use std::fmt;
use std::process;

/// Exit code for fatal errors.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when tiles are still missing after the run.
pub const EXIT_INCOMPLETE: i32 = 3;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create the HTTP client
    HttpClient(ProviderError),
    /// Failed to start the async runtime or signal handler
    Runtime(String),
    /// A pipeline stage failed
    Pipeline(PipelineError),
    /// The run finished with tiles still missing
    Incomplete { failed: usize, cancelled: usize },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Incomplete { .. } => EXIT_INCOMPLETE,
            _ => EXIT_FAILURE,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        match self {
            CliError::Incomplete { .. } => eprintln!("{}", self),
            _ => eprintln!("Error: {}", self),
        }

        // Print additional help for specific errors
        match self {
            CliError::Pipeline(PipelineError::Metadata(MetadataError::Fetch { .. })) => {
                eprintln!();
                eprintln!("Check that:");
                eprintln!("  1. The photo ID exists on the host");
                eprintln!("  2. base_url in config.ini (or --base-url) is correct");
                eprintln!("  3. The network is reachable");
            }
            CliError::Pipeline(PipelineError::Assembly(_)) => {
                eprintln!();
                eprintln!("Downloaded tiles were kept; re-running skips straight to assembly.");
                eprintln!("With --compositor magick, make sure ImageMagick 7 is installed");
                eprintln!("and magick_path (or --magick-path) points to the executable.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Incomplete { failed, cancelled } if *cancelled > 0 => write!(
                f,
                "Interrupted with {} tile(s) not downloaded ({} failed). Re-run to resume.",
                cancelled + failed,
                failed
            ),
            CliError::Incomplete { failed, .. } => write!(
                f,
                "{} tile(s) failed to download. Retry recommended.",
                failed
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::HttpClient(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigastitch::grid::GridError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("bad".into()).exit_code(), EXIT_FAILURE);
        assert_eq!(
            CliError::Incomplete {
                failed: 1,
                cancelled: 0
            }
            .exit_code(),
            EXIT_INCOMPLETE
        );
    }

    #[test]
    fn test_incomplete_message() {
        let err = CliError::Incomplete {
            failed: 3,
            cancelled: 0,
        };
        assert_eq!(
            err.to_string(),
            "3 tile(s) failed to download. Retry recommended."
        );

        let err = CliError::Incomplete {
            failed: 1,
            cancelled: 4,
        };
        assert!(err.to_string().contains("5 tile(s) not downloaded"));
    }

    #[test]
    fn test_pipeline_error_message() {
        let err: CliError = PipelineError::Grid(GridError::InvalidLevel {
            requested: 9,
            max_level: 4,
        })
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid level 9: must be 0 (highest) or between 1 and 4"
        );
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
