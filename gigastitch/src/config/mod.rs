//! Configuration for gigastitch.
//!
//! Two layers live here:
//!
//! - [`ConfigFile`]: the user's `~/.gigastitch/config.ini`, parsed into
//!   per-section settings structs with defaults for anything missing.
//! - [`DownloadConfig`] / [`AssemblyConfig`]: runtime builders handed to the
//!   acquisition and assembly stages.
//!
//! # Example
//!
//! ```
//! use gigastitch::config::{AssemblyConfig, CompositorKind, DownloadConfig};
//!
//! let download = DownloadConfig::new().with_parallel_downloads(4);
//! let assembly = AssemblyConfig::new().with_compositor(CompositorKind::Raster);
//! assert_eq!(download.parallel_downloads(), 4);
//! assert_eq!(assembly.compositor(), CompositorKind::Raster);
//! ```

mod assembly;
pub mod defaults;
mod download;
mod file;
mod parser;
mod settings;

pub use assembly::{AssemblyConfig, CompositorKind};
pub use defaults::clamp_parallel_downloads;
pub use download::DownloadConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use parser::{expand_tilde, validate_base_url};
pub use settings::{
    AssemblySettings, ConfigFile, DownloadSettings, LoggingSettings, OutputSettings,
    SourceSettings,
};
