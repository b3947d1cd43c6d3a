//! Common types shared across CLI commands.

use clap::ValueEnum;
use gigastitch::config::{validate_base_url, CompositorKind};

/// Compositor selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CompositorArg {
    /// Compose in-process (no external tools needed)
    Raster,
    /// Use ImageMagick's `magick` executable
    Magick,
}

impl From<CompositorArg> for CompositorKind {
    fn from(arg: CompositorArg) -> Self {
        match arg {
            CompositorArg::Raster => CompositorKind::Raster,
            CompositorArg::Magick => CompositorKind::Magick,
        }
    }
}

/// Value parser for `--base-url`, sharing the config file's validation.
pub fn parse_base_url(value: &str) -> Result<String, String> {
    let value = value.trim();
    validate_base_url(value).map_err(|reason| format!("base URL {}", reason))?;
    Ok(value.trim_end_matches('/').to_string())
}
