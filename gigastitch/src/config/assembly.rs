//! Image assembly configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::defaults::{
    default_magick_path, default_parallel_rows, DEFAULT_JPEG_QUALITY, DEFAULT_TRIM_FUZZ,
};
use super::settings::AssemblySettings;

/// Composition backend used to build row strips and the final canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositorKind {
    /// In-process raster composition
    #[default]
    Raster,
    /// External ImageMagick `montage`/`convert`
    Magick,
}

impl FromStr for CompositorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raster" => Ok(Self::Raster),
            "magick" | "imagemagick" => Ok(Self::Magick),
            other => Err(format!("unknown compositor '{}'", other)),
        }
    }
}

impl fmt::Display for CompositorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => write!(f, "raster"),
            Self::Magick => write!(f, "magick"),
        }
    }
}

/// Configuration for image assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    compositor: CompositorKind,
    magick_path: PathBuf,
    trim_fuzz: u8,
    jpeg_quality: u8,
    parallel_rows: usize,
}

impl AssemblyConfig {
    /// Create a new assembly configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[assembly]` section of the config file.
    pub fn from_settings(settings: &AssemblySettings) -> Self {
        Self::new()
            .with_compositor(settings.compositor)
            .with_magick_path(settings.magick_path.clone())
            .with_trim_fuzz(settings.trim_fuzz)
            .with_jpeg_quality(settings.jpeg_quality)
            .with_parallel_rows(settings.parallel_rows)
    }

    pub fn with_compositor(mut self, compositor: CompositorKind) -> Self {
        self.compositor = compositor;
        self
    }

    pub fn with_magick_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.magick_path = path.into();
        self
    }

    /// Set the per-channel trim tolerance (0 = exact match).
    pub fn with_trim_fuzz(mut self, fuzz: u8) -> Self {
        self.trim_fuzz = fuzz;
        self
    }

    /// Set JPEG quality, clamped to 1-100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the number of rows composed concurrently (at least 1).
    pub fn with_parallel_rows(mut self, rows: usize) -> Self {
        self.parallel_rows = rows.max(1);
        self
    }

    pub fn compositor(&self) -> CompositorKind {
        self.compositor
    }

    pub fn magick_path(&self) -> &Path {
        &self.magick_path
    }

    pub fn trim_fuzz(&self) -> u8 {
        self.trim_fuzz
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn parallel_rows(&self) -> usize {
        self.parallel_rows
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            compositor: CompositorKind::Raster,
            magick_path: default_magick_path(),
            trim_fuzz: DEFAULT_TRIM_FUZZ,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            parallel_rows: default_parallel_rows(),
        }
    }
}
