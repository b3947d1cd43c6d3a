//! Panorama assembly
//!
//! Turns a complete tile set into the final image in three steps: each row
//! of tiles is composed into a strip, the strips are stacked into the full
//! canvas, and the uniform padding the host adds to edge tiles is trimmed.
//! The composition itself is delegated to a [`Compositor`] so the in-process
//! [`RasterCompositor`] and the ImageMagick-backed [`MagickCompositor`] are
//! interchangeable.

mod assembler;
mod compositor;
mod magick;
mod raster;
mod trim;

pub use assembler::{AssemblyError, ImageAssembler};
pub use compositor::{CompositionError, Compositor, MontageLayout};
pub use magick::MagickCompositor;
pub use raster::RasterCompositor;
pub use trim::{trim_bounds, TrimBounds};

use crate::config::{AssemblyConfig, CompositorKind};
use std::sync::Arc;

/// Creates the compositor selected by `config`.
pub fn create_compositor(config: &AssemblyConfig) -> Arc<dyn Compositor> {
    match config.compositor() {
        CompositorKind::Raster => Arc::new(RasterCompositor::new(
            config.jpeg_quality(),
            config.trim_fuzz(),
        )),
        CompositorKind::Magick => Arc::new(MagickCompositor::new(
            config.magick_path(),
            config.trim_fuzz(),
        )),
    }
}
