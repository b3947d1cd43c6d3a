//! Composition backends.
//!
//! A [`Compositor`] performs the three image operations assembly needs:
//! laying out equally sized cells into a grid (used once per row and once
//! for the full canvas) and trimming uniform borders off the result.
//! Calls are blocking and are run on tokio's blocking pool by the assembler.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised by a composition backend.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// The external tool could not be started
    #[error("Compositor not available at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran but reported failure
    #[error("{operation} exited with {status}")]
    ToolFailed {
        operation: &'static str,
        status: ExitStatus,
    },

    /// Decoding or encoding an image failed
    #[error("Image error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Reading or writing an image file failed
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inputs do not fit the requested layout
    #[error("Invalid montage: {0}")]
    InvalidLayout(String),
}

/// Grid arrangement of equally sized cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MontageLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl MontageLayout {
    /// One row of `columns` square cells.
    pub fn row(columns: u32, tile_size: u32) -> Self {
        Self {
            columns,
            rows: 1,
            cell_width: tile_size,
            cell_height: tile_size,
        }
    }

    /// `rows` full-width row strips stacked vertically.
    pub fn stack(rows: u32, row_width: u32, tile_size: u32) -> Self {
        Self {
            columns: 1,
            rows,
            cell_width: row_width,
            cell_height: tile_size,
        }
    }

    /// Number of cells in the layout.
    pub fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Pixel size of the composed image.
    pub fn output_size(&self) -> (u64, u64) {
        (
            self.columns as u64 * self.cell_width as u64,
            self.rows as u64 * self.cell_height as u64,
        )
    }

    /// Top-left pixel of the cell at `index` (row-major).
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let col = index as u32 % self.columns;
        let row = index as u32 / self.columns;
        (col * self.cell_width, row * self.cell_height)
    }
}

/// Backend that composes and trims image files.
pub trait Compositor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Lays out `inputs` row-major into `layout` and writes `output`.
    ///
    /// Each input occupies one cell, top-left aligned, with no gaps.
    fn montage(
        &self,
        inputs: &[PathBuf],
        layout: MontageLayout,
        output: &Path,
    ) -> Result<(), CompositionError>;

    /// Strips uniform borders from `input` and writes `output`.
    ///
    /// Returns the dimensions of the written image.
    fn trim(&self, input: &Path, output: &Path) -> Result<(u32, u32), CompositionError>;
}

pub(super) fn check_inputs(inputs: &[PathBuf], layout: MontageLayout) -> Result<(), CompositionError> {
    if layout.columns == 0 || layout.rows == 0 {
        return Err(CompositionError::InvalidLayout(format!(
            "empty grid {}x{}",
            layout.columns, layout.rows
        )));
    }
    if inputs.len() != layout.cells() {
        return Err(CompositionError::InvalidLayout(format!(
            "{} inputs for a {}x{} grid",
            inputs.len(),
            layout.columns,
            layout.rows
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout() {
        let layout = MontageLayout::row(4, 256);
        assert_eq!(layout.cells(), 4);
        assert_eq!(layout.output_size(), (1024, 256));
        assert_eq!(layout.cell_origin(2), (512, 0));
    }

    #[test]
    fn test_stack_layout() {
        let layout = MontageLayout::stack(3, 1024, 256);
        assert_eq!(layout.output_size(), (1024, 768));
        assert_eq!(layout.cell_origin(2), (0, 512));
    }

    #[test]
    fn test_check_inputs_count() {
        let layout = MontageLayout::row(2, 8);
        assert!(check_inputs(&[PathBuf::from("a")], layout).is_err());
        assert!(check_inputs(&[PathBuf::from("a"), PathBuf::from("b")], layout).is_ok());
    }
}
