//! On-disk naming for tiles, intermediates and the final artifact.
//!
//! ```text
//! <output>/<photo_id>/RRRR-CCCC.jpg     downloaded tile
//! <output>/<photo_id>/line-RRRR.jpg     row composite (transient)
//! <output>/<photo_id>-stitched.jpg      full canvas before trim (transient)
//! <output>/<photo_id>.partial.jpg       trim output before rename (transient)
//! <output>/<photo_id>.jpg               final artifact
//! ```

use crate::grid::TileCoord;
use std::path::PathBuf;

/// File extension of tiles and composed images.
pub const IMAGE_EXTENSION: &str = "jpg";

/// File name of a tile: zero-padded row and column.
///
/// # Example
///
/// ```
/// use gigastitch::grid::TileCoord;
/// use gigastitch::layout::tile_filename;
///
/// assert_eq!(tile_filename(TileCoord::new(3, 12)), "0003-0012.jpg");
/// ```
pub fn tile_filename(coord: TileCoord) -> String {
    format!("{:04}-{:04}.{}", coord.row, coord.col, IMAGE_EXTENSION)
}

/// File name of a row composite.
pub fn row_filename(row: u32) -> String {
    format!("line-{:04}.{}", row, IMAGE_EXTENSION)
}

/// Paths used by a single panorama under an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    output_dir: PathBuf,
    photo_id: u64,
}

impl OutputLayout {
    /// Creates the layout for `photo_id` under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, photo_id: u64) -> Self {
        Self {
            output_dir: output_dir.into(),
            photo_id,
        }
    }

    /// Photo identifier this layout belongs to.
    pub fn photo_id(&self) -> u64 {
        self.photo_id
    }

    /// Directory holding tiles and row composites.
    pub fn photo_dir(&self) -> PathBuf {
        self.output_dir.join(self.photo_id.to_string())
    }

    /// Path of a downloaded tile.
    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.photo_dir().join(tile_filename(coord))
    }

    /// Path of a row composite.
    pub fn row_path(&self, row: u32) -> PathBuf {
        self.photo_dir().join(row_filename(row))
    }

    /// Path of the full canvas before trimming.
    pub fn stitched_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}-stitched.{}", self.photo_id, IMAGE_EXTENSION))
    }

    /// Path of the final trimmed image.
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.photo_id, IMAGE_EXTENSION))
    }

    /// Path the trim step writes to before it is renamed onto the artifact.
    ///
    /// Keeps the image extension so external tools pick the right encoder.
    pub fn artifact_staging_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.partial.{}", self.photo_id, IMAGE_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_filename_padding() {
        assert_eq!(tile_filename(TileCoord::new(0, 0)), "0000-0000.jpg");
        assert_eq!(tile_filename(TileCoord::new(12, 345)), "0012-0345.jpg");
    }

    #[test]
    fn test_tile_filename_wide_grid() {
        // Padding is a minimum width, larger indices are not truncated
        assert_eq!(tile_filename(TileCoord::new(1, 12345)), "0001-12345.jpg");
    }

    #[test]
    fn test_row_filename() {
        assert_eq!(row_filename(7), "line-0007.jpg");
    }

    #[test]
    fn test_layout_paths() {
        let layout = OutputLayout::new("/out", 231697);

        assert_eq!(layout.photo_dir(), PathBuf::from("/out/231697"));
        assert_eq!(
            layout.tile_path(TileCoord::new(3, 12)),
            PathBuf::from("/out/231697/0003-0012.jpg")
        );
        assert_eq!(
            layout.row_path(2),
            PathBuf::from("/out/231697/line-0002.jpg")
        );
        assert_eq!(
            layout.stitched_path(),
            PathBuf::from("/out/231697-stitched.jpg")
        );
        assert_eq!(layout.artifact_path(), PathBuf::from("/out/231697.jpg"));
        assert_eq!(
            layout.artifact_staging_path(),
            PathBuf::from("/out/231697.partial.jpg")
        );
    }
}
