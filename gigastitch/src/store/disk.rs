//! Filesystem-backed tile store.

use super::{StoreError, TileStore};
use crate::grid::TileCoord;
use crate::layout::OutputLayout;
use std::path::PathBuf;
use tracing::trace;

/// Tile store rooted at the photo directory of an [`OutputLayout`].
///
/// Tiles are written to a `.tmp` sibling and renamed into place, so a
/// crash never leaves a truncated file under the final name.
#[derive(Debug, Clone)]
pub struct DiskTileStore {
    layout: OutputLayout,
}

impl DiskTileStore {
    /// Opens the store, creating the photo directory if needed.
    pub async fn open(layout: OutputLayout) -> Result<Self, StoreError> {
        let dir = layout.photo_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        Ok(Self { layout })
    }

    /// Layout this store writes into.
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }
}

impl TileStore for DiskTileStore {
    async fn exists(&self, coord: TileCoord) -> bool {
        // Empty files can be left by tools that write in place; treat them as missing.
        match tokio::fs::metadata(self.path(coord)).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }

    async fn write(&self, coord: TileCoord, data: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path(coord);
        let temp_path = path.with_extension("tmp");

        if let Err(source) = tokio::fs::write(&temp_path, &data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::Write { path, source });
        }

        if let Err(source) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::Write { path, source });
        }

        trace!(row = coord.row, col = coord.col, bytes = data.len(), "Tile stored");
        Ok(())
    }

    fn path(&self, coord: TileCoord) -> PathBuf {
        self.layout.tile_path(coord)
    }
}
