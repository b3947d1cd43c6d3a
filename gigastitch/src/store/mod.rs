//! Tile persistence
//!
//! [`TileStore`] models which tiles of a panorama are already on disk and
//! persists newly fetched ones. Presence is what makes runs resumable: a tile
//! that exists is never fetched again.

mod disk;

pub use disk::DiskTileStore;

use crate::grid::TileCoord;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from tile persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the tile directory
    #[error("Failed to create tile directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or publish a tile file
    #[error("Failed to write tile {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Storage for the tiles of one `(photo, level)` grid.
///
/// Implementations must make [`write`](TileStore::write) all-or-nothing: a
/// tile interrupted mid-write must not be reported by
/// [`exists`](TileStore::exists) on a later run.
pub trait TileStore: Send + Sync {
    /// Returns true if the tile is already stored.
    fn exists(&self, coord: TileCoord) -> impl Future<Output = bool> + Send;

    /// Stores the bytes of a tile.
    fn write(
        &self,
        coord: TileCoord,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Location of the tile, used by assembly to read it back.
    fn path(&self, coord: TileCoord) -> PathBuf;
}
