//! Per-tile outcomes and their aggregate.

use crate::grid::TileCoord;
use crate::provider::ProviderError;
use crate::store::StoreError;
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a single tile could not be stored.
#[derive(Debug, Error)]
pub enum TileError {
    /// The host did not deliver the tile
    #[error("fetch failed: {0}")]
    Fetch(#[from] ProviderError),

    /// The request did not finish in time
    #[error("fetch timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The tile arrived but could not be persisted
    #[error("write failed: {0}")]
    Write(#[from] StoreError),
}

/// What happened to one coordinate during a run.
#[derive(Debug)]
pub enum TileOutcome {
    /// Fetched and stored in this run
    Downloaded { bytes: u64, attempts: u32 },
    /// Already present from an earlier run
    Reused,
    /// Every attempt failed; the tile stays missing on disk
    Failed { attempts: u32, error: TileError },
    /// Not attempted, or abandoned, because the run was cancelled
    Cancelled,
}

/// Aggregate of all tile outcomes of one acquisition run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionResult {
    /// Tiles fetched in this run
    pub downloaded: usize,
    /// Tiles present before this run
    pub reused: usize,
    /// Tiles that failed after all attempts
    pub failed: usize,
    /// Tiles not completed because of cancellation
    pub cancelled: usize,
    /// Bytes fetched in this run
    pub bytes: u64,
    /// Coordinates of failed tiles, row-major
    pub failed_coordinates: BTreeSet<TileCoord>,
}

impl AcquisitionResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one tile outcome into the totals.
    pub fn record(&mut self, coord: TileCoord, outcome: &TileOutcome) {
        match outcome {
            TileOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            TileOutcome::Reused => self.reused += 1,
            TileOutcome::Failed { .. } => {
                self.failed += 1;
                self.failed_coordinates.insert(coord);
            }
            TileOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Records a tile whose worker died without reporting.
    pub fn record_lost(&mut self, coord: TileCoord) {
        self.failed += 1;
        self.failed_coordinates.insert(coord);
    }

    /// Number of coordinates accounted for.
    #[inline]
    pub fn total(&self) -> usize {
        self.downloaded + self.reused + self.failed + self.cancelled
    }

    /// Number of tiles still missing on disk.
    #[inline]
    pub fn missing(&self) -> usize {
        self.failed + self.cancelled
    }

    /// Returns true if every tile is on disk and assembly may proceed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }
}
