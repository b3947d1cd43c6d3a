//! Grid type definitions

use std::fmt;
use thiserror::Error;

/// Position of one tile within the grid of a single pyramid level.
///
/// Ordering is row-major, so a `BTreeSet<TileCoord>` iterates the same way
/// tiles are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Y position, 0 at the top edge
    pub row: u32,
    /// X position, 0 at the left edge
    pub col: u32,
}

impl TileCoord {
    /// Creates a tile coordinate.
    #[inline]
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Tile grid for one pyramid level of one panorama.
///
/// Produced by [`resolve`](super::resolve) and immutable for the rest of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGrid {
    /// Highest level offered by the pyramid
    pub max_level: u32,
    /// Level actually fetched (never the `0` sentinel)
    pub level: u32,
    /// Downsampling factor relative to `max_level`, always a power of two
    pub scale: u64,
    /// Logical pixel width at this level
    pub width: u32,
    /// Logical pixel height at this level
    pub height: u32,
    /// Edge length of a square tile in pixels
    pub tile_size: u32,
    /// Number of tile columns
    pub tile_columns: u32,
    /// Number of tile rows
    pub tile_rows: u32,
}

impl ResolvedGrid {
    /// Total number of tiles in the grid.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tile_columns as usize * self.tile_rows as usize
    }

    /// Width of the un-trimmed canvas built from full-size tiles.
    #[inline]
    pub fn canvas_width(&self) -> u64 {
        self.tile_columns as u64 * self.tile_size as u64
    }

    /// Height of the un-trimmed canvas built from full-size tiles.
    #[inline]
    pub fn canvas_height(&self) -> u64 {
        self.tile_rows as u64 * self.tile_size as u64
    }

    /// Returns an iterator over every tile coordinate.
    ///
    /// Coordinates are yielded in row-major order (row 0 all columns, row 1
    /// all columns, etc.).
    #[inline]
    pub fn coords(&self) -> GridCoordsIterator {
        GridCoordsIterator {
            columns: self.tile_columns,
            total: self.tile_count(),
            current: 0,
        }
    }

    /// Returns true if the coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.row < self.tile_rows && coord.col < self.tile_columns
    }
}

/// Iterator over all coordinates of a grid in row-major order.
#[derive(Debug, Clone)]
pub struct GridCoordsIterator {
    columns: u32,
    total: usize,
    current: usize,
}

impl Iterator for GridCoordsIterator {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }

        let columns = self.columns as usize;
        let row = (self.current / columns) as u32;
        let col = (self.current % columns) as u32;

        self.current += 1;

        Some(TileCoord { row, col })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCoordsIterator {}

/// Errors from grid resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Requested level is negative or above the top of the pyramid
    #[error("Invalid level {requested}: {}", allowed_levels(.max_level))]
    InvalidLevel { requested: i64, max_level: u32 },
}

fn allowed_levels(max_level: &u32) -> String {
    match max_level {
        // Single-level pyramid: the sentinel is the only valid choice
        0 => "this panorama has a single level, use 0".to_string(),
        1 => "must be 0 (highest) or 1".to_string(),
        n => format!("must be 0 (highest) or between 1 and {}", n),
    }
}
