//! Pyramid grid calculation
//!
//! Turns panorama metadata and a requested level into the concrete grid of
//! tiles that has to be fetched. Everything here is integer arithmetic: the
//! ceiling and floor rules decide exactly which tiles are downloaded.

mod types;

pub use types::{GridCoordsIterator, GridError, ResolvedGrid, TileCoord};

use crate::metadata::PanoramaMetadata;

/// Level value that selects the highest resolution available.
pub const HIGHEST_LEVEL: i64 = 0;

/// Computes the highest level of the pyramid.
///
/// This is the smallest `n` such that `tile_size × 2^n` covers the longer
/// image side, i.e. `ceil(log2(max(tiles_x, tiles_y)))` at full resolution.
pub fn max_level(metadata: &PanoramaMetadata) -> u32 {
    let tile_size = metadata.tile_size as u64;
    let tiles_x = (metadata.max_width as u64).div_ceil(tile_size);
    let tiles_y = (metadata.max_height as u64).div_ceil(tile_size);
    let tiles = tiles_x.max(tiles_y).max(1);

    tiles.next_power_of_two().trailing_zeros()
}

/// Resolves the tile grid for a requested level.
///
/// # Arguments
///
/// * `metadata` - Dimensions of the full-resolution panorama
/// * `requested_level` - Pyramid level, where [`HIGHEST_LEVEL`] (`0`) means `max_level`
///
/// # Errors
///
/// Returns [`GridError::InvalidLevel`] if the level is negative or above
/// `max_level`.
pub fn resolve(
    metadata: &PanoramaMetadata,
    requested_level: i64,
) -> Result<ResolvedGrid, GridError> {
    let max_level = max_level(metadata);

    let level = match requested_level {
        HIGHEST_LEVEL => max_level,
        l if l < 0 || l > max_level as i64 => {
            return Err(GridError::InvalidLevel {
                requested: requested_level,
                max_level,
            });
        }
        l => l as u32,
    };

    let scale = 1u64 << (max_level - level);
    let tile_size = metadata.tile_size as u64;

    // Extreme aspect ratios can floor one side to zero at coarse levels;
    // keep at least one pixel so the grid always has a tile.
    let width = (metadata.max_width as u64 / scale).max(1);
    let height = (metadata.max_height as u64 / scale).max(1);

    Ok(ResolvedGrid {
        max_level,
        level,
        scale,
        width: width as u32,
        height: height as u32,
        tile_size: metadata.tile_size,
        tile_columns: width.div_ceil(tile_size) as u32,
        tile_rows: height.div_ceil(tile_size) as u32,
    })
}
