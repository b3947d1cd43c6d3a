//! Tile acquisition
//!
//! Fetches every tile of a [`ResolvedGrid`](crate::grid::ResolvedGrid) that
//! the [`TileStore`](crate::store::TileStore) does not already hold. A failed
//! tile never stops the run: each one is attempted, and failures are
//! aggregated into an [`AcquisitionResult`] for the caller to act on.

mod acquire;
mod results;

pub use acquire::TileAcquisition;
pub use results::{AcquisitionResult, TileError, TileOutcome};
