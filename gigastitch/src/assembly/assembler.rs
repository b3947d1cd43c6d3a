//! Row, canvas and trim orchestration.

use super::compositor::{CompositionError, Compositor, MontageLayout};
use crate::grid::{ResolvedGrid, TileCoord};
use crate::layout::OutputLayout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that stop assembly.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A tile expected on disk is not there
    #[error("Tile {coord} missing at {path}")]
    MissingTile { coord: TileCoord, path: PathBuf },

    /// The compositor failed on one of the steps
    #[error("Composition failed: {0}")]
    Composition(#[from] CompositionError),

    /// A blocking composition task panicked or was cancelled
    #[error("Composition task failed: {0}")]
    Task(String),
}

/// Builds the final panorama from a complete set of tiles.
pub struct ImageAssembler {
    compositor: Arc<dyn Compositor>,
    parallel_rows: usize,
}

impl ImageAssembler {
    /// Creates an assembler composing at most `parallel_rows` rows at once.
    pub fn new(compositor: Arc<dyn Compositor>, parallel_rows: usize) -> Self {
        Self {
            compositor,
            parallel_rows: parallel_rows.max(1),
        }
    }

    /// Composes rows, stacks them into the canvas, trims it and cleans up.
    ///
    /// Returns the path of the final image. On failure, intermediate images
    /// already written are left in place.
    pub async fn assemble(
        &self,
        grid: &ResolvedGrid,
        layout: &OutputLayout,
    ) -> Result<PathBuf, AssemblyError> {
        self.check_tiles(grid, layout).await?;

        info!(
            compositor = self.compositor.name(),
            rows = grid.tile_rows,
            columns = grid.tile_columns,
            "Download complete, starting stitch"
        );

        let rows = self.compose_rows(grid, layout).await?;

        let stitched = layout.stitched_path();
        let stack = MontageLayout::stack(
            grid.tile_rows,
            grid.tile_columns * grid.tile_size,
            grid.tile_size,
        );
        info!(
            output = %stitched.display(),
            width = grid.canvas_width(),
            height = grid.canvas_height(),
            "Combining all rows"
        );
        self.blocking({
            let compositor = Arc::clone(&self.compositor);
            let rows = rows.clone();
            let stitched = stitched.clone();
            move || compositor.montage(&rows, stack, &stitched)
        })
        .await?;

        let artifact = layout.artifact_path();
        let staging = layout.artifact_staging_path();
        info!(output = %artifact.display(), "Trimming padding");
        let trimmed = self
            .blocking({
                let compositor = Arc::clone(&self.compositor);
                let stitched = stitched.clone();
                let staging = staging.clone();
                move || compositor.trim(&stitched, &staging)
            })
            .await;
        let (width, height) = match trimmed {
            Ok(size) => size,
            Err(e) => {
                discard_staging(&staging).await;
                return Err(e);
            }
        };

        // A previous artifact is only replaced once the new one is complete.
        if let Err(source) = tokio::fs::rename(&staging, &artifact).await {
            discard_staging(&staging).await;
            return Err(CompositionError::Io {
                path: artifact,
                source,
            }
            .into());
        }

        if (width, height) != (grid.width, grid.height) {
            warn!(
                expected_width = grid.width,
                expected_height = grid.height,
                width,
                height,
                "Trimmed size differs from expected panorama size"
            );
        }

        for path in rows.iter().chain(std::iter::once(&stitched)) {
            remove_intermediate(path).await;
        }

        info!(output = %artifact.display(), width, height, "Panorama written");
        Ok(artifact)
    }

    async fn check_tiles(
        &self,
        grid: &ResolvedGrid,
        layout: &OutputLayout,
    ) -> Result<(), AssemblyError> {
        for coord in grid.coords() {
            let path = layout.tile_path(coord);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Err(AssemblyError::MissingTile { coord, path });
            }
        }
        Ok(())
    }

    /// Writes one composite per row, returning their paths in row order.
    async fn compose_rows(
        &self,
        grid: &ResolvedGrid,
        layout: &OutputLayout,
    ) -> Result<Vec<PathBuf>, AssemblyError> {
        let semaphore = Arc::new(Semaphore::new(self.parallel_rows));
        let row_layout = MontageLayout::row(grid.tile_columns, grid.tile_size);
        let mut tasks = JoinSet::new();

        for row in 0..grid.tile_rows {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| AssemblyError::Task(e.to_string()))?;

            let inputs: Vec<PathBuf> = (0..grid.tile_columns)
                .map(|col| layout.tile_path(TileCoord::new(row, col)))
                .collect();
            let output = layout.row_path(row);
            let compositor = Arc::clone(&self.compositor);

            info!(row, "Creating row");
            tasks.spawn_blocking(move || {
                let _permit = permit;
                compositor.montage(&inputs, row_layout, &output)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| AssemblyError::Task(e.to_string()))??;
        }

        Ok((0..grid.tile_rows).map(|row| layout.row_path(row)).collect())
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, AssemblyError>
    where
        F: FnOnce() -> Result<T, CompositionError> + Send + 'static,
        T: Send + 'static,
    {
        let result = tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| AssemblyError::Task(e.to_string()))?;
        Ok(result?)
    }
}

async fn discard_staging(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed partial artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove partial artifact"),
    }
}

async fn remove_intermediate(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed intermediate image"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove intermediate image"),
    }
}
