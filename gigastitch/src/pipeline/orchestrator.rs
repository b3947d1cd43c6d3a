//! End-to-end run: metadata, grid, tiles, image.

use super::outcome::{PipelineError, PipelineOutcome};
use super::PipelineConfig;
use crate::acquisition::TileAcquisition;
use crate::assembly::{create_compositor, Compositor, ImageAssembler};
use crate::grid::{self, ResolvedGrid};
use crate::layout::OutputLayout;
use crate::metadata::{MetadataResolver, PanoramaMetadata};
use crate::provider::AsyncHttpClient;
use crate::source::GigapanSource;
use crate::store::DiskTileStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Downloads and stitches panoramas.
pub struct Pipeline<C>
where
    C: AsyncHttpClient + 'static,
{
    client: Arc<C>,
    source: GigapanSource,
    config: PipelineConfig,
    assembler: ImageAssembler,
}

impl<C> Pipeline<C>
where
    C: AsyncHttpClient + 'static,
{
    /// Creates a pipeline using the compositor selected in `config`.
    pub fn new(client: Arc<C>, config: PipelineConfig) -> Self {
        let compositor = create_compositor(&config.assembly);
        Self::with_compositor(client, config, compositor)
    }

    /// Creates a pipeline with an explicit compositor.
    pub fn with_compositor(
        client: Arc<C>,
        config: PipelineConfig,
        compositor: Arc<dyn Compositor>,
    ) -> Self {
        let assembler = ImageAssembler::new(compositor, config.assembly.parallel_rows());
        Self {
            client,
            source: GigapanSource::new(config.base_url.clone()),
            config,
            assembler,
        }
    }

    /// Runs every stage for one panorama.
    ///
    /// Metadata, level and store errors are returned before any tile is
    /// fetched. A run with missing tiles returns
    /// [`PipelineOutcome::Incomplete`] and leaves any existing artifact
    /// untouched.
    pub async fn run(
        &self,
        photo_id: u64,
        requested_level: i64,
        cancel: &CancellationToken,
    ) -> Result<PipelineOutcome, PipelineError> {
        let metadata = MetadataResolver::new(Arc::clone(&self.client), self.source.clone())
            .resolve(photo_id)
            .await?;

        let grid = grid::resolve(&metadata, requested_level)?;
        log_summary(photo_id, &metadata, requested_level, &grid);

        let layout = OutputLayout::new(&self.config.output_dir, photo_id);
        let store = Arc::new(DiskTileStore::open(layout.clone()).await?);

        let acquisition = TileAcquisition::with_config(
            Arc::clone(&self.client),
            store,
            self.source.clone(),
            photo_id,
            self.config.download,
        )
        .acquire(&grid, cancel)
        .await;

        if !acquisition.is_complete() {
            warn!(
                photo_id,
                failed = acquisition.failed,
                cancelled = acquisition.cancelled,
                "Tiles missing, skipping assembly"
            );
            return Ok(PipelineOutcome::Incomplete { grid, acquisition });
        }

        let artifact = self.assembler.assemble(&grid, &layout).await?;

        Ok(PipelineOutcome::Completed {
            artifact,
            grid,
            acquisition,
        })
    }
}

fn log_summary(photo_id: u64, metadata: &PanoramaMetadata, requested_level: i64, grid: &ResolvedGrid) {
    info!(
        photo_id,
        max_width = metadata.max_width,
        max_height = metadata.max_height,
        max_level = grid.max_level,
        tile_size = metadata.tile_size,
        requested_level,
        level = grid.level,
        width = grid.width,
        height = grid.height,
        "Panorama {}: max size {}x{}, level {} of {}, target size {}x{}",
        photo_id,
        metadata.max_width,
        metadata.max_height,
        grid.level,
        grid.max_level,
        grid.width,
        grid.height
    );
    info!(
        columns = grid.tile_columns,
        rows = grid.tile_rows,
        tiles = grid.tile_count(),
        "Grid: {} x {} tiles = {} total",
        grid.tile_columns,
        grid.tile_rows,
        grid.tile_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DownloadConfig;
    use crate::grid::GridError;
    use crate::metadata::MetadataError;
    use crate::provider::{MockAsyncHttpClient, ProviderError};
    use tempfile::TempDir;

    const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <PhotoOverlay>
    <ImagePyramid>
      <tileSize>256</tileSize>
      <maxWidth>4000</maxWidth>
      <maxHeight>3000</maxHeight>
    </ImagePyramid>
  </PhotoOverlay>
</kml>"#;

    fn pipeline(
        response: Result<Vec<u8>, ProviderError>,
        output: &TempDir,
    ) -> Pipeline<MockAsyncHttpClient> {
        let config = PipelineConfig::new(output.path())
            .with_base_url("http://host")
            .with_download(DownloadConfig::new().with_parallel_downloads(2));
        Pipeline::new(Arc::new(MockAsyncHttpClient { response }), config)
    }

    #[tokio::test]
    async fn test_metadata_failure_is_fatal() {
        let output = TempDir::new().unwrap();
        let pipeline = pipeline(
            Err(ProviderError::HttpStatus {
                status: 404,
                url: "http://host/gigapans/1.kml".to_string(),
            }),
            &output,
        );

        let err = pipeline.run(1, 0, &CancellationToken::new()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Metadata(MetadataError::Fetch { photo_id: 1, .. })
        ));
        assert!(!output.path().join("1").exists());
    }

    #[tokio::test]
    async fn test_invalid_level_creates_nothing() {
        let output = TempDir::new().unwrap();
        let pipeline = pipeline(Ok(KML.as_bytes().to_vec()), &output);

        let err = pipeline.run(9, 5, &CancellationToken::new()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Grid(GridError::InvalidLevel {
                requested: 5,
                max_level: 4
            })
        ));
        assert!(!output.path().join("9").exists());
    }

    #[tokio::test]
    async fn test_cancelled_run_is_incomplete() {
        let output = TempDir::new().unwrap();
        let pipeline = pipeline(Ok(KML.as_bytes().to_vec()), &output);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = pipeline.run(9, 2, &cancel).await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.acquisition().cancelled, 12);
        assert_eq!(outcome.grid().level, 2);
        assert!(outcome.artifact().is_none());
        assert!(!output.path().join("9.jpg").exists());
    }
}
