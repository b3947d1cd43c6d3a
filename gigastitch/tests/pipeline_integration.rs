//! Integration tests for the download-and-stitch pipeline.
//!
//! These tests run the complete workflow against an in-memory host:
//! - Grid resolution for the reference panorama
//! - Partial failure leaves tiles on disk and skips assembly
//! - Successful runs produce the trimmed artifact and clean up
//! - Re-runs resume from the tiles already stored

use gigastitch::grid::{self, TileCoord};
use gigastitch::layout::OutputLayout;
use gigastitch::metadata::PanoramaMetadata;
use gigastitch::pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
use gigastitch::provider::{AsyncHttpClient, ProviderError};
use gigastitch::config::DownloadConfig;
use image::{Rgb, RgbImage};
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Test Helpers
// =============================================================================

const BASE_URL: &str = "http://gigapan.test";
const PHOTO_ID: u64 = 48_151;

const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://earth.google.com/kml/2.1">
  <Document>
    <PhotoOverlay>
      <ImagePyramid>
        <tileSize>256</tileSize>
        <maxWidth>4000</maxWidth>
        <maxHeight>3000</maxHeight>
        <gridOrigin>upperLeft</gridOrigin>
      </ImagePyramid>
    </PhotoOverlay>
  </Document>
</kml>"#;

/// Logical size of the reference panorama at level 2.
const LEVEL_TWO_SIZE: (u32, u32) = (1000, 750);

/// In-memory tile host serving one panorama at level 2.
///
/// Edge tiles are padded with black past the logical size, as the real host
/// pads them.
struct FakeHost {
    failing: Mutex<HashSet<String>>,
    tile_fetches: AtomicUsize,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            failing: Mutex::new(HashSet::new()),
            tile_fetches: AtomicUsize::new(0),
        }
    }

    fn fail_tile(&self, level: u32, coord: TileCoord) {
        self.failing.lock().unwrap().insert(tile_url(level, coord));
    }

    fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn tile_fetches(&self) -> usize {
        self.tile_fetches.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for FakeHost {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        if url == format!("{}/gigapans/{}.kml", BASE_URL, PHOTO_ID) {
            return Ok(KML.as_bytes().to_vec());
        }
        if url.starts_with(&format!("{}/get_ge_tile/{}/", BASE_URL, PHOTO_ID)) {
            self.tile_fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.lock().unwrap().contains(url) {
                return Err(ProviderError::HttpStatus {
                    status: 500,
                    url: url.to_string(),
                });
            }
            return parse_tile_coord(url)
                .map(panorama_tile)
                .ok_or_else(|| ProviderError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                });
        }
        Err(ProviderError::HttpStatus {
            status: 404,
            url: url.to_string(),
        })
    }
}

fn tile_url(level: u32, coord: TileCoord) -> String {
    format!(
        "{}/get_ge_tile/{}/{}/{}/{}",
        BASE_URL, PHOTO_ID, level, coord.row, coord.col
    )
}

/// Reads `.../{row}/{col}` from a tile URL.
fn parse_tile_coord(url: &str) -> Option<TileCoord> {
    let mut parts = url.rsplit('/');
    let col = parts.next()?.parse().ok()?;
    let row = parts.next()?.parse().ok()?;
    Some(TileCoord::new(row, col))
}

/// 256px JPEG tile: a gradient inside the panorama, black padding outside.
fn panorama_tile(coord: TileCoord) -> Vec<u8> {
    let (width, height) = LEVEL_TWO_SIZE;
    let image = RgbImage::from_fn(256, 256, |x, y| {
        let inside = coord.col * 256 + x < width && coord.row * 256 + y < height;
        if inside {
            Rgb([x as u8, y as u8, 128])
        } else {
            Rgb([0, 0, 0])
        }
    });
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

fn reference_metadata() -> PanoramaMetadata {
    PanoramaMetadata {
        max_width: 4000,
        max_height: 3000,
        tile_size: 256,
    }
}

fn pipeline(host: &Arc<FakeHost>, output: &TempDir) -> Pipeline<FakeHost> {
    let config = PipelineConfig::new(output.path())
        .with_base_url(BASE_URL)
        .with_download(DownloadConfig::new().with_parallel_downloads(4));
    Pipeline::new(Arc::clone(host), config)
}

fn count_tiles(layout: &OutputLayout) -> usize {
    std::fs::read_dir(layout.photo_dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            name.ends_with(".jpg") && !name.starts_with("line-")
        })
        .count()
}

// =============================================================================
// Grid Resolution
// =============================================================================

#[test]
fn test_highest_level_of_reference_panorama() {
    let grid = grid::resolve(&reference_metadata(), 0).unwrap();

    assert_eq!(grid.max_level, 4);
    assert_eq!(grid.level, 4);
    assert_eq!((grid.width, grid.height), (4000, 3000));
    assert_eq!((grid.tile_columns, grid.tile_rows), (16, 12));
    assert_eq!(grid.tile_count(), 192);
}

#[test]
fn test_level_two_of_reference_panorama() {
    let grid = grid::resolve(&reference_metadata(), 2).unwrap();

    assert_eq!(grid.scale, 4);
    assert_eq!((grid.width, grid.height), (1000, 750));
    assert_eq!((grid.tile_columns, grid.tile_rows), (4, 3));
    assert_eq!(grid.tile_count(), 12);
}

// =============================================================================
// Pipeline Runs
// =============================================================================

#[tokio::test]
async fn test_failed_tile_skips_assembly() {
    let output = TempDir::new().unwrap();
    let host = Arc::new(FakeHost::new());
    host.fail_tile(2, TileCoord::new(1, 3));
    let layout = OutputLayout::new(output.path(), PHOTO_ID);

    let outcome = pipeline(&host, &output)
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();

    let PipelineOutcome::Incomplete { acquisition, .. } = outcome else {
        panic!("run with a failed tile must not complete");
    };
    assert_eq!(acquisition.failed, 1);
    assert_eq!(acquisition.downloaded, 11);
    assert!(acquisition.failed_coordinates.contains(&TileCoord::new(1, 3)));
    assert_eq!(count_tiles(&layout), 11);
    assert!(!layout.tile_path(TileCoord::new(1, 3)).exists());
    assert!(!layout.row_path(0).exists());
    assert!(!layout.stitched_path().exists());
    assert!(!layout.artifact_path().exists());
}

#[tokio::test]
async fn test_complete_run_writes_artifact() {
    let output = TempDir::new().unwrap();
    let host = Arc::new(FakeHost::new());
    let layout = OutputLayout::new(output.path(), PHOTO_ID);

    let outcome = pipeline(&host, &output)
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();

    let PipelineOutcome::Completed {
        artifact,
        grid,
        acquisition,
    } = outcome
    else {
        panic!("run with every tile must complete");
    };
    assert_eq!(artifact, layout.artifact_path());
    assert_eq!(acquisition.downloaded, 12);
    assert_eq!(host.tile_fetches(), 12);

    // The black padding is trimmed away; JPEG ringing may keep a few pixels.
    assert_eq!((grid.width, grid.height), LEVEL_TWO_SIZE);
    let (width, height) = image::image_dimensions(&artifact).unwrap();
    assert!(
        width.abs_diff(grid.width) <= 4 && height.abs_diff(grid.height) <= 4,
        "artifact is {}x{}, expected about {}x{}",
        width,
        height,
        grid.width,
        grid.height
    );

    for row in 0..3 {
        assert!(!layout.row_path(row).exists(), "row {} not cleaned up", row);
    }
    assert!(!layout.stitched_path().exists());
    assert_eq!(count_tiles(&layout), 12);
}

#[tokio::test]
async fn test_second_run_fetches_nothing() {
    let output = TempDir::new().unwrap();
    let host = Arc::new(FakeHost::new());
    let pipeline = pipeline(&host, &output);

    pipeline
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();
    let fetches_after_first = host.tile_fetches();

    let outcome = pipeline
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(host.tile_fetches(), fetches_after_first);
    assert_eq!(outcome.acquisition().reused, 12);
    assert_eq!(outcome.acquisition().downloaded, 0);
}

#[tokio::test]
async fn test_resume_fetches_only_missing_tiles() {
    let output = TempDir::new().unwrap();
    let host = Arc::new(FakeHost::new());
    host.fail_tile(2, TileCoord::new(0, 0));
    host.fail_tile(2, TileCoord::new(2, 1));
    let pipeline = pipeline(&host, &output);

    let first = pipeline
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.acquisition().failed, 2);

    host.heal();
    let before = host.tile_fetches();
    let second = pipeline
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();

    assert!(second.is_complete());
    assert_eq!(host.tile_fetches() - before, 2);
    assert_eq!(second.acquisition().downloaded, 2);
    assert_eq!(second.acquisition().reused, 10);
}

#[tokio::test]
async fn test_failed_run_keeps_previous_artifact() {
    let output = TempDir::new().unwrap();
    let host = Arc::new(FakeHost::new());
    host.fail_tile(2, TileCoord::new(2, 3));
    let layout = OutputLayout::new(output.path(), PHOTO_ID);
    std::fs::write(layout.artifact_path(), b"previous").unwrap();

    let outcome = pipeline(&host, &output)
        .run(PHOTO_ID, 2, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(std::fs::read(layout.artifact_path()).unwrap(), b"previous");
}

#[tokio::test]
async fn test_unknown_photo_is_fatal() {
    let output = TempDir::new().unwrap();
    let host = Arc::new(FakeHost::new());

    let result = pipeline(&host, &output)
        .run(1, 0, &CancellationToken::new())
        .await;

    assert!(result.is_err());
    assert_eq!(host.tile_fetches(), 0);
}
