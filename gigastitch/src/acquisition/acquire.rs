//! Bounded concurrent tile fetching.
//!
//! One task is spawned per coordinate into a [`JoinSet`]. A shared
//! [`Semaphore`] limits how many of them talk to the host at once, and the
//! caller's task collects outcomes as they finish, so the aggregate needs no
//! locking.

use super::results::{AcquisitionResult, TileError, TileOutcome};
use crate::config::DownloadConfig;
use crate::grid::{ResolvedGrid, TileCoord};
use crate::provider::AsyncHttpClient;
use crate::source::GigapanSource;
use crate::store::TileStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Downloads the missing tiles of one panorama into a [`TileStore`].
pub struct TileAcquisition<C, S>
where
    C: AsyncHttpClient + 'static,
    S: TileStore + 'static,
{
    client: Arc<C>,
    store: Arc<S>,
    source: GigapanSource,
    photo_id: u64,
    config: DownloadConfig,
}

impl<C, S> TileAcquisition<C, S>
where
    C: AsyncHttpClient + 'static,
    S: TileStore + 'static,
{
    /// Creates an acquisition for `photo_id` with default download settings.
    pub fn new(client: Arc<C>, store: Arc<S>, source: GigapanSource, photo_id: u64) -> Self {
        Self::with_config(client, store, source, photo_id, DownloadConfig::default())
    }

    /// Creates an acquisition with custom download settings.
    pub fn with_config(
        client: Arc<C>,
        store: Arc<S>,
        source: GigapanSource,
        photo_id: u64,
        config: DownloadConfig,
    ) -> Self {
        Self {
            client,
            store,
            source,
            photo_id,
            config,
        }
    }

    /// Attempts every coordinate of `grid`, skipping tiles already stored.
    ///
    /// Never fails as a whole: per-tile failures are logged and counted in
    /// the returned [`AcquisitionResult`]. Once `cancel` fires no new
    /// fetches start and in-flight fetches are abandoned; writes already
    /// underway still complete.
    pub async fn acquire(
        &self,
        grid: &ResolvedGrid,
        cancel: &CancellationToken,
    ) -> AcquisitionResult {
        let total = grid.tile_count();
        let semaphore = Arc::new(Semaphore::new(self.config.parallel_downloads()));
        let mut pending: BTreeSet<TileCoord> = BTreeSet::new();
        let mut tasks = JoinSet::new();

        info!(
            photo_id = self.photo_id,
            level = grid.level,
            tiles = total,
            parallel = self.config.parallel_downloads(),
            "Starting tile acquisition"
        );

        for coord in grid.coords() {
            pending.insert(coord);

            let client = Arc::clone(&self.client);
            let store = Arc::clone(&self.store);
            let sem = Arc::clone(&semaphore);
            let token = cancel.clone();
            let url = self.source.tile_url(self.photo_id, grid.level, coord);
            let config = self.config;

            tasks.spawn(async move {
                let outcome = acquire_tile(coord, url, client, store, sem, token, config).await;
                (coord, outcome)
            });
        }

        let mut result = AcquisitionResult::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((coord, outcome)) => {
                    pending.remove(&coord);
                    log_outcome(coord, &outcome, result.total() + 1, total);
                    result.record(coord, &outcome);
                }
                Err(join_err) => {
                    warn!(error = %join_err, "Tile task panicked");
                }
            }
        }

        // Workers that panicked never reported their coordinate.
        for coord in pending {
            result.record_lost(coord);
        }

        info!(
            photo_id = self.photo_id,
            downloaded = result.downloaded,
            reused = result.reused,
            failed = result.failed,
            cancelled = result.cancelled,
            bytes = result.bytes,
            "Tile acquisition finished"
        );

        result
    }
}

fn log_outcome(coord: TileCoord, outcome: &TileOutcome, done: usize, total: usize) {
    match outcome {
        TileOutcome::Downloaded { bytes, attempts } => info!(
            row = coord.row,
            col = coord.col,
            bytes,
            attempts,
            done,
            total,
            "Tile downloaded"
        ),
        TileOutcome::Reused => debug!(
            row = coord.row,
            col = coord.col,
            done,
            total,
            "Tile already present"
        ),
        TileOutcome::Failed { attempts, error } => warn!(
            row = coord.row,
            col = coord.col,
            attempts,
            error = %error,
            "Tile failed"
        ),
        TileOutcome::Cancelled => trace!(row = coord.row, col = coord.col, "Tile cancelled"),
    }
}

/// Fetches and stores one tile, retrying with exponential backoff.
async fn acquire_tile<C, S>(
    coord: TileCoord,
    url: String,
    client: Arc<C>,
    store: Arc<S>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    config: DownloadConfig,
) -> TileOutcome
where
    C: AsyncHttpClient,
    S: TileStore,
{
    if store.exists(coord).await {
        return TileOutcome::Reused;
    }

    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return TileOutcome::Cancelled,
        permit = semaphore.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return TileOutcome::Cancelled,
        },
    };

    let mut attempts = 0;
    loop {
        attempts += 1;
        trace!(row = coord.row, col = coord.col, attempt = attempts, url = %url, "Fetching tile");

        let fetch = tokio::time::timeout(config.timeout(), client.get(&url));
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return TileOutcome::Cancelled,
            fetched = fetch => fetched,
        };

        let error = match fetched {
            Ok(Ok(data)) => {
                let bytes = data.len() as u64;
                // Not raced against cancellation: a started write always lands.
                return match store.write(coord, data).await {
                    Ok(()) => TileOutcome::Downloaded { bytes, attempts },
                    Err(e) => TileOutcome::Failed {
                        attempts,
                        error: TileError::Write(e),
                    },
                };
            }
            Ok(Err(e)) => {
                let retryable = e.is_retryable();
                let error = TileError::Fetch(e);
                if !retryable {
                    return TileOutcome::Failed { attempts, error };
                }
                error
            }
            Err(_) => TileError::Timeout {
                secs: config.timeout_secs(),
            },
        };

        if attempts > config.max_retries() {
            return TileOutcome::Failed { attempts, error };
        }

        let delay = config.retry_delay(attempts);
        debug!(
            row = coord.row,
            col = coord.col,
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Retrying tile"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return TileOutcome::Cancelled,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
