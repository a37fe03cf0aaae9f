//! Snapshot refresh: the on-demand path used by requests and the scheduled
//! path driven by a timer. Both run the same ingest-then-cache-write sequence.
//!
//! Cache failures never fail a refresh. A failed read is a miss; a failed
//! write is logged and the freshly ingested snapshot is still returned.
//! Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use shindo_core::Snapshot;
use shindo_store::{EARTHQUAKE_CACHE_TTL, SNAPSHOT_KEY, SnapshotCache};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::coalesce::Coalescer;
use crate::ingest::ingest;
use crate::source::{FeedError, FeedSource};

/// Cloneable so every caller coalesced onto one refresh gets the same error.
#[derive(Error, Debug, Clone)]
pub enum RefreshError {
    #[error("upstream feed unavailable: {0}")]
    Upstream(#[source] Arc<FeedError>),
}

impl From<FeedError> for RefreshError {
    fn from(e: FeedError) -> Self {
        Self::Upstream(Arc::new(e))
    }
}

pub struct Refresher {
    feed: Arc<dyn FeedSource>,
    cache: SnapshotCache,
    inflight: Coalescer<Result<Snapshot, RefreshError>>,
}

impl Refresher {
    pub fn new(feed: Arc<dyn FeedSource>, cache: SnapshotCache) -> Self {
        Self {
            feed,
            cache,
            inflight: Coalescer::new(),
        }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Ingest a fresh snapshot and write it to the cache.
    pub async fn refresh(&self) -> Result<Snapshot, RefreshError> {
        let snapshot = ingest(self.feed.as_ref()).await?;
        if let Err(e) = self.cache.put(&snapshot, EARTHQUAKE_CACHE_TTL).await {
            warn!(error = %e, "snapshot cache write failed, returning uncached snapshot");
        }
        Ok(snapshot)
    }

    /// On-demand read: the cached snapshot, or a synchronous refresh when
    /// `force` is set or the cache has nothing live.
    ///
    /// Concurrent cache misses share one refresh and all receive its
    /// outcome, including its error. `force` always runs its own refresh.
    pub async fn load(&self, force: bool) -> Result<Snapshot, RefreshError> {
        if force {
            info!("forced snapshot refresh");
            return self.refresh().await;
        }
        if let Some(snapshot) = self.cached().await {
            return Ok(snapshot);
        }

        self.inflight
            .run(SNAPSHOT_KEY, || async {
                if let Some(snapshot) = self.cached().await {
                    debug!("snapshot filled by a concurrent refresh");
                    return Ok(snapshot);
                }
                self.refresh().await
            })
            .await
    }

    /// Scheduled entry point. Failures are logged and handed back to the
    /// scheduler; there is no retry.
    pub async fn run_scheduled(&self) -> Result<(), RefreshError> {
        match self.refresh().await {
            Ok(snapshot) => {
                info!(
                    detailed = snapshot.detailed.len(),
                    basic = snapshot.basic.len(),
                    "scheduled refresh complete"
                );
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "scheduled refresh failed");
                Err(e)
            }
        }
    }

    async fn cached(&self) -> Option<Snapshot> {
        match self.cache.get().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "snapshot cache read failed, treating as miss");
                None
            }
        }
    }
}

/// Spawn the periodic refresh timer. The first tick fires immediately.
pub fn spawn_schedule(refresher: Arc<Refresher>, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "starting scheduled refresh");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            // Already logged; the next tick is the only retry.
            let _ = refresher.run_scheduled().await;
        }
    })
}
