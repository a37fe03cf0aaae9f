//! Snapshot cache: the latest normalised bulletins under one fixed key.

use std::sync::Arc;
use std::time::Duration;

use shindo_core::Snapshot;
use tracing::{debug, warn};

use crate::StoreError;
use crate::kv::KvStore;

pub const SNAPSHOT_KEY: &str = "earthquakes:latest";

/// Lifetime of a cached snapshot.
pub const EARTHQUAKE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Read-through cache for [`Snapshot`]s.
///
/// `put` always replaces the whole snapshot; reads never trigger a refresh.
#[derive(Clone)]
pub struct SnapshotCache {
    kv: Arc<dyn KvStore>,
}

impl SnapshotCache {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Current snapshot, or `None` when absent or expired.
    ///
    /// A stored value that no longer decodes is treated as absent so the
    /// caller refreshes over it.
    pub async fn get(&self) -> Result<Option<Snapshot>, StoreError> {
        let Some(bytes) = self.kv.get(SNAPSHOT_KEY).await? else {
            debug!(key = SNAPSHOT_KEY, "snapshot cache miss");
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(key = SNAPSHOT_KEY, error = %e, "discarding undecodable snapshot");
                Ok(None)
            }
        }
    }

    pub async fn put(&self, snapshot: &Snapshot, ttl: Duration) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(snapshot)?;
        self.kv.put(SNAPSHOT_KEY, bytes, Some(ttl)).await?;
        debug!(
            key = SNAPSHOT_KEY,
            detailed = snapshot.detailed.len(),
            basic = snapshot.basic.len(),
            ttl_secs = ttl.as_secs(),
            "snapshot cached"
        );
        Ok(())
    }
}
