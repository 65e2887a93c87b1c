//! Cache-or-fetch composition around the aggregation engine.

use std::sync::Arc;

use tracing::{info, warn};

use lorawatch_store::SnapshotCache;
use lorawatch_types::Snapshot;

use crate::aggregator::Aggregator;
use crate::config::ConnectionConfig;
use crate::enrich::Enrich;
use crate::error::{AggregateError, ReadError};
use crate::transport::Transport;

/// The public entry point: serves the assembled snapshot from the cache when
/// fresh, otherwise runs a full aggregation pass and writes the result back.
pub struct SensorReader {
    cache: Arc<SnapshotCache>,
    aggregator: Aggregator,
}

impl SensorReader {
    pub fn new(
        config: Arc<ConnectionConfig>,
        cache: Arc<SnapshotCache>,
        transport: Arc<dyn Transport>,
        enricher: Arc<dyn Enrich>,
    ) -> Self {
        Self {
            cache,
            aggregator: Aggregator::new(config, transport, enricher),
        }
    }

    /// Read the assembled snapshot.
    ///
    /// With `force_refresh` the cache is dropped first and the platform is
    /// always consulted; otherwise a fresh cached snapshot is served without
    /// any network traffic. Returns exactly once per call with either the
    /// snapshot or an opaque user-facing error.
    pub async fn read_sensors_data(&self, force_refresh: bool) -> Result<Snapshot, ReadError> {
        info!("reading sensors data...");

        if force_refresh {
            self.cache.invalidate();
        } else if self.cache.is_fresh() {
            match self.cache.read() {
                Ok(snapshot) => {
                    info!("Returning data from cache.");
                    return Ok(snapshot);
                }
                // A fresh-but-unreadable cache file degrades to a live fetch.
                Err(e) => warn!("Discarding unreadable cache file: {e}"),
            }
        }

        let snapshot = self.aggregator.run().await.map_err(|e| match e {
            AggregateError::Root(_) | AggregateError::Rejected => ReadError::Unavailable,
            AggregateError::RootParse(_) => ReadError::Internal,
        })?;

        self.persist_detached(snapshot.clone());
        info!("Returning data from IoT server.");
        Ok(snapshot)
    }

    /// Best-effort write-back, detached from the caller's response: the read
    /// result is not held up by cache I/O and a failed write is logged only.
    fn persist_detached(&self, snapshot: Snapshot) {
        let cache = Arc::clone(&self.cache);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = cache.write(&snapshot) {
                warn!("Failed to persist snapshot cache: {e}");
            }
        });
    }
}
