//! Snapshot cache persistence for the lorawatch sensor aggregator.
//!
//! One aggregation run produces one [`lorawatch_types::Snapshot`]; this crate
//! persists it as a single JSON file whose modification time is the sole
//! freshness signal. There is no content hash and no version field: a
//! snapshot is served from disk iff the file is younger than the configured
//! freshness window.
//!
//! Every filesystem failure on the read side degrades to "not cached"; the
//! write side is best-effort and surfaces failures to the caller for logging
//! only. Partial snapshots are never persisted; the aggregator only hands a
//! fully-assembled snapshot to [`SnapshotCache::write`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use lorawatch_store::SnapshotCache;
//!
//! let cache = SnapshotCache::new(lorawatch_store::default_cache_path(), Duration::from_secs(60));
//! if cache.is_fresh() {
//!     let snapshot = cache.read()?;
//!     println!("{} sensors cached", snapshot.sensors.len());
//! }
//! # Ok::<(), lorawatch_store::Error>(())
//! ```

mod cache;
mod error;

pub use cache::SnapshotCache;
pub use error::{Error, Result};

/// Default cache file path following platform conventions.
///
/// - Linux: `~/.cache/lorawatch/sensors.cache.json`
/// - macOS: `~/Library/Caches/lorawatch/sensors.cache.json`
/// - Windows: `C:\Users\<user>\AppData\Local\lorawatch\sensors.cache.json`
pub fn default_cache_path() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("lorawatch")
        .join("sensors.cache.json")
}
