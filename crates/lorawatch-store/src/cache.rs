//! Snapshot cache backed by a single JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use lorawatch_types::Snapshot;

use crate::error::{Error, Result};

/// File-backed cache for one aggregated snapshot.
///
/// Freshness is keyed purely off the file's modification time against the
/// configured window; the content itself carries no staleness marker.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
    freshness_window: Duration,
}

impl SnapshotCache {
    /// Create a cache over the given file path with the given freshness window.
    pub fn new(path: impl Into<PathBuf>, freshness_window: Duration) -> Self {
        Self {
            path: path.into(),
            freshness_window,
        }
    }

    /// The cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a cached snapshot exists and is younger than the freshness
    /// window.
    ///
    /// Any filesystem error (missing file, unreadable metadata) counts as
    /// "not fresh", never as a failure.
    pub fn is_fresh(&self) -> bool {
        let Ok(metadata) = std::fs::metadata(&self.path) else {
            return false;
        };
        let Ok(mtime) = metadata.modified() else {
            return false;
        };
        match SystemTime::now().duration_since(mtime) {
            Ok(age) => age < self.freshness_window,
            // An mtime in the future means the file was just written.
            Err(_) => true,
        }
    }

    /// Read and parse the cached snapshot.
    pub fn read(&self) -> Result<Snapshot> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist a fully-assembled snapshot, creating the cache directory if
    /// needed.
    pub fn write(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, content)?;
        debug!("Snapshot cached at {}", self.path.display());
        Ok(())
    }

    /// Delete the cached snapshot. Idempotent: a missing file is not an error.
    pub fn invalidate(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Cache file {} deleted", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete cache file {}: {}", self.path.display(), e),
        }
    }
}
