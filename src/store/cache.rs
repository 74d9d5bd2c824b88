//! Best-effort local copy of the last known roster document.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::models::RosterDocument;

/// A local JSON copy of the roster, read when the store is unreachable.
///
/// Neither reads nor writes fail: problems are logged and treated as "no
/// cached copy".
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    /// Creates a cache at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached document, if a readable one exists.
    pub async fn read(&self) -> Option<RosterDocument> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "No local roster cache");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ignoring unreadable roster cache");
                None
            }
        }
    }

    /// Replaces the cached document.
    pub async fn write(&self, document: &RosterDocument) {
        let json = match serde_json::to_string(document) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "Failed to serialize roster cache");
                return;
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %err, "Failed to create roster cache directory");
                return;
            }
        }

        if let Err(err) = tokio::fs::write(&self.path, json).await {
            warn!(path = %self.path.display(), error = %err, "Failed to write roster cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RosterSeed;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("leave-engine-cache-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_cache_reads_none() {
        let cache = LocalCache::new(scratch_dir().join("roster.cache.json"));
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = scratch_dir();
        let cache = LocalCache::new(dir.join("roster.cache.json"));
        let document = RosterDocument::seeded(&RosterSeed::default());

        cache.write(&document).await;
        assert_eq!(cache.read().await, Some(document));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_garbage_cache_reads_none() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.cache.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(LocalCache::new(&path).read().await.is_none());

        let _ = std::fs::remove_dir_all(dir);
    }
}
