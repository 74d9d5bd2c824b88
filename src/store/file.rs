//! JSON file document store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::RosterDocument;

use super::{DocumentStore, SNAPSHOT_CHANNEL_CAPACITY, Snapshot, WriteToken};

/// A [`DocumentStore`] backed by one JSON file.
///
/// Every save writes the whole document to a sibling temporary file and
/// renames it over the target, so readers never see a half-written file.
/// Saves are serialized by an internal mutex.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    updates: broadcast::Sender<Snapshot>,
}

impl JsonFileStore {
    /// Creates a store for the file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (updates, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            updates,
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "roster.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn persistence_failure(path: &Path, err: impl std::fmt::Display) -> EngineError {
    EngineError::PersistenceFailure {
        message: format!("{}: {}", path.display(), err),
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> EngineResult<Option<RosterDocument>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No roster document on disk yet");
                return Ok(None);
            }
            Err(err) => {
                return Err(EngineError::StoreUnavailable {
                    message: format!("{}: {}", self.path.display(), err),
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| EngineError::StoreUnavailable {
                message: format!("{}: invalid roster document: {}", self.path.display(), e),
            })
    }

    async fn save(&self, document: &RosterDocument, origin: Option<WriteToken>) -> EngineResult<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| persistence_failure(&self.path, e))?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_failure(parent, e))?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| persistence_failure(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| persistence_failure(&self.path, e))?;

        info!(
            path = %self.path.display(),
            partners = document.partners.len(),
            origin = ?origin.map(|t| t.to_string()),
            "Saved roster document"
        );

        let _ = self.updates.send(Snapshot {
            document: document.clone(),
            origin,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.updates.subscribe()
    }
}
