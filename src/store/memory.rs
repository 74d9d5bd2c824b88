//! In-memory document store.

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use crate::error::EngineResult;
use crate::models::RosterDocument;

use super::{DocumentStore, SNAPSHOT_CHANNEL_CAPACITY, Snapshot, WriteToken};

/// A [`DocumentStore`] that keeps the document in memory.
#[derive(Debug)]
pub struct InMemoryStore {
    document: RwLock<Option<RosterDocument>>,
    updates: broadcast::Sender<Snapshot>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            document: RwLock::new(None),
            updates,
        }
    }

    /// Creates a store already holding `document`.
    pub fn with_document(document: RosterDocument) -> Self {
        let (updates, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            document: RwLock::new(Some(document)),
            updates,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn load(&self) -> EngineResult<Option<RosterDocument>> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &RosterDocument, origin: Option<WriteToken>) -> EngineResult<()> {
        *self.document.write().await = Some(document.clone());

        let delivered = self
            .updates
            .send(Snapshot {
                document: document.clone(),
                origin,
            })
            .unwrap_or(0);
        debug!(subscribers = delivered, "Stored roster document in memory");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.updates.subscribe()
    }
}
