//! Roster document persistence.
//!
//! A [`DocumentStore`] loads and saves the whole [`RosterDocument`] and
//! pushes a [`Snapshot`] to every subscriber after each stored change. Saves
//! may carry the [`WriteToken`] of the local write that produced them, which
//! lets the [`EchoGuard`] tell a client's own echo apart from someone else's
//! update.
//!
//! Implementations:
//!
//! - [`JsonFileStore`] keeps the document in a JSON file on disk.
//! - [`InMemoryStore`] keeps it in memory, for tests and ephemeral servers.
//!
//! [`LocalCache`] is the best-effort local copy a client falls back to when
//! the store cannot be reached.

mod cache;
mod echo;
mod file;
mod memory;

pub use cache::LocalCache;
pub use echo::{EchoGuard, PendingWrite, SnapshotDisposition};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::RosterDocument;

/// Capacity of the snapshot broadcast channel of the bundled stores.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Identifies one local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteToken(Uuid);

impl WriteToken {
    /// Issues a fresh token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WriteToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WriteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored document as pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The full document after the change.
    pub document: RosterDocument,
    /// The token of the write that produced it, when the writer supplied one.
    pub origin: Option<WriteToken>,
}

/// Whole-document persistence with change notification.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the stored document, or `None` when nothing was stored yet.
    async fn load(&self) -> EngineResult<Option<RosterDocument>>;

    /// Replaces the stored document and notifies subscribers.
    async fn save(&self, document: &RosterDocument, origin: Option<WriteToken>) -> EngineResult<()>;

    /// Subscribes to stored changes. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<Snapshot>;
}
