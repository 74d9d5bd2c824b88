//! Suppression of inbound snapshots while a local write is in flight.
//!
//! After a client saves, the store pushes the saved document back to every
//! subscriber, including the writer. Until that echo arrives, any other
//! snapshot may predate the write and would roll the client's optimistic
//! state back. The guard ignores such snapshots for a bounded window.

use std::time::{Duration, Instant};

use super::{Snapshot, WriteToken};

/// The local write the guard is waiting to see echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    /// Token sent along with the save.
    pub token: WriteToken,
    /// When the write was issued.
    pub issued_at: Instant,
}

/// What a client should do with an inbound snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotDisposition {
    /// Replace local state with the snapshot.
    Apply,
    /// The snapshot is the echo of the pending local write. Local state
    /// already reflects it.
    OwnEcho,
    /// A foreign snapshot arrived inside the window and is ignored.
    Suppressed,
}

/// Tracks at most one pending local write.
#[derive(Debug, Clone)]
pub struct EchoGuard {
    window: Duration,
    pending: Option<PendingWrite>,
}

impl EchoGuard {
    /// Creates a guard that suppresses foreign snapshots for `window` after
    /// each local write.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// The suppression window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The write currently awaiting its echo.
    pub fn pending(&self) -> Option<&PendingWrite> {
        self.pending.as_ref()
    }

    /// Records a new local write and returns the token to save it with.
    ///
    /// A newer write replaces any older pending one.
    pub fn begin_write(&mut self, now: Instant) -> WriteToken {
        let token = WriteToken::new();
        self.pending = Some(PendingWrite {
            token,
            issued_at: now,
        });
        token
    }

    /// Whether `snapshot` is the echo of the pending local write.
    pub fn is_local_pending_write(&self, snapshot: &Snapshot) -> bool {
        self.pending
            .is_some_and(|pending| snapshot.origin == Some(pending.token))
    }

    /// Decides the fate of an inbound snapshot received at `now`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use leave_engine::models::{RosterDocument, RosterSeed};
    /// use leave_engine::store::{EchoGuard, Snapshot, SnapshotDisposition};
    ///
    /// let mut guard = EchoGuard::new(Duration::from_millis(500));
    /// let start = Instant::now();
    /// let token = guard.begin_write(start);
    /// let document = RosterDocument::seeded(&RosterSeed::default());
    ///
    /// let foreign = Snapshot { document: document.clone(), origin: None };
    /// assert_eq!(
    ///     guard.admit(&foreign, start + Duration::from_millis(100)),
    ///     SnapshotDisposition::Suppressed
    /// );
    ///
    /// let echo = Snapshot { document, origin: Some(token) };
    /// assert_eq!(
    ///     guard.admit(&echo, start + Duration::from_millis(200)),
    ///     SnapshotDisposition::OwnEcho
    /// );
    /// assert!(guard.pending().is_none());
    /// ```
    pub fn admit(&mut self, snapshot: &Snapshot, now: Instant) -> SnapshotDisposition {
        let Some(pending) = self.pending else {
            return SnapshotDisposition::Apply;
        };

        if snapshot.origin == Some(pending.token) {
            self.pending = None;
            return SnapshotDisposition::OwnEcho;
        }

        if now.saturating_duration_since(pending.issued_at) < self.window {
            SnapshotDisposition::Suppressed
        } else {
            self.pending = None;
            SnapshotDisposition::Apply
        }
    }
}
