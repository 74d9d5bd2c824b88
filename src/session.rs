//! Client-side roster session.
//!
//! A [`RosterSession`] is the single writer that owns one client's view of
//! the roster. It loads the document once with a bounded wait, falls back to
//! the local cache or the seed roster when the store does not answer, and
//! then applies every edit optimistically: local state changes first, the
//! store is written second, and a failed write is reported without rolling
//! the edit back.
//!
//! Inbound snapshots go through an [`EchoGuard`] so that an update arriving
//! while the session's own write is in flight cannot undo that write.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::calculation::{
    Balance, ToggleOutcome, migrate_flat_records, partner_balance, rename_partner, set_allocation,
    set_count_holidays_as_leave, set_year, toggle_partner_day, toggle_work_day,
};
use crate::config::AppConfig;
use crate::error::{EngineError, EngineResult};
use crate::holidays::HolidayService;
use crate::models::{AllocationKind, DayCategory, RosterDocument, RosterSeed};
use crate::store::{DocumentStore, EchoGuard, LocalCache, Snapshot, SnapshotDisposition};

/// Where the session's initial document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// The store returned a document.
    Remote,
    /// The store was empty; the seed roster was created and saved.
    Seeded,
    /// The store did not answer; the local cache was used.
    Cache,
    /// The store did not answer and no cache existed; the seed roster is
    /// used without being saved.
    Defaults,
}

/// Tunables for [`RosterSession::open`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long to wait for the initial load.
    pub load_timeout: Duration,
    /// How long foreign snapshots are ignored after a local write.
    pub echo_window: Duration,
    /// Roster created when nothing is stored.
    pub seed: RosterSeed,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_millis(5000),
            echo_window: Duration::from_millis(500),
            seed: RosterSeed::default(),
        }
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            load_timeout: Duration::from_millis(config.storage.load_timeout_ms),
            echo_window: Duration::from_millis(config.storage.echo_window_ms),
            seed: config.roster.clone(),
        }
    }
}

/// One partner's balance, as listed by [`RosterSession::balances`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerBalance {
    /// Partner id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Balance for the session's year.
    pub balance: Balance,
}

/// A single client's live view of the roster.
pub struct RosterSession {
    store: Arc<dyn DocumentStore>,
    holidays: HolidayService,
    cache: Option<LocalCache>,
    guard: EchoGuard,
    updates: broadcast::Receiver<Snapshot>,
    document: RosterDocument,
    source: LoadSource,
}

impl RosterSession {
    /// Loads the roster and starts listening for stored changes.
    ///
    /// Never fails: a store that times out or errors degrades to the local
    /// cache, then to the seed roster.
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        holidays: HolidayService,
        cache: Option<LocalCache>,
        options: SessionOptions,
    ) -> Self {
        let updates = store.subscribe();

        let millis = u64::try_from(options.load_timeout.as_millis()).unwrap_or(u64::MAX);
        let loaded = match tokio::time::timeout(options.load_timeout, store.load()).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout { millis }),
        };

        let (document, source) = match loaded {
            Ok(Some(document)) => (document, LoadSource::Remote),
            Ok(None) => {
                let document = RosterDocument::seeded(&options.seed);
                if let Err(err) = store.save(&document, None).await {
                    warn!(error = %err, "Failed to save seed roster");
                }
                info!(partners = document.partners.len(), "Seeded empty roster store");
                (document, LoadSource::Seeded)
            }
            Err(err) => {
                warn!(error = %err, "Roster store unavailable, falling back to local copy");
                let cached = match &cache {
                    Some(cache) => cache.read().await,
                    None => None,
                };
                match cached {
                    Some(document) => (document, LoadSource::Cache),
                    None => (RosterDocument::seeded(&options.seed), LoadSource::Defaults),
                }
            }
        };

        info!(source = ?source, year = document.year, "Opened roster session");

        let mut session = Self {
            store,
            holidays,
            cache,
            guard: EchoGuard::new(options.echo_window),
            updates,
            document,
            source,
        };

        if let Some(migrated) = migrate_flat_records(&session.document) {
            info!(year = migrated.year, "Migrated flat day-sets into the displayed year");
            if matches!(source, LoadSource::Remote | LoadSource::Seeded) {
                if let Err(err) = session.commit(migrated).await {
                    warn!(error = %err, "Failed to save migrated roster");
                }
            } else {
                session.document = migrated;
            }
        } else if source == LoadSource::Remote {
            session.refresh_cache().await;
        }

        session
    }

    /// The current document.
    pub fn document(&self) -> &RosterDocument {
        &self.document
    }

    /// Where the initial document came from.
    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// The displayed year.
    pub fn year(&self) -> i32 {
        self.document.year
    }

    /// Toggles `date` for a partner in the year the date falls in.
    ///
    /// A training day over its limit fails with
    /// [`EngineError::LimitExceeded`] and nothing is written. A vacation on
    /// a day that cannot hold one returns [`ToggleOutcome::Inert`] and
    /// nothing is written.
    pub async fn toggle_day(
        &mut self,
        partner_id: &str,
        date: NaiveDate,
        category: DayCategory,
    ) -> EngineResult<ToggleOutcome> {
        let year = date.year();
        let holidays = self.holidays.holidays_for(year).await;
        let (document, outcome) = toggle_partner_day(
            &self.document,
            partner_id,
            year,
            date,
            category,
            &holidays,
        )?;

        match outcome {
            ToggleOutcome::LimitExceeded { category, limit } => {
                info!(partner_id, %date, %category, limit, "Toggle refused, allocation used up");
                Err(EngineError::LimitExceeded { category, limit })
            }
            ToggleOutcome::Inert { class } => {
                debug!(partner_id, %date, %class, "Ignored vacation on a non-selectable day");
                Ok(outcome)
            }
            _ => {
                self.commit(document).await?;
                Ok(outcome)
            }
        }
    }

    /// Sets one allocation for a partner in the displayed year.
    pub async fn set_allocation(
        &mut self,
        partner_id: &str,
        kind: AllocationKind,
        value: u32,
    ) -> EngineResult<()> {
        let document = set_allocation(&self.document, partner_id, self.document.year, kind, value)?;
        self.commit(document).await
    }

    /// Flips one weekday of a partner's schedule in the displayed year.
    pub async fn toggle_work_day(&mut self, partner_id: &str, weekday_index: u8) -> EngineResult<()> {
        let document =
            toggle_work_day(&self.document, partner_id, self.document.year, weekday_index)?;
        self.commit(document).await
    }

    /// Renames a partner.
    pub async fn rename_partner(&mut self, partner_id: &str, name: &str) -> EngineResult<()> {
        let document = rename_partner(&self.document, partner_id, name)?;
        self.commit(document).await
    }

    /// Sets the firm-wide holiday policy.
    pub async fn set_count_holidays_as_leave(&mut self, enabled: bool) -> EngineResult<()> {
        let document = set_count_holidays_as_leave(&self.document, enabled);
        self.commit(document).await
    }

    /// Changes the displayed year.
    pub async fn set_year(&mut self, year: i32) -> EngineResult<()> {
        let document = set_year(&self.document, year);
        self.commit(document).await
    }

    /// Computes one partner's balance for the displayed year.
    pub async fn balance(&self, partner_id: &str) -> EngineResult<Balance> {
        let holidays = self.holidays.holidays_for(self.document.year).await;
        partner_balance(&self.document, partner_id, self.document.year, &holidays)
    }

    /// Computes every partner's balance for the displayed year.
    pub async fn balances(&self) -> EngineResult<Vec<PartnerBalance>> {
        self.balances_for_year(self.document.year).await
    }

    /// Computes every partner's balance for `year` without changing the
    /// displayed year.
    pub async fn balances_for_year(&self, year: i32) -> EngineResult<Vec<PartnerBalance>> {
        let holidays = self.holidays.holidays_for(year).await;
        self.document
            .partners
            .iter()
            .map(|partner| {
                Ok(PartnerBalance {
                    id: partner.id.clone(),
                    name: partner.name.clone(),
                    balance: partner_balance(&self.document, &partner.id, year, &holidays)?,
                })
            })
            .collect()
    }

    /// Handles an inbound snapshot received now.
    pub async fn receive(&mut self, snapshot: Snapshot) -> SnapshotDisposition {
        self.receive_at(snapshot, Instant::now()).await
    }

    /// Handles an inbound snapshot received at `now`.
    pub async fn receive_at(&mut self, snapshot: Snapshot, now: Instant) -> SnapshotDisposition {
        let disposition = self.guard.admit(&snapshot, now);
        match disposition {
            SnapshotDisposition::Apply => {
                self.document = snapshot.document;
                self.refresh_cache().await;
            }
            SnapshotDisposition::OwnEcho => debug!("Observed echo of local write"),
            SnapshotDisposition::Suppressed => {
                info!("Ignored remote snapshot while a local write is pending")
            }
        }
        disposition
    }

    /// Handles every snapshot the store has pushed since the last call.
    pub async fn poll_updates(&mut self) -> Vec<SnapshotDisposition> {
        let mut dispositions = Vec::new();
        loop {
            match self.updates.try_recv() {
                Ok(snapshot) => dispositions.push(self.receive(snapshot).await),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed roster snapshots");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        dispositions
    }

    async fn refresh_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write(&self.document).await;
        }
    }

    async fn commit(&mut self, document: RosterDocument) -> EngineResult<()> {
        self.document = document;
        self.refresh_cache().await;

        let token = self.guard.begin_write(Instant::now());
        match self.store.save(&self.document, Some(token)).await {
            Ok(()) => {
                debug!(%token, "Committed roster change");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Roster change kept locally but not saved");
                Err(match err {
                    EngineError::PersistenceFailure { .. } => err,
                    other => EngineError::PersistenceFailure {
                        message: other.to_string(),
                    },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::StaticHolidaySource;
    use crate::models::{Allocations, HolidayTable, Partner};
    use crate::store::{InMemoryStore, WriteToken};
    use async_trait::async_trait;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn holidays() -> HolidayService {
        HolidayService::new(Arc::new(StaticHolidaySource::new()))
    }

    fn options() -> SessionOptions {
        SessionOptions {
            load_timeout: Duration::from_millis(50),
            ..SessionOptions::default()
        }
    }

    /// A store that never answers loads in time and rejects every save.
    struct UnreachableStore {
        updates: broadcast::Sender<Snapshot>,
    }

    impl UnreachableStore {
        fn new() -> Self {
            Self {
                updates: broadcast::channel(4).0,
            }
        }
    }

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn load(&self) -> EngineResult<Option<RosterDocument>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn save(&self, _: &RosterDocument, _: Option<WriteToken>) -> EngineResult<()> {
            Err(EngineError::PersistenceFailure {
                message: "offline".to_string(),
            })
        }

        fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
            self.updates.subscribe()
        }
    }

    async fn open_in_memory() -> (Arc<InMemoryStore>, RosterSession) {
        let store = Arc::new(InMemoryStore::new());
        let session = RosterSession::open(store.clone(), holidays(), None, options()).await;
        (store, session)
    }

    #[tokio::test]
    async fn test_empty_store_is_seeded_and_saved() {
        let (store, session) = open_in_memory().await;

        assert_eq!(session.source(), LoadSource::Seeded);
        assert_eq!(session.document().partners.len(), 5);
        assert_eq!(store.load().await.unwrap().as_ref(), Some(session.document()));
    }

    #[tokio::test]
    async fn test_stored_document_is_loaded() {
        let mut document = RosterDocument::seeded(&RosterSeed::default());
        document.year = 2027;
        let store = Arc::new(InMemoryStore::with_document(document.clone()));

        let session = RosterSession::open(store, holidays(), None, options()).await;
        assert_eq!(session.source(), LoadSource::Remote);
        assert_eq!(session.document(), &document);
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_defaults() {
        let session =
            RosterSession::open(Arc::new(UnreachableStore::new()), holidays(), None, options())
                .await;

        assert_eq!(session.source(), LoadSource::Defaults);
        assert_eq!(session.document(), &RosterDocument::seeded(&RosterSeed::default()));
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_cache() {
        let dir = std::env::temp_dir().join(format!("leave-engine-session-{}", uuid::Uuid::new_v4()));
        let cache = LocalCache::new(dir.join("roster.cache.json"));
        let mut cached = RosterDocument::seeded(&RosterSeed::default());
        cached.year = 2030;
        cache.write(&cached).await;

        let session = RosterSession::open(
            Arc::new(UnreachableStore::new()),
            holidays(),
            Some(cache),
            options(),
        )
        .await;

        assert_eq!(session.source(), LoadSource::Cache);
        assert_eq!(session.year(), 2030);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_toggle_is_saved_and_echo_recognised() {
        let (store, mut session) = open_in_memory().await;
        session.poll_updates().await;

        let outcome = session
            .toggle_day("1", make_date("2026-03-02"), DayCategory::Vacation)
            .await
            .unwrap();
        assert!(outcome.is_applied());
        assert_eq!(store.load().await.unwrap().as_ref(), Some(session.document()));
        assert_eq!(session.balance("1").await.unwrap().remaining, 24);

        assert_eq!(session.poll_updates().await, vec![SnapshotDisposition::OwnEcho]);
    }

    #[tokio::test]
    async fn test_limit_refusal_does_not_write() {
        let (store, mut session) = open_in_memory().await;
        let before = store.load().await.unwrap();

        let result = session
            .toggle_day("2", make_date("2026-03-02"), DayCategory::TrainingGiven)
            .await;

        match result {
            Err(EngineError::LimitExceeded { category, limit }) => {
                assert_eq!(category, DayCategory::TrainingGiven);
                assert_eq!(limit, 0);
            }
            other => panic!("Expected LimitExceeded, got {:?}", other),
        }
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_inert_vacation_does_not_write() {
        let (store, mut session) = open_in_memory().await;
        let before = store.load().await.unwrap();

        let outcome = session
            .toggle_day("1", make_date("2026-03-07"), DayCategory::Vacation)
            .await
            .unwrap();

        assert!(matches!(outcome, ToggleOutcome::Inert { .. }));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_partner_is_not_found() {
        let (_, mut session) = open_in_memory().await;
        let before = session.document().clone();

        let result = session.rename_partner("42", "Nobody").await;
        assert!(matches!(result, Err(EngineError::PartnerNotFound { .. })));
        assert_eq!(session.document(), &before);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_local_state() {
        let mut session =
            RosterSession::open(Arc::new(UnreachableStore::new()), holidays(), None, options())
                .await;

        let result = session
            .toggle_day("1", make_date("2026-03-02"), DayCategory::Vacation)
            .await;

        assert!(matches!(result, Err(EngineError::PersistenceFailure { .. })));
        assert_eq!(session.balance("1").await.unwrap().deducted, 1);
    }

    #[tokio::test]
    async fn test_foreign_snapshot_suppressed_until_window_ends() {
        let (_, mut session) = open_in_memory().await;
        session.poll_updates().await;
        session.set_count_holidays_as_leave(true).await.unwrap();

        let stale = Snapshot {
            document: RosterDocument::seeded(&RosterSeed::default()),
            origin: None,
        };
        let now = Instant::now();

        assert_eq!(
            session.receive_at(stale.clone(), now).await,
            SnapshotDisposition::Suppressed
        );
        assert!(session.document().settings.count_holidays_as_leave);

        assert_eq!(
            session.receive_at(stale, now + Duration::from_secs(1)).await,
            SnapshotDisposition::Apply
        );
        assert!(!session.document().settings.count_holidays_as_leave);
    }

    #[tokio::test]
    async fn test_open_migrates_flat_records() {
        let mut partner = Partner::new("1", "Nina Lucas", Allocations::default());
        partner.vacations.insert(make_date("2026-03-02"));
        let document = RosterDocument {
            partners: vec![partner],
            settings: Default::default(),
            year: 2026,
        };
        let store = Arc::new(InMemoryStore::with_document(document));

        let session = RosterSession::open(store.clone(), holidays(), None, options()).await;
        let migrated = session.document().partner("1").unwrap();

        assert!(!migrated.has_flat_day_sets());
        assert!(migrated.year_specific.contains_key(&2026));
        assert_eq!(session.balance("1").await.unwrap().deducted, 1);
        assert_eq!(store.load().await.unwrap().as_ref(), Some(session.document()));
    }

    /// Serves one document on load and rejects every save.
    struct ReadOnlyStore {
        document: RosterDocument,
        updates: broadcast::Sender<Snapshot>,
    }

    #[async_trait]
    impl DocumentStore for ReadOnlyStore {
        async fn load(&self) -> EngineResult<Option<RosterDocument>> {
            Ok(Some(self.document.clone()))
        }

        async fn save(&self, _: &RosterDocument, _: Option<WriteToken>) -> EngineResult<()> {
            Err(EngineError::PersistenceFailure {
                message: "read-only".to_string(),
            })
        }

        fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
            self.updates.subscribe()
        }
    }

    #[tokio::test]
    async fn test_migration_kept_locally_when_save_fails() {
        let mut partner = Partner::new("1", "Nina Lucas", Allocations::default());
        partner.vacations.insert(make_date("2026-03-02"));
        let store = Arc::new(ReadOnlyStore {
            document: RosterDocument {
                partners: vec![partner],
                settings: Default::default(),
                year: 2026,
            },
            updates: broadcast::channel(4).0,
        });

        let session = RosterSession::open(store, holidays(), None, options()).await;

        assert_eq!(session.source(), LoadSource::Remote);
        let migrated = session.document().partner("1").unwrap();
        assert!(!migrated.has_flat_day_sets());
        assert_eq!(session.balance("1").await.unwrap().deducted, 1);
    }

    #[tokio::test]
    async fn test_toggle_outside_displayed_year_lands_in_its_own_year() {
        let mut document = RosterDocument::seeded(&RosterSeed::default());
        document.partners[0].allocations.training_give = 3;
        let store = Arc::new(InMemoryStore::with_document(document));
        let new_year = make_date("2027-01-01");
        let holidays = HolidayService::new(Arc::new(StaticHolidaySource::new().with_year(
            2027,
            HolidayTable::new().with_holiday(new_year, "1er janvier"),
        )));
        let mut session = RosterSession::open(store, holidays, None, options()).await;
        assert_eq!(session.year(), 2026);

        let outcome = session
            .toggle_day("1", new_year, DayCategory::TrainingGiven)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ToggleOutcome::Added {
                category: DayCategory::TrainingGiven
            }
        );

        let partner = session.document().partner("1").unwrap();
        assert!(!partner.year_specific.contains_key(&2026));
        assert!(partner.year_specific[&2027].trainings_given.contains(&new_year));

        // Training on a non-worked holiday earns a day back in its own year.
        let balances = session.balances_for_year(2027).await.unwrap();
        assert_eq!(balances[0].balance.recovered, 1);
        assert_eq!(session.balance("1").await.unwrap().recovered, 0);
    }

    #[tokio::test]
    async fn test_balances_and_schedule_edits() {
        let (_, mut session) = open_in_memory().await;
        session
            .set_allocation("3", AllocationKind::Vacation, 30)
            .await
            .unwrap();
        session.toggle_work_day("3", 3).await.unwrap();
        session.set_year(2027).await.unwrap();

        let balances = session.balances().await.unwrap();
        assert_eq!(balances.len(), 5);
        assert_eq!(balances[2].name, "Michael Bennaim");
        // Overrides are per year, so 2027 starts from the base allocation.
        assert_eq!(balances[2].balance.remaining, 25);
    }
}
