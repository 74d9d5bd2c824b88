//! Application state for the leave engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::calculation::migrate_flat_records;
use crate::error::{EngineError, EngineResult};
use crate::holidays::HolidayService;
use crate::models::{RosterDocument, RosterSeed};
use crate::store::{DocumentStore, WriteToken};

/// Shared application state.
///
/// Contains the document store, the holiday service and the seed roster.
/// Handlers that read, modify and write the document hold the write lock
/// for the whole cycle, so the server is a single writer.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    holidays: HolidayService,
    seed: Arc<RosterSeed>,
    load_timeout: Duration,
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: Arc<dyn DocumentStore>, holidays: HolidayService, seed: RosterSeed) -> Self {
        Self {
            store,
            holidays,
            seed: Arc::new(seed),
            load_timeout: Duration::from_millis(5000),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a copy with a different bound on document loads.
    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    /// The holiday service.
    pub fn holidays(&self) -> &HolidayService {
        &self.holidays
    }

    /// Waits for exclusive write access.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Loads the document, bounded by the load timeout.
    pub async fn load(&self) -> EngineResult<Option<RosterDocument>> {
        let millis = u64::try_from(self.load_timeout.as_millis()).unwrap_or(u64::MAX);
        tokio::time::timeout(self.load_timeout, self.store.load())
            .await
            .map_err(|_| EngineError::Timeout { millis })?
    }

    /// Saves the document under a fresh write token.
    pub async fn save(&self, document: &RosterDocument) -> EngineResult<()> {
        self.store.save(document, Some(WriteToken::new())).await
    }

    /// Loads the document, creating and saving the seed roster when the
    /// store is empty. Callers must hold the write lock.
    pub async fn load_or_seed(&self) -> EngineResult<RosterDocument> {
        if let Some(document) = self.load().await? {
            return Ok(document);
        }

        let document = RosterDocument::seeded(&self.seed);
        self.save(&document).await?;
        info!(partners = document.partners.len(), "Seeded empty roster store");
        Ok(document)
    }

    /// Prepares the store for serving: seeds it when empty and migrates flat
    /// day-sets into the displayed year.
    pub async fn initialize(&self) -> EngineResult<RosterDocument> {
        let _guard = self.lock_writes().await;
        let document = self.load_or_seed().await?;

        match migrate_flat_records(&document) {
            Some(migrated) => {
                self.save(&migrated).await?;
                info!(year = migrated.year, "Migrated flat day-sets into the displayed year");
                Ok(migrated)
            }
            None => Ok(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::StaticHolidaySource;
    use crate::models::{Allocations, Partner};
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn make_state(store: Arc<InMemoryStore>) -> AppState {
        AppState::new(
            store,
            HolidayService::new(Arc::new(StaticHolidaySource::new())),
            RosterSeed::default(),
        )
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_initialize_seeds_empty_store() {
        let store = Arc::new(InMemoryStore::new());
        let document = make_state(store.clone()).initialize().await.unwrap();

        assert_eq!(document.partners.len(), 5);
        assert_eq!(store.load().await.unwrap(), Some(document));
    }

    #[tokio::test]
    async fn test_initialize_migrates_flat_records() {
        let mut partner = Partner::new("1", "Nina Lucas", Allocations::default());
        partner
            .trainings_given
            .insert(NaiveDate::from_ymd_opt(2026, 5, 4).unwrap());
        let store = Arc::new(InMemoryStore::with_document(RosterDocument {
            partners: vec![partner],
            settings: Default::default(),
            year: 2026,
        }));

        let document = make_state(store.clone()).initialize().await.unwrap();
        let migrated = document.partner("1").unwrap();
        assert!(!migrated.has_flat_day_sets());
        assert_eq!(migrated.year_specific[&2026].trainings_given.len(), 1);
        assert_eq!(store.load().await.unwrap(), Some(document));
    }
}
