//! Per-year caching of holiday tables.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::HolidayTable;

use super::HolidaySource;

/// Caches holiday tables per year for the lifetime of the process.
///
/// Cloning the service shares the cache. A failed fetch is logged and
/// answered with an empty table that is not cached, so the next lookup for
/// that year retries the source.
#[derive(Clone)]
pub struct HolidayService {
    source: Arc<dyn HolidaySource>,
    cache: Arc<Mutex<HashMap<i32, HolidayTable>>>,
}

impl HolidayService {
    /// Creates a service over `source`.
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        Self {
            source,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the holidays for `year`, fetching them on first use.
    ///
    /// The cache lock is not held while the source is queried, so lookups of
    /// cached years never wait on a fetch. Concurrent first lookups of the
    /// same year may each query the source; the first answer stored wins.
    pub async fn holidays_for(&self, year: i32) -> HolidayTable {
        if let Some(table) = self.cache.lock().await.get(&year) {
            return table.clone();
        }

        match self.source.fetch(year).await {
            Ok(table) => {
                let mut cache = self.cache.lock().await;
                let stored = cache.entry(year).or_insert_with(|| {
                    info!(year, holidays = table.len(), "Cached public holidays");
                    table
                });
                stored.clone()
            }
            Err(err) => {
                warn!(year, error = %err, "Holiday lookup failed, using an empty table");
                HolidayTable::new()
            }
        }
    }

    /// Whether `year` is already cached.
    pub async fn is_cached(&self, year: i32) -> bool {
        self.cache.lock().await.contains_key(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, EngineResult};
    use crate::holidays::StaticHolidaySource;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl HolidaySource for CountingSource {
        async fn fetch(&self, year: i32) -> EngineResult<HolidayTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EngineError::HolidayFetch {
                    year,
                    message: "network down".to_string(),
                });
            }
            Ok(HolidayTable::new().with_holiday(
                NaiveDate::from_ymd_opt(year, 12, 25).unwrap(),
                "Jour de Noël",
            ))
        }
    }

    #[tokio::test]
    async fn test_fetches_once_per_year() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let service = HolidayService::new(source.clone());

        let first = service.holidays_for(2026).await;
        let second = service.holidays_for(2026).await;
        service.holidays_for(2027).await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(service.is_cached(2026).await);
    }

    #[tokio::test]
    async fn test_failure_fails_open_and_is_not_cached() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let service = HolidayService::new(source.clone());

        assert!(service.holidays_for(2026).await.is_empty());
        assert!(service.holidays_for(2026).await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(!service.is_cached(2026).await);
    }

    /// Answers 2027 only once released; every other year answers at once.
    struct GatedSource {
        started: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl HolidaySource for GatedSource {
        async fn fetch(&self, year: i32) -> EngineResult<HolidayTable> {
            if year == 2027 {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(HolidayTable::new().with_holiday(
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
                "1er janvier",
            ))
        }
    }

    #[tokio::test]
    async fn test_cached_year_is_served_while_another_year_is_fetched() {
        let source = Arc::new(GatedSource {
            started: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let service = HolidayService::new(source.clone());
        service.holidays_for(2026).await;

        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.holidays_for(2027).await }
        });
        source.started.notified().await;

        let cached = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            service.holidays_for(2026),
        )
        .await
        .expect("cached year blocked behind an in-flight fetch");
        assert_eq!(cached.len(), 1);
        assert!(!service.is_cached(2027).await);

        source.release.notify_one();
        assert_eq!(pending.await.unwrap().len(), 1);
        assert!(service.is_cached(2027).await);
    }

    #[tokio::test]
    async fn test_static_source_serves_configured_years() {
        let christmas = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        let source = StaticHolidaySource::new()
            .with_year(2026, HolidayTable::new().with_holiday(christmas, "Jour de Noël"));
        let service = HolidayService::new(Arc::new(source));

        assert!(service.holidays_for(2026).await.is_holiday(christmas));
        assert!(service.holidays_for(2031).await.is_empty());
    }
}
