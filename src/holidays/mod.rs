//! Public holiday lookup.
//!
//! The engine consumes holidays as a [`HolidayTable`] per year. This module
//! provides the sources those tables come from and the [`HolidayService`]
//! that caches them for the lifetime of the process. Lookups fail open: a
//! source error yields an empty table rather than an error.

mod gouv;
mod service;

pub use gouv::{DEFAULT_HOLIDAYS_URL, GouvHolidaySource};
pub use service::HolidayService;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::HolidayTable;

/// A source of public holiday tables.
#[async_trait]
pub trait HolidaySource: Send + Sync {
    /// Fetches the holidays for `year`.
    async fn fetch(&self, year: i32) -> EngineResult<HolidayTable>;
}

/// A source serving fixed tables, for tests and offline use.
///
/// Years without a table resolve to an empty table.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidaySource {
    tables: BTreeMap<i32, HolidayTable>,
}

impl StaticHolidaySource {
    /// Creates a source with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy serving `table` for `year`.
    pub fn with_year(mut self, year: i32, table: HolidayTable) -> Self {
        self.tables.insert(year, table);
        self
    }
}

#[async_trait]
impl HolidaySource for StaticHolidaySource {
    async fn fetch(&self, year: i32) -> EngineResult<HolidayTable> {
        Ok(self.tables.get(&year).cloned().unwrap_or_default())
    }
}
