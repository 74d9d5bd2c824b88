//! Public holiday table model.
//!
//! This module contains the [`HolidayTable`] type: the read-only mapping from
//! date to holiday name that the engine consumes for one calendar year.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Public holidays for one calendar year, keyed by date.
///
/// The wire form is the JSON object published by the French government
/// calendar API: `{"2026-01-01": "1er janvier", ...}`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::models::HolidayTable;
///
/// let christmas = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
/// let holidays = HolidayTable::new().with_holiday(christmas, "Noël");
///
/// assert_eq!(holidays.name(christmas), Some("Noël"));
/// assert!(holidays.is_holiday(christmas));
/// assert_eq!(holidays.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayTable(BTreeMap<NaiveDate, String>);

impl HolidayTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with one more holiday.
    pub fn with_holiday(mut self, date: NaiveDate, name: impl Into<String>) -> Self {
        self.0.insert(date, name.into());
        self
    }

    /// Returns the holiday name for `date`, if any.
    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.0.get(&date).map(String::as_str)
    }

    /// Checks if `date` is in the table.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    /// Iterates over `(date, name)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.0.iter().map(|(date, name)| (*date, name.as_str()))
    }

    /// Number of holidays in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for HolidayTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deserialize_government_calendar_payload() {
        let json = r#"{
            "2026-01-01": "1er janvier",
            "2026-05-25": "Lundi de Pentecôte",
            "2026-12-25": "Jour de Noël"
        }"#;

        let table: HolidayTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.name(make_date("2026-05-25")),
            Some("Lundi de Pentecôte")
        );
        assert!(!table.is_holiday(make_date("2026-05-26")));
    }

    #[test]
    fn test_iter_is_date_ordered() {
        let table = HolidayTable::new()
            .with_holiday(make_date("2026-12-25"), "Noël")
            .with_holiday(make_date("2026-01-01"), "1er janvier");

        let dates: Vec<NaiveDate> = table.iter().map(|(date, _)| date).collect();
        assert_eq!(dates, vec![make_date("2026-01-01"), make_date("2026-12-25")]);
    }

    #[test]
    fn test_empty_table() {
        let table = HolidayTable::new();
        assert!(table.is_empty());
        assert_eq!(table.name(make_date("2026-01-01")), None);
    }
}
