//! Year-scoped partner record resolution.
//!
//! Partners keep base defaults plus a map of per-year overrides. Reading a
//! year never writes; writes go through [`with_year_record`], which replaces
//! the override stored for that year.

use std::collections::BTreeSet;

use crate::models::{Partner, RosterDocument, YearRecord};

/// Resolves the record that applies to `partner` in `year`.
///
/// An explicit override is returned as stored, with any missing schedule or
/// allocations taken from the partner's base values. Without an override a
/// record is synthesized from the base values with empty day-sets.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{resolve_year_record, with_year_record};
/// use leave_engine::models::{Allocations, Partner};
///
/// let partner = Partner::new("1", "Nina Lucas", Allocations::default());
/// let mut record = resolve_year_record(&partner, 2027);
/// assert!(record.vacations.is_empty());
///
/// record.allocations.vacation = 27;
/// let updated = with_year_record(&partner, 2027, record.clone());
/// assert_eq!(resolve_year_record(&updated, 2027), record);
/// assert_eq!(resolve_year_record(&updated, 2026).allocations.vacation, 25);
/// ```
pub fn resolve_year_record(partner: &Partner, year: i32) -> YearRecord {
    match partner.year_specific.get(&year) {
        Some(stored) => YearRecord {
            work_days: stored
                .work_days
                .clone()
                .unwrap_or_else(|| partner.work_days.clone()),
            allocations: stored.allocations.unwrap_or(partner.allocations),
            vacations: stored.vacations.clone(),
            trainings_given: stored.trainings_given.clone(),
            trainings_received: stored.trainings_received.clone(),
        },
        None => YearRecord::new(partner.work_days.clone(), partner.allocations),
    }
}

/// Returns a copy of `partner` with `record` stored as the override for `year`.
pub fn with_year_record(partner: &Partner, year: i32, record: YearRecord) -> Partner {
    let mut next = partner.clone();
    next.year_specific.insert(year, record.into());
    next
}

/// Resolves `year`, applies `update`, and stores the result as the override.
pub fn update_year_record<F>(partner: &Partner, year: i32, update: F) -> Partner
where
    F: FnOnce(YearRecord) -> YearRecord,
{
    let record = update(resolve_year_record(partner, year));
    with_year_record(partner, year, record)
}

/// Moves flat-record day-sets into the override for `year`.
///
/// Only partners that still hold base-level day-sets and have no override
/// for `year` are touched; their base sets are cleared. Returns `None` when
/// nothing needed migrating.
pub fn migrate_flat_record(partner: &Partner, year: i32) -> Option<Partner> {
    if !partner.has_flat_day_sets() || partner.year_specific.contains_key(&year) {
        return None;
    }

    let mut record = YearRecord::new(partner.work_days.clone(), partner.allocations);
    record.vacations = partner.vacations.clone();
    record.trainings_given = partner.trainings_given.clone();
    // The flat layout did not keep the sets disjoint; vacation wins.
    record.trainings_given.retain(|date| !record.vacations.contains(date));
    record.trainings_received = partner
        .trainings_received
        .iter()
        .filter(|date| !record.vacations.contains(*date) && !record.trainings_given.contains(*date))
        .copied()
        .collect();

    let mut next = with_year_record(partner, year, record);
    next.vacations = BTreeSet::new();
    next.trainings_given = BTreeSet::new();
    next.trainings_received = BTreeSet::new();
    Some(next)
}

/// Applies [`migrate_flat_record`] to every partner for the document's year.
///
/// Returns `None` when the document is already fully year-scoped.
pub fn migrate_flat_records(document: &RosterDocument) -> Option<RosterDocument> {
    let mut changed = false;
    let partners: Vec<Partner> = document
        .partners
        .iter()
        .map(|partner| match migrate_flat_record(partner, document.year) {
            Some(migrated) => {
                changed = true;
                migrated
            }
            None => partner.clone(),
        })
        .collect();

    changed.then(|| RosterDocument {
        partners,
        settings: document.settings,
        year: document.year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocations, RosterSeed, WorkDays, YearOverride};
    use chrono::{NaiveDate, Weekday};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn partner() -> Partner {
        Partner::new("1", "Nina Lucas", Allocations::default())
    }

    #[test]
    fn test_missing_override_synthesizes_from_base() {
        let mut base = partner();
        base.work_days = WorkDays::monday_to_friday().with_day(Weekday::Wed, false);
        base.vacations.insert(make_date("2026-02-02"));

        let record = resolve_year_record(&base, 2026);
        assert_eq!(record.work_days, base.work_days);
        assert_eq!(record.allocations, base.allocations);
        assert!(record.vacations.is_empty());
        assert!(record.trainings_given.is_empty());
        assert!(record.trainings_received.is_empty());
    }

    #[test]
    fn test_partial_override_falls_back_to_base_fields() {
        let mut base = partner();
        base.allocations.vacation = 30;
        let mut stored = YearOverride::default();
        stored.vacations.insert(make_date("2027-07-05"));
        base.year_specific.insert(2027, stored);

        let record = resolve_year_record(&base, 2027);
        assert_eq!(record.allocations.vacation, 30);
        assert_eq!(record.work_days, WorkDays::monday_to_friday());
        assert!(record.vacations.contains(&make_date("2027-07-05")));
    }

    #[test]
    fn test_resolving_is_idempotent_and_read_only() {
        let base = partner();
        let first = resolve_year_record(&base, 2030);
        let second = resolve_year_record(&base, 2030);

        assert_eq!(first, second);
        assert!(base.year_specific.is_empty());
    }

    #[test]
    fn test_update_year_record_touches_only_that_year() {
        let base = partner();
        let updated = update_year_record(&base, 2026, |mut record| {
            record.vacations.insert(make_date("2026-08-03"));
            record
        });

        assert_eq!(resolve_year_record(&updated, 2026).vacations.len(), 1);
        assert!(resolve_year_record(&updated, 2027).vacations.is_empty());
        assert!(base.year_specific.is_empty());
    }

    #[test]
    fn test_migrate_moves_flat_sets_into_year() {
        let mut base = partner();
        base.vacations.insert(make_date("2026-02-02"));
        base.trainings_received.insert(make_date("2026-02-02"));
        base.trainings_received.insert(make_date("2026-02-07"));

        let migrated = migrate_flat_record(&base, 2026).unwrap();
        let record = resolve_year_record(&migrated, 2026);

        assert!(!migrated.has_flat_day_sets());
        assert!(record.vacations.contains(&make_date("2026-02-02")));
        assert_eq!(record.trainings_received.len(), 1);
        assert!(record.is_disjoint());
    }

    #[test]
    fn test_migrate_skips_existing_override() {
        let mut base = partner();
        base.vacations.insert(make_date("2026-02-02"));
        base.year_specific.insert(2026, YearOverride::default());

        assert!(migrate_flat_record(&base, 2026).is_none());
    }

    #[test]
    fn test_migrate_document_reports_no_change_for_seed() {
        let document = RosterDocument::seeded(&RosterSeed::default());
        assert!(migrate_flat_records(&document).is_none());
    }
}
