//! Roster-level updates.
//!
//! Each function takes the current [`RosterDocument`] by reference and
//! returns a new one; the input is never modified. Partner lookups fail with
//! [`EngineError::PartnerNotFound`].

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationKind, DayCategory, HolidayTable, Partner, RosterDocument, Settings,
    weekday_from_index,
};

use super::balance::{Balance, compute_balance};
use super::toggle::{ToggleOutcome, toggle_day_checked};
use super::year_record::{resolve_year_record, update_year_record, with_year_record};

fn find_partner<'a>(document: &'a RosterDocument, id: &str) -> EngineResult<&'a Partner> {
    document
        .partner(id)
        .ok_or_else(|| EngineError::PartnerNotFound { id: id.to_string() })
}

fn replace_partner(document: &RosterDocument, updated: Partner) -> RosterDocument {
    let partners = document
        .partners
        .iter()
        .map(|p| if p.id == updated.id { updated.clone() } else { p.clone() })
        .collect();

    RosterDocument {
        partners,
        settings: document.settings,
        year: document.year,
    }
}

/// Applies a calendar toggle for one partner and year.
///
/// `date` must fall in `year`, otherwise the toggle fails with
/// [`EngineError::DateOutsideYear`]; `holidays` is the table for that year.
/// Refused toggles return an unchanged copy of the document together with
/// the refusal outcome.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::calculation::{partner_balance, toggle_partner_day};
/// use leave_engine::models::{DayCategory, HolidayTable, RosterDocument, RosterSeed};
///
/// let document = RosterDocument::seeded(&RosterSeed::default());
/// let holidays = HolidayTable::new();
/// let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// let (updated, outcome) =
///     toggle_partner_day(&document, "1", 2026, monday, DayCategory::Vacation, &holidays)?;
/// assert!(outcome.is_applied());
/// assert_eq!(partner_balance(&updated, "1", 2026, &holidays)?.remaining, 24);
/// assert_eq!(partner_balance(&document, "1", 2026, &holidays)?.remaining, 25);
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
pub fn toggle_partner_day(
    document: &RosterDocument,
    id: &str,
    year: i32,
    date: NaiveDate,
    category: DayCategory,
    holidays: &HolidayTable,
) -> EngineResult<(RosterDocument, ToggleOutcome)> {
    let partner = find_partner(document, id)?;
    if date.year() != year {
        return Err(EngineError::DateOutsideYear { date, year });
    }
    let result = toggle_day_checked(&resolve_year_record(partner, year), date, category, holidays);

    if !result.outcome.is_applied() {
        return Ok((document.clone(), result.outcome));
    }

    let updated = with_year_record(partner, year, result.record);
    Ok((replace_partner(document, updated), result.outcome))
}

/// Sets one annual quota for a partner and year.
pub fn set_allocation(
    document: &RosterDocument,
    id: &str,
    year: i32,
    kind: AllocationKind,
    value: u32,
) -> EngineResult<RosterDocument> {
    let partner = find_partner(document, id)?;
    let updated = update_year_record(partner, year, |mut record| {
        record.allocations = record.allocations.with(kind, value);
        record
    });
    Ok(replace_partner(document, updated))
}

/// Flips one weekday (0 = Sunday … 6 = Saturday) in a partner's schedule for a year.
pub fn toggle_work_day(
    document: &RosterDocument,
    id: &str,
    year: i32,
    weekday_index: u8,
) -> EngineResult<RosterDocument> {
    let weekday =
        weekday_from_index(weekday_index).ok_or(EngineError::InvalidWeekday { index: weekday_index })?;
    let partner = find_partner(document, id)?;
    let updated = update_year_record(partner, year, |mut record| {
        record.work_days = record.work_days.toggled(weekday);
        record
    });
    Ok(replace_partner(document, updated))
}

/// Renames a partner.
pub fn rename_partner(
    document: &RosterDocument,
    id: &str,
    name: impl Into<String>,
) -> EngineResult<RosterDocument> {
    let mut updated = find_partner(document, id)?.clone();
    updated.name = name.into();
    Ok(replace_partner(document, updated))
}

/// Sets the firm-wide holiday policy.
pub fn set_count_holidays_as_leave(document: &RosterDocument, enabled: bool) -> RosterDocument {
    RosterDocument {
        partners: document.partners.clone(),
        settings: Settings {
            count_holidays_as_leave: enabled,
        },
        year: document.year,
    }
}

/// Changes the displayed year.
pub fn set_year(document: &RosterDocument, year: i32) -> RosterDocument {
    RosterDocument {
        partners: document.partners.clone(),
        settings: document.settings,
        year,
    }
}

/// Computes a partner's balance for a year under the document's settings.
pub fn partner_balance(
    document: &RosterDocument,
    id: &str,
    year: i32,
    holidays: &HolidayTable,
) -> EngineResult<Balance> {
    let partner = find_partner(document, id)?;
    Ok(compute_balance(
        &resolve_year_record(partner, year),
        holidays,
        document.settings,
    ))
}
