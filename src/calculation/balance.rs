//! Leave balance calculation.
//!
//! This module turns a partner's [`YearRecord`] into a [`Balance`]: days
//! deducted from the vacation quota, days recovered through training held on
//! days off, and what remains. Going over the quota is a valid state; it is
//! reported through [`Balance::over_limit`], never rejected.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::{HolidayTable, Settings, YearRecord};

use super::day_classification::{DayClass, classify};

/// Result of a balance calculation for one partner and year.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::calculation::compute_balance;
/// use leave_engine::models::{Allocations, HolidayTable, Settings, WorkDays, YearRecord};
///
/// let mut record = YearRecord::new(WorkDays::monday_to_friday(), Allocations::default());
/// record.vacations.insert(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()); // Monday
/// record.vacations.insert(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()); // Saturday
///
/// let balance = compute_balance(&record, &HolidayTable::new(), Settings::default());
/// assert_eq!(balance.deducted, 1);
/// assert_eq!(balance.remaining, 24);
/// assert!(!balance.over_limit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Days deducted by the partner's own vacation selections.
    pub vacation_days: u32,
    /// Days debited automatically for public holidays on work days.
    pub holiday_days: u32,
    /// Total days used: `vacation_days + holiday_days`.
    pub deducted: u32,
    /// Days earned back through training on days off.
    pub recovered: u32,
    /// Vacation allocation plus recovered days.
    pub total_available: i64,
    /// `allocation - deducted + recovered`. May be negative.
    pub remaining: i64,
    /// Whether `remaining` is below zero.
    pub over_limit: bool,
}

/// Days one vacation date costs, given its classification.
///
/// | Class | Cost |
/// |---|---|
/// | Weekend, NonWorkDay | 0 |
/// | WorkedHoliday, RegularWorkDay | 1 |
/// | TrueHoliday | 1 when `count_holidays_as_leave`, else 0 |
pub fn vacation_cost(class: DayClass, settings: Settings) -> u32 {
    match class {
        DayClass::Weekend | DayClass::NonWorkDay => 0,
        DayClass::WorkedHoliday | DayClass::RegularWorkDay => 1,
        DayClass::TrueHoliday => u32::from(settings.count_holidays_as_leave),
    }
}

/// Sums the cost of every date in the record's vacation set.
pub fn vacation_deduction(record: &YearRecord, holidays: &HolidayTable, settings: Settings) -> u32 {
    record
        .vacations
        .iter()
        .map(|date| vacation_cost(classify(*date, &record.work_days, holidays), settings))
        .sum()
}

/// Counts the non-worked holidays debited automatically from the quota.
///
/// Only applies when `count_holidays_as_leave` is set. A holiday counts when
/// it is a [`DayClass::TrueHoliday`] that falls on a weekday the partner
/// works, whether or not the partner selected it.
pub fn holiday_debit(record: &YearRecord, holidays: &HolidayTable, settings: Settings) -> u32 {
    if !settings.count_holidays_as_leave {
        return 0;
    }

    holidays
        .iter()
        .filter(|(date, _)| {
            classify(*date, &record.work_days, holidays) == DayClass::TrueHoliday
                && record.work_days.works_on(date.weekday())
        })
        .count() as u32
}

/// Counts training dates that earn a vacation day back.
///
/// A training day recovers one day when held on a weekend, a non-work day or
/// a non-worked holiday. Training on a regular work day or a worked holiday
/// is neutral.
pub fn recovered_days(record: &YearRecord, holidays: &HolidayTable) -> u32 {
    record
        .training_dates()
        .filter(|date| classify(*date, &record.work_days, holidays).recovers_training())
        .count() as u32
}

/// Computes the full balance for a record.
///
/// # Arguments
///
/// * `record` - The resolved year record
/// * `holidays` - Public holidays for the record's year
/// * `settings` - Firm-wide policy, passed explicitly
pub fn compute_balance(record: &YearRecord, holidays: &HolidayTable, settings: Settings) -> Balance {
    let vacation_days = vacation_deduction(record, holidays, settings);
    let holiday_days = holiday_debit(record, holidays, settings);
    let deducted = vacation_days + holiday_days;
    let recovered = recovered_days(record, holidays);

    let allocation = i64::from(record.allocations.vacation);
    let total_available = allocation + i64::from(recovered);
    let remaining = allocation - i64::from(deducted) + i64::from(recovered);

    Balance {
        vacation_days,
        holiday_days,
        deducted,
        recovered,
        total_available,
        remaining,
        over_limit: remaining < 0,
    }
}
