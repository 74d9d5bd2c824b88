//! Day classification logic.
//!
//! This module decides, for a single date, whether it is a weekend, a day the
//! partner does not work, a public holiday, a holiday the firm works anyway,
//! or a regular work day. Every balance rule is expressed in terms of this
//! classification.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{HolidayTable, WorkDays, is_weekend};

/// Holiday-name fragment marking a public holiday the firm works.
///
/// Matched case-insensitively against the holiday name.
pub const WORKED_HOLIDAY_MARKER: &str = "pentecôte";

/// Classification of a date for one partner.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::DayClass;
///
/// assert!(DayClass::RegularWorkDay.accepts_vacation());
/// assert!(DayClass::WorkedHoliday.accepts_vacation());
/// assert!(!DayClass::TrueHoliday.accepts_vacation());
/// assert!(DayClass::NonWorkDay.recovers_training());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClass {
    /// Saturday or Sunday. Overrides every other rule.
    Weekend,
    /// A weekday the partner's schedule explicitly excludes.
    NonWorkDay,
    /// A public holiday that is not worked.
    TrueHoliday,
    /// A public holiday the firm works anyway.
    WorkedHoliday,
    /// A day the partner would normally work.
    RegularWorkDay,
}

impl DayClass {
    /// Whether a vacation may be recorded on a day of this class.
    ///
    /// Weekends and non-worked holidays are inert in the calendar.
    pub fn accepts_vacation(self) -> bool {
        !matches!(self, DayClass::Weekend | DayClass::TrueHoliday)
    }

    /// Whether a training held on a day of this class earns a day back.
    pub fn recovers_training(self) -> bool {
        matches!(
            self,
            DayClass::Weekend | DayClass::NonWorkDay | DayClass::TrueHoliday
        )
    }
}

impl std::fmt::Display for DayClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayClass::Weekend => write!(f, "Weekend"),
            DayClass::NonWorkDay => write!(f, "Non-work day"),
            DayClass::TrueHoliday => write!(f, "Public holiday"),
            DayClass::WorkedHoliday => write!(f, "Worked holiday"),
            DayClass::RegularWorkDay => write!(f, "Work day"),
        }
    }
}

/// Checks if a holiday name designates a holiday the firm works.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::is_worked_holiday;
///
/// assert!(is_worked_holiday("Lundi de Pentecôte"));
/// assert!(is_worked_holiday("LUNDI DE PENTECÔTE"));
/// assert!(!is_worked_holiday("Jour de Noël"));
/// ```
pub fn is_worked_holiday(name: &str) -> bool {
    name.to_lowercase().contains(WORKED_HOLIDAY_MARKER)
}

/// Classifies a date for a partner.
///
/// Rules, in priority order:
/// 1. Saturday and Sunday are [`DayClass::Weekend`], whatever the schedule
///    or the holiday table says.
/// 2. A holiday whose name matches [`WORKED_HOLIDAY_MARKER`] is
///    [`DayClass::WorkedHoliday`].
/// 3. Any other holiday is [`DayClass::TrueHoliday`].
/// 4. A weekday explicitly excluded by `work_days` is [`DayClass::NonWorkDay`].
/// 5. Everything else is [`DayClass::RegularWorkDay`].
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use leave_engine::calculation::{DayClass, classify};
/// use leave_engine::models::{HolidayTable, WorkDays};
///
/// let pentecost = NaiveDate::from_ymd_opt(2026, 5, 25).unwrap(); // Monday
/// let holidays = HolidayTable::new().with_holiday(pentecost, "Lundi de Pentecôte");
/// let schedule = WorkDays::monday_to_friday().with_day(Weekday::Wed, false);
///
/// assert_eq!(classify(pentecost, &schedule, &holidays), DayClass::WorkedHoliday);
///
/// let wednesday = NaiveDate::from_ymd_opt(2026, 5, 27).unwrap();
/// assert_eq!(classify(wednesday, &schedule, &holidays), DayClass::NonWorkDay);
/// ```
pub fn classify(date: NaiveDate, work_days: &WorkDays, holidays: &HolidayTable) -> DayClass {
    let weekday = date.weekday();

    if is_weekend(weekday) {
        return DayClass::Weekend;
    }

    if let Some(name) = holidays.name(date) {
        return if is_worked_holiday(name) {
            DayClass::WorkedHoliday
        } else {
            DayClass::TrueHoliday
        };
    }

    if work_days.excludes(weekday) {
        DayClass::NonWorkDay
    } else {
        DayClass::RegularWorkDay
    }
}
