//! Day-set toggling.
//!
//! A calendar click is a toggle intent: a date and a target category. This
//! module is the only place the engine moves a date between the vacation and
//! training day-sets, so the day-sets stay pairwise disjoint by construction.
//!
//! Transitions, per date:
//!
//! | Current state | Target | Result |
//! |---|---|---|
//! | `target` | `target` | removed |
//! | none | `target` | added (training: if under its limit) |
//! | other category | `target` | moved (training: if under its limit) |
//!
//! A refused transition returns the record unchanged together with an
//! outcome describing why.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DayCategory, HolidayTable, YearRecord};

use super::day_classification::{DayClass, classify};

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ToggleOutcome {
    /// The date had no category and now holds `category`.
    Added {
        /// The new category.
        category: DayCategory,
    },
    /// The date moved from one category to another.
    Moved {
        /// The category the date held before.
        from: DayCategory,
        /// The category the date holds now.
        to: DayCategory,
    },
    /// The date held `category` and now holds none.
    Removed {
        /// The category that was cleared.
        category: DayCategory,
    },
    /// Refused: the training allocation for `category` is used up.
    LimitExceeded {
        /// The capped category.
        category: DayCategory,
        /// The allocation that was reached.
        limit: u32,
    },
    /// Refused: vacation cannot be recorded on a day of this class.
    Inert {
        /// The date's classification.
        class: DayClass,
    },
}

impl ToggleOutcome {
    /// Whether the record changed.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            ToggleOutcome::Added { .. } | ToggleOutcome::Moved { .. } | ToggleOutcome::Removed { .. }
        )
    }
}

/// A new record and the outcome that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResult {
    /// The record after the toggle; equal to the input when refused.
    pub record: YearRecord,
    /// What happened.
    pub outcome: ToggleOutcome,
}

/// Toggles `date` in or out of `category`.
///
/// Vacation toggles are never limited. Training toggles that would add a
/// date are refused with [`ToggleOutcome::LimitExceeded`] when the target
/// set already holds as many dates as its allocation. Removing is always
/// allowed.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::calculation::{ToggleOutcome, toggle_day};
/// use leave_engine::models::{Allocations, DayCategory, WorkDays, YearRecord};
///
/// let record = YearRecord::new(
///     WorkDays::monday_to_friday(),
///     Allocations { vacation: 25, training_give: 1, training_receive: 0 },
/// );
/// let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// let first = toggle_day(&record, monday, DayCategory::Vacation);
/// assert!(first.record.vacations.contains(&monday));
///
/// let moved = toggle_day(&first.record, monday, DayCategory::TrainingGiven);
/// assert_eq!(
///     moved.outcome,
///     ToggleOutcome::Moved { from: DayCategory::Vacation, to: DayCategory::TrainingGiven }
/// );
/// assert!(moved.record.vacations.is_empty());
///
/// let refused = toggle_day(&record, monday, DayCategory::TrainingReceived);
/// assert_eq!(
///     refused.outcome,
///     ToggleOutcome::LimitExceeded { category: DayCategory::TrainingReceived, limit: 0 }
/// );
/// assert_eq!(refused.record, record);
/// ```
pub fn toggle_day(record: &YearRecord, date: NaiveDate, category: DayCategory) -> ToggleResult {
    let current = record.category_of(date);

    if current == Some(category) {
        let mut next = record.clone();
        next.dates_mut(category).remove(&date);
        return ToggleResult {
            record: next,
            outcome: ToggleOutcome::Removed { category },
        };
    }

    if let Some(limit) = record.limit_for(category) {
        if record.dates(category).len() >= limit as usize {
            return ToggleResult {
                record: record.clone(),
                outcome: ToggleOutcome::LimitExceeded { category, limit },
            };
        }
    }

    let mut next = record.clone();
    if let Some(previous) = current {
        next.dates_mut(previous).remove(&date);
    }
    next.dates_mut(category).insert(date);

    let outcome = match current {
        Some(from) => ToggleOutcome::Moved { from, to: category },
        None => ToggleOutcome::Added { category },
    };

    ToggleResult {
        record: next,
        outcome,
    }
}

/// Toggles a date the way the calendar does, refusing inert vacation days.
///
/// Adding a vacation on a [`DayClass::Weekend`] or [`DayClass::TrueHoliday`]
/// is refused with [`ToggleOutcome::Inert`]. Removing a date is never
/// refused, and worked holidays accept vacations.
pub fn toggle_day_checked(
    record: &YearRecord,
    date: NaiveDate,
    category: DayCategory,
    holidays: &HolidayTable,
) -> ToggleResult {
    let adding = record.category_of(date) != Some(category);

    if adding && category == DayCategory::Vacation {
        let class = classify(date, &record.work_days, holidays);
        if !class.accepts_vacation() {
            return ToggleResult {
                record: record.clone(),
                outcome: ToggleOutcome::Inert { class },
            };
        }
    }

    toggle_day(record, date, category)
}
