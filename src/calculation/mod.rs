//! Calculation logic for the leave accounting engine.
//!
//! This module contains the pure functions of the engine: day classification,
//! balance calculation, the day-set toggle state machine, year-scoped record
//! resolution, and the roster-level updates built on top of them. Nothing here
//! performs I/O or keeps state between calls.

mod balance;
mod day_classification;
mod roster_update;
mod toggle;
mod year_record;

pub use balance::{
    Balance, compute_balance, holiday_debit, recovered_days, vacation_cost, vacation_deduction,
};
pub use day_classification::{DayClass, WORKED_HOLIDAY_MARKER, classify, is_worked_holiday};
pub use roster_update::{
    partner_balance, rename_partner, set_allocation, set_count_holidays_as_leave, set_year,
    toggle_partner_day, toggle_work_day,
};
pub use toggle::{ToggleOutcome, ToggleResult, toggle_day, toggle_day_checked};
pub use year_record::{
    migrate_flat_record, migrate_flat_records, resolve_year_record, update_year_record,
    with_year_record,
};
