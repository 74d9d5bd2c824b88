//! Core data models for the leave accounting engine.
//!
//! This module contains all the domain models used throughout the engine.

mod category;
mod holiday;
mod partner;
mod roster;
mod schedule;

pub use category::DayCategory;
pub use holiday::HolidayTable;
pub use partner::{Partner, YearOverride, YearRecord};
pub use roster::{DEFAULT_YEAR, RosterDocument, RosterSeed, SeedPartner, Settings};
pub use schedule::{
    AllocationKind, Allocations, DEFAULT_VACATION_ALLOCATION, WorkDays, is_weekend,
    weekday_from_index, weekday_index,
};
