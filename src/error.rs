//! Error types for the leave accounting engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur around the engine: configuration,
//! roster lookups, allocation refusals and the persistence collaborators.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DayCategory;

/// The main error type for the leave accounting engine.
///
/// The pure calculation functions never fail on well-formed input; these
/// variants are produced by the roster-level updates, the collaborators and
/// the callers that turn a refused toggle into an error.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
/// use leave_engine::models::DayCategory;
///
/// let error = EngineError::LimitExceeded {
///     category: DayCategory::TrainingGiven,
///     limit: 2,
/// };
/// assert_eq!(
///     error.to_string(),
///     "Allocation limit reached for training given: 2 day(s)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The referenced partner is not part of the roster.
    #[error("Partner not found: {id}")]
    PartnerNotFound {
        /// The partner id that was not found.
        id: String,
    },

    /// A training day could not be added because its allocation is used up.
    #[error("Allocation limit reached for {category}: {limit} day(s)")]
    LimitExceeded {
        /// The category whose allocation is exhausted.
        category: DayCategory,
        /// The allocation value that was reached.
        limit: u32,
    },

    /// The remote document load did not answer in time.
    #[error("Timed out after {millis} ms waiting for the roster document")]
    Timeout {
        /// The bound that was exceeded, in milliseconds.
        millis: u64,
    },

    /// The roster document could not be written.
    #[error("Failed to persist roster document: {message}")]
    PersistenceFailure {
        /// A description of the write failure.
        message: String,
    },

    /// The roster document could not be read.
    #[error("Roster store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the read failure.
        message: String,
    },

    /// The public holiday source failed for a year.
    #[error("Failed to fetch holidays for {year}: {message}")]
    HolidayFetch {
        /// The requested year.
        year: i32,
        /// A description of the failure.
        message: String,
    },

    /// A weekday index outside `0..=6` was supplied.
    #[error("Invalid weekday index: {index}")]
    InvalidWeekday {
        /// The rejected index.
        index: u8,
    },

    /// A day toggle named a record year the date does not belong to.
    #[error("Date {date} does not fall in year {year}")]
    DateOutsideYear {
        /// The toggled date.
        date: NaiveDate,
        /// The record year that was requested.
        year: i32,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
