//! Weekly work schedule and annual allocation models.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Default annual vacation allocation, in days.
pub const DEFAULT_VACATION_ALLOCATION: u32 = 25;

/// Returns the weekday index used on the wire (0 = Sunday … 6 = Saturday).
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Maps a wire weekday index (0 = Sunday … 6 = Saturday) back to a [`Weekday`].
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Returns true for Saturday and Sunday.
pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// A partner's nominal weekly schedule.
///
/// Stored as a map from weekday index (0 = Sunday … 6 = Saturday) to
/// "works this weekday". Only an explicit `false` excludes a weekday; a
/// missing entry counts as worked. Weekends are never worked, whatever the
/// map says.
///
/// # Example
///
/// ```
/// use chrono::Weekday;
/// use leave_engine::models::WorkDays;
///
/// let schedule = WorkDays::monday_to_friday().with_day(Weekday::Wed, false);
/// assert!(schedule.works_on(Weekday::Tue));
/// assert!(!schedule.works_on(Weekday::Wed));
/// assert!(!schedule.works_on(Weekday::Sat));
/// assert_eq!(schedule.days_per_week(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkDays(BTreeMap<u8, bool>);

impl WorkDays {
    /// The default schedule: Monday through Friday.
    pub fn monday_to_friday() -> Self {
        Self((1..=5).map(|day| (day, true)).collect())
    }

    /// Builds a schedule from a raw weekday-index map.
    pub fn from_map(days: BTreeMap<u8, bool>) -> Self {
        Self(days)
    }

    /// Returns the raw weekday-index map.
    pub fn as_map(&self) -> &BTreeMap<u8, bool> {
        &self.0
    }

    /// Whether the partner nominally works on `weekday`.
    pub fn works_on(&self, weekday: Weekday) -> bool {
        !is_weekend(weekday) && !self.excludes(weekday)
    }

    /// Whether `weekday` is explicitly marked as not worked.
    pub fn excludes(&self, weekday: Weekday) -> bool {
        self.0.get(&weekday_index(weekday)) == Some(&false)
    }

    /// Returns a copy with `weekday` set to `works`.
    pub fn with_day(&self, weekday: Weekday, works: bool) -> Self {
        let mut days = self.0.clone();
        days.insert(weekday_index(weekday), works);
        Self(days)
    }

    /// Returns a copy with `weekday` flipped.
    pub fn toggled(&self, weekday: Weekday) -> Self {
        let works = self.0.get(&weekday_index(weekday)).copied().unwrap_or(true);
        self.with_day(weekday, !works)
    }

    /// Number of weekdays (Monday to Friday) the partner works.
    pub fn days_per_week(&self) -> usize {
        [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
            .into_iter()
            .filter(|day| self.works_on(*day))
            .count()
    }
}

impl Default for WorkDays {
    fn default() -> Self {
        Self::monday_to_friday()
    }
}

fn default_vacation() -> u32 {
    DEFAULT_VACATION_ALLOCATION
}

/// Which annual quota an allocation edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AllocationKind {
    /// Vacation days.
    Vacation,
    /// Training days the partner may give.
    TrainingGive,
    /// Training days the partner may attend.
    TrainingReceive,
}

/// Annual quotas for one partner and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocations {
    /// Vacation days granted for the year.
    #[serde(default = "default_vacation")]
    pub vacation: u32,
    /// Maximum number of training days given.
    #[serde(default)]
    pub training_give: u32,
    /// Maximum number of training days received.
    #[serde(default)]
    pub training_receive: u32,
}

impl Allocations {
    /// Returns the quota for `kind`.
    pub fn get(&self, kind: AllocationKind) -> u32 {
        match kind {
            AllocationKind::Vacation => self.vacation,
            AllocationKind::TrainingGive => self.training_give,
            AllocationKind::TrainingReceive => self.training_receive,
        }
    }

    /// Returns a copy with the quota for `kind` replaced.
    pub fn with(&self, kind: AllocationKind, value: u32) -> Self {
        let mut next = *self;
        match kind {
            AllocationKind::Vacation => next.vacation = value,
            AllocationKind::TrainingGive => next.training_give = value,
            AllocationKind::TrainingReceive => next.training_receive = value,
        }
        next
    }
}

impl Default for Allocations {
    fn default() -> Self {
        Self {
            vacation: DEFAULT_VACATION_ALLOCATION,
            training_give: 0,
            training_receive: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_round_trips_every_day() {
        for index in 0..=6 {
            let weekday = weekday_from_index(index).unwrap();
            assert_eq!(weekday_index(weekday), index);
        }
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn test_missing_entry_counts_as_worked() {
        let schedule = WorkDays::from_map(BTreeMap::from([(1, true)]));
        assert!(schedule.works_on(Weekday::Thu));
        assert!(!schedule.excludes(Weekday::Thu));
    }

    #[test]
    fn test_weekend_never_worked_even_if_marked() {
        let schedule = WorkDays::monday_to_friday()
            .with_day(Weekday::Sat, true)
            .with_day(Weekday::Sun, true);
        assert!(!schedule.works_on(Weekday::Sat));
        assert!(!schedule.works_on(Weekday::Sun));
        assert_eq!(schedule.days_per_week(), 5);
    }

    #[test]
    fn test_toggled_flips_a_weekday() {
        let schedule = WorkDays::monday_to_friday().toggled(Weekday::Wed);
        assert!(schedule.excludes(Weekday::Wed));
        assert!(schedule.toggled(Weekday::Wed).works_on(Weekday::Wed));
    }

    #[test]
    fn test_work_days_serialize_with_index_keys() {
        let json = serde_json::to_string(&WorkDays::monday_to_friday()).unwrap();
        assert_eq!(json, r#"{"1":true,"2":true,"3":true,"4":true,"5":true}"#);

        let parsed: WorkDays = serde_json::from_str(r#"{"3":false}"#).unwrap();
        assert!(parsed.excludes(Weekday::Wed));
    }

    #[test]
    fn test_allocations_wire_names() {
        let allocations = Allocations::default().with(AllocationKind::TrainingGive, 2);
        let json = serde_json::to_value(allocations).unwrap();
        assert_eq!(json["vacation"], 25);
        assert_eq!(json["trainingGive"], 2);
        assert_eq!(json["trainingReceive"], 0);
        assert_eq!(allocations.get(AllocationKind::TrainingGive), 2);
    }
}
