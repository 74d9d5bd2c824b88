//! Partner and year-scoped record models.
//!
//! A [`Partner`] carries base defaults (schedule and allocations) plus a map
//! of per-year overrides. The engine works on a resolved [`YearRecord`]; see
//! [`resolve_year_record`](crate::calculation::resolve_year_record).

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::category::DayCategory;
use super::schedule::{Allocations, WorkDays};

/// The data the engine operates on for one partner and one year.
///
/// The three day-sets are pairwise disjoint; the only way the engine changes
/// a date's category is [`toggle_day`](crate::calculation::toggle_day),
/// which keeps them so.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::models::{Allocations, DayCategory, WorkDays, YearRecord};
///
/// let record = YearRecord::new(WorkDays::monday_to_friday(), Allocations::default());
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// assert_eq!(record.category_of(day), None);
/// assert!(record.dates(DayCategory::Vacation).is_empty());
/// assert_eq!(record.limit_for(DayCategory::Vacation), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    /// Nominal weekly schedule.
    #[serde(default)]
    pub work_days: WorkDays,
    /// Annual quotas.
    #[serde(default)]
    pub allocations: Allocations,
    /// Days marked as leave.
    #[serde(default)]
    pub vacations: BTreeSet<NaiveDate>,
    /// Days marked as training given.
    #[serde(default)]
    pub trainings_given: BTreeSet<NaiveDate>,
    /// Days marked as training received.
    #[serde(default)]
    pub trainings_received: BTreeSet<NaiveDate>,
}

impl YearRecord {
    /// Creates a record with empty day-sets.
    pub fn new(work_days: WorkDays, allocations: Allocations) -> Self {
        Self {
            work_days,
            allocations,
            vacations: BTreeSet::new(),
            trainings_given: BTreeSet::new(),
            trainings_received: BTreeSet::new(),
        }
    }

    /// Returns the day-set for `category`.
    pub fn dates(&self, category: DayCategory) -> &BTreeSet<NaiveDate> {
        match category {
            DayCategory::Vacation => &self.vacations,
            DayCategory::TrainingGiven => &self.trainings_given,
            DayCategory::TrainingReceived => &self.trainings_received,
        }
    }

    pub(crate) fn dates_mut(&mut self, category: DayCategory) -> &mut BTreeSet<NaiveDate> {
        match category {
            DayCategory::Vacation => &mut self.vacations,
            DayCategory::TrainingGiven => &mut self.trainings_given,
            DayCategory::TrainingReceived => &mut self.trainings_received,
        }
    }

    /// Returns the category `date` currently holds, if any.
    pub fn category_of(&self, date: NaiveDate) -> Option<DayCategory> {
        DayCategory::ALL
            .into_iter()
            .find(|category| self.dates(*category).contains(&date))
    }

    /// Allocation cap enforced when adding to `category`.
    ///
    /// Vacation is never capped by the engine.
    pub fn limit_for(&self, category: DayCategory) -> Option<u32> {
        match category {
            DayCategory::Vacation => None,
            DayCategory::TrainingGiven => Some(self.allocations.training_give),
            DayCategory::TrainingReceived => Some(self.allocations.training_receive),
        }
    }

    /// Whether no date appears in more than one day-set.
    pub fn is_disjoint(&self) -> bool {
        self.vacations.is_disjoint(&self.trainings_given)
            && self.vacations.is_disjoint(&self.trainings_received)
            && self.trainings_given.is_disjoint(&self.trainings_received)
    }

    /// Iterates over every training date, given then received.
    pub fn training_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.trainings_given
            .iter()
            .chain(self.trainings_received.iter())
            .copied()
    }
}

/// A stored per-year override.
///
/// Schedule and allocations may be left out, in which case the partner's
/// base values apply. Day-sets default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOverride {
    /// Schedule for the year, if different from the base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_days: Option<WorkDays>,
    /// Allocations for the year, if different from the base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocations: Option<Allocations>,
    /// Days marked as leave.
    #[serde(default)]
    pub vacations: BTreeSet<NaiveDate>,
    /// Days marked as training given.
    #[serde(default)]
    pub trainings_given: BTreeSet<NaiveDate>,
    /// Days marked as training received.
    #[serde(default)]
    pub trainings_received: BTreeSet<NaiveDate>,
}

impl From<YearRecord> for YearOverride {
    fn from(record: YearRecord) -> Self {
        Self {
            work_days: Some(record.work_days),
            allocations: Some(record.allocations),
            vacations: record.vacations,
            trainings_given: record.trainings_given,
            trainings_received: record.trainings_received,
        }
    }
}

/// A roster member.
///
/// The base `vacations`/`trainings*` fields belong to the older flat record
/// layout. They are kept for round-tripping but are only read by
/// [`migrate_flat_records`](crate::calculation::migrate_flat_records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Stable identifier. Accepts a JSON string or number.
    #[serde(deserialize_with = "deserialize_partner_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base weekly schedule.
    #[serde(default)]
    pub work_days: WorkDays,
    /// Base allocations.
    #[serde(default)]
    pub allocations: Allocations,
    /// Flat-record leave days.
    #[serde(default)]
    pub vacations: BTreeSet<NaiveDate>,
    /// Flat-record training days given.
    #[serde(default)]
    pub trainings_given: BTreeSet<NaiveDate>,
    /// Flat-record training days received.
    #[serde(default)]
    pub trainings_received: BTreeSet<NaiveDate>,
    /// Per-year overrides.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub year_specific: BTreeMap<i32, YearOverride>,
}

impl Partner {
    /// Creates a partner with default schedule and the given allocations.
    pub fn new(id: impl Into<String>, name: impl Into<String>, allocations: Allocations) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            work_days: WorkDays::default(),
            allocations,
            vacations: BTreeSet::new(),
            trainings_given: BTreeSet::new(),
            trainings_received: BTreeSet::new(),
            year_specific: BTreeMap::new(),
        }
    }

    /// Whether the partner still holds day-sets in the flat layout.
    pub fn has_flat_day_sets(&self) -> bool {
        !(self.vacations.is_empty()
            && self.trainings_given.is_empty()
            && self.trainings_received.is_empty())
    }
}

fn deserialize_partner_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_partner_id_accepts_number_or_string() {
        let numeric: Partner = serde_json::from_str(r#"{"id": 3, "name": "Michael Bennaim"}"#).unwrap();
        let text: Partner = serde_json::from_str(r#"{"id": "3", "name": "Michael Bennaim"}"#).unwrap();

        assert_eq!(numeric.id, "3");
        assert_eq!(numeric, text);
    }

    #[test]
    fn test_partner_defaults_when_fields_absent() {
        let partner: Partner = serde_json::from_str(r#"{"id": "1", "name": "Nina Lucas"}"#).unwrap();

        assert_eq!(partner.work_days, WorkDays::monday_to_friday());
        assert_eq!(partner.allocations, Allocations::default());
        assert!(partner.year_specific.is_empty());
        assert!(!partner.has_flat_day_sets());
    }

    #[test]
    fn test_legacy_fields_are_ignored() {
        let partner: Partner = serde_json::from_str(
            r#"{"id": "1", "name": "Nina Lucas", "trainings": [], "vacations": ["2026-02-02"]}"#,
        )
        .unwrap();

        assert!(partner.vacations.contains(&make_date("2026-02-02")));
        assert!(partner.has_flat_day_sets());
    }

    #[test]
    fn test_year_specific_round_trip_with_partial_override() {
        let json = r#"{
            "id": "2",
            "name": "Claire Deroy",
            "yearSpecific": {
                "2027": { "vacations": ["2027-07-05"] }
            }
        }"#;

        let partner: Partner = serde_json::from_str(json).unwrap();
        let override_2027 = &partner.year_specific[&2027];
        assert_eq!(override_2027.work_days, None);
        assert_eq!(override_2027.allocations, None);
        assert!(override_2027.vacations.contains(&make_date("2027-07-05")));

        let value = serde_json::to_value(&partner).unwrap();
        assert_eq!(value["yearSpecific"]["2027"]["vacations"][0], "2027-07-05");
        assert!(value["yearSpecific"]["2027"].get("workDays").is_none());
    }

    #[test]
    fn test_category_of_and_disjointness() {
        let mut record = YearRecord::default();
        record.trainings_given.insert(make_date("2026-04-01"));

        assert_eq!(
            record.category_of(make_date("2026-04-01")),
            Some(DayCategory::TrainingGiven)
        );
        assert!(record.is_disjoint());

        record.vacations.insert(make_date("2026-04-01"));
        assert!(!record.is_disjoint());
    }

    #[test]
    fn test_limits_per_category() {
        let record = YearRecord::new(
            WorkDays::default(),
            Allocations {
                vacation: 25,
                training_give: 2,
                training_receive: 4,
            },
        );
        assert_eq!(record.limit_for(DayCategory::Vacation), None);
        assert_eq!(record.limit_for(DayCategory::TrainingGiven), Some(2));
        assert_eq!(record.limit_for(DayCategory::TrainingReceived), Some(4));
    }
}
