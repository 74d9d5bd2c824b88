//! Request types for the leave engine API.
//!
//! Patch bodies are shallow merges: every field is optional and only the
//! fields present in the body replace the stored ones.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Allocations, DayCategory, Partner, Settings, WorkDays, YearOverride};

/// Body of `PATCH /api/partners/:id`.
///
/// The partner id is taken from the path and cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New base schedule.
    #[serde(default)]
    pub work_days: Option<WorkDays>,
    /// New base allocations.
    #[serde(default)]
    pub allocations: Option<Allocations>,
    /// Replacement flat-record leave days.
    #[serde(default)]
    pub vacations: Option<BTreeSet<NaiveDate>>,
    /// Replacement flat-record training days given.
    #[serde(default)]
    pub trainings_given: Option<BTreeSet<NaiveDate>>,
    /// Replacement flat-record training days received.
    #[serde(default)]
    pub trainings_received: Option<BTreeSet<NaiveDate>>,
    /// Replacement per-year overrides.
    #[serde(default)]
    pub year_specific: Option<BTreeMap<i32, YearOverride>>,
}

impl PartnerPatch {
    /// Merges the present fields into `partner`.
    pub fn apply(self, mut partner: Partner) -> Partner {
        if let Some(name) = self.name {
            partner.name = name;
        }
        if let Some(work_days) = self.work_days {
            partner.work_days = work_days;
        }
        if let Some(allocations) = self.allocations {
            partner.allocations = allocations;
        }
        if let Some(vacations) = self.vacations {
            partner.vacations = vacations;
        }
        if let Some(trainings_given) = self.trainings_given {
            partner.trainings_given = trainings_given;
        }
        if let Some(trainings_received) = self.trainings_received {
            partner.trainings_received = trainings_received;
        }
        if let Some(year_specific) = self.year_specific {
            partner.year_specific = year_specific;
        }
        partner
    }
}

/// Body of `PATCH /api/settings`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    /// New holiday policy.
    #[serde(default)]
    pub count_holidays_as_leave: Option<bool>,
}

impl SettingsPatch {
    /// Merges the present fields into `settings`.
    pub fn apply(self, settings: Settings) -> Settings {
        Settings {
            count_holidays_as_leave: self
                .count_holidays_as_leave
                .unwrap_or(settings.count_holidays_as_leave),
        }
    }
}

/// Body of `PATCH /api/year`, also its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBody {
    /// The displayed year.
    pub year: i32,
}

/// Body of `POST /api/partners/:id/days`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    /// The clicked date.
    pub date: NaiveDate,
    /// The category being toggled.
    pub category: DayCategory,
    /// Record year; defaults to the year of `date` and must match it.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Query of `GET /api/partners/:id/balance`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BalanceQuery {
    /// Record year; defaults to the document's displayed year.
    pub year: Option<i32>,
}
