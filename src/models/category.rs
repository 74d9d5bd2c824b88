//! Day categories a calendar date can be marked with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The category a partner can mark a date with.
///
/// A date holds at most one category per partner and year; a date holding
/// none is simply absent from all three day-sets of the
/// [`YearRecord`](super::YearRecord).
///
/// # Example
///
/// ```
/// use leave_engine::models::DayCategory;
///
/// let category: DayCategory = "training-given".parse().unwrap();
/// assert_eq!(category, DayCategory::TrainingGiven);
/// assert_eq!(category.to_string(), "training given");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DayCategory {
    /// Annual leave.
    Vacation,
    /// A training session the partner gives.
    TrainingGiven,
    /// A training session the partner attends.
    TrainingReceived,
}

impl DayCategory {
    /// All categories, in display order.
    pub const ALL: [DayCategory; 3] = [
        DayCategory::Vacation,
        DayCategory::TrainingGiven,
        DayCategory::TrainingReceived,
    ];

    /// Returns true for the two training categories.
    pub fn is_training(self) -> bool {
        matches!(self, DayCategory::TrainingGiven | DayCategory::TrainingReceived)
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayCategory::Vacation => write!(f, "vacation"),
            DayCategory::TrainingGiven => write!(f, "training given"),
            DayCategory::TrainingReceived => write!(f, "training received"),
        }
    }
}

impl FromStr for DayCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "vacation" | "leave" => Ok(DayCategory::Vacation),
            "traininggiven" | "traininggive" => Ok(DayCategory::TrainingGiven),
            "trainingreceived" | "trainingreceive" => Ok(DayCategory::TrainingReceived),
            _ => Err(format!(
                "unknown day category '{}' (expected vacation, training-given or training-received)",
                s
            )),
        }
    }
}
