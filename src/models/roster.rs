//! Roster document, firm-wide settings and seed roster.
//!
//! The [`RosterDocument`] is the unit the persistence collaborator reads and
//! rewrites as a whole on every mutation.

use serde::{Deserialize, Serialize};

use super::partner::Partner;
use super::schedule::Allocations;

/// The display year used when a document or seed does not name one.
pub const DEFAULT_YEAR: i32 = 2026;

fn default_year() -> i32 {
    DEFAULT_YEAR
}

/// Firm-wide policy flags shared by every partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether non-worked public holidays are debited from vacation quotas.
    #[serde(default)]
    pub count_holidays_as_leave: bool,
}

/// The whole persisted roster.
///
/// # Example
///
/// ```
/// use leave_engine::models::{RosterDocument, RosterSeed};
///
/// let document = RosterDocument::seeded(&RosterSeed::default());
/// assert_eq!(document.partners.len(), 5);
/// assert_eq!(document.year, 2026);
/// assert!(!document.settings.count_holidays_as_leave);
/// assert_eq!(document.partner("2").map(|p| p.name.as_str()), Some("Claire Deroy"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDocument {
    /// Roster members.
    #[serde(default)]
    pub partners: Vec<Partner>,
    /// Firm-wide settings.
    #[serde(default)]
    pub settings: Settings,
    /// The year currently displayed.
    #[serde(default = "default_year")]
    pub year: i32,
}

impl RosterDocument {
    /// Builds a fresh document from a seed roster.
    pub fn seeded(seed: &RosterSeed) -> Self {
        Self {
            partners: seed
                .partners
                .iter()
                .map(|p| Partner::new(p.id.clone(), p.name.clone(), seed.allocations))
                .collect(),
            settings: Settings::default(),
            year: seed.year,
        }
    }

    /// Looks up a partner by id.
    pub fn partner(&self, id: &str) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == id)
    }
}

/// One entry of the seed roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPartner {
    /// Partner id.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl SeedPartner {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// The roster used when no document exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSeed {
    /// Initial display year.
    #[serde(default = "default_year")]
    pub year: i32,
    /// Allocations given to every seeded partner.
    #[serde(default)]
    pub allocations: Allocations,
    /// The partners to create.
    #[serde(default = "default_partners")]
    pub partners: Vec<SeedPartner>,
}

fn default_partners() -> Vec<SeedPartner> {
    vec![
        SeedPartner::new("1", "Nina Lucas"),
        SeedPartner::new("2", "Claire Deroy"),
        SeedPartner::new("3", "Michael Bennaim"),
        SeedPartner::new("4", "Emilie Fauchon"),
        SeedPartner::new("5", "Pauline Denoeux"),
    ]
}

impl Default for RosterSeed {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            allocations: Allocations::default(),
            partners: default_partners(),
        }
    }
}
