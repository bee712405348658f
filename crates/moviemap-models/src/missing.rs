use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A movie that automated enrichment could not resolve, parked in the
/// manual override queue for an operator to complete.
///
/// The operator edits `countries` by hand; once it is non-empty the next
/// sync run consumes the entry into a canonical record and deletes it.
/// The stored `reason` is never overwritten while the entry exists, so
/// the original failure context stays visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissingEntry {
    pub imdb_id: String,
    pub title: String,
    pub year: Option<u32>,
    pub imdb_rating: Option<f64>,
    pub user_rating: Option<u8>,
    pub genres: Vec<String>,
    pub directors: String,
    pub reason: String,
    /// Operator-supplied ISO 3166-1 codes. Starts empty.
    #[serde(default)]
    pub countries: Vec<String>,
    pub added_at: DateTime<Utc>,
}

impl MissingEntry {
    /// An entry is complete once the operator has supplied at least one
    /// non-blank country code.
    pub fn is_complete(&self) -> bool {
        self.countries.iter().any(|c| !c.trim().is_empty())
    }
}
