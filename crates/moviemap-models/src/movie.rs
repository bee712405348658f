use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single authoritative, persisted representation of a movie.
///
/// Invariant: `countries` is never empty for a stored record, and
/// `country_names` covers every code in `countries`. A candidate that
/// cannot satisfy this is routed to the manual override queue instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub imdb_id: String,
    pub title: String,
    pub year: Option<u32>,
    pub poster: Option<String>,
    /// Quality score from the best available source (IMDb rating, or the
    /// metadata service's vote average as a fallback).
    pub rating: Option<f64>,
    /// User-assigned 1-10 rating. The only field an export may refresh
    /// once a record exists.
    pub user_rating: Option<u8>,
    pub director: Option<String>,
    pub genres: Vec<String>,
    /// ISO 3166-1 production country codes.
    pub countries: Vec<String>,
    pub country_names: BTreeMap<String, String>,
    /// Absent for manually-sourced records.
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub origin: RecordOrigin,
    pub fetched_at: DateTime<Utc>,
}

impl MovieRecord {
    pub fn is_co_production(&self) -> bool {
        self.countries.len() > 1
    }
}

/// Whether a record came from automated enrichment or from an operator
/// completing a manual override entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    #[default]
    Automatic,
    Manual,
}
