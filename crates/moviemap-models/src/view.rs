use crate::movie::MovieRecord;
use serde::{Deserialize, Serialize};

/// One country bucket in a published view file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryEntry {
    pub name: String,
    pub count: usize,
    pub movies: Vec<MovieView>,
}

/// Denormalized movie projection for the presentation layer.
///
/// `all_countries` carries the full country set so the UI can
/// cross-highlight a co-production under every country it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub imdb_id: String,
    pub title: String,
    pub year: Option<u32>,
    pub poster: Option<String>,
    pub rating: Option<f64>,
    pub user_rating: Option<u8>,
    pub director: Option<String>,
    pub genres: Vec<String>,
    pub is_co_production: bool,
    pub all_countries: Vec<String>,
}

impl MovieView {
    pub fn from_record(record: &MovieRecord) -> Self {
        Self {
            imdb_id: record.imdb_id.clone(),
            title: record.title.clone(),
            year: record.year,
            poster: record.poster.clone(),
            rating: record.rating,
            user_rating: record.user_rating,
            director: record.director.clone(),
            genres: record.genres.clone(),
            is_co_production: record.is_co_production(),
            all_countries: record.countries.clone(),
        }
    }
}
