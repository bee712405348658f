use crate::store::DatabaseStore;
use anyhow::{Context, Result};
use chrono::Utc;
use moviemap_config::PathManager;
use moviemap_models::{ListReference, MovieDatabase, MovieRecord, RecordOrigin};
use moviemap_sources::export;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{info, warn};

/// Legacy per-country view file, the format that predates the central
/// database: `{countryCode: {name, movies: [...]}}`.
#[derive(Debug, Deserialize)]
struct LegacyCountry {
    name: String,
    #[serde(default)]
    movies: Vec<LegacyMovie>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMovie {
    imdb_id: String,
    title: String,
    year: Option<u32>,
    poster: Option<String>,
    rating: Option<f64>,
    user_rating: Option<u8>,
    director: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    all_countries: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BootstrapSummary {
    pub unique_movies: usize,
    /// Legacy movies dropped because they carried no country codes.
    pub skipped: usize,
    pub lists: Vec<String>,
}

/// One-time migration: convert a legacy per-country view file plus the
/// input CSVs into the central database and list reference layout.
/// Movies appearing under several countries are deduplicated on first
/// occurrence; their country-name maps are widened from the per-country
/// headers collected across the whole file.
pub fn bootstrap_from_legacy(paths: &PathManager, legacy_file: &Path) -> Result<BootstrapSummary> {
    let content = std::fs::read_to_string(legacy_file)
        .with_context(|| format!("failed to read legacy file {}", legacy_file.display()))?;
    let by_country: BTreeMap<String, LegacyCountry> = serde_json::from_str(&content)
        .with_context(|| format!("legacy file {} is not valid JSON", legacy_file.display()))?;

    let country_names: BTreeMap<String, String> = by_country
        .iter()
        .map(|(code, data)| (code.clone(), data.name.clone()))
        .collect();

    let mut database = MovieDatabase::new();
    let mut skipped = BTreeSet::new();
    for country in by_country.values() {
        for movie in &country.movies {
            if database.movies.contains_key(&movie.imdb_id) || skipped.contains(&movie.imdb_id) {
                continue;
            }
            // A record without country codes cannot be stored; the
            // database invariant requires at least one.
            if movie.all_countries.is_empty() {
                warn!(
                    imdb_id = %movie.imdb_id,
                    title = %movie.title,
                    "Legacy movie has no production countries, skipping"
                );
                skipped.insert(movie.imdb_id.clone());
                continue;
            }
            let names: BTreeMap<String, String> = movie
                .all_countries
                .iter()
                .map(|code| {
                    let name = country_names.get(code).cloned().unwrap_or_else(|| code.clone());
                    (code.clone(), name)
                })
                .collect();
            database.movies.insert(
                movie.imdb_id.clone(),
                MovieRecord {
                    imdb_id: movie.imdb_id.clone(),
                    title: movie.title.clone(),
                    year: movie.year,
                    poster: movie.poster.clone(),
                    rating: movie.rating,
                    user_rating: movie.user_rating,
                    director: movie.director.clone(),
                    genres: movie.genres.clone(),
                    countries: movie.all_countries.clone(),
                    country_names: names,
                    tmdb_id: None,
                    origin: RecordOrigin::Automatic,
                    fetched_at: Utc::now(),
                },
            );
        }
    }

    info!(movies = database.movies.len(), "Built database from legacy file");

    paths.ensure_directories()?;
    database.last_updated = Some(Utc::now());
    DatabaseStore::new(paths.database_file()).save(&database)?;

    // Recreate list references from the input exports so counts line up
    // with what the next sync run will see.
    let mut lists = Vec::new();
    let input_dir = paths.require_input_dir()?;
    let mut csv_files: Vec<std::path::PathBuf> = std::fs::read_dir(&input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    csv_files.sort();

    let now = Utc::now();
    for csv_path in &csv_files {
        let list_name = csv_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("list")
            .to_string();
        let candidates = export::parse_export_csv(csv_path)?;
        let movie_ids: Vec<String> = candidates.into_iter().map(|c| c.imdb_id).collect();

        let reference = ListReference {
            name: crate::sync::display_name(&list_name),
            source: format!("{}.csv", list_name),
            last_synced: now,
            movie_ids,
        };
        let json = serde_json::to_string_pretty(&reference)?;
        std::fs::write(paths.list_file(&list_name), json)?;
        lists.push(list_name);
    }

    Ok(BootstrapSummary {
        unique_movies: database.movies.len(),
        skipped: skipped.len(),
        lists,
    })
}
