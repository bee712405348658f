use crate::store::DatabaseStore;
use anyhow::{anyhow, Context, Result};
use moviemap_config::PathManager;
use moviemap_models::{CountryEntry, ListReference, MovieDatabase, MovieView};
use std::collections::BTreeMap;
use tracing::info;

/// Project the database, filtered by one list's id sequence, into the
/// per-country grouping the presentation layer consumes.
///
/// Ids absent from the database are skipped; each record is fanned out
/// to every one of its countries, so a co-production contributes one
/// count to each.
pub fn build_country_view(
    database: &MovieDatabase,
    movie_ids: &[String],
) -> BTreeMap<String, CountryEntry> {
    let mut by_country: BTreeMap<String, CountryEntry> = BTreeMap::new();

    for imdb_id in movie_ids {
        let Some(movie) = database.movies.get(imdb_id) else {
            continue;
        };
        // The store invariant keeps empty country sets out of the
        // database; an empty set here would produce an orphan record.
        if movie.countries.is_empty() {
            continue;
        }

        let view = MovieView::from_record(movie);
        for code in &movie.countries {
            let entry = by_country.entry(code.clone()).or_insert_with(|| CountryEntry {
                name: movie
                    .country_names
                    .get(code)
                    .cloned()
                    .unwrap_or_else(|| code.clone()),
                count: 0,
                movies: Vec::new(),
            });
            entry.movies.push(view.clone());
            entry.count += 1;
        }
    }

    by_country
}

/// Summary of one rebuilt view file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ViewSummary {
    pub list: String,
    pub movies: usize,
    pub countries: usize,
}

/// Rebuild and replace every published view file from the current
/// database and list references. Not incremental: each file is written
/// wholesale.
pub fn build_all_views(paths: &PathManager) -> Result<Vec<ViewSummary>> {
    let database = DatabaseStore::new(paths.database_file()).load()?;

    let lists_dir = paths.lists_dir();
    if !lists_dir.is_dir() {
        return Err(anyhow!(
            "no list references found in {}; run a sync first",
            lists_dir.display()
        ));
    }

    let mut list_files: Vec<std::path::PathBuf> = std::fs::read_dir(&lists_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    list_files.sort();

    if list_files.is_empty() {
        return Err(anyhow!(
            "no list references found in {}; run a sync first",
            lists_dir.display()
        ));
    }

    std::fs::create_dir_all(paths.views_dir())?;

    let mut summaries = Vec::new();
    for list_path in &list_files {
        let content = std::fs::read_to_string(list_path)
            .with_context(|| format!("failed to read list reference {}", list_path.display()))?;
        let reference: ListReference = serde_json::from_str(&content)
            .with_context(|| format!("malformed list reference {}", list_path.display()))?;

        let list_name = list_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("invalid list file name {}", list_path.display()))?;

        let view = build_country_view(&database, &reference.movie_ids);
        let in_database = reference
            .movie_ids
            .iter()
            .filter(|id| database.movies.contains_key(*id))
            .count();

        let view_path = paths.view_file(list_name);
        let json = serde_json::to_string_pretty(&view)?;
        std::fs::write(&view_path, json)
            .with_context(|| format!("failed to write view {}", view_path.display()))?;

        info!(
            list = %reference.name,
            movies = in_database,
            countries = view.len(),
            "Rebuilt view"
        );
        summaries.push(ViewSummary {
            list: reference.name,
            movies: in_database,
            countries: view.len(),
        });
    }

    Ok(summaries)
}
