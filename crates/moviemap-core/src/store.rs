use anyhow::{Context, Result};
use moviemap_models::MovieDatabase;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Whole-file load/replace for the central database.
///
/// Nothing is written until the run has finished mutating the in-memory
/// copy, so a failed run leaves the previous on-disk state untouched. An
/// unreadable or corrupt database is fatal: silently starting fresh
/// would re-fetch (and re-bill) every movie.
pub struct DatabaseStore {
    path: PathBuf,
}

impl DatabaseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<MovieDatabase> {
        if !self.path.exists() {
            info!("No existing database found, starting fresh");
            return Ok(MovieDatabase::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read database {}", self.path.display()))?;
        let database: MovieDatabase = serde_json::from_str(&content)
            .with_context(|| format!("database {} is not valid JSON", self.path.display()))?;
        info!(movies = database.movies.len(), "Loaded central database");
        Ok(database)
    }

    pub fn save(&self, database: &MovieDatabase) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(database)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write database {}", self.path.display()))?;
        debug!(movies = database.movies.len(), "Database saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use moviemap_models::{MovieRecord, RecordOrigin};
    use std::collections::BTreeMap;

    fn sample_record() -> MovieRecord {
        MovieRecord {
            imdb_id: "tt001".to_string(),
            title: "Sample".to_string(),
            year: Some(2001),
            poster: None,
            rating: Some(7.5),
            user_rating: Some(8),
            director: Some("A Director".to_string()),
            genres: vec!["Drama".to_string()],
            countries: vec!["FR".to_string()],
            country_names: BTreeMap::from([("FR".to_string(), "France".to_string())]),
            tmdb_id: Some(42),
            origin: RecordOrigin::Automatic,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatabaseStore::new(dir.path().join("movies.json"));
        let database = store.load().unwrap();
        assert!(database.movies.is_empty());
        assert_eq!(database.version, 1);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatabaseStore::new(dir.path().join("db").join("movies.json"));

        let mut database = MovieDatabase::new();
        database.movies.insert("tt001".to_string(), sample_record());
        database.last_updated = Some(Utc::now());
        store.save(&database).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, database);
    }

    #[test]
    fn test_corrupt_database_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = DatabaseStore::new(&path);
        assert!(store.load().is_err());
        // The corrupt file must survive for manual inspection.
        assert!(path.exists());
    }
}
