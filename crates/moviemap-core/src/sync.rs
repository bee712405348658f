use crate::countries::CountryTable;
use crate::missing::MissingStore;
use crate::store::DatabaseStore;
use anyhow::{Context, Result};
use chrono::Utc;
use moviemap_config::PathManager;
use moviemap_models::{CandidateRecord, ListReference, MovieRecord, RecordOrigin};
use moviemap_sources::{export, EnrichedMovie, Enricher, Lookup};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("no CSV files found in {0}")]
    NoSourceFiles(PathBuf),
}

/// One failed enrichment, reported in the end-of-run tally.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFetch {
    pub imdb_id: String,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSummary {
    pub name: String,
    pub total: usize,
    pub in_database: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub lists: Vec<ListSummary>,
    pub unique_candidates: usize,
    pub already_known: usize,
    pub fetched: usize,
    pub manually_resolved: usize,
    pub failed: Vec<FailedFetch>,
    pub ratings_updated: usize,
    /// How many candidates were handed to the enrichment client. Zero on
    /// a rerun with unchanged inputs.
    pub enrichment_calls: usize,
}

type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// The reconciliation engine: merges source exports, the central
/// database, the manual override queue and enrichment results into an
/// updated database plus per-list reference files.
///
/// A run moves through Reading, Diffing, Resolving, Refreshing and
/// Persisting in order. All stores are loaded up front and written
/// exactly once at the end, whole-file; a fatal error anywhere leaves
/// the previous on-disk state untouched.
pub struct SyncEngine {
    paths: PathManager,
    enricher: Option<Box<dyn Enricher>>,
    progress: Option<ProgressCallback>,
}

impl SyncEngine {
    pub fn new(paths: PathManager) -> Self {
        Self {
            paths,
            enricher: None,
            progress: None,
        }
    }

    /// Without an enricher, every new candidate goes straight to the
    /// manual override queue.
    pub fn with_enricher(mut self, enricher: Box<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub async fn run(&mut self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        // Reading: parse every list. The first occurrence of an id
        // across all lists (filename order) wins for field values, but
        // each list's full ordered sequence is kept verbatim.
        let input_dir = self.paths.require_input_dir()?;
        let mut csv_files: Vec<PathBuf> = std::fs::read_dir(&input_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        csv_files.sort();
        if csv_files.is_empty() {
            return Err(SyncError::NoSourceFiles(input_dir).into());
        }

        let mut candidates: BTreeMap<String, CandidateRecord> = BTreeMap::new();
        let mut list_sequences: Vec<(String, Vec<String>)> = Vec::new();
        for csv_path in &csv_files {
            let list_name = csv_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("list")
                .to_string();
            let rows = export::parse_export_csv(csv_path)
                .with_context(|| format!("failed to parse source list {}", csv_path.display()))?;

            let mut sequence = Vec::with_capacity(rows.len());
            for row in rows {
                sequence.push(row.imdb_id.clone());
                candidates.entry(row.imdb_id.clone()).or_insert(row);
            }
            info!(list = %list_name, movies = sequence.len(), "Parsed source list");
            list_sequences.push((list_name, sequence));
        }
        report.unique_candidates = candidates.len();

        // All loads happen before any write.
        let store = DatabaseStore::new(self.paths.database_file());
        let mut database = store.load()?;
        let mut missing = MissingStore::load(self.paths.missing_file())?;
        let mut countries = CountryTable::load(self.paths.countries_file())?;

        // Diffing
        let new_ids: Vec<String> = candidates
            .keys()
            .filter(|id| !database.movies.contains_key(*id))
            .cloned()
            .collect();
        report.already_known = candidates.len() - new_ids.len();
        info!(
            new = new_ids.len(),
            known = report.already_known,
            "Diffed candidates against database"
        );

        // Resolving: strictly one candidate at a time; the enrichment
        // throttle is only safe under sequential access.
        if let Some(enricher) = &self.enricher {
            if !new_ids.is_empty() {
                info!(enricher = enricher.name(), movies = new_ids.len(), "Resolving new movies");
            }
        }
        let total = new_ids.len() as u64;
        for (index, imdb_id) in new_ids.iter().enumerate() {
            let Some(candidate) = candidates.get(imdb_id) else {
                continue;
            };

            // An operator decision must not be silently overridden, so a
            // complete override entry always wins over a network attempt.
            if missing.get(imdb_id).is_some_and(|e| e.is_complete()) {
                if let Some(record) = missing.consume(imdb_id, candidate, &countries) {
                    database.movies.insert(imdb_id.clone(), record);
                    report.manually_resolved += 1;
                    self.report_progress(index as u64 + 1, total);
                    continue;
                }
            }

            match &self.enricher {
                None => {
                    let reason = "no API key configured";
                    missing.record_failure(candidate, reason);
                    report.failed.push(FailedFetch {
                        imdb_id: imdb_id.clone(),
                        title: candidate.title.clone(),
                        reason: reason.to_string(),
                    });
                }
                Some(enricher) => {
                    report.enrichment_calls += 1;
                    match enricher.resolve(candidate).await {
                        Ok(Lookup::Found(enriched)) => {
                            debug!(imdb_id = %imdb_id, title = %enriched.title, "Enriched movie");
                            database
                                .movies
                                .insert(imdb_id.clone(), build_record(candidate, enriched));
                            // A stale partial queue entry is superseded by
                            // the successful fetch.
                            missing.remove(imdb_id);
                            report.fetched += 1;
                        }
                        Ok(Lookup::NotFound { reason }) => {
                            warn!(
                                imdb_id = %imdb_id,
                                title = %candidate.title,
                                reason = %reason,
                                "Movie not resolvable automatically"
                            );
                            missing.record_failure(candidate, &reason);
                            report.failed.push(FailedFetch {
                                imdb_id: imdb_id.clone(),
                                title: candidate.title.clone(),
                                reason,
                            });
                        }
                        Err(e) => {
                            let reason = e.to_string();
                            warn!(
                                imdb_id = %imdb_id,
                                title = %candidate.title,
                                error = %reason,
                                "Enrichment failed"
                            );
                            missing.record_failure(candidate, &reason);
                            report.failed.push(FailedFetch {
                                imdb_id: imdb_id.clone(),
                                title: candidate.title.clone(),
                                reason,
                            });
                        }
                    }
                }
            }
            self.report_progress(index as u64 + 1, total);
        }

        // Refreshing: the user rating is the only field an export may
        // change on an already-enriched record.
        for (imdb_id, candidate) in &candidates {
            let Some(user_rating) = candidate.user_rating else {
                continue;
            };
            if let Some(record) = database.movies.get_mut(imdb_id) {
                if record.user_rating != Some(user_rating) {
                    debug!(imdb_id = %imdb_id, rating = user_rating, "Refreshing user rating");
                    record.user_rating = Some(user_rating);
                    report.ratings_updated += 1;
                }
            }
        }

        // Persisting: every output is a whole-file replace.
        self.paths.ensure_directories()?;
        database.last_updated = Some(Utc::now());
        store.save(&database)?;

        let widened = countries.merge_from_database(&database);
        if widened > 0 {
            debug!(entries = widened, "Widened country table from database");
        }
        countries.save()?;

        let now = Utc::now();
        for (list_name, sequence) in &list_sequences {
            let in_database = sequence
                .iter()
                .filter(|id| database.movies.contains_key(*id))
                .count();
            let reference = ListReference {
                name: display_name(list_name),
                source: format!("{}.csv", list_name),
                last_synced: now,
                movie_ids: sequence.clone(),
            };
            let json = serde_json::to_string_pretty(&reference)?;
            let path = self.paths.list_file(list_name);
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write list reference {}", path.display()))?;
            report.lists.push(ListSummary {
                name: list_name.clone(),
                total: sequence.len(),
                in_database,
            });
        }

        missing.save()?;

        info!(
            movies = database.movies.len(),
            fetched = report.fetched,
            failed = report.failed.len(),
            ratings_updated = report.ratings_updated,
            "Sync complete"
        );
        Ok(report)
    }

    fn report_progress(&self, done: u64, total: u64) {
        if let Some(progress) = &self.progress {
            progress(done, total);
        }
    }
}

fn build_record(candidate: &CandidateRecord, enriched: EnrichedMovie) -> MovieRecord {
    MovieRecord {
        imdb_id: candidate.imdb_id.clone(),
        title: enriched.title,
        year: enriched.year,
        poster: enriched.poster,
        rating: enriched.rating,
        user_rating: candidate.user_rating,
        director: enriched.director,
        genres: enriched.genres,
        countries: enriched.countries,
        country_names: enriched.country_names,
        tmdb_id: Some(enriched.tmdb_id),
        origin: RecordOrigin::Automatic,
        fetched_at: Utc::now(),
    }
}

/// "watchlist" -> "Watchlist", matching the list file naming convention.
pub(crate) fn display_name(list_name: &str) -> String {
    let mut chars = list_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moviemap_models::{MissingEntry, MovieDatabase};
    use moviemap_sources::EnrichError;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const HEADER: &str =
        "Const,Title,Original Title,Year,IMDb Rating,Your Rating,Genres,Directors,Title Type";

    /// Scripted enricher: answers from a fixed table and counts calls.
    struct StubEnricher {
        calls: Arc<AtomicUsize>,
        found: HashMap<String, Vec<(String, String)>>,
        not_found: HashMap<String, String>,
        failing: HashSet<String>,
    }

    impl StubEnricher {
        fn new(calls: Arc<AtomicUsize>) -> Self {
            Self {
                calls,
                found: HashMap::new(),
                not_found: HashMap::new(),
                failing: HashSet::new(),
            }
        }

        fn found(mut self, imdb_id: &str, countries: &[(&str, &str)]) -> Self {
            self.found.insert(
                imdb_id.to_string(),
                countries
                    .iter()
                    .map(|(c, n)| (c.to_string(), n.to_string()))
                    .collect(),
            );
            self
        }

        fn not_found(mut self, imdb_id: &str, reason: &str) -> Self {
            self.not_found
                .insert(imdb_id.to_string(), reason.to_string());
            self
        }

        fn failing(mut self, imdb_id: &str) -> Self {
            self.failing.insert(imdb_id.to_string());
            self
        }
    }

    #[async_trait]
    impl Enricher for StubEnricher {
        async fn resolve(&self, candidate: &CandidateRecord) -> Result<Lookup, EnrichError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.failing.contains(&candidate.imdb_id) {
                return Err(EnrichError::Http {
                    endpoint: "find",
                    status: 500,
                    attempts: 3,
                });
            }
            if let Some(reason) = self.not_found.get(&candidate.imdb_id) {
                return Ok(Lookup::NotFound {
                    reason: reason.clone(),
                });
            }
            if let Some(countries) = self.found.get(&candidate.imdb_id) {
                return Ok(Lookup::Found(EnrichedMovie {
                    title: candidate.title.clone(),
                    year: candidate.year,
                    poster: Some("/poster.jpg".to_string()),
                    rating: candidate.imdb_rating.or(Some(7.0)),
                    director: Some("Stub Director".to_string()),
                    genres: candidate.genres.clone(),
                    countries: countries.iter().map(|(c, _)| c.clone()).collect(),
                    country_names: countries.iter().cloned().collect(),
                    tmdb_id: 42,
                }));
            }
            Ok(Lookup::NotFound {
                reason: "not found on TMDB".to_string(),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn setup(dir: &tempfile::TempDir) -> PathManager {
        let paths = PathManager::new(dir.path());
        std::fs::create_dir_all(paths.input_dir()).unwrap();
        paths
    }

    fn write_list(paths: &PathManager, name: &str, rows: &[&str]) {
        let mut content = String::from(HEADER);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(paths.input_dir().join(format!("{}.csv", name)), content).unwrap();
    }

    fn load_database(paths: &PathManager) -> MovieDatabase {
        DatabaseStore::new(paths.database_file()).load().unwrap()
    }

    fn load_missing_entries(paths: &PathManager) -> BTreeMap<String, MissingEntry> {
        let content = std::fs::read_to_string(paths.missing_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_new_movies_and_builds_lists() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt001,First Movie,First Movie,2001,7.5,8,Drama,Director One,Movie"],
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).found("tt001", &[("FR", "France"), ("DE", "Germany")]);

        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(report.fetched, 1);
        assert_eq!(report.unique_candidates, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let database = load_database(&paths);
        let record = &database.movies["tt001"];
        assert_eq!(record.countries, vec!["FR", "DE"]);
        assert_eq!(record.user_rating, Some(8));
        assert_eq!(record.origin, RecordOrigin::Automatic);
        assert!(record.is_co_production());

        let list: ListReference = serde_json::from_str(
            &std::fs::read_to_string(paths.list_file("watchlist")).unwrap(),
        )
        .unwrap();
        assert_eq!(list.name, "Watchlist");
        assert_eq!(list.source, "watchlist.csv");
        assert_eq!(list.movie_ids, vec!["tt001"]);

        // The country table picked up the names observed in the database.
        let countries = CountryTable::load(paths.countries_file()).unwrap();
        assert_eq!(countries.display_name("FR"), "France");
        assert_eq!(countries.display_name("DE"), "Germany");
    }

    #[tokio::test]
    async fn test_dedup_first_list_wins() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        // Lists are read in filename order, so a.csv wins the candidate merge.
        write_list(
            &paths,
            "a",
            &["tt001,Shared Movie,Shared Movie,2001,7.5,8,Drama,Director One,Movie"],
        );
        write_list(
            &paths,
            "b",
            &["tt001,Shared Movie,Shared Movie,2001,7.5,9,Drama,Director One,Movie"],
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).found("tt001", &[("FR", "France")]);

        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(report.unique_candidates, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let database = load_database(&paths);
        assert_eq!(database.movies.len(), 1);
        assert_eq!(database.movies["tt001"].user_rating, Some(8));

        // Both lists keep their own membership sequence.
        for list_name in ["a", "b"] {
            let list: ListReference = serde_json::from_str(
                &std::fs::read_to_string(paths.list_file(list_name)).unwrap(),
            )
            .unwrap();
            assert_eq!(list.movie_ids, vec!["tt001"]);
        }
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt001,First Movie,First Movie,2001,7.5,8,Drama,Director One,Movie"],
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).found("tt001", &[("FR", "France")]);
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        engine.run().await.unwrap();
        let first = load_database(&paths);

        let second_calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(second_calls.clone()).found("tt001", &[("FR", "France")]);
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(report.enrichment_calls, 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.fetched, 0);
        assert_eq!(report.ratings_updated, 0);
        assert_eq!(report.already_known, 1);

        // Identical content apart from the database timestamp.
        let second = load_database(&paths);
        assert_eq!(second.movies, first.movies);
    }

    #[tokio::test]
    async fn test_complete_manual_entry_wins_over_enrichment() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt002,Obscure Film,Obscure Film,1975,,7,Drama,Someone,Movie"],
        );

        paths.ensure_directories().unwrap();
        std::fs::write(
            paths.missing_file(),
            r#"{"tt002": {
                "imdbId": "tt002", "title": "Obscure Film", "year": 1975,
                "imdbRating": null, "userRating": 7, "genres": ["Drama"],
                "directors": "Someone", "reason": "no production regions",
                "countries": ["GB"], "addedAt": "2026-01-01T00:00:00Z"
            }}"#,
        )
        .unwrap();
        std::fs::write(paths.countries_file(), "code,name\nGB,United Kingdom\n").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).found("tt002", &[("FR", "France")]);
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        // The operator decision is consumed without touching the network.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.manually_resolved, 1);

        let database = load_database(&paths);
        let record = &database.movies["tt002"];
        assert_eq!(record.countries, vec!["GB"]);
        assert_eq!(record.country_names["GB"], "United Kingdom");
        assert_eq!(record.origin, RecordOrigin::Manual);

        assert!(load_missing_entries(&paths).is_empty());
    }

    #[tokio::test]
    async fn test_no_regions_routes_to_manual_queue() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt002,Regionless,Regionless,1999,,,Drama,Someone,Movie"],
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).not_found("tt002", "no production regions");
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(report.fetched, 0);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].reason, "no production regions");

        let database = load_database(&paths);
        assert!(!database.movies.contains_key("tt002"));

        let entries = load_missing_entries(&paths);
        assert_eq!(entries["tt002"].reason, "no production regions");
        assert!(entries["tt002"].countries.is_empty());
    }

    #[tokio::test]
    async fn test_operator_completion_flow() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt002,Obscure Film,Obscure Film,1975,,7,Drama,Someone,Movie"],
        );

        // First run: enrichment yields no regions, the movie is queued.
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).not_found("tt002", "no production regions");
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        engine.run().await.unwrap();

        // Operator edits the queue file.
        let mut entries = load_missing_entries(&paths);
        entries.get_mut("tt002").unwrap().countries = vec!["GB".to_string()];
        std::fs::write(
            paths.missing_file(),
            serde_json::to_string_pretty(&entries).unwrap(),
        )
        .unwrap();

        // Second run consumes the entry without an enrichment call.
        let second_calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(second_calls.clone());
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.manually_resolved, 1);

        let database = load_database(&paths);
        assert_eq!(database.movies["tt002"].countries, vec!["GB"]);
        assert!(load_missing_entries(&paths).is_empty());

        // And the consumed movie shows up in the built view.
        let view = crate::views::build_country_view(&database, &["tt002".to_string()]);
        assert_eq!(view["GB"].count, 1);
    }

    #[tokio::test]
    async fn test_user_rating_refresh_leaves_other_fields_alone() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt001,First Movie,First Movie,2001,7.5,8,Drama,Director One,Movie"],
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).found("tt001", &[("FR", "France")]);
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        engine.run().await.unwrap();
        let first = load_database(&paths);

        // Same movie, new user rating in the export.
        write_list(
            &paths,
            "watchlist",
            &["tt001,First Movie,First Movie,2001,7.5,9,Drama,Director One,Movie"],
        );

        let second_calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(second_calls.clone());
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.ratings_updated, 1);

        let second = load_database(&paths);
        let before = &first.movies["tt001"];
        let after = &second.movies["tt001"];
        assert_eq!(after.user_rating, Some(9));
        assert_eq!(after.title, before.title);
        assert_eq!(after.countries, before.countries);
        assert_eq!(after.rating, before.rating);
        assert_eq!(after.fetched_at, before.fetched_at);
    }

    #[tokio::test]
    async fn test_failure_reason_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt002,Obscure Film,Obscure Film,1975,,,Drama,Someone,Movie"],
        );

        // First run without an api key queues the movie.
        let mut engine = SyncEngine::new(paths.clone());
        let report = engine.run().await.unwrap();
        assert_eq!(report.failed[0].reason, "no API key configured");

        // A later run with enrichment still failing keeps the original reason.
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).not_found("tt002", "not found on TMDB");
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        engine.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let entries = load_missing_entries(&paths);
        assert_eq!(entries["tt002"].reason, "no API key configured");
    }

    #[tokio::test]
    async fn test_transport_failure_routes_to_manual_queue() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);
        write_list(
            &paths,
            "watchlist",
            &["tt003,Flaky Movie,Flaky Movie,2010,,,Drama,Someone,Movie"],
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubEnricher::new(calls.clone()).failing("tt003");
        let mut engine = SyncEngine::new(paths.clone()).with_enricher(Box::new(stub));
        let report = engine.run().await.unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("HTTP 500"));

        let entries = load_missing_entries(&paths);
        assert!(entries.contains_key("tt003"));
        assert!(!load_database(&paths).movies.contains_key("tt003"));
    }

    #[tokio::test]
    async fn test_missing_input_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::new(dir.path());

        let mut engine = SyncEngine::new(paths.clone());
        assert!(engine.run().await.is_err());
        // Nothing was written.
        assert!(!paths.database_file().exists());
    }

    #[tokio::test]
    async fn test_no_csv_files_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(&dir);

        let mut engine = SyncEngine::new(paths.clone());
        let err = engine.run().await.unwrap_err();
        assert!(err.to_string().contains("no CSV files"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("watchlist"), "Watchlist");
        assert_eq!(display_name("festival"), "Festival");
        assert_eq!(display_name(""), "");
    }
}
