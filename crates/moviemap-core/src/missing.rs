use crate::countries::CountryTable;
use anyhow::{Context, Result};
use chrono::Utc;
use moviemap_models::{CandidateRecord, MissingEntry, MovieRecord, RecordOrigin};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// The manual override queue: movies automated enrichment gave up on,
/// keyed by IMDb id, waiting for an operator to supply country codes.
///
/// Loaded once per run, mutated in memory, persisted once at the end via
/// whole-file replace.
pub struct MissingStore {
    path: PathBuf,
    entries: BTreeMap<String, MissingEntry>,
}

impl MissingStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read manual override file {}", path.display()))?;
        let entries: BTreeMap<String, MissingEntry> = serde_json::from_str(&content)
            .with_context(|| format!("manual override file {} is not valid JSON", path.display()))?;
        info!(entries = entries.len(), "Loaded manual override queue");
        Ok(Self { path, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&MissingEntry> {
        self.entries.get(imdb_id)
    }

    /// Queue a candidate for manual resolution. Insert-only: an existing
    /// entry keeps its original reason so operator context is not masked.
    /// Returns whether a new entry was created.
    pub fn record_failure(&mut self, candidate: &CandidateRecord, reason: &str) -> bool {
        if self.entries.contains_key(&candidate.imdb_id) {
            debug!(
                imdb_id = %candidate.imdb_id,
                "Already queued for manual override, keeping original reason"
            );
            return false;
        }

        self.entries.insert(
            candidate.imdb_id.clone(),
            MissingEntry {
                imdb_id: candidate.imdb_id.clone(),
                title: candidate.title.clone(),
                year: candidate.year,
                imdb_rating: candidate.imdb_rating,
                user_rating: candidate.user_rating,
                genres: candidate.genres.clone(),
                directors: candidate.directors.clone(),
                reason: reason.to_string(),
                countries: Vec::new(),
                added_at: Utc::now(),
            },
        );
        true
    }

    /// Drop a stale entry, e.g. after a later enrichment attempt
    /// succeeded for the same id.
    pub fn remove(&mut self, imdb_id: &str) -> Option<MissingEntry> {
        self.entries.remove(imdb_id)
    }

    /// Build a canonical record from a completed entry and remove it from
    /// the queue. Returns `None` when the entry is absent or still
    /// incomplete. Fresher fields from the current export win over the
    /// snapshot stored when the entry was queued.
    pub fn consume(
        &mut self,
        imdb_id: &str,
        candidate: &CandidateRecord,
        countries: &CountryTable,
    ) -> Option<MovieRecord> {
        let entry = match self.entries.get(imdb_id) {
            Some(entry) if entry.is_complete() => entry.clone(),
            _ => return None,
        };

        let codes: Vec<String> = entry
            .countries
            .iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        let country_names: BTreeMap<String, String> = codes
            .iter()
            .map(|code| (code.clone(), countries.display_name(code)))
            .collect();

        let record = MovieRecord {
            imdb_id: entry.imdb_id.clone(),
            title: if candidate.title.is_empty() {
                entry.title.clone()
            } else {
                candidate.title.clone()
            },
            year: candidate.year.or(entry.year),
            poster: None,
            rating: candidate.imdb_rating.or(entry.imdb_rating),
            user_rating: candidate.user_rating.or(entry.user_rating),
            director: first_name(&candidate.directors).or_else(|| first_name(&entry.directors)),
            genres: if candidate.genres.is_empty() {
                entry.genres.clone()
            } else {
                candidate.genres.clone()
            },
            countries: codes,
            country_names,
            tmdb_id: None,
            origin: RecordOrigin::Manual,
            fetched_at: Utc::now(),
        };

        self.entries.remove(imdb_id);
        info!(imdb_id = %imdb_id, title = %record.title, "Consumed manual override entry");
        Some(record)
    }

    /// Whole-file replace, called once per run after all entries are
    /// resolved or updated.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json).with_context(|| {
            format!(
                "failed to write manual override file {}",
                self.path.display()
            )
        })?;
        debug!(entries = self.entries.len(), "Manual override queue saved");
        Ok(())
    }
}

fn first_name(field: &str) -> Option<String> {
    field
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
