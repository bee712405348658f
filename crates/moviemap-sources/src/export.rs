use anyhow::{anyhow, Result};
use csv::Reader;
use moviemap_models::CandidateRecord;
use std::fs::File;
use std::path::Path;

/// Title types that count as feature content. Everything else (series,
/// episodes, podcasts, video games) never becomes a candidate.
const MOVIE_TITLE_TYPES: &[&str] = &["Movie", "TV Movie", "TV Special", "TV Short", "Video"];

/// Parse a watch-export CSV into candidate records.
///
/// Rows with a non-movie title type or an empty id are silently skipped.
/// Numeric fields that fail to parse become `None`, never zero. A
/// structurally malformed row is a fatal error for the run: the file is
/// assumed corrupt rather than partially usable.
pub fn parse_export_csv<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateRecord>> {
    let file = File::open(&path)
        .map_err(|e| anyhow!("failed to open {}: {}", path.as_ref().display(), e))?;
    let mut reader = Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let header_map: std::collections::HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();

    let available_columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    tracing::debug!("Available CSV columns: {:?}", available_columns);

    let required = ["Const", "Title", "Title Type"];
    for col in &required {
        if !header_map.contains_key(*col) {
            return Err(anyhow!(
                "Missing required column: {}. Available columns: {:?}",
                col,
                available_columns
            ));
        }
    }

    let mut candidates = Vec::new();
    let mut row_count = 0;
    for result in reader.records() {
        let record = result?;
        row_count += 1;

        let field = |col: &str| {
            header_map
                .get(col)
                .and_then(|&i| record.get(i))
                .unwrap_or("")
        };

        let imdb_id = field("Const");
        if imdb_id.is_empty() {
            tracing::debug!(row = row_count, "Skipping row with empty IMDb id");
            continue;
        }

        let title_type = field("Title Type");
        if !MOVIE_TITLE_TYPES.contains(&title_type) {
            tracing::debug!(
                row = row_count,
                title_type = %title_type,
                "Skipping non-movie row"
            );
            continue;
        }

        let genres: Vec<String> = field("Genres")
            .split(", ")
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();

        candidates.push(CandidateRecord {
            imdb_id: imdb_id.to_string(),
            title: field("Title").to_string(),
            original_title: field("Original Title").to_string(),
            year: field("Year").parse::<u32>().ok(),
            imdb_rating: field("IMDb Rating").parse::<f64>().ok(),
            user_rating: field("Your Rating")
                .parse::<u8>()
                .ok()
                .filter(|r| (1..=10).contains(r)),
            genres,
            directors: field("Directors").to_string(),
        });
    }

    tracing::info!(
        "Parsed {} total rows, {} movie candidates from {}",
        row_count,
        candidates.len(),
        path.as_ref().display()
    );
    Ok(candidates)
}
