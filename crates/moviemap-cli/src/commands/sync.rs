use crate::output::{Output, OutputFormat};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use moviemap_config::{PathManager, Settings, API_KEY_ENV};
use moviemap_core::SyncEngine;
use moviemap_sources::TmdbClient;
use tracing::debug;

pub async fn run_sync(no_fetch: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let settings = Settings::load(paths.config_file().as_deref())?;
    debug!(data_dir = %paths.data_dir().display(), "Starting sync");

    let mut engine = SyncEngine::new(paths.clone());

    match (&settings.tmdb.api_key, no_fetch) {
        (_, true) => {
            output.warn("Fetching disabled, new movies go to the manual override queue");
        }
        (None, false) => {
            output.warn(format!(
                "No TMDB api key configured (set {}), new movies go to the manual override queue",
                API_KEY_ENV
            ));
        }
        (Some(key), false) => {
            let client = TmdbClient::new(key.clone(), &settings.tmdb);
            engine = engine.with_enricher(Box::new(client));
        }
    }

    // The bar stays hidden until the engine reports the first new movie,
    // so a no-op rerun prints nothing.
    let bar = ProgressBar::hidden();
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} fetched")?
            .progress_chars("#>-"),
    );
    if output.format() == OutputFormat::Human && !output.is_quiet() {
        let bar = bar.clone();
        engine = engine.with_progress(Box::new(move |done, total| {
            if bar.length() != Some(total) {
                bar.set_length(total);
                bar.set_draw_target(ProgressDrawTarget::stderr());
            }
            bar.set_position(done);
        }));
    }

    let report = engine.run().await?;
    bar.finish_and_clear();

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Sync complete: {} fetched, {} resolved manually, {} rating updates, {} already known",
                report.fetched,
                report.manually_resolved,
                report.ratings_updated,
                report.already_known
            ));
            for list in &report.lists {
                output.info(format!(
                    "  {}: {}/{} movies in database",
                    list.name, list.in_database, list.total
                ));
            }
            if !report.failed.is_empty() {
                output.warn(format!(
                    "{} movies need country codes in db/missing.json:",
                    report.failed.len()
                ));
                for failure in &report.failed {
                    output.info(format!(
                        "  {} {} ({})",
                        failure.imdb_id, failure.title, failure.reason
                    ));
                }
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&report)?);
        }
    }

    Ok(())
}
