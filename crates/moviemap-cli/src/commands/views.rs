use crate::output::{Output, OutputFormat};
use anyhow::Result;
use moviemap_config::PathManager;
use moviemap_core::views::build_all_views;

pub fn run_views(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let summaries = build_all_views(&paths)?;

    match output.format() {
        OutputFormat::Human => {
            for summary in &summaries {
                output.success(format!(
                    "{}: {} movies across {} countries",
                    summary.list, summary.movies, summary.countries
                ));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&summaries)?);
        }
    }

    Ok(())
}
