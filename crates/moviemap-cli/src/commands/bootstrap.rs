use crate::output::{Output, OutputFormat};
use anyhow::Result;
use moviemap_config::PathManager;
use moviemap_core::bootstrap::bootstrap_from_legacy;
use std::path::Path;

pub fn run_bootstrap(legacy_file: &Path, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let summary = bootstrap_from_legacy(&paths, legacy_file)?;

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Migrated {} movies into {}",
                summary.unique_movies,
                paths.database_file().display()
            ));
            for list in &summary.lists {
                output.info(format!("  rebuilt list reference: {}", list));
            }
            if summary.skipped > 0 {
                output.warn(format!(
                    "{} legacy movies had no production countries and were skipped",
                    summary.skipped
                ));
            }
            output.info("Run 'moviemap views' to rebuild the published views.");
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&summary)?);
        }
    }

    Ok(())
}
