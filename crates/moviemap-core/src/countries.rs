use anyhow::{Context, Result};
use moviemap_models::MovieDatabase;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Durable country code → display name table, self-healing from observed
/// data.
///
/// Precedence, highest first: a name already on file (operator edits
/// live here and are never clobbered), then a newly observed real name
/// for a code-only or unknown entry, then the bare code as a last
/// resort. A name equal to its code is low-confidence and may be
/// upgraded; a real name is never downgraded.
pub struct CountryTable {
    path: PathBuf,
    names: BTreeMap<String, String>,
}

impl CountryTable {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut names = BTreeMap::new();

        if path.exists() {
            let mut reader = csv::Reader::from_path(&path)
                .with_context(|| format!("failed to open country table {}", path.display()))?;
            for result in reader.records() {
                let record = result
                    .with_context(|| format!("malformed country table {}", path.display()))?;
                if let (Some(code), Some(name)) = (record.get(0), record.get(1)) {
                    if !code.is_empty() {
                        names.insert(code.to_string(), name.to_string());
                    }
                }
            }
            info!(countries = names.len(), "Loaded country table");
        }

        Ok(Self { path, names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn display_name(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    /// Widen the table with every country name observed in the database.
    /// Returns the number of entries added or upgraded.
    pub fn merge_from_database(&mut self, database: &MovieDatabase) -> usize {
        let mut changed = 0;
        for record in database.movies.values() {
            for (code, name) in &record.country_names {
                match self.names.get(code) {
                    None => {
                        let value = if name.is_empty() { code } else { name };
                        self.names.insert(code.clone(), value.clone());
                        changed += 1;
                    }
                    // Upgrade a code-only placeholder once a real name shows up.
                    Some(existing) if existing == code && name != code && !name.is_empty() => {
                        debug!(code = %code, name = %name, "Upgrading code-only country entry");
                        self.names.insert(code.clone(), name.clone());
                        changed += 1;
                    }
                    _ => {}
                }
            }
            // Codes the record never got a name for still get a row.
            for code in &record.countries {
                if !self.names.contains_key(code) {
                    self.names.insert(code.clone(), code.clone());
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Persist sorted by code; the csv writer quotes names containing
    /// the delimiter.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("failed to write country table {}", self.path.display()))?;
        writer.write_record(["code", "name"])?;
        for (code, name) in &self.names {
            writer.write_record([code, name])?;
        }
        writer.flush()?;
        debug!(countries = self.names.len(), "Country table saved");
        Ok(())
    }
}
