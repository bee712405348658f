use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the data directory from the environment, defaulting to `./data`.
pub fn base_data_dir() -> PathBuf {
    std::env::var("MOVIEMAP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("input directory not found: {0} (expected CSV exports under it)")]
    MissingInputDir(PathBuf),
}

/// Resolves every file the pipeline reads or writes under one data
/// directory:
///
/// ```text
/// data/
///   input/        source CSV exports, one per list (required)
///   db/           movies.json, missing.json, countries.csv
///   lists/        <list>.json reference files
///   views/        <list>.json published views
/// ```
#[derive(Debug, Clone)]
pub struct PathManager {
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn input_dir(&self) -> PathBuf {
        self.data_dir.join("input")
    }

    /// The input directory must exist before a run; everything else is
    /// created on demand.
    pub fn require_input_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.input_dir();
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(ConfigError::MissingInputDir(dir))
        }
    }

    pub fn db_dir(&self) -> PathBuf {
        self.data_dir.join("db")
    }

    pub fn database_file(&self) -> PathBuf {
        self.db_dir().join("movies.json")
    }

    pub fn missing_file(&self) -> PathBuf {
        self.db_dir().join("missing.json")
    }

    pub fn countries_file(&self) -> PathBuf {
        self.db_dir().join("countries.csv")
    }

    pub fn lists_dir(&self) -> PathBuf {
        self.data_dir.join("lists")
    }

    pub fn list_file(&self, list_name: &str) -> PathBuf {
        self.lists_dir().join(format!("{}.json", list_name))
    }

    pub fn views_dir(&self) -> PathBuf {
        self.data_dir.join("views")
    }

    pub fn view_file(&self, list_name: &str) -> PathBuf {
        self.views_dir().join(format!("{}.json", list_name))
    }

    /// Optional config.toml in the platform config directory
    /// (e.g. ~/.config/moviemap on Linux).
    pub fn config_file(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("moviemap").join("config.toml"))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.db_dir())?;
        std::fs::create_dir_all(self.lists_dir())?;
        std::fs::create_dir_all(self.views_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        Self::new(base_data_dir())
    }
}
