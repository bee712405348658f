pub mod paths;
pub mod settings;

pub use paths::{ConfigError, PathManager};
pub use settings::{Settings, TmdbSettings, API_KEY_ENV};
