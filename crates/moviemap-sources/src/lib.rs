pub mod error;
pub mod export;
pub mod tmdb;
pub mod traits;

pub use error::EnrichError;
pub use tmdb::TmdbClient;
pub use traits::{EnrichedMovie, Enricher, Lookup};
