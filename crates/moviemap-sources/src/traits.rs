use crate::error::EnrichError;
use async_trait::async_trait;
use moviemap_models::CandidateRecord;
use std::collections::BTreeMap;

/// Outcome of an enrichment attempt that completed without a
/// transport-level failure.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(EnrichedMovie),
    /// The service has no usable record for this candidate. Covers both
    /// a missing cross-reference match and a match with zero production
    /// countries, which cannot be placed on the map.
    NotFound { reason: String },
}

/// Metadata resolved for one candidate, ready to become a canonical
/// record. The sync engine supplies the user rating and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMovie {
    pub title: String,
    pub year: Option<u32>,
    pub poster: Option<String>,
    pub rating: Option<f64>,
    pub director: Option<String>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub country_names: BTreeMap<String, String>,
    pub tmdb_id: u64,
}

/// Seam between the reconciliation engine and the metadata service.
///
/// Implementations own their own throttling and retry behavior, which is
/// only safe under strictly sequential calls; the engine never resolves
/// more than one candidate at a time.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn resolve(&self, candidate: &CandidateRecord) -> Result<Lookup, EnrichError>;

    fn name(&self) -> &str;
}
