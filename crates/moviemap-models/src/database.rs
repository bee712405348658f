use crate::movie::MovieRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DATABASE_VERSION: u32 = 1;

/// Versioned container for all canonical movie records, keyed by IMDb id.
///
/// The whole mapping is the unit of durability: it is loaded once per
/// run, mutated in memory and replaced on disk in one write. `BTreeMap`
/// keeps the serialized form deterministically ordered so repeated runs
/// with unchanged inputs produce byte-identical output (timestamps aside).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDatabase {
    pub version: u32,
    pub last_updated: Option<DateTime<Utc>>,
    pub movies: BTreeMap<String, MovieRecord>,
}

impl MovieDatabase {
    pub fn new() -> Self {
        Self {
            version: DATABASE_VERSION,
            last_updated: None,
            movies: BTreeMap::new(),
        }
    }
}

impl Default for MovieDatabase {
    fn default() -> Self {
        Self::new()
    }
}
