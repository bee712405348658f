use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-list reference file: the ordered id sequence as it appeared in the
/// source export, duplicates included. This sequence, not the database,
/// defines membership and count semantics for a list. Regenerated in full
/// on every sync run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListReference {
    pub name: String,
    pub source: String,
    pub last_synced: DateTime<Utc>,
    pub movie_ids: Vec<String>,
}
