/// A parsed-but-unenriched row from a watch-export CSV.
///
/// Candidates live only for the duration of one sync run; the persisted
/// representation of a movie is [`crate::MovieRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub imdb_id: String,
    pub title: String,
    pub original_title: String,
    pub year: Option<u32>,
    pub imdb_rating: Option<f64>,
    /// User-assigned rating on a 1-10 scale.
    pub user_rating: Option<u8>,
    pub genres: Vec<String>,
    /// Raw comma-separated director field from the export.
    pub directors: String,
}
