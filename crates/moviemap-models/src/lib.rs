pub mod candidate;
pub mod database;
pub mod list;
pub mod missing;
pub mod movie;
pub mod view;

pub use candidate::CandidateRecord;
pub use database::MovieDatabase;
pub use list::ListReference;
pub use missing::MissingEntry;
pub use movie::{MovieRecord, RecordOrigin};
pub use view::{CountryEntry, MovieView};
