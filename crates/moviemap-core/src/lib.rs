pub mod bootstrap;
pub mod countries;
pub mod missing;
pub mod store;
pub mod sync;
pub mod views;

pub use countries::CountryTable;
pub use missing::MissingStore;
pub use store::DatabaseStore;
pub use sync::{FailedFetch, ListSummary, SyncEngine, SyncReport};
