mod recorder;
mod schema;
mod store;
mod trait_def;

pub use recorder::{EventRecorder, POPULAR_DEFAULT_LIMIT, POPULAR_MAX_LIMIT};
pub use store::SqliteHistoryStore;
pub use trait_def::{HistoryStore, PopularSong};
