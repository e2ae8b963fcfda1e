//! HistoryStore trait definition.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A song ranked by how often searches surfaced it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopularSong {
    pub song_id: String,
    pub score: i64,
}

/// Append-only storage for usage events. Events are never updated or
/// deleted by the application.
pub trait HistoryStore: Send + Sync {
    /// Append a search event; `found` marks whether the search produced
    /// results. A supplied song id also gets linked to the event.
    fn record_search(&self, term: &str, found: bool, song_id: Option<&str>) -> Result<()>;

    /// Append a category-click event carrying the display name captured at
    /// click time (None when the category was already gone).
    fn record_category_click(&self, category_name: Option<&str>) -> Result<()>;

    /// Songs ranked by linked-event count, score descending. Ties break on
    /// song id so the order is stable.
    fn popular_songs(&self, limit: i64) -> Result<Vec<PopularSong>>;
}
