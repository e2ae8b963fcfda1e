//! Event recording service sitting between the HTTP layer and the stores.

use std::sync::Arc;

use tracing::debug;

use super::trait_def::{HistoryStore, PopularSong};
use crate::catalog_store::CatalogStore;
use crate::errors::ServiceError;

pub const POPULAR_DEFAULT_LIMIT: i64 = 10;
pub const POPULAR_MAX_LIMIT: i64 = 50;

pub struct EventRecorder {
    history: Arc<dyn HistoryStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl EventRecorder {
    pub fn new(history: Arc<dyn HistoryStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        EventRecorder { history, catalog }
    }

    pub fn record_search(
        &self,
        term: &str,
        found: bool,
        song_id: Option<&str>,
    ) -> Result<(), ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::Validation(
                "Search term must not be empty".into(),
            ));
        }
        self.history.record_search(term, found, song_id)?;
        debug!("Recorded search event for '{}'", term);
        Ok(())
    }

    /// The category display name is captured at click time; later renames
    /// or deletions leave recorded history untouched.
    pub fn record_category_click(&self, category_id: &str) -> Result<(), ServiceError> {
        let name = self.catalog.get_category_name(category_id)?;
        self.history.record_category_click(name.as_deref())?;
        debug!("Recorded category click for '{}'", category_id);
        Ok(())
    }

    /// Popularity ranking. Missing limit falls back to
    /// `POPULAR_DEFAULT_LIMIT`; out-of-range values are clamped rather
    /// than rejected.
    pub fn popular(&self, limit: Option<i64>) -> Result<Vec<PopularSong>, ServiceError> {
        let limit = limit
            .unwrap_or(POPULAR_DEFAULT_LIMIT)
            .clamp(1, POPULAR_MAX_LIMIT);
        Ok(self.history.popular_songs(limit)?)
    }
}
