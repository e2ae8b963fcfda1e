//! CatalogStore trait definition.

use anyhow::Result;

use super::models::{
    Artist, Category, CategorySummary, NewSong, SearchCriteria, SongDetail, SongListItem,
    SongUpdate,
};
use crate::pagination::{ResolvedPage, SortClause};

/// Storage backend for the song catalog and its artist/category links.
///
/// All multi-statement writes run inside a single transaction, so a reader
/// never observes a song with a half-replaced link set.
pub trait CatalogStore: Send + Sync {
    /// Insert a song and link the supplied artist/category ids. Duplicate
    /// ids in the lists collapse to one link. Returns the new song id.
    fn create_song(&self, song: &NewSong) -> Result<String>;

    /// Apply a partial update. Scalar fields follow the tri-state in
    /// `SongUpdate`; a supplied link id list (even empty) replaces that
    /// whole link set. Returns false if the song does not exist.
    fn update_song(&self, id: &str, update: &SongUpdate) -> Result<bool>;

    /// Delete a song. Link rows cascade. Returns false if the song does
    /// not exist.
    fn delete_song(&self, id: &str) -> Result<bool>;

    /// Get a song with resolved artists and categories. Lyrics longer
    /// than `LYRICS_PREVIEW_MAX_CHARS` come back truncated. Returns
    /// Ok(None) if the song does not exist.
    fn get_song_detail(&self, id: &str) -> Result<Option<SongDetail>>;

    /// Case-insensitive substring search over one criterion, ordered by
    /// title ascending.
    fn search_songs(
        &self,
        criteria: &SearchCriteria,
        page: &ResolvedPage,
    ) -> Result<Vec<SongListItem>>;

    /// Songs linked to a category, ordered by title ascending. An unknown
    /// category yields an empty page.
    fn list_songs_by_category(
        &self,
        category_id: &str,
        page: &ResolvedPage,
    ) -> Result<Vec<SongListItem>>;

    /// Full catalog listing for the admin surface. Without a sort clause
    /// the order is title ascending.
    fn list_songs(
        &self,
        page: &ResolvedPage,
        sort: Option<SortClause>,
    ) -> Result<Vec<SongListItem>>;

    /// All categories ordered by name, each carrying a description/icon
    /// picked from one of its song links. Which link wins is unspecified
    /// when links disagree.
    fn list_categories(&self) -> Result<Vec<CategorySummary>>;

    /// Display name of a category. Returns Ok(None) if the category does
    /// not exist.
    fn get_category_name(&self, id: &str) -> Result<Option<String>>;

    /// Seed an artist. Artists have no admin surface of their own; this
    /// exists for import tooling and tests.
    fn insert_artist(&self, artist: &Artist) -> Result<()>;

    /// Seed a category. Same standing as `insert_artist`.
    fn insert_category(&self, category: &Category) -> Result<()>;

    /// Connectivity probe for the health endpoint.
    fn ping(&self) -> Result<()>;
}
