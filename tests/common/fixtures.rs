//! Test data seeding
//!
//! Seeds a small but representative catalog: two artists, three
//! categories (one intentionally without songs) and three songs with
//! overlapping artist/category links.

use super::constants::*;
use anyhow::Result;
use catalog_server::catalog_store::{Artist, CatalogStore, Category, NewSong};

/// Seeds artists, categories and songs. Returns the generated song ids
/// in seed order (song 1, song 2, song 3).
pub(crate) fn seed_catalog(store: &dyn CatalogStore) -> Result<Vec<String>> {
    store.insert_artist(&Artist {
        id: ARTIST_1_ID.to_string(),
        name: ARTIST_1_NAME.to_string(),
    })?;
    store.insert_artist(&Artist {
        id: ARTIST_2_ID.to_string(),
        name: ARTIST_2_NAME.to_string(),
    })?;

    store.insert_category(&Category {
        id: CATEGORY_ROCK_ID.to_string(),
        name: "Rock".to_string(),
    })?;
    store.insert_category(&Category {
        id: CATEGORY_DUETS_ID.to_string(),
        name: "Duets".to_string(),
    })?;
    store.insert_category(&Category {
        id: CATEGORY_EVERGREENS_ID.to_string(),
        name: "Evergreens".to_string(),
    })?;

    let song_1 = store.create_song(&NewSong {
        title: SONG_1_TITLE.to_string(),
        code: SONG_1_CODE.to_string(),
        lyrics: Some(SONG_1_LYRICS.to_string()),
        performer: Some("Lionel".to_string()),
        artist_ids: vec![ARTIST_1_ID.to_string()],
        category_ids: vec![CATEGORY_ROCK_ID.to_string()],
    })?;

    let song_2 = store.create_song(&NewSong {
        title: SONG_2_TITLE.to_string(),
        code: SONG_2_CODE.to_string(),
        lyrics: None,
        performer: Some("Harry".to_string()),
        artist_ids: vec![ARTIST_2_ID.to_string()],
        category_ids: vec![CATEGORY_ROCK_ID.to_string(), CATEGORY_DUETS_ID.to_string()],
    })?;

    let song_3 = store.create_song(&NewSong {
        title: SONG_3_TITLE.to_string(),
        code: SONG_3_CODE.to_string(),
        lyrics: Some(SONG_3_LYRICS.to_string()),
        performer: None,
        artist_ids: vec![ARTIST_1_ID.to_string(), ARTIST_2_ID.to_string()],
        category_ids: vec![CATEGORY_DUETS_ID.to_string()],
    })?;

    Ok(vec![song_1, song_2, song_3])
}
