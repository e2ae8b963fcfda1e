//! SQLite schema definitions for the song catalog database.
//!
//! Songs, artists and categories use integer rowids internally and unique
//! text ids for lookups. Category description/icon live on the
//! song-category link row, not on the category itself.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("code", &SqlType::Text, non_null = true),
        sqlite_column!("lyrics", &SqlType::Text),
        sqlite_column!("performer", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_songs_id", "id"),
        ("idx_songs_title", "title"),
        ("idx_songs_code", "code"),
    ],
    unique_constraints: &[&["id"]],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_artists_id", "id"),
        ("idx_artists_name", "name"),
    ],
    unique_constraints: &[&["id"]],
};

const CATEGORIES_TABLE: Table = Table {
    name: "categories",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_categories_id", "id")],
    unique_constraints: &[&["id"]],
};

const SONGS_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "rowid",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ARTISTS_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "rowid",
    on_delete: ForeignKeyOnChange::Cascade,
};

const CATEGORIES_FK: ForeignKey = ForeignKey {
    foreign_table: "categories",
    foreign_column: "rowid",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// Song <-> Artist links. The unique pair makes duplicate links impossible;
/// inserts go through INSERT OR IGNORE.
const SONG_ARTISTS_TABLE: Table = Table {
    name: "song_artists",
    columns: &[
        sqlite_column!(
            "song_rowid",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONGS_FK)
        ),
        sqlite_column!(
            "artist_rowid",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTISTS_FK)
        ),
    ],
    indices: &[
        ("idx_song_artists_song", "song_rowid"),
        ("idx_song_artists_artist", "artist_rowid"),
    ],
    unique_constraints: &[&["song_rowid", "artist_rowid"]],
};

/// Song <-> Category links carrying the per-link description/icon blobs.
const SONG_CATEGORIES_TABLE: Table = Table {
    name: "song_categories",
    columns: &[
        sqlite_column!(
            "song_rowid",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONGS_FK)
        ),
        sqlite_column!(
            "category_rowid",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&CATEGORIES_FK)
        ),
        sqlite_column!("description", &SqlType::Text),
        sqlite_column!("icon", &SqlType::Blob),
    ],
    indices: &[
        ("idx_song_categories_song", "song_rowid"),
        ("idx_song_categories_category", "category_rowid"),
    ],
    unique_constraints: &[&["song_rowid", "category_rowid"]],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONGS_TABLE,
        ARTISTS_TABLE,
        CATEGORIES_TABLE,
        SONG_ARTISTS_TABLE,
        SONG_CATEGORIES_TABLE,
    ],
    migration: None,
}];
