//! SQLite schema for the usage-history database.
//!
//! Events are append-only. Song links live in a side table so one search
//! can later carry several songs without a schema change; the clicked
//! category name is denormalized at write time so history survives
//! category renames and deletions.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const HISTORY_EVENTS_TABLE: Table = Table {
    name: "history_events",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("search_term", &SqlType::Text),
        sqlite_column!("clicked_category_name", &SqlType::Text),
        sqlite_column!("searched", &SqlType::Integer, non_null = true),
        sqlite_column!("clicked", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_history_events_id", "id")],
    unique_constraints: &[&["id"]],
};

const HISTORY_EVENTS_FK: ForeignKey = ForeignKey {
    foreign_table: "history_events",
    foreign_column: "rowid",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// Songs attached to a history event. `song_id` is a plain text id rather
/// than a foreign key; the catalog lives in another database file.
const HISTORY_SONGS_TABLE: Table = Table {
    name: "history_songs",
    columns: &[
        sqlite_column!(
            "history_rowid",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&HISTORY_EVENTS_FK)
        ),
        sqlite_column!("song_id", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_history_songs_event", "history_rowid"),
        ("idx_history_songs_song", "song_id"),
    ],
    unique_constraints: &[&["history_rowid", "song_id"]],
};

pub const HISTORY_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[HISTORY_EVENTS_TABLE, HISTORY_SONGS_TABLE],
    migration: None,
}];
