//! SQLite schema for the admin accounts database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

const ADMINS_TABLE: Table = Table {
    name: "admins",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true),
        sqlite_column!("password_hash", &SqlType::Text, non_null = true),
        sqlite_column!("address", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_admins_id", "id"),
        ("idx_admins_email", "email"),
    ],
    unique_constraints: &[&["id"], &["email"]],
};

pub const ADMIN_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ADMINS_TABLE],
    migration: None,
}];
