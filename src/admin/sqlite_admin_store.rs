//! SQLite-backed admin store.
//!
//! Admin traffic is tiny, so a single mutex-guarded connection covers both
//! reads and writes.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::admin_store::AdminStore;
use super::models::Admin;
use super::schema::ADMIN_VERSIONED_SCHEMAS;
use crate::sqlite_persistence::BASE_DB_VERSION;

#[derive(Clone)]
pub struct SqliteAdminStore {
    conn: Arc<Mutex<Connection>>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = ADMIN_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &ADMIN_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating admin db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let mut current_version = (db_version - BASE_DB_VERSION as i64).max(0) as usize;
    if current_version >= latest_version {
        latest_schema
            .validate(conn)
            .context("Admin database schema validation failed")?;
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in ADMIN_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating admin db from version {} to {}",
                current_version, schema.version
            );
            migration_fn(&tx)?;
            current_version = schema.version;
        }
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    tx.commit()?;
    Ok(())
}

impl SqliteAdminStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let mut conn =
            Connection::open(db_path.as_ref()).context("Failed to open admin database")?;
        migrate_if_needed(&mut conn)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let admin_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM admins", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened admin store: {} admins", admin_count);

        Ok(SqliteAdminStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn parse_admin(row: &rusqlite::Row) -> rusqlite::Result<Admin> {
        Ok(Admin {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            address: row.get(4)?,
        })
    }
}

impl AdminStore for SqliteAdminStore {
    fn insert_admin(&self, admin: &Admin) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO admins (id, name, email, password_hash, address)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &admin.id,
                &admin.name,
                &admin.email,
                &admin.password_hash,
                &admin.address
            ],
        )
        .context(format!("Failed to insert admin '{}'", admin.email))?;
        Ok(())
    }

    fn get_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let conn = self.conn.lock().unwrap();
        let admin = conn
            .query_row(
                "SELECT id, name, email, password_hash, address
                 FROM admins WHERE email = ?1",
                params![email],
                Self::parse_admin,
            )
            .optional()?;
        Ok(admin)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let conn = self.conn.lock().unwrap();
        let admin = conn
            .query_row(
                "SELECT id, name, email, password_hash, address
                 FROM admins WHERE id = ?1",
                params![id],
                Self::parse_admin,
            )
            .optional()?;
        Ok(admin)
    }

    fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE admins SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id],
        )?;
        Ok(changed > 0)
    }

    fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM admins WHERE email = ?1",
            params![email],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    fn count_admins(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM admins", [], |r| r.get(0))?;
        Ok(count)
    }
}
