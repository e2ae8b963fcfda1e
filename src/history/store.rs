//! SQLite-backed history store.
//!
//! Event volume is modest and rows are tiny, so one mutex-guarded
//! connection handles everything. The two-statement search insert runs in
//! a single transaction.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use super::schema::HISTORY_VERSIONED_SCHEMAS;
use super::trait_def::{HistoryStore, PopularSong};
use crate::sqlite_persistence::BASE_DB_VERSION;

#[derive(Clone)]
pub struct SqliteHistoryStore {
    conn: Arc<Mutex<Connection>>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = HISTORY_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &HISTORY_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating history db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let mut current_version = (db_version - BASE_DB_VERSION as i64).max(0) as usize;
    if current_version >= latest_version {
        latest_schema
            .validate(conn)
            .context("History database schema validation failed")?;
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in HISTORY_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating history db from version {} to {}",
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

impl SqliteHistoryStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let mut conn =
            Connection::open(db_path.as_ref()).context("Failed to open history database")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut conn)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let event_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM history_events", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened history store: {} events", event_count);

        Ok(SqliteHistoryStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn record_search(&self, term: &str, found: bool, song_id: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| -> Result<()> {
            conn.execute(
                "INSERT INTO history_events (id, search_term, searched, clicked)
                 VALUES (?1, ?2, ?3, 0)",
                params![&id, term, found as i64],
            )?;
            if let Some(song_id) = song_id {
                conn.execute(
                    "INSERT OR IGNORE INTO history_songs (history_rowid, song_id)
                     SELECT rowid, ?1 FROM history_events WHERE id = ?2",
                    params![song_id, &id],
                )?;
            }
            Ok(())
        })();

        match result {
            Ok(()) => {
                conn.execute("COMMIT", [])?;
                Ok(())
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn record_category_click(&self, category_name: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history_events (id, clicked_category_name, searched, clicked)
             VALUES (?1, ?2, 0, 1)",
            params![Uuid::new_v4().to_string(), category_name],
        )?;
        Ok(())
    }

    fn popular_songs(&self, limit: i64) -> Result<Vec<PopularSong>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT song_id, COUNT(*) AS score
             FROM history_songs
             GROUP BY song_id
             ORDER BY score DESC, song_id ASC
             LIMIT ?1",
        )?;
        let songs = stmt
            .query_map(params![limit], |row| {
                Ok(PopularSong {
                    song_id: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(songs)
    }
}
