//! SQLite-backed catalog store implementation.
//!
//! One writer connection serializes all mutations; reads round-robin over a
//! small pool of read-only connections. Every multi-statement write runs in
//! a single BEGIN IMMEDIATE transaction so link replacement is atomic.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::pagination::{ResolvedPage, SortClause};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let mut current_version = (db_version - BASE_DB_VERSION as i64).max(0) as usize;
    if current_version >= latest_version {
        latest_schema
            .validate(conn)
            .context("Catalog database schema validation failed")?;
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating catalog db from version {} to {}",
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

impl SqliteCatalogStore {
    /// Open (or create) the catalog database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections for concurrent reads
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        // foreign_keys is per-connection; link rows cascade on song delete
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        migrate_if_needed(&mut write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let song_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap_or(0);
        let category_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))
            .unwrap_or(0);

        info!(
            "Opened song catalog: {} songs, {} categories",
            song_count, category_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn get_song_rowid(conn: &Connection, id: &str) -> Result<Option<i64>> {
        match conn.query_row("SELECT rowid FROM songs WHERE id = ?1", params![id], |r| {
            r.get(0)
        }) {
            Ok(rowid) => Ok(Some(rowid)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn link_artists(conn: &Connection, song_rowid: i64, artist_ids: &[String]) -> Result<()> {
        for artist_id in artist_ids {
            let artist_rowid: i64 = conn
                .query_row(
                    "SELECT rowid FROM artists WHERE id = ?1",
                    params![artist_id],
                    |r| r.get(0),
                )
                .context(format!("Artist '{}' not found", artist_id))?;

            conn.execute(
                "INSERT OR IGNORE INTO song_artists (song_rowid, artist_rowid) VALUES (?1, ?2)",
                params![song_rowid, artist_rowid],
            )?;
        }
        Ok(())
    }

    fn link_categories(conn: &Connection, song_rowid: i64, category_ids: &[String]) -> Result<()> {
        for category_id in category_ids {
            let category_rowid: i64 = conn
                .query_row(
                    "SELECT rowid FROM categories WHERE id = ?1",
                    params![category_id],
                    |r| r.get(0),
                )
                .context(format!("Category '{}' not found", category_id))?;

            conn.execute(
                "INSERT OR IGNORE INTO song_categories (song_rowid, category_rowid) VALUES (?1, ?2)",
                params![song_rowid, category_rowid],
            )?;
        }
        Ok(())
    }

    fn parse_song_list_item(row: &rusqlite::Row) -> rusqlite::Result<SongListItem> {
        Ok(SongListItem {
            id: row.get(0)?,
            title: row.get(1)?,
            code: row.get(2)?,
            performer: row.get(3)?,
        })
    }
}

fn truncate_lyrics(lyrics: Option<String>) -> Option<String> {
    lyrics.map(|text| {
        if text.chars().count() > LYRICS_PREVIEW_MAX_CHARS {
            text.chars().take(LYRICS_PREVIEW_MAX_CHARS).collect()
        } else {
            text
        }
    })
}

impl CatalogStore for SqliteCatalogStore {
    fn create_song(&self, song: &NewSong) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> Result<()> {
            conn.execute(
                "INSERT INTO songs (id, title, code, lyrics, performer) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &id,
                    &song.title,
                    &song.code,
                    &song.lyrics,
                    &song.performer
                ],
            )?;

            let song_rowid: i64 = conn.query_row(
                "SELECT rowid FROM songs WHERE id = ?1",
                params![&id],
                |r| r.get(0),
            )?;

            Self::link_artists(&conn, song_rowid, &song.artist_ids)?;
            Self::link_categories(&conn, song_rowid, &song.category_ids)?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                conn.execute("COMMIT", [])?;
                Ok(id)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn update_song(&self, id: &str, update: &SongUpdate) -> Result<bool> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> Result<bool> {
            let song_rowid = match Self::get_song_rowid(&conn, id)? {
                Some(rowid) => rowid,
                None => return Ok(false),
            };

            if let Some(title) = &update.title {
                conn.execute(
                    "UPDATE songs SET title = ?1 WHERE rowid = ?2",
                    params![title, song_rowid],
                )?;
            }
            if let Some(code) = &update.code {
                conn.execute(
                    "UPDATE songs SET code = ?1 WHERE rowid = ?2",
                    params![code, song_rowid],
                )?;
            }
            match &update.lyrics {
                FieldUpdate::Keep => {}
                FieldUpdate::Clear => {
                    conn.execute(
                        "UPDATE songs SET lyrics = NULL WHERE rowid = ?1",
                        params![song_rowid],
                    )?;
                }
                FieldUpdate::Set(lyrics) => {
                    conn.execute(
                        "UPDATE songs SET lyrics = ?1 WHERE rowid = ?2",
                        params![lyrics, song_rowid],
                    )?;
                }
            }
            match &update.performer {
                FieldUpdate::Keep => {}
                FieldUpdate::Clear => {
                    conn.execute(
                        "UPDATE songs SET performer = NULL WHERE rowid = ?1",
                        params![song_rowid],
                    )?;
                }
                FieldUpdate::Set(performer) => {
                    conn.execute(
                        "UPDATE songs SET performer = ?1 WHERE rowid = ?2",
                        params![performer, song_rowid],
                    )?;
                }
            }

            if let Some(artist_ids) = &update.artist_ids {
                conn.execute(
                    "DELETE FROM song_artists WHERE song_rowid = ?1",
                    params![song_rowid],
                )?;
                Self::link_artists(&conn, song_rowid, artist_ids)?;
            }
            if let Some(category_ids) = &update.category_ids {
                conn.execute(
                    "DELETE FROM song_categories WHERE song_rowid = ?1",
                    params![song_rowid],
                )?;
                Self::link_categories(&conn, song_rowid, category_ids)?;
            }
            Ok(true)
        })();

        match result {
            Ok(found) => {
                conn.execute("COMMIT", [])?;
                Ok(found)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn delete_song(&self, id: &str) -> Result<bool> {
        let conn = self.write_conn.lock().unwrap();
        // Single statement; song_artists/song_categories rows cascade
        let deleted = conn.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn get_song_detail(&self, id: &str) -> Result<Option<SongDetail>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();

        let (song_rowid, song) = match conn.query_row(
            "SELECT rowid, id, title, code, lyrics, performer FROM songs WHERE id = ?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    Song {
                        id: r.get(1)?,
                        title: r.get(2)?,
                        code: r.get(3)?,
                        lyrics: r.get(4)?,
                        performer: r.get(5)?,
                    },
                ))
            },
        ) {
            Ok(found) => found,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut stmt = conn.prepare_cached(
            "SELECT a.id, a.name FROM artists a
             JOIN song_artists sa ON sa.artist_rowid = a.rowid
             WHERE sa.song_rowid = ?1 ORDER BY a.name",
        )?;
        let artists = stmt
            .query_map(params![song_rowid], |r| {
                Ok(ArtistRef {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare_cached(
            "SELECT c.id, c.name, sc.description, sc.icon FROM categories c
             JOIN song_categories sc ON sc.category_rowid = c.rowid
             WHERE sc.song_rowid = ?1 ORDER BY c.name",
        )?;
        let categories = stmt
            .query_map(params![song_rowid], |r| {
                Ok(CategoryRef {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    description: r.get(2)?,
                    icon: r.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(SongDetail {
            id: song.id,
            title: song.title,
            code: song.code,
            lyrics: truncate_lyrics(song.lyrics),
            performer: song.performer,
            artists,
            categories,
        }))
    }

    fn search_songs(
        &self,
        criteria: &SearchCriteria,
        page: &ResolvedPage,
    ) -> Result<Vec<SongListItem>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();

        let (sql, term) = match criteria {
            SearchCriteria::Title(term) => (
                "SELECT id, title, code, performer FROM songs
                 WHERE title LIKE ?1 ORDER BY title ASC LIMIT ?2 OFFSET ?3",
                term,
            ),
            SearchCriteria::Artist(term) => (
                "SELECT DISTINCT s.id, s.title, s.code, s.performer FROM songs s
                 JOIN song_artists sa ON sa.song_rowid = s.rowid
                 JOIN artists a ON a.rowid = sa.artist_rowid
                 WHERE a.name LIKE ?1 ORDER BY s.title ASC LIMIT ?2 OFFSET ?3",
                term,
            ),
            SearchCriteria::Lyrics(term) => (
                "SELECT id, title, code, performer FROM songs
                 WHERE lyrics LIKE ?1 ORDER BY title ASC LIMIT ?2 OFFSET ?3",
                term,
            ),
        };

        let pattern = format!("%{}%", term);
        let mut stmt = conn.prepare_cached(sql)?;
        let items = stmt
            .query_map(
                params![pattern, page.limit, page.offset],
                Self::parse_song_list_item,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn list_songs_by_category(
        &self,
        category_id: &str,
        page: &ResolvedPage,
    ) -> Result<Vec<SongListItem>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT s.id, s.title, s.code, s.performer FROM songs s
             JOIN song_categories sc ON sc.song_rowid = s.rowid
             JOIN categories c ON c.rowid = sc.category_rowid
             WHERE c.id = ?1 ORDER BY s.title ASC LIMIT ?2 OFFSET ?3",
        )?;
        let items = stmt
            .query_map(
                params![category_id, page.limit, page.offset],
                Self::parse_song_list_item,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn list_songs(
        &self,
        page: &ResolvedPage,
        sort: Option<SortClause>,
    ) -> Result<Vec<SongListItem>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();

        // The sort field comes from resolve_sort's allow-list, never from
        // caller input, so splicing it into the SQL text is safe.
        let order_by = sort
            .map(|clause| clause.as_sql())
            .unwrap_or_else(|| "title ASC".to_string());
        let sql = format!(
            "SELECT id, title, code, performer FROM songs ORDER BY {} LIMIT ?1 OFFSET ?2",
            order_by
        );

        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![page.limit, page.offset], Self::parse_song_list_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();

        // MIN() stands in for an arbitrary pick among the category's link
        // rows; which row supplies description/icon is unspecified when
        // links disagree.
        let mut stmt = conn.prepare_cached(
            "SELECT c.id, c.name, MIN(sc.description), MIN(sc.icon)
             FROM categories c
             LEFT JOIN song_categories sc ON sc.category_rowid = c.rowid
             GROUP BY c.rowid ORDER BY c.name ASC",
        )?;
        let categories = stmt
            .query_map([], |r| {
                Ok(CategorySummary {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    description: r.get(2)?,
                    icon: r.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn get_category_name(&self, id: &str) -> Result<Option<String>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();

        match conn.query_row(
            "SELECT name FROM categories WHERE id = ?1",
            params![id],
            |r| r.get(0),
        ) {
            Ok(name) => Ok(Some(name)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_artist(&self, artist: &Artist) -> Result<()> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO artists (id, name) VALUES (?1, ?2)",
            params![&artist.id, &artist.name],
        )
        .context(format!("Failed to insert artist '{}'", artist.id))?;
        Ok(())
    }

    fn insert_category(&self, category: &Category) -> Result<()> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO categories (id, name) VALUES (?1, ?2)",
            params![&category.id, &category.name],
        )
        .context(format!("Failed to insert category '{}'", category.id))?;
        Ok(())
    }

    fn ping(&self) -> Result<()> {
        let conn_arc = self.get_read_conn();
        let conn = conn_arc.lock().unwrap();
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}
