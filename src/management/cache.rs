use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

use crate::{
    Res,
    error::Error,
    types::{CacheEntry, CacheKey},
    utils,
};

/// Persistent store of counted results, one row per (artist, album, word).
///
/// Rows are written once and never updated. A second insert for the same
/// key fails with [`Error::CacheWriteConflict`]; [`ResultCache::remove`] is
/// the only way to make room for a fresh count.
pub struct ResultCache {
    conn: Mutex<Connection>,
}

impl ResultCache {
    pub fn open(path: &Path) -> Res<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Res<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Res<Self> {
        conn.execute_batch(
            r#"
CREATE TABLE IF NOT EXISTS counts (
  Artist TEXT NOT NULL,
  Album TEXT NOT NULL,
  Word TEXT NOT NULL,
  Count INTEGER NOT NULL,
  Album_Art TEXT,
  PRIMARY KEY (Artist, Album, Word)
);
"#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: &CacheKey) -> Res<Option<CacheEntry>> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT Count, Album_Art FROM counts WHERE Artist = ?1 AND Album = ?2 AND Word = ?3",
                params![key.artist, key.album, key.word],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        Ok(row.map(|(count, art)| CacheEntry::new(count.max(0) as u64, art)))
    }

    /// Inserts a new row. Never overwrites an existing one.
    pub fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Res<()> {
        let art = utils::sanitize_art_url(entry.album_art.clone());
        let count = i64::try_from(entry.count)
            .map_err(|_| Error::InvalidInput(format!("count {} out of range", entry.count)))?;

        let conn = self.lock();
        let inserted = conn.execute(
            "INSERT INTO counts (Artist, Album, Word, Count, Album_Art) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![key.artist, key.album, key.word, count, art],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(Error::CacheWriteConflict(key.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the row of `key`. Returns whether a row existed.
    pub fn remove(&self, key: &CacheKey) -> Res<bool> {
        let conn = self.lock();
        let removed = conn.execute(
            "DELETE FROM counts WHERE Artist = ?1 AND Album = ?2 AND Word = ?3",
            params![key.artist, key.album, key.word],
        )?;
        Ok(removed > 0)
    }

    /// All rows, ordered by artist, album and word.
    pub fn entries(&self) -> Res<Vec<(CacheKey, CacheEntry)>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT Artist, Album, Word, Count, Album_Art FROM counts ORDER BY Artist, Album, Word",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                CacheKey {
                    artist: row.get(0)?,
                    album: row.get(1)?,
                    word: row.get(2)?,
                },
                CacheEntry::new(row.get::<_, i64>(3)?.max(0) as u64, row.get(4)?),
            ))
        })?;

        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // a panic mid-statement leaves no partial row behind
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
