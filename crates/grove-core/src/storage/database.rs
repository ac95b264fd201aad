//! SQLite-backed stats store.
//!
//! Stats live in a small key-value table as two named integer fields:
//! - `streak`
//! - `total_minutes`
//!
//! Values are stored as decimal text. A key that is missing or does not
//! parse as a non-negative integer reads as zero.

use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;
use super::store::{Stats, StatsStore};
use crate::error::PersistenceError;

const STREAK_KEY: &str = "streak";
const TOTAL_MINUTES_KEY: &str = "total_minutes";

/// SQLite database holding the cumulative stats.
pub struct SqliteStatsStore {
    conn: Connection,
}

impl SqliteStatsStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/grove.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, PersistenceError> {
        let dir = data_dir().map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Self::open_at(&dir.join("grove.db"))
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path).map_err(|source| PersistenceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn read_counter(&self, key: &str) -> Result<u64, PersistenceError> {
        let Some(raw) = self.kv_get(key)? else {
            return Ok(0);
        };
        match raw.trim().parse::<u64>() {
            Ok(n) => Ok(n),
            Err(_) => {
                let err = PersistenceError::Corrupt {
                    key: key.to_string(),
                    value: raw,
                };
                tracing::warn!(error = %err, "treating unreadable counter as zero");
                Ok(0)
            }
        }
    }
}

impl StatsStore for SqliteStatsStore {
    fn load(&self) -> Result<Stats, PersistenceError> {
        Ok(Stats {
            streak: self.read_counter(STREAK_KEY)?,
            total_minutes: self.read_counter(TOTAL_MINUTES_KEY)?,
        })
    }

    fn save(&mut self, stats: &Stats) -> Result<(), PersistenceError> {
        self.kv_set(STREAK_KEY, &stats.streak.to_string())?;
        self.kv_set(TOTAL_MINUTES_KEY, &stats.total_minutes.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_zero() {
        let store = SqliteStatsStore::open_memory().unwrap();
        assert_eq!(store.load().unwrap(), Stats::default());
    }

    #[test]
    fn save_then_load() {
        let mut store = SqliteStatsStore::open_memory().unwrap();
        store.save(&Stats::new(3, 75)).unwrap();
        assert_eq!(store.load().unwrap(), Stats::new(3, 75));
        assert_eq!(store.kv_get("streak").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn corrupt_values_read_as_zero() {
        let store = SqliteStatsStore::open_memory().unwrap();
        store.kv_set("streak", "lots").unwrap();
        store.kv_set("total_minutes", "-12").unwrap();
        assert_eq!(store.load().unwrap(), Stats::default());
    }

    #[test]
    fn one_bad_key_does_not_spoil_the_other() {
        let store = SqliteStatsStore::open_memory().unwrap();
        store.kv_set("streak", "").unwrap();
        store.kv_set("total_minutes", "50").unwrap();
        assert_eq!(store.load().unwrap(), Stats::new(0, 50));
    }

    #[test]
    fn kv_store() {
        let store = SqliteStatsStore::open_memory().unwrap();
        assert!(store.kv_get("test").unwrap().is_none());
        store.kv_set("test", "hello").unwrap();
        assert_eq!(store.kv_get("test").unwrap().unwrap(), "hello");
    }
}
