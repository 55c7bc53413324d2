//! SQLite-based local cache.
//!
//! The durable fallback for streak state when the remote store is
//! unreachable: a single key-value table, synchronous access, last value
//! wins. Single-process, single-writer, so no transactions are needed.

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::CacheError;

/// Local durable key-value cache.
pub struct Cache {
    conn: Connection,
}

impl Cache {
    /// Open the cache at `~/.config/daystreak/daystreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub fn open() -> Result<Self, CacheError> {
        let path = data_dir()
            .map_err(|e| CacheError::OpenFailed {
                path: "~/.config/daystreak".into(),
                message: e.to_string(),
            })?
            .join("daystreak.db");
        let conn = Connection::open(&path).map_err(|e| CacheError::OpenFailed {
            path,
            message: e.to_string(),
        })?;
        let cache = Self { conn };
        cache.migrate()?;
        Ok(cache)
    }

    /// Open an in-memory cache (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory().map_err(|e| CacheError::OpenFailed {
            path: ":memory:".into(),
            message: e.to_string(),
        })?;
        let cache = Self { conn };
        cache.migrate()?;
        Ok(cache)
    }

    fn migrate(&self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a cached value.
    pub fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a cached value, replacing any previous one.
    pub fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a cached value. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_delete() {
        let cache = Cache::open_memory().unwrap();
        assert!(cache.get("streak").unwrap().is_none());

        cache.set("streak", "{\"streak\":3}").unwrap();
        assert_eq!(cache.get("streak").unwrap().unwrap(), "{\"streak\":3}");

        cache.delete("streak").unwrap();
        assert!(cache.get("streak").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_last_value_wins() {
        let cache = Cache::open_memory().unwrap();
        cache.set("k", "old").unwrap();
        cache.set("k", "new").unwrap();
        assert_eq!(cache.get("k").unwrap().unwrap(), "new");
    }

    #[test]
    fn delete_missing_key_is_ok() {
        let cache = Cache::open_memory().unwrap();
        cache.delete("never-set").unwrap();
    }
}
