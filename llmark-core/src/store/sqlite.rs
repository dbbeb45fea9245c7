use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;

use crate::error::StoreError;

use super::KeyValueStore;

/// SQLite-backed [`KeyValueStore`]: a single `kv` table holding JSON text.
///
/// This is the on-disk adapter the CLI uses; the browsing surface talks to
/// the host's storage area instead. Values are stored as serialized JSON so
/// the file is inspectable with any sqlite shell.
#[derive(Debug)]
pub struct SqliteKv {
    conn: Mutex<Connection>,
}

impl SqliteKv {
    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock();
        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;
        // WAL is silently ignored for in-memory connections.
        let _ = conn.execute_batch("PRAGMA journal_mode = WAL;");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
             );",
        )?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("llmark store mutex poisoned")
    }

    fn read_raw(conn: &Connection, key: &str) -> Result<Option<Value>, StoreError> {
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.lock();
        Self::read_raw(&conn, key)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let conn = self.lock();
        let text = serde_json::to_string(&value)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, text],
        )?;
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let current = Self::read_raw(&tx, key)?;
        if current.as_ref() != expected {
            return Ok(false);
        }
        let text = serde_json::to_string(&new)?;
        tx.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, text],
        )?;
        tx.commit()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let kv = SqliteKv::in_memory().unwrap();
        assert_eq!(kv.get("llmarks").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_replaces_the_whole_value() {
        let kv = SqliteKv::in_memory().unwrap();
        kv.set("llmarks", json!([1, 2])).await.unwrap();
        kv.set("llmarks", json!([3])).await.unwrap();
        assert_eq!(kv.get("llmarks").await.unwrap(), Some(json!([3])));
    }

    #[tokio::test]
    async fn cas_rejects_a_stale_snapshot() {
        let kv = SqliteKv::in_memory().unwrap();
        kv.set("k", json!("a")).await.unwrap();
        let stale = json!("z");
        assert!(!kv.compare_and_swap("k", Some(&stale), json!("b")).await.unwrap());
        let fresh = json!("a");
        assert!(kv.compare_and_swap("k", Some(&fresh), json!("b")).await.unwrap());
        assert_eq!(kv.get("k").await.unwrap(), Some(json!("b")));
    }

    #[tokio::test]
    async fn values_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marks.db");
        {
            let kv = SqliteKv::open(&path).unwrap();
            kv.set("llmarks", json!([{"id": 1, "title": "kept"}]))
                .await
                .unwrap();
        }
        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(
            kv.get("llmarks").await.unwrap(),
            Some(json!([{"id": 1, "title": "kept"}]))
        );
    }
}
