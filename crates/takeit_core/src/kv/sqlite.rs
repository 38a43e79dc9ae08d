//! SQLite-backed durable key-value store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite databases and create the `kv_entries` table.
//! - Serve get/set/delete without blocking the async runtime.
//!
//! # Invariants
//! - Returned stores carry `PRAGMA user_version = SCHEMA_VERSION`.
//! - A database written by a newer build is refused, never downgraded.
//! - All SQLite calls run on the blocking pool, one at a time per store.

use super::{KeyValueStore, KvError, KvResult};
use async_trait::async_trait;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Layout version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Durable store over one SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// Opens a SQLite database file and creates the entries table if needed.
    ///
    /// # Side effects
    /// - Creates the database file when missing.
    /// - Emits `kv_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Self::open_with("file", || Connection::open(path))
    }

    /// Opens a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> KvResult<Self> {
        Self::open_with("memory", Connection::open_in_memory)
    }

    fn open_with(
        mode: &str,
        connect: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> KvResult<Self> {
        let started_at = Instant::now();
        info!("event=kv_open module=kv status=start mode={mode}");

        let mut conn = connect().map_err(|err| {
            error!(
                "event=kv_open module=kv status=error mode={mode} duration_ms={} error_code=kv_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            KvError::from(err)
        })?;

        if let Err(err) = bootstrap_connection(&mut conn) {
            error!(
                "event=kv_open module=kv status=error mode={mode} duration_ms={} error_code=kv_bootstrap_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }

        info!(
            "event=kv_open module=kv status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> KvResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> KvResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| KvError::Worker("sqlite connection lock poisoned".to_string()))?;
            op(&guard)
        })
        .await?
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])?;
            Ok(())
        })
        .await
    }
}

fn bootstrap_connection(conn: &mut Connection) -> KvResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_schema(conn)
}

fn ensure_schema(conn: &mut Connection) -> KvResult<()> {
    let db_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if db_version > SCHEMA_VERSION {
        return Err(KvError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if db_version == SCHEMA_VERSION {
        return Ok(());
    }

    // Version 0 is either a fresh file or one created before versioning.
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;
    info!("event=kv_schema module=kv status=ok version={SCHEMA_VERSION} from={db_version}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, SqliteKvStore, SCHEMA_VERSION};
    use crate::kv::KeyValueStore;
    use rusqlite::Connection;

    #[test]
    fn unversioned_table_is_adopted_without_losing_entries() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE kv_entries (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL,
                 updated_at INTEGER NOT NULL DEFAULT 0);
             INSERT INTO kv_entries (key, value) VALUES ('items_storage', '[]');",
        )
        .unwrap();

        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();

        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        let value: String = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = 'items_storage';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
        assert_eq!(value, "[]");
    }

    #[tokio::test]
    async fn in_memory_store_overwrites_and_deletes() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.set("items_storage", "[]".to_string()).await.unwrap();
        store
            .set("items_storage", "[{}]".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("items_storage").await.unwrap().as_deref(),
            Some("[{}]")
        );

        store.delete("items_storage").await.unwrap();
        assert_eq!(store.get("items_storage").await.unwrap(), None);
    }
}
