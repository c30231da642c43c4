use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{KeyValueBackend, StorageError};

pub type DbConnection = Arc<Mutex<Connection>>;

/// Key/value backend on a single SQLite table
pub struct SqliteBackend {
    connection: DbConnection,
}

/// Returns the path to the storage database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/edufinance/storage.sqlite`
/// - **Linux**: `~/.local/share/edufinance/storage.sqlite`
/// - **Windows**: `%LOCALAPPDATA%\edufinance\storage.sqlite`
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("edufinance").join("storage.sqlite"))
}

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    tracing::debug!("Storage migrations completed");
    Ok(())
}

impl SqliteBackend {
    /// Open (creating if needed) the database file and run migrations
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        run_migrations(&conn)?;

        tracing::info!("Storage opened at {}", db_path.display());
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.connection
            .lock()
            .map_err(|_| StorageError::Backend("storage connection lock poisoned".to_string()))
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row_result in rows {
            keys.push(row_result?);
        }

        Ok(keys)
    }

    fn total_bytes(&self) -> Result<usize, StorageError> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv_store",
            [],
            |row| row.get(0),
        )?;
        Ok(total.max(0) as usize)
    }
}
