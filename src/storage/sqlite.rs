//! SQLite state backend
//!
//! Stores every key as a row of a single `state` table:
//!
//! ```text
//! key TEXT PRIMARY KEY | value TEXT
//! ```
//!
//! The connection sits behind a `std::sync::Mutex` because
//! `rusqlite::Connection` is not `Sync`.

use crate::storage::backend::{StateBackend, StorageKey};
use crate::storage::error::{StorageError, StorageResult};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed state store
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteBackend {
    /// Create or open the database at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS state (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;

        tracing::debug!("Opened sqlite state at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire sqlite lock: {}", e)))
    }
}

impl StateBackend for SqliteBackend {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM state WHERE key = ?",
                params![key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO state (key, value) VALUES (?, ?)",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM state WHERE key = ?", params![key.as_str()])?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("path", &self.path)
            .finish()
    }
}
