//! The state backend abstraction
//!
//! Account and session code never touches a concrete store. It is handed a
//! `StateBackend` and reads/writes serialized values under a fixed set of
//! keys, so tests can swap in `MemoryBackend` and the binary can pick a
//! durable one from configuration.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::{FileBackend, MemoryBackend, SqliteBackend};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Named slots in the persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Every registered account, in registration order
    Accounts,
    /// Snapshot of the logged-in account
    CurrentSession,
    /// Local-home feed preference
    FeedSelection,
}

impl StorageKey {
    /// Get all keys for iteration
    pub fn all() -> &'static [StorageKey] {
        &[
            StorageKey::Accounts,
            StorageKey::CurrentSession,
            StorageKey::FeedSelection,
        ]
    }

    /// Name the key is stored under
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Accounts => "accounts",
            StorageKey::CurrentSession => "current_session",
            StorageKey::FeedSelection => "feed_selection",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable key-value surface holding serialized state.
///
/// Implementations must treat `remove` of an absent key as success.
pub trait StateBackend: Send + Sync {
    /// Read the raw value stored under `key`
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()>;

    /// Delete `key`
    fn remove(&self, key: StorageKey) -> StorageResult<()>;
}

impl<T: StateBackend + ?Sized> StateBackend for &T {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<T: StateBackend + ?Sized> StateBackend for Arc<T> {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<T: StateBackend + ?Sized> StateBackend for Box<T> {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Read and decode the JSON value under `key`
pub fn load_json<T, B>(backend: &B, key: StorageKey) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    B: StateBackend + ?Sized,
{
    match backend.load(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`
pub fn save_json<T, B>(backend: &B, key: StorageKey, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    B: StateBackend + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    backend.save(key, &raw)
}

/// Like `load_json`, but unreadable or malformed state counts as absent
pub fn load_json_lenient<T, B>(backend: &B, key: StorageKey) -> Option<T>
where
    T: DeserializeOwned,
    B: StateBackend + ?Sized,
{
    match load_json(backend, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring unreadable {} state: {}", key, e);
            None
        }
    }
}

/// Which backend implementation to open
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Nothing survives the process
    Memory,
    /// `<data_dir>/<key>.json`
    #[default]
    File,
    /// `<data_dir>/locally.db`
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(StorageError::Config(format!("unknown backend `{}`", other))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::File => write!(f, "file"),
            BackendKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Configuration for opening a backend
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend implementation
    pub kind: BackendKind,
    /// Root directory for all data
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::File,
            data_dir: PathBuf::from("locally_data"),
        }
    }
}

impl StorageConfig {
    pub fn new(kind: BackendKind, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            data_dir: data_dir.into(),
        }
    }

    /// Get path to the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("locally.db")
    }
}

/// Open the backend selected by `config`
pub fn open_backend(config: &StorageConfig) -> StorageResult<Box<dyn StateBackend>> {
    tracing::debug!("Opening {} backend at {:?}", config.kind, config.data_dir);

    let backend: Box<dyn StateBackend> = match config.kind {
        BackendKind::Memory => Box::new(MemoryBackend::new()),
        BackendKind::File => Box::new(FileBackend::open(&config.data_dir)?),
        BackendKind::Sqlite => Box::new(SqliteBackend::open(config.db_path())?),
    };

    Ok(backend)
}
