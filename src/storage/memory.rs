//! In-memory state backend
//!
//! Holds values in a `HashMap` for the life of the process.

use crate::storage::backend::{StateBackend, StorageKey};
use crate::storage::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local backend, the fake used by tests
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>> {
        self.values
            .lock()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire state lock: {}", e)))
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}
