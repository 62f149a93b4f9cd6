//! File state backend - one JSON file per key
//!
//! Each key maps to `<data_dir>/<key>.json`. Values are written with a
//! plain `fs::write`; a crash mid-write can leave a truncated file, which
//! readers then treat as missing data.

use crate::storage::backend::{StateBackend, StorageKey};
use crate::storage::error::StorageResult;
use std::path::{Path, PathBuf};

/// Directory-backed state store
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a backend rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    /// Get the data directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StateBackend for FileBackend {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        tracing::debug!("Writing {} ({} bytes) to {:?}", key, value.len(), path);
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
