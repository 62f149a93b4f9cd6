//! Locally State Storage
//!
//! Everything the app persists lives behind one small key-value surface:
//!
//! - **backend**: the `StateBackend` trait and the named keys
//! - **memory**: in-process map, used by tests and `backend = "memory"`
//! - **file**: one JSON file per key in a data directory
//! - **sqlite**: a single `state` table in `locally.db`
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! accounts         → JSON array of account objects
//! current_session  → JSON account object (absent when logged out)
//! feed_selection   → JSON string ("for-you")
//! ```
//!
//! # Example
//!
//! ```rust
//! use locally::storage::{MemoryBackend, StateBackend, StorageKey};
//!
//! let backend = MemoryBackend::new();
//! backend.save(StorageKey::FeedSelection, "\"for-you\"").unwrap();
//! assert!(backend.load(StorageKey::FeedSelection).unwrap().is_some());
//! ```

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod sqlite;

// Re-export commonly used types
pub use backend::{
    load_json, load_json_lenient, open_backend, save_json, BackendKind, StateBackend,
    StorageConfig, StorageKey,
};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
