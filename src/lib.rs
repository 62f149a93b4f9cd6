//! # Locally
//!
//! Account and session core for the Locally demo, a marketplace that
//! connects performers, venues and locals. Registered accounts and the
//! logged-in snapshot are kept in a small key-value store; pages ask it who
//! is logged in and where to send them.
//!
//! ## Modules
//!
//! - [`storage`]: State backends (memory, JSON files, SQLite)
//! - [`account`]: Account store, session accessor and the auth facade
//! - [`navigation`]: Page gate, landing pages, feed preference
//! - [`matching`]: Role-based match candidates
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use locally::account::{Account, AuthService, Role};
//! use locally::storage::{open_backend, BackendKind, StorageConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = open_backend(&StorageConfig::new(BackendKind::File, "./data"))?;
//!     let auth = AuthService::new(&*backend);
//!
//!     let landing = auth.sign_up(
//!         Account::new("sam", "pw1", Role::Performer).field("genre", "Jazz"),
//!     )?;
//!     println!("Welcome {}, go to {}", landing.account.display_name(), landing.page);
//!
//!     auth.log_out()?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod config;
pub mod matching;
pub mod navigation;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    open_backend, BackendKind, FileBackend, MemoryBackend, SqliteBackend, StateBackend,
    StorageConfig, StorageError, StorageKey, StorageResult,
};

pub use account::{
    Account, AccountError, AccountResult, AccountStore, AuthService, Landing, Role,
    SessionAccessor,
};

pub use navigation::{gate, gate_path, landing_page, Access, FeedPreference, FeedSelection, Page};

pub use matching::match_candidates;

pub use config::{
    Config, ConfigError, LoggingConfig, StorageConfig as ConfigStorageConfig,
};
