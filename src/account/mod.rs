//! Locally Accounts
//!
//! - **types**: `Account` and `Role`
//! - **store**: registered accounts (`accounts` key)
//! - **session**: the logged-in snapshot (`current_session` key)
//! - **service**: the facade the forms call
//! - **error**: Error types
//!
//! # Flow
//!
//! ```text
//! sign up:  register → verify_credentials → start_session → landing page
//! log in:   verify_credentials → start_session → landing page
//! log out:  end_session → index.html
//! ```
//!
//! # Example
//!
//! ```rust
//! use locally::account::{Account, AuthService, Role};
//! use locally::storage::MemoryBackend;
//! use std::sync::Arc;
//!
//! let auth = AuthService::new(Arc::new(MemoryBackend::new()));
//! auth.register(Account::new("sam", "pw1", Role::Performer)).unwrap();
//!
//! let account = auth.authenticate("sam", "pw1").unwrap();
//! assert_eq!(auth.current_account(), Some(account));
//!
//! auth.end_session().unwrap();
//! assert!(auth.current_account().is_none());
//! ```

pub mod error;
pub mod service;
pub mod session;
pub mod store;
pub mod types;

pub use error::{AccountError, AccountResult};
pub use service::{AuthService, Landing};
pub use session::SessionAccessor;
pub use store::AccountStore;
pub use types::{Account, Role, UnknownRole};
