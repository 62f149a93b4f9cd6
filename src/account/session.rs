//! Session Accessor
//!
//! The session is a full copy of the logged-in account stored under
//! `current_session`. It is `Absent` until a successful login, and goes
//! back to `Absent` on logout. Logging in again overwrites it.

use crate::account::types::Account;
use crate::storage::{load_json_lenient, save_json, StateBackend, StorageKey, StorageResult};

/// Read/write access to the current-account snapshot
#[derive(Debug, Clone)]
pub struct SessionAccessor<B> {
    backend: B,
}

impl<B: StateBackend> SessionAccessor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The logged-in account, if any
    pub fn current_account(&self) -> Option<Account> {
        load_json_lenient(&self.backend, StorageKey::CurrentSession)
    }

    /// Whether a session is active
    pub fn is_active(&self) -> bool {
        self.current_account().is_some()
    }

    /// Replace the snapshot with a copy of `account`
    pub fn start_session(&self, account: &Account) -> StorageResult<()> {
        save_json(&self.backend, StorageKey::CurrentSession, account)?;
        tracing::info!("Session started for {}", account.username);
        Ok(())
    }

    /// Drop the snapshot. Calling this with no session is a no-op.
    pub fn end_session(&self) -> StorageResult<()> {
        self.backend.remove(StorageKey::CurrentSession)?;
        tracing::info!("Session ended");
        Ok(())
    }
}
