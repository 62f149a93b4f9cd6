//! Account Store
//!
//! Durable, insertion-ordered collection of registered accounts kept under
//! the `accounts` key. Nothing is cached: every call re-reads the backend,
//! so two stores sharing one backend always agree.
//!
//! `register` checks uniqueness and then writes, with no lock in between.
//! Two processes registering the same username at the same moment can both
//! succeed.

use crate::account::error::{AccountError, AccountResult};
use crate::account::types::Account;
use crate::storage::{
    load_json, load_json_lenient, save_json, StateBackend, StorageError, StorageKey,
};

/// Registered accounts over a state backend
#[derive(Debug, Clone)]
pub struct AccountStore<B> {
    backend: B,
}

impl<B: StateBackend> AccountStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// All registered accounts, in registration order.
    ///
    /// Missing or malformed state yields an empty list.
    pub fn list_accounts(&self) -> Vec<Account> {
        load_json_lenient(&self.backend, StorageKey::Accounts).unwrap_or_default()
    }

    /// Find an account by exact username
    pub fn find(&self, username: &str) -> Option<Account> {
        self.list_accounts()
            .into_iter()
            .find(|a| a.username == username)
    }

    /// Accounts to append to.
    ///
    /// Malformed state starts a fresh list, but a failed read is returned:
    /// writing after one would drop every stored account.
    fn load_for_update(&self) -> AccountResult<Vec<Account>> {
        match load_json(&self.backend, StorageKey::Accounts) {
            Ok(accounts) => Ok(accounts.unwrap_or_default()),
            Err(StorageError::Serialization(e)) => {
                tracing::warn!("Replacing malformed accounts state: {}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Append a new account
    pub fn register(&self, account: Account) -> AccountResult<()> {
        let mut accounts = self.load_for_update()?;

        if accounts.iter().any(|a| a.username == account.username) {
            tracing::debug!("Rejected registration for taken username {}", account.username);
            return Err(AccountError::UsernameTaken);
        }

        tracing::info!("Registered {} account {}", account.role, account.username);
        accounts.push(account);
        save_json(&self.backend, StorageKey::Accounts, &accounts)?;

        Ok(())
    }

    /// Look up the account matching both fields exactly.
    ///
    /// Pure lookup; the session is not touched.
    pub fn verify_credentials(&self, username: &str, password: &str) -> AccountResult<Account> {
        self.list_accounts()
            .into_iter()
            .find(|a| a.username == username && a.password == password)
            .ok_or(AccountError::InvalidCredentials)
    }

    /// Number of registered accounts
    pub fn count(&self) -> usize {
        self.list_accounts().len()
    }
}
