//! Auth facade
//!
//! Pairs the account store with the session accessor behind the calls the
//! login, sign-up and logout forms make. `authenticate` is one step from the
//! caller's view: credentials are checked first, and the session is only
//! written when they match.

use crate::account::error::AccountResult;
use crate::account::session::SessionAccessor;
use crate::account::store::AccountStore;
use crate::account::types::Account;
use crate::navigation::{landing_page, Page};
use crate::storage::{StateBackend, StorageResult};

/// Where a form sends the user after a successful login or sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    pub account: Account,
    pub page: Page,
}

/// Account store and session over one shared backend
#[derive(Debug, Clone)]
pub struct AuthService<B> {
    accounts: AccountStore<B>,
    sessions: SessionAccessor<B>,
}

impl<B: StateBackend + Clone> AuthService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            accounts: AccountStore::new(backend.clone()),
            sessions: SessionAccessor::new(backend),
        }
    }
}

impl<B: StateBackend> AuthService<B> {
    pub fn list_accounts(&self) -> Vec<Account> {
        self.accounts.list_accounts()
    }

    pub fn register(&self, account: Account) -> AccountResult<()> {
        self.accounts.register(account)
    }

    /// Check credentials and make the matching account current.
    ///
    /// On failure the existing session is left as it was.
    pub fn authenticate(&self, username: &str, password: &str) -> AccountResult<Account> {
        let account = self.accounts.verify_credentials(username, password)?;
        self.sessions.start_session(&account)?;
        Ok(account)
    }

    pub fn current_account(&self) -> Option<Account> {
        self.sessions.current_account()
    }

    pub fn end_session(&self) -> StorageResult<()> {
        self.sessions.end_session()
    }

    /// Login form: authenticate and pick the landing page for the role
    pub fn log_in(&self, username: &str, password: &str) -> AccountResult<Landing> {
        let account = self.authenticate(username, password)?;
        let page = landing_page(account.role);
        Ok(Landing { account, page })
    }

    /// Sign-up form: register, log straight in, pick the landing page
    pub fn sign_up(&self, account: Account) -> AccountResult<Landing> {
        let username = account.username.clone();
        let password = account.password.clone();

        self.register(account)?;
        self.log_in(&username, &password)
    }

    /// Logout link: drop the session and return to the entry page
    pub fn log_out(&self) -> StorageResult<Page> {
        self.end_session()?;
        Ok(Page::Index)
    }
}
