//! Page routing around the session
//!
//! Pages themselves are rendered elsewhere; this module only answers the
//! questions every page asks of the account core:
//!
//! - may this visitor see this page, or should they go to the entry page?
//! - where does an account land after login or sign-up?
//! - which local-home feed did the visitor pick last?

use crate::account::{Account, Role};
use crate::storage::{load_json_lenient, save_json, StateBackend, StorageKey, StorageResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every page of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Login form
    Index,
    SignUp,
    SignUpPerformer,
    SignUpVenue,
    SignUpLocal,
    /// Performer/venue home
    Home,
    LocalHome,
    Following,
    Messages,
    Calendar,
    Match,
    Discover,
    Manage,
    Post,
    NearMe,
    Search,
}

impl Page {
    /// Get all pages for iteration
    pub fn all() -> &'static [Page] {
        &[
            Page::Index,
            Page::SignUp,
            Page::SignUpPerformer,
            Page::SignUpVenue,
            Page::SignUpLocal,
            Page::Home,
            Page::LocalHome,
            Page::Following,
            Page::Messages,
            Page::Calendar,
            Page::Match,
            Page::Discover,
            Page::Manage,
            Page::Post,
            Page::NearMe,
            Page::Search,
        ]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::SignUp => "signup.html",
            Page::SignUpPerformer => "signup_performer.html",
            Page::SignUpVenue => "signup_venue.html",
            Page::SignUpLocal => "signup_local.html",
            Page::Home => "home.html",
            Page::LocalHome => "local_home.html",
            Page::Following => "following.html",
            Page::Messages => "messages.html",
            Page::Calendar => "calendar.html",
            Page::Match => "match.html",
            Page::Discover => "discover.html",
            Page::Manage => "manage.html",
            Page::Post => "post.html",
            Page::NearMe => "near_me.html",
            Page::Search => "search.html",
        }
    }

    /// Reachable without a session
    pub fn is_entry(&self) -> bool {
        matches!(
            self,
            Page::Index
                | Page::SignUp
                | Page::SignUpPerformer
                | Page::SignUpVenue
                | Page::SignUpLocal
        )
    }

    /// Sign-up form for a role
    pub fn sign_up_for(role: Role) -> Page {
        match role {
            Role::Performer => Page::SignUpPerformer,
            Role::Venue => Page::SignUpVenue,
            Role::Local => Page::SignUpLocal,
        }
    }

    /// Resolve the last path segment of a URL or path, ignoring any
    /// `#fragment` or `?query`. `.html` is optional.
    pub fn from_path(path: &str) -> Option<Page> {
        let path = path.split(&['#', '?'][..]).next().unwrap_or_default();
        let last = path.rsplit('/').next().unwrap_or_default();
        let stem = last.strip_suffix(".html").unwrap_or(last);

        Page::all()
            .iter()
            .copied()
            .find(|p| p.file_name().strip_suffix(".html") == Some(stem))
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Outcome of the page-load check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Page),
}

/// Decide whether a visitor may stay on `page`
pub fn gate(current: Option<&Account>, page: Page) -> Access {
    if current.is_some() || page.is_entry() {
        Access::Allow
    } else {
        Access::Redirect(Page::Index)
    }
}

/// Same as [`gate`] for a raw path; unknown paths count as protected
pub fn gate_path(current: Option<&Account>, path: &str) -> Access {
    match Page::from_path(path) {
        Some(page) => gate(current, page),
        None if current.is_some() => Access::Allow,
        None => Access::Redirect(Page::Index),
    }
}

/// Where an account goes after login or sign-up
pub fn landing_page(role: Role) -> Page {
    match role {
        Role::Local => Page::LocalHome,
        Role::Performer | Role::Venue => Page::Home,
    }
}

/// Local-home feed tab
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FeedSelection {
    #[default]
    ForYou,
    Following,
}

impl FromStr for FeedSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "for-you" => Ok(FeedSelection::ForYou),
            "following" => Ok(FeedSelection::Following),
            other => Err(format!("unknown feed `{}` (expected for-you or following)", other)),
        }
    }
}

impl std::fmt::Display for FeedSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSelection::ForYou => write!(f, "for-you"),
            FeedSelection::Following => write!(f, "following"),
        }
    }
}

/// Persisted feed preference
#[derive(Debug, Clone)]
pub struct FeedPreference<B> {
    backend: B,
}

impl<B: StateBackend> FeedPreference<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Last stored selection, `for-you` when unset or unreadable
    pub fn selection(&self) -> FeedSelection {
        load_json_lenient(&self.backend, StorageKey::FeedSelection).unwrap_or_default()
    }

    /// Switch tabs and return the page to show.
    ///
    /// `following` has its own page and is not remembered.
    pub fn switch(&self, selection: FeedSelection) -> StorageResult<Page> {
        match selection {
            FeedSelection::Following => Ok(Page::Following),
            FeedSelection::ForYou => {
                save_json(&self.backend, StorageKey::FeedSelection, &selection)?;
                Ok(Page::LocalHome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn test_page_from_path() {
        assert_eq!(Page::from_path("index.html"), Some(Page::Index));
        assert_eq!(Page::from_path("/app/local_home.html"), Some(Page::LocalHome));
        assert_eq!(Page::from_path("manage.html#profile"), Some(Page::Manage));
        assert_eq!(Page::from_path("near_me"), Some(Page::NearMe));
        assert_eq!(Page::from_path("nowhere.html"), None);
        assert_eq!(Page::from_path(""), None);
    }

    #[test]
    fn test_file_names_round_trip() {
        for page in Page::all() {
            assert_eq!(Page::from_path(page.file_name()), Some(*page));
        }
    }

    #[test]
    fn test_entry_pages() {
        let entry: Vec<Page> = Page::all().iter().copied().filter(Page::is_entry).collect();
        assert_eq!(
            entry,
            vec![
                Page::Index,
                Page::SignUp,
                Page::SignUpPerformer,
                Page::SignUpVenue,
                Page::SignUpLocal
            ]
        );
    }

    #[test]
    fn test_gate() {
        let sam = Account::new("sam", "pw1", Role::Performer);

        assert_eq!(gate(None, Page::Index), Access::Allow);
        assert_eq!(gate(None, Page::SignUpVenue), Access::Allow);
        assert_eq!(gate(None, Page::Match), Access::Redirect(Page::Index));
        assert_eq!(gate(Some(&sam), Page::Match), Access::Allow);
        assert_eq!(gate(Some(&sam), Page::Index), Access::Allow);
    }

    #[test]
    fn test_gate_unknown_path() {
        let sam = Account::new("sam", "pw1", Role::Performer);

        assert_eq!(gate_path(None, "secret.html"), Access::Redirect(Page::Index));
        assert_eq!(gate_path(Some(&sam), "secret.html"), Access::Allow);
        assert_eq!(gate_path(None, "/signup.html"), Access::Allow);
    }

    #[test]
    fn test_sign_up_for_role() {
        assert_eq!(Page::sign_up_for(Role::Performer), Page::SignUpPerformer);
        assert_eq!(Page::sign_up_for(Role::Venue), Page::SignUpVenue);
        assert_eq!(Page::sign_up_for(Role::Local), Page::SignUpLocal);

        for role in Role::all() {
            let page = Page::sign_up_for(*role);
            assert!(page.is_entry());
            assert_eq!(gate(None, page), Access::Allow);
        }
    }

    #[test]
    fn test_landing_page() {
        assert_eq!(landing_page(Role::Local), Page::LocalHome);
        assert_eq!(landing_page(Role::Performer), Page::Home);
        assert_eq!(landing_page(Role::Venue), Page::Home);
    }

    #[test]
    fn test_feed_default_and_switch() {
        let backend = MemoryBackend::new();
        let feed = FeedPreference::new(&backend);

        assert_eq!(feed.selection(), FeedSelection::ForYou);
        assert_eq!(feed.switch(FeedSelection::ForYou).unwrap(), Page::LocalHome);
        assert_eq!(
            backend.load(StorageKey::FeedSelection).unwrap().as_deref(),
            Some("\"for-you\"")
        );
    }

    #[test]
    fn test_following_is_not_persisted() {
        let backend = MemoryBackend::new();
        let feed = FeedPreference::new(&backend);

        assert_eq!(feed.switch(FeedSelection::Following).unwrap(), Page::Following);
        assert!(backend.load(StorageKey::FeedSelection).unwrap().is_none());
        assert_eq!(feed.selection(), FeedSelection::ForYou);
    }

    #[test]
    fn test_malformed_feed_falls_back() {
        let backend = MemoryBackend::new();
        backend.save(StorageKey::FeedSelection, "\"trending\"").unwrap();

        assert_eq!(FeedPreference::new(&backend).selection(), FeedSelection::ForYou);
    }

    #[test]
    fn test_feed_parse() {
        assert_eq!("following".parse::<FeedSelection>(), Ok(FeedSelection::Following));
        assert!("trending".parse::<FeedSelection>().is_err());
    }
}
