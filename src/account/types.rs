//! Core data types for accounts
//!
//! - `Role`: which side of the marketplace an account is on
//! - `Account`: credentials, role and free-form profile fields

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Marketplace role of an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Musicians, bands, acts looking for gigs
    Performer,
    /// Bars, cafes, clubs looking for acts
    Venue,
    /// Residents browsing what's on nearby
    Local,
}

impl Role {
    /// Get all roles for iteration
    pub fn all() -> &'static [Role] {
        &[Role::Performer, Role::Venue, Role::Local]
    }

    /// Profile fields collected by this role's sign-up form
    pub fn profile_fields(&self) -> &'static [&'static str] {
        match self {
            Role::Venue => &[
                "name",
                "venueType",
                "location",
                "budget",
                "preferredAct",
                "genre",
                "atmosphere",
            ],
            Role::Performer => &[
                "firstName",
                "lastName",
                "stageName",
                "location",
                "performerType",
                "genre",
                "preferredVenue",
                "atmosphere",
                "charge",
            ],
            Role::Local => &["firstName", "lastName", "location"],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Performer => write!(f, "performer"),
            Role::Venue => write!(f, "venue"),
            Role::Local => write!(f, "local"),
        }
    }
}

/// A role name that is not `performer`, `venue` or `local`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}` (expected performer, venue or local)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "performer" => Ok(Role::Performer),
            "venue" => Ok(Role::Venue),
            "local" => Ok(Role::Local),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// A registered identity
///
/// Profile fields are opaque strings stored inline next to the credentials,
/// e.g. `{"username":"sam","password":"pw1","role":"performer","genre":"Jazz"}`,
/// in the order they were set. They can only be set through [`Account::field`],
/// which keeps them from shadowing `username`, `password` or `role`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    /// Stored and compared verbatim
    pub password: String,
    pub role: Role,
    #[serde(flatten)]
    profile: IndexMap<String, String>,
}

const RESERVED_FIELDS: &[&str] = &["username", "password", "role"];

impl Account {
    /// Create an account with no profile fields
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
            profile: IndexMap::new(),
        }
    }

    /// Builder method: set a profile field
    ///
    /// Keys that collide with the credential fields are ignored.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            tracing::warn!("Ignoring profile field `{}` on account {}", key, self.username);
            return self;
        }
        self.profile.insert(key, value.into());
        self
    }

    /// Get a profile field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.profile.get(key).map(String::as_str)
    }

    /// Profile fields in the order they were set
    pub fn profile(&self) -> impl Iterator<Item = (&str, &str)> {
        self.profile.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Name to show on cards and nav bars
    ///
    /// Venues use `name`, everyone else `firstName lastName`. Falls back
    /// to the username when those are missing or blank.
    pub fn display_name(&self) -> String {
        let name = match self.role {
            Role::Venue => self.get("name").unwrap_or_default().trim().to_string(),
            Role::Performer | Role::Local => {
                let first = self.get("firstName").unwrap_or_default().trim();
                let last = self.get("lastName").unwrap_or_default().trim();
                format!("{} {}", first, last).trim().to_string()
            }
        };

        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }

    /// Upper-cased first letter of the username, shown as the avatar
    pub fn initial(&self) -> Option<char> {
        self.username.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Venue).unwrap(), "\"venue\"");
        let role: Role = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(role, Role::Local);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Performer".parse::<Role>().unwrap(), Role::Performer);
        assert_eq!(
            "dj".parse::<Role>(),
            Err(UnknownRole("dj".to_string()))
        );
    }

    #[test]
    fn test_account_json_layout() {
        let account = Account::new("sam", "pw1", Role::Performer)
            .field("genre", "Jazz")
            .field("charge", "200-400");

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["username"], "sam");
        assert_eq!(value["password"], "pw1");
        assert_eq!(value["role"], "performer");
        assert_eq!(value["genre"], "Jazz");
        assert_eq!(value["charge"], "200-400");
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let json = r#"{"username":"blue","password":"x","role":"venue","name":"Blue Note Cafe","venueType":"Cafe"}"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert_eq!(account.get("venueType"), Some("Cafe"));
        let back: Account = serde_json::from_str(&serde_json::to_string(&account).unwrap()).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_reserved_field_ignored() {
        let account = Account::new("sam", "pw1", Role::Local).field("password", "other");
        assert_eq!(account.password, "pw1");
        assert_eq!(account.profile().count(), 0);
    }

    #[test]
    fn test_reserved_fields_never_serialized_twice() {
        let account = Account::new("sam", "pw1", Role::Performer)
            .field("role", "venue")
            .field("username", "kim")
            .field("genre", "Jazz");

        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json.matches("\"role\"").count(), 1);
        assert_eq!(json.matches("\"username\"").count(), 1);

        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, Role::Performer);
        assert_eq!(back.username, "sam");
        assert_eq!(back.get("genre"), Some("Jazz"));
    }

    #[test]
    fn test_field_order_preserved() {
        let json = r#"{"username":"blue","password":"x","role":"venue","venueType":"Cafe","name":"Blue Note Cafe","atmosphere":"Cozy","budget":"200-400"}"#;
        let account: Account = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = account.profile().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["venueType", "name", "atmosphere", "budget"]);
        assert_eq!(serde_json::to_string(&account).unwrap(), json);
    }

    #[test]
    fn test_display_name() {
        let venue = Account::new("blue", "x", Role::Venue).field("name", "Blue Note Cafe");
        assert_eq!(venue.display_name(), "Blue Note Cafe");

        let performer = Account::new("maya", "x", Role::Performer)
            .field("firstName", "Maya")
            .field("lastName", "Alvarez");
        assert_eq!(performer.display_name(), "Maya Alvarez");

        let local = Account::new("kim", "x", Role::Local).field("firstName", "Kim");
        assert_eq!(local.display_name(), "Kim");

        let bare = Account::new("anon", "x", Role::Venue).field("name", "  ");
        assert_eq!(bare.display_name(), "anon");
    }

    #[test]
    fn test_initial() {
        assert_eq!(Account::new("sam", "x", Role::Local).initial(), Some('S'));
        assert_eq!(Account::new("", "x", Role::Local).initial(), None);
    }
}
