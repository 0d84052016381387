//! Provisioned user registry.

use std::collections::HashMap;

use dirview_core::config::UserEntry;
use dirview_core::error::AppError;
use dirview_core::result::AppResult;

use crate::password::hasher::is_well_formed;

/// A provisioned principal. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique username.
    pub username: String,
    /// Encoded `base64(salt):base64(hash)`.
    pub password_hash: String,
}

impl UserRecord {
    /// Builds a record, rejecting an empty username or a hash that is not
    /// in the encoded form.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> AppResult<Self> {
        let username = username.into();
        let password_hash = password_hash.into();

        if username.is_empty() {
            return Err(AppError::configuration("User entry has an empty username"));
        }
        if !is_well_formed(&password_hash) {
            return Err(AppError::configuration(format!(
                "User '{username}' has a malformed password hash"
            )));
        }

        Ok(Self {
            username,
            password_hash,
        })
    }
}

/// Read-only lookup of users by name.
pub trait UserDirectory: Send + Sync {
    /// Returns the user named `username`, if provisioned.
    fn find(&self, username: &str) -> Option<&UserRecord>;

    /// Number of provisioned users.
    fn len(&self) -> usize;

    /// Whether the directory has no users.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory registry fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl StaticUserDirectory {
    /// Builds a directory from records. Duplicate usernames are rejected.
    pub fn new(records: Vec<UserRecord>) -> AppResult<Self> {
        let mut users = HashMap::with_capacity(records.len());
        for record in records {
            if users.contains_key(&record.username) {
                return Err(AppError::configuration(format!(
                    "Duplicate user '{}'",
                    record.username
                )));
            }
            users.insert(record.username.clone(), record);
        }
        Ok(Self { users })
    }

    /// Builds a directory from configuration entries.
    pub fn from_entries(entries: &[UserEntry]) -> AppResult<Self> {
        let records = entries
            .iter()
            .map(|e| UserRecord::new(e.username.clone(), e.password_hash.clone()))
            .collect::<AppResult<Vec<_>>>()?;
        Self::new(records)
    }

    /// The built-in demo registry: `alice` and `bob`, both with the
    /// password `password`.
    pub fn builtin() -> Self {
        let users = [
            (
                "alice",
                "yJg3w0gbQpVei0eHpVQJ9Q:Vm7sOUeOYCRxoye3oyFnOEXnOzmTiDAb2JzD4YYUEkA",
            ),
            (
                "bob",
                "AD2My0yV5W1IftJuXrjnnw:yrqh7B4FSIDjncTLbkXte/0KpTIyQtOt0llOTNUOjzE",
            ),
        ]
        .into_iter()
        .map(|(name, hash)| {
            (
                name.to_string(),
                UserRecord {
                    username: name.to_string(),
                    password_hash: hash.to_string(),
                },
            )
        })
        .collect();

        Self { users }
    }

    /// Usernames in the directory, sorted.
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl UserDirectory for StaticUserDirectory {
    fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}
