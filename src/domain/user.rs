//! User model and the credential store contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainResult;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// A principal able to authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Unique, case-sensitive, immutable key
    pub username: String,
    /// bcrypt digest, never the plaintext
    pub password_hash: String,
    pub role: UserRole,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Credential store contract
///
/// `insert_if_absent` must be atomic on `username`: when two inserts race,
/// exactly one record survives and both callers receive it.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Insert `user` unless a record with the same username already exists;
    /// returns the stored record either way.
    async fn insert_if_absent(&self, user: User) -> DomainResult<User>;
}
