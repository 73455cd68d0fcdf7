//! Login and identity resolution
//!
//! Orchestrates the credential store, password verifier and token service.
//! The only mutation this service ever performs is the one-time bootstrap
//! insert of the default administrator.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::auth::jwt::{create_token, verify_token, JwtConfig};
use crate::auth::password::{hash_password, hash_password_with_cost, verify_password};
use crate::domain::{CredentialStore, DomainError, User, UserRole};

/// Fixed credential pair that bootstraps the default administrator on
/// first use
const BOOTSTRAP_USERNAME: &str = "admin";
const BOOTSTRAP_PASSWORD: &str = "admin";

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// No record for the supplied username
    #[error("user not found")]
    NotFound,
    /// Password did not verify against the stored digest
    #[error("incorrect password")]
    BadCredentials,
    /// Signature, structure, expiry or subject-lookup failure
    #[error("invalid authentication token")]
    InvalidToken,
    /// The account exists but is disabled
    #[error("account is disabled")]
    AccountDisabled,
    /// The credential store is unreachable
    #[error("credential store unavailable: {0}")]
    Store(String),
}

impl From<DomainError> for AuthError {
    fn from(e: DomainError) -> Self {
        Self::Store(e.to_string())
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Authenticator: login and per-request identity resolution
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_config: JwtConfig,
    bcrypt_cost: Option<u32>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_config: JwtConfig) -> Self {
        Self {
            store,
            jwt_config,
            bcrypt_cost: None,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: Option<u32>) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Authenticate by username + password and return a bearer token.
    ///
    /// The very first `admin`/`admin` login creates the administrator
    /// record; afterwards the stored record is authoritative. The disabled
    /// flag is deliberately NOT checked here: a disabled account can still
    /// obtain a token but fails at [`Self::resolve_identity`].
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResult, AuthError> {
        let mut user = self.store.find_by_username(username).await?;

        if user.is_none() && username == BOOTSTRAP_USERNAME && password == BOOTSTRAP_PASSWORD {
            user = Some(self.bootstrap_admin().await?);
        }

        let Some(user) = user else {
            return Err(AuthError::NotFound);
        };

        // Every account, the administrator included, is checked against its
        // stored digest. Malformed digests verify as false.
        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AuthError::BadCredentials);
        }

        let token = create_token(&user.username, &self.jwt_config)
            .map_err(|e| AuthError::Store(format!("failed to sign token: {e}")))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Resolve the account behind a bearer token.
    ///
    /// A missing subject record is reported exactly like a bad signature,
    /// so callers cannot tell which stage rejected the token.
    pub async fn resolve_identity(&self, token: &str) -> Result<User, AuthError> {
        let claims =
            verify_token(token, &self.jwt_config).map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .store
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if user.disabled {
            return Err(AuthError::AccountDisabled);
        }

        Ok(user)
    }

    /// Create the default administrator record.
    ///
    /// Goes through the store's atomic insert-if-absent: when two first
    /// logins race, one insert wins and both logins proceed with the
    /// winner's record.
    async fn bootstrap_admin(&self) -> Result<User, AuthError> {
        let password_hash = match self.bcrypt_cost {
            Some(cost) => hash_password_with_cost(BOOTSTRAP_PASSWORD, cost),
            None => hash_password(BOOTSTRAP_PASSWORD),
        }
        .map_err(|e| AuthError::Store(format!("failed to hash bootstrap password: {e}")))?;

        let now = Utc::now();
        let admin = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: BOOTSTRAP_USERNAME.to_string(),
            password_hash,
            role: UserRole::Admin,
            disabled: false,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert_if_absent(admin).await?;
        info!(user_id = %stored.id, "Default admin account bootstrapped");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::domain::DomainResult;

    /// In-memory credential store; insert-if-absent is atomic under the lock
    #[derive(Default)]
    struct MemoryCredentialStore {
        users: Mutex<HashMap<String, User>>,
    }

    #[async_trait]
    impl CredentialStore for MemoryCredentialStore {
        async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
            Ok(self.users.lock().await.get(username).cloned())
        }

        async fn insert_if_absent(&self, user: User) -> DomainResult<User> {
            let mut users = self.users.lock().await;
            let stored = users
                .entry(user.username.clone())
                .or_insert(user)
                .clone();
            Ok(stored)
        }
    }

    fn service() -> (Arc<MemoryCredentialStore>, AuthService) {
        let store = Arc::new(MemoryCredentialStore::default());
        let jwt = JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "medequip-service".to_string(),
        };
        // minimum bcrypt cost keeps the tests fast
        let svc = AuthService::new(store.clone(), jwt).with_bcrypt_cost(Some(4));
        (store, svc)
    }

    async fn seed_user(store: &MemoryCredentialStore, username: &str, password: &str, disabled: bool) {
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hash_password_with_cost(password, 4).unwrap(),
            role: UserRole::User,
            disabled,
            created_at: now,
            updated_at: now,
        };
        store.insert_if_absent(user).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (_store, svc) = service();
        let err = svc.login("nobody", "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn unknown_admin_with_wrong_password_is_not_found() {
        // bootstrap only triggers on the exact credential pair
        let (store, svc) = service();
        let err = svc.login("admin", "not-admin").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
        assert!(store.users.lock().await.is_empty());
    }

    #[tokio::test]
    async fn first_admin_login_bootstraps_once() {
        let (store, svc) = service();

        let first = svc.login("admin", "admin").await.unwrap();
        assert_eq!(first.user.username, "admin");
        assert_eq!(first.user.role, UserRole::Admin);
        assert!(!first.user.disabled);
        assert_eq!(first.token_type, "Bearer");

        let second = svc.login("admin", "admin").await.unwrap();
        assert_eq!(second.user.id, first.user.id);
        assert_eq!(store.users.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_bootstrap_creates_single_record() {
        let (store, svc) = service();
        let svc = Arc::new(svc);

        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.login("admin", "admin").await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.login("admin", "admin").await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a.user.id, b.user.id);
        assert_eq!(store.users.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn existing_admin_uses_stored_hash() {
        let (store, svc) = service();
        svc.login("admin", "admin").await.unwrap();

        // after bootstrap the stored digest is authoritative
        let err = svc.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
        assert_eq!(store.users.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn regular_user_login_verifies_hash() {
        let (store, svc) = service();
        seed_user(&store, "alice", "s3cret", false).await;

        let ok = svc.login("alice", "s3cret").await.unwrap();
        assert_eq!(ok.user.username, "alice");

        let err = svc.login("alice", "s3cre7").await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn login_ignores_disabled_flag() {
        // disabled accounts fail at identity resolution, not at login
        let (store, svc) = service();
        seed_user(&store, "mallory", "pw", true).await;

        let result = svc.login("mallory", "pw").await.unwrap();

        let err = svc.resolve_identity(&result.token).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled));
    }

    #[tokio::test]
    async fn resolve_identity_round_trips() {
        let (store, svc) = service();
        seed_user(&store, "alice", "s3cret", false).await;

        let result = svc.login("alice", "s3cret").await.unwrap();
        let user = svc.resolve_identity(&result.token).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn resolve_identity_rejects_garbage() {
        let (_store, svc) = service();
        let err = svc.resolve_identity("not-a-token").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn missing_subject_record_reads_as_invalid_token() {
        let (store, svc) = service();
        seed_user(&store, "alice", "s3cret", false).await;
        let result = svc.login("alice", "s3cret").await.unwrap();

        store.users.lock().await.clear();

        let err = svc.resolve_identity(&result.token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
