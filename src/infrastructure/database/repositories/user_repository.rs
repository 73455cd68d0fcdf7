use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{CredentialStore, DomainError, DomainResult, User, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmCredentialStore {
    db: DatabaseConnection,
}

impl SeaOrmCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        disabled: model.disabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn insert_if_absent(&self, new_user: User) -> DomainResult<User> {
        let username = new_user.username.clone();

        let active = user::ActiveModel {
            id: Set(new_user.id),
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            role: Set(domain_role_to_entity(new_user.role)),
            disabled: Set(new_user.disabled),
            created_at: Set(new_user.created_at),
            updated_at: Set(new_user.updated_at),
        };

        match active.insert(&self.db).await {
            Ok(model) => Ok(user_model_to_domain(model)),
            // The unique index on username decided the race: re-read the
            // winner's record and hand it back.
            Err(e) if is_unique_violation(&e) => self
                .find_by_username(&username)
                .await?
                .ok_or_else(|| DomainError::Conflict(format!("username taken: {username}"))),
            Err(e) => Err(db_err(e)),
        }
    }
}
