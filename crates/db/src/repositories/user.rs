//! User repository: registration and account resolution.
//!
//! Doubles as the user directory for the transfer flow, resolving a user
//! id or username to the account it owns.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::{AccountRepository, is_unique_violation};
use crate::entities::{accounts, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Username already taken.
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A user together with the account it owns.
#[derive(Debug, Clone)]
pub struct UserWithAccount {
    /// The user record.
    pub user: users::Model,
    /// The user's account.
    pub account: accounts::Model,
}

/// User repository for registration and lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new user with a zero-balance account.
    ///
    /// The user row and its account are created in one transaction, so a
    /// user without an account is never observable.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateUsername` if the username is taken.
    pub async fn register(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<users::Model, UserError> {
        if self.username_exists(username).await? {
            return Err(UserError::DuplicateUsername(username.to_string()));
        }

        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // A concurrent registration can still slip past the exists check;
        // the unique constraint is the authority.
        let user = match user.insert(&txn).await {
            Ok(u) => u,
            Err(e) if is_unique_violation(&e) => {
                return Err(UserError::DuplicateUsername(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        AccountRepository::create_in(&txn, user.id).await?;

        txn.commit().await?;
        info!(user_id = %user.id, username = %user.username, "user registered");

        Ok(user)
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, UserError> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(UserError::from)
    }

    /// Resolves a user id to the user and its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_with_account_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserWithAccount>, UserError> {
        let result = users::Entity::find_by_id(user_id)
            .find_also_related(accounts::Entity)
            .one(&self.db)
            .await?;

        Ok(result.and_then(|(user, account)| account.map(|account| UserWithAccount { user, account })))
    }

    /// Resolves a username to the user and its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_with_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserWithAccount>, UserError> {
        let result = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .find_also_related(accounts::Entity)
            .one(&self.db)
            .await?;

        Ok(result.and_then(|(user, account)| account.map(|account| UserWithAccount { user, account })))
    }

    /// Checks whether a username is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, UserError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
