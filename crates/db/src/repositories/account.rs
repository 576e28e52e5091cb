//! Account repository: the sole writer of `balance`.
//!
//! Every balance mutation goes through `debit`/`credit`, which load the
//! account row with `SELECT ... FOR UPDATE` so concurrent mutations
//! against one account serialize. Both are composable inside a
//! caller-managed transaction and never commit on their own.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use remit_core::ledger::{BalanceCache, LedgerError, apply_credit, apply_debit, validate_amount};
use remit_shared::types::AccountId;

use super::db_err;
use crate::entities::accounts;

/// Account repository for balance reads and mutations.
#[derive(Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    cache: BalanceCache,
}

impl AccountRepository {
    /// Creates a new account repository sharing the given balance cache.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: BalanceCache) -> Self {
        Self { db, cache }
    }

    /// Builds a zero-balance account for `owner_id` inside the caller's
    /// transaction.
    ///
    /// Does not commit; the caller decides the fate of the transaction.
    /// Used at registration so the user row and its account commit
    /// together.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_in(
        txn: &DatabaseTransaction,
        owner_id: Uuid,
    ) -> Result<accounts::Model, DbErr> {
        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account.insert(txn).await
    }

    /// Finds an account by its id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        account_id: Uuid,
    ) -> Result<Option<accounts::Model>, LedgerError> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Finds the account owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the query fails.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<accounts::Model>, LedgerError> {
        accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Returns the account balance, read through the cache.
    ///
    /// On a miss the backing row is read and the cache populated. The
    /// cached value may be stale up to the cache TTL; mutations
    /// invalidate it on commit.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if no such account exists.
    pub async fn get_balance(&self, account_id: Uuid) -> Result<Decimal, LedgerError> {
        let key = AccountId::from_uuid(account_id);

        if let Some(balance) = self.cache.get(key) {
            debug!(account_id = %account_id, "balance cache hit");
            return Ok(balance);
        }

        let account = self
            .find_by_id(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        self.cache.set(key, account.balance);
        Ok(account.balance)
    }

    /// Debits `amount` from the account within transaction `txn`.
    ///
    /// The row is loaded with `SELECT ... FOR UPDATE`, so a concurrent
    /// debit against the same account waits for this transaction to
    /// commit or roll back before reading the balance. Does not commit
    /// and does not touch the cache; the caller invalidates the cache
    /// entry once the transaction commits.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the account is missing,
    /// `LedgerError::InsufficientFunds` if the balance cannot cover the
    /// amount.
    pub async fn debit(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
        amount: Decimal,
    ) -> Result<accounts::Model, LedgerError> {
        let account = Self::load_for_update(txn, account_id).await?;
        let new_balance = apply_debit(account.balance, amount)?;

        Self::persist_balance(txn, account, new_balance).await
    }

    /// Credits `amount` to the account within transaction `txn`.
    ///
    /// Same locking and commit semantics as `debit`; there is no upper
    /// bound on a credit.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the account is missing.
    pub async fn credit(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
        amount: Decimal,
    ) -> Result<accounts::Model, LedgerError> {
        let account = Self::load_for_update(txn, account_id).await?;
        let new_balance = apply_credit(account.balance, amount);

        Self::persist_balance(txn, account, new_balance).await
    }

    /// Deposits `amount` into an account: a pure credit with no matching
    /// debit, outside the conservation law.
    ///
    /// Runs in its own transaction and invalidates the cache entry after
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` for non-positive amounts and
    /// `LedgerError::AccountNotFound` if the account is missing.
    pub async fn fund(
        &self,
        account_id: Uuid,
        amount: Decimal,
    ) -> Result<accounts::Model, LedgerError> {
        validate_amount(amount)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let account = self.credit(&txn, account_id, amount).await?;
        txn.commit().await.map_err(db_err)?;

        self.invalidate_balance(account_id);
        info!(account_id = %account_id, amount = %amount, "account funded");

        Ok(account)
    }

    /// Drops the cached balance for an account.
    ///
    /// Call after a mutating transaction commits; the next `get_balance`
    /// repopulates from the backing store.
    pub fn invalidate_balance(&self, account_id: Uuid) {
        self.cache.invalidate(AccountId::from_uuid(account_id));
    }

    /// Loads an account row with a row-level lock held until the
    /// enclosing transaction ends.
    async fn load_for_update(
        txn: &DatabaseTransaction,
        account_id: Uuid,
    ) -> Result<accounts::Model, LedgerError> {
        accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Writes the new balance and bumps `updated_at`.
    async fn persist_balance(
        txn: &DatabaseTransaction,
        account: accounts::Model,
        new_balance: Decimal,
    ) -> Result<accounts::Model, LedgerError> {
        let mut active: accounts::ActiveModel = account.into();
        active.balance = Set(new_balance);
        active.updated_at = Set(Utc::now().into());

        active.update(txn).await.map_err(db_err)
    }
}
