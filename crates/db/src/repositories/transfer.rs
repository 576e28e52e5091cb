//! Transfer repository: orchestration and history.
//!
//! `initiate_transfer` runs the whole money movement inside one database
//! transaction: resolve both parties, debit the sender under a row lock,
//! credit the receiver, stamp a reference, persist the transfer row,
//! commit. Any failure before the commit drops the transaction, which
//! rolls back every mutation; a transfer row therefore only ever exists
//! for a fully completed movement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use remit_core::ledger::{
    BalanceSnapshot, LedgerError, MAX_REFERENCE_ATTEMPTS, ReferenceGenerator, validate_amount,
    validate_parties,
};
use remit_shared::types::{PageRequest, Paginated};

use super::{AccountRepository, UserRepository, db_err, is_unique_violation, user::UserError};
use crate::entities::transfers;

/// Input for initiating a transfer.
#[derive(Debug, Clone)]
pub struct InitiateTransferInput {
    /// The authenticated sender's user id.
    pub sender_user_id: Uuid,
    /// The receiver's username.
    pub receiver_username: String,
    /// Amount to move. Must be positive.
    pub amount: Decimal,
}

/// Filter options for listing transfers.
///
/// Both bounds are inclusive; either may be omitted.
#[derive(Debug, Clone, Default)]
pub struct TransferFilter {
    /// Lower bound on `created_at`.
    pub start_period: Option<DateTime<Utc>>,
    /// Upper bound on `created_at`.
    pub end_period: Option<DateTime<Utc>>,
}

/// Transfer repository: orchestrates transfers and serves history queries.
#[derive(Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
    accounts: AccountRepository,
    users: UserRepository,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    ///
    /// The account and user repositories are injected at composition
    /// time; nothing here holds a reference back to this repository.
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        accounts: AccountRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            db,
            accounts,
            users,
        }
    }

    /// Moves `amount` from the sender's account to the receiver's.
    ///
    /// Validation (positive amount, distinct parties) happens before the
    /// transaction opens. The debit takes a row lock, so two transfers
    /// draining the same account serialize and the second sees the
    /// post-debit balance.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidAmount` for a non-positive amount
    /// - `LedgerError::AccountNotFound` if the sender has no account
    /// - `LedgerError::RecipientNotFound` if the receiver username is unknown
    /// - `LedgerError::SelfTransfer` if both resolve to the same account
    /// - `LedgerError::InsufficientFunds` if the sender cannot cover the amount
    /// - `LedgerError::ReferenceGenerationFailed` if reference retries run out
    pub async fn initiate_transfer(
        &self,
        input: InitiateTransferInput,
    ) -> Result<transfers::Model, LedgerError> {
        validate_amount(input.amount)?;

        let sender = self
            .users
            .find_with_account_by_user_id(input.sender_user_id)
            .await
            .map_err(user_err)?
            .ok_or(LedgerError::AccountNotFound(input.sender_user_id))?;

        let receiver = self
            .users
            .find_with_account_by_username(&input.receiver_username)
            .await
            .map_err(user_err)?
            .ok_or_else(|| LedgerError::RecipientNotFound(input.receiver_username.clone()))?;

        validate_parties(sender.account.id, receiver.account.id)?;

        // Dropping `txn` on any error path below rolls everything back.
        let txn = self.db.begin().await.map_err(db_err)?;

        let debited = self
            .accounts
            .debit(&txn, sender.account.id, input.amount)
            .await?;
        let snapshot = BalanceSnapshot::from_debited(debited.balance, input.amount);

        self.accounts
            .credit(&txn, receiver.account.id, input.amount)
            .await?;

        let transfer = self
            .insert_with_reference(
                &txn,
                sender.account.id,
                receiver.account.id,
                input.amount,
                snapshot,
            )
            .await?;

        txn.commit().await.map_err(db_err)?;

        // Cache entries only change after the commit; a rollback above
        // leaves the cache untouched.
        self.accounts.invalidate_balance(sender.account.id);
        self.accounts.invalidate_balance(receiver.account.id);

        info!(
            transfer_id = %transfer.id,
            reference = %transfer.reference,
            amount = %transfer.amount,
            sender_account = %transfer.sender_account_id,
            receiver_account = %transfer.receiver_account_id,
            "transfer completed"
        );

        Ok(transfer)
    }

    /// Lists transfers where the user is sender or receiver.
    ///
    /// Results are ordered newest first and paginated; `count` in the
    /// result is the total number of matches ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the user has no account.
    pub async fn find(
        &self,
        user_id: Uuid,
        filter: &TransferFilter,
        page: &PageRequest,
    ) -> Result<Paginated<transfers::Model>, LedgerError> {
        let account = self
            .accounts
            .find_by_owner(user_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(user_id))?;

        let mut condition = Condition::all().add(
            Condition::any()
                .add(transfers::Column::SenderAccountId.eq(account.id))
                .add(transfers::Column::ReceiverAccountId.eq(account.id)),
        );

        if let Some(start) = filter.start_period {
            condition = condition.add(transfers::Column::CreatedAt.gte(start));
        }
        if let Some(end) = filter.end_period {
            condition = condition.add(transfers::Column::CreatedAt.lte(end));
        }

        let count = transfers::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let records = transfers::Entity::find()
            .filter(condition)
            .order_by_desc(transfers::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Paginated::new(records, count))
    }

    /// Inserts the transfer row, retrying with a fresh reference when the
    /// uniqueness constraint fires.
    ///
    /// Each attempt runs in a savepoint so a failed insert does not
    /// poison the enclosing transaction.
    async fn insert_with_reference(
        &self,
        txn: &DatabaseTransaction,
        sender_account_id: Uuid,
        receiver_account_id: Uuid,
        amount: Decimal,
        snapshot: BalanceSnapshot,
    ) -> Result<transfers::Model, LedgerError> {
        for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
            let reference = ReferenceGenerator::generate();

            match Self::try_insert(
                txn,
                sender_account_id,
                receiver_account_id,
                amount,
                snapshot,
                &reference,
            )
            .await
            {
                Ok(transfer) => return Ok(transfer),
                Err(LedgerError::DuplicateReference(r)) => {
                    warn!(attempt, reference = %r, "transfer reference collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LedgerError::ReferenceGenerationFailed {
            attempts: MAX_REFERENCE_ATTEMPTS,
        })
    }

    /// One insert attempt inside a savepoint.
    async fn try_insert(
        txn: &DatabaseTransaction,
        sender_account_id: Uuid,
        receiver_account_id: Uuid,
        amount: Decimal,
        snapshot: BalanceSnapshot,
        reference: &str,
    ) -> Result<transfers::Model, LedgerError> {
        let savepoint = txn.begin().await.map_err(db_err)?;

        let transfer = transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            sender_account_id: Set(sender_account_id),
            receiver_account_id: Set(receiver_account_id),
            amount: Set(amount),
            reference: Set(reference.to_string()),
            balance_before: Set(snapshot.before),
            balance_after: Set(snapshot.after),
            created_at: Set(Utc::now().into()),
        };

        match transfer.insert(&savepoint).await {
            Ok(model) => {
                savepoint.commit().await.map_err(db_err)?;
                Ok(model)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(LedgerError::DuplicateReference(reference.to_string()))
            }
            Err(e) => Err(db_err(e)),
        }
    }
}

/// Maps user-directory errors into the ledger taxonomy.
fn user_err(err: UserError) -> LedgerError {
    match err {
        UserError::Database(e) => LedgerError::Database(e.to_string()),
        UserError::DuplicateUsername(u) => {
            LedgerError::Internal(format!("unexpected duplicate username: {u}"))
        }
    }
}
