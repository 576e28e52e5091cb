//! `SeaORM` Entity for the transfers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An immutable record of one completed debit/credit pair. Rows are
/// append-only: never updated, never deleted. The existence of a row is
/// proof that both sides of the money movement committed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    /// Transfer ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Debited account.
    pub sender_account_id: Uuid,
    /// Credited account.
    pub receiver_account_id: Uuid,
    /// Amount moved. Positive.
    pub amount: Decimal,
    /// Short external identifier. Unique across all transfers.
    #[sea_orm(unique)]
    pub reference: String,
    /// Sender balance before the debit.
    pub balance_before: Decimal,
    /// Sender balance after the debit.
    pub balance_after: Decimal,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations. Both sides point at accounts, so no `Related` impl
/// is provided; queries name the side they want explicitly.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The debited account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::SenderAccountId",
        to = "super::accounts::Column::Id"
    )]
    SenderAccount,
    /// The credited account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ReceiverAccountId",
        to = "super::accounts::Column::Id"
    )]
    ReceiverAccount,
}

impl ActiveModelBehavior for ActiveModel {}
