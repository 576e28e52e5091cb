//! Repository abstractions for data access.
//!
//! Repositories own all SQL. The ledger repositories surface the
//! `LedgerError` taxonomy from `remit-core`; user management has its own
//! small error type.

pub mod account;
pub mod transfer;
pub mod user;

pub use account::AccountRepository;
pub use transfer::{InitiateTransferInput, TransferFilter, TransferRepository};
pub use user::{UserError, UserRepository, UserWithAccount};

use remit_core::ledger::LedgerError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error into the ledger taxonomy.
pub(crate) fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Returns true if the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
