//! Ledger domain logic.
//!
//! This module implements the rules that keep money honest:
//! - Balance arithmetic (debits never go negative, credits are unbounded)
//! - Transfer validation (positive amounts, no self-transfers)
//! - Reference generation for persisted transfers
//! - The read-through balance cache
//! - Error types for ledger operations

pub mod balance;
pub mod cache;
pub mod error;
pub mod reference;
pub mod validation;

pub use balance::{BalanceSnapshot, apply_credit, apply_debit};
pub use cache::BalanceCache;
pub use error::LedgerError;
pub use reference::{MAX_REFERENCE_ATTEMPTS, REFERENCE_LENGTH, ReferenceGenerator};
pub use validation::{validate_amount, validate_parties};
