//! Ledger error types.
//!
//! This is the error taxonomy for every balance mutation and transfer
//! operation. All errors raised inside a transfer transaction abort the
//! transaction wholesale; a partial debit-without-credit state is never
//! observable outside the ledger.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transfer or funding amount must be positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Sender and receiver must be different accounts.
    #[error("Cannot transfer to your own account")]
    SelfTransfer,

    // ========== Resolution Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Receiver username could not be resolved to an account.
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    // ========== Balance Errors ==========
    /// Debit exceeds the available balance.
    #[error("Insufficient balance: have {available}, need {requested}")]
    InsufficientFunds {
        /// Balance available on the account.
        available: Decimal,
        /// Amount the debit asked for.
        requested: Decimal,
    },

    // ========== Reference Errors ==========
    /// A generated reference collided with an existing one. Retryable.
    #[error("Transfer reference already exists: {0}")]
    DuplicateReference(String),

    /// Reference generation retries exhausted. Fatal to the request.
    #[error("Failed to generate a unique reference after {attempts} attempts")]
    ReferenceGenerationFailed {
        /// Number of attempts made.
        attempts: u32,
    },

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::RecipientNotFound(_) => "RECIPIENT_NOT_FOUND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::ReferenceGenerationFailed { .. } => "REFERENCE_GENERATION_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount(_) | Self::SelfTransfer => 400,

            // 404 Not Found - resolution failures
            Self::AccountNotFound(_) | Self::RecipientNotFound(_) => 404,

            // 422 Unprocessable - business rule violation
            Self::InsufficientFunds { .. } => 422,

            // 409 Conflict - should be retried internally, never surfaced
            Self::DuplicateReference(_) => 409,

            // 500 Internal Server Error
            Self::ReferenceGenerationFailed { .. } | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable within the same request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateReference(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(dec!(-1)).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(LedgerError::SelfTransfer.error_code(), "SELF_TRANSFER");
        assert_eq!(
            LedgerError::InsufficientFunds {
                available: dec!(50),
                requested: dec!(100),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            LedgerError::RecipientNotFound("bob".to_string()).error_code(),
            "RECIPIENT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidAmount(dec!(0)).http_status_code(), 400);
        assert_eq!(LedgerError::SelfTransfer.http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                available: dec!(0),
                requested: dec!(1),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::ReferenceGenerationFailed { attempts: 5 }.http_status_code(),
            500
        );
        assert_eq!(
            LedgerError::Database("boom".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_only_duplicate_reference_is_retryable() {
        assert!(LedgerError::DuplicateReference("ABC123XYZ456".to_string()).is_retryable());
        assert!(!LedgerError::ReferenceGenerationFailed { attempts: 5 }.is_retryable());
        assert!(!LedgerError::SelfTransfer.is_retryable());
        assert!(
            !LedgerError::InsufficientFunds {
                available: dec!(1),
                requested: dec!(2),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientFunds {
            available: dec!(50.00),
            requested: dec!(100.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: have 50.00, need 100.00"
        );

        let err = LedgerError::RecipientNotFound("jaden".to_string());
        assert_eq!(err.to_string(), "Recipient not found: jaden");
    }
}
