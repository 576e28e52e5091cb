//! Pure validation rules for transfers and funding.
//!
//! These checks run before any database transaction opens, so a request
//! that can never succeed is rejected without touching the store.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;

/// Validates that an amount is strictly positive.
///
/// # Errors
///
/// Returns `LedgerError::InvalidAmount` for zero or negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

/// Validates that sender and receiver are different accounts.
///
/// A self-transfer would have no net effect but would still burn a
/// reference and write a misleading ledger row, so it is rejected.
///
/// # Errors
///
/// Returns `LedgerError::SelfTransfer` when both sides are the same account.
pub fn validate_parties(
    sender_account_id: Uuid,
    receiver_account_id: Uuid,
) -> Result<(), LedgerError> {
    if sender_account_id == receiver_account_id {
        return Err(LedgerError::SelfTransfer);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(1))]
    #[case(dec!(10000))]
    #[case(dec!(0.0001))]
    fn test_positive_amounts_accepted(#[case] amount: Decimal) {
        assert!(validate_amount(amount).is_ok());
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(-0.01))]
    fn test_non_positive_amounts_rejected(#[case] amount: Decimal) {
        assert!(matches!(
            validate_amount(amount),
            Err(LedgerError::InvalidAmount(a)) if a == amount
        ));
    }

    #[test]
    fn test_distinct_parties_accepted() {
        assert!(validate_parties(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_self_transfer_rejected() {
        let id = Uuid::new_v4();
        assert!(matches!(
            validate_parties(id, id),
            Err(LedgerError::SelfTransfer)
        ));
    }
}
