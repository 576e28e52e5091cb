//! Balance arithmetic.
//!
//! All balance math goes through these two functions so the invariant
//! `balance >= 0` holds at every observable point. Credits have no upper
//! bound; debits fail rather than go below zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Applies a debit, returning the new balance.
///
/// # Errors
///
/// Returns `LedgerError::InsufficientFunds` if the balance cannot cover
/// the amount. The balance is left untouched in that case.
pub fn apply_debit(balance: Decimal, amount: Decimal) -> Result<Decimal, LedgerError> {
    if balance < amount {
        return Err(LedgerError::InsufficientFunds {
            available: balance,
            requested: amount,
        });
    }
    Ok(balance - amount)
}

/// Applies a credit, returning the new balance. Never fails.
#[must_use]
pub fn apply_credit(balance: Decimal, amount: Decimal) -> Decimal {
    balance + amount
}

/// The sender's balance before and after a debit.
///
/// Persisted on every transfer row as proof of what the debit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Sender balance before the debit.
    pub before: Decimal,
    /// Sender balance after the debit.
    pub after: Decimal,
}

impl BalanceSnapshot {
    /// Builds the snapshot for a debit of `amount` against `before`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientFunds` if the debit would go negative.
    pub fn debit(before: Decimal, amount: Decimal) -> Result<Self, LedgerError> {
        let after = apply_debit(before, amount)?;
        Ok(Self { before, after })
    }

    /// Reconstructs the snapshot from the post-debit balance.
    ///
    /// Used when the debit already happened under a row lock and only the
    /// updated balance is in hand.
    #[must_use]
    pub fn from_debited(after: Decimal, amount: Decimal) -> Self {
        Self {
            before: after + amount,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Strategy for non-negative balances (2 decimal places, up to 10M).
    fn balance_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000_000).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for positive amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// A successful debit never produces a negative balance.
        #[test]
        fn prop_debit_never_negative(
            balance in balance_strategy(),
            amount in amount_strategy(),
        ) {
            if let Ok(after) = apply_debit(balance, amount) {
                prop_assert!(after >= Decimal::ZERO);
                prop_assert_eq!(after, balance - amount);
            } else {
                // Failure only when the balance cannot cover the amount.
                prop_assert!(balance < amount);
            }
        }

        /// A balanced debit/credit pair conserves the total amount of money.
        #[test]
        fn prop_transfer_conserves_money(
            sender in balance_strategy(),
            receiver in balance_strategy(),
            amount in amount_strategy(),
        ) {
            prop_assume!(sender >= amount);

            let sender_after = apply_debit(sender, amount).unwrap();
            let receiver_after = apply_credit(receiver, amount);

            prop_assert_eq!(sender_after + receiver_after, sender + receiver);
            prop_assert_eq!(sender - sender_after, amount);
            prop_assert_eq!(receiver_after - receiver, amount);
        }

        /// Credits are unbounded and exact.
        #[test]
        fn prop_credit_is_exact(
            balance in balance_strategy(),
            amount in amount_strategy(),
        ) {
            let after = apply_credit(balance, amount);
            prop_assert_eq!(after - balance, amount);
        }

        /// Snapshot round trip: reconstructing from the post-debit balance
        /// gives back the pre-debit balance.
        #[test]
        fn prop_snapshot_roundtrip(
            before in balance_strategy(),
            amount in amount_strategy(),
        ) {
            prop_assume!(before >= amount);

            let snap = BalanceSnapshot::debit(before, amount).unwrap();
            let rebuilt = BalanceSnapshot::from_debited(snap.after, amount);

            prop_assert_eq!(snap, rebuilt);
            prop_assert_eq!(snap.before - snap.after, amount);
        }
    }

    #[test]
    fn test_debit_exact_balance_allowed() {
        // Draining the account to exactly zero is legal.
        assert_eq!(apply_debit(dec!(100), dec!(100)).unwrap(), dec!(0));
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let err = apply_debit(dec!(50), dec!(100)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                available,
                requested,
            } if available == dec!(50) && requested == dec!(100)
        ));
    }

    #[test]
    fn test_snapshot_fields() {
        let snap = BalanceSnapshot::debit(dec!(500), dec!(100)).unwrap();
        assert_eq!(snap.before, dec!(500));
        assert_eq!(snap.after, dec!(400));
    }

    #[test]
    fn test_no_drift_on_fractional_amounts() {
        // 0.1 + 0.2 style drift must not exist with decimal arithmetic.
        let after = apply_credit(dec!(0.1), dec!(0.2));
        assert_eq!(after, dec!(0.3));

        let snap = BalanceSnapshot::debit(dec!(0.3), dec!(0.1)).unwrap();
        assert_eq!(snap.after, dec!(0.2));
    }
}
