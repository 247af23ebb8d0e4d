//! Derives an account balance from its ledger.

use crate::bank::{Transaction, TransactionKind};

/// The signed sum of `transactions`: deposits add, withdrawals subtract.
///
/// The result does not depend on the order of `transactions` and may be negative.
pub fn balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| match transaction.kind {
            TransactionKind::Deposit => transaction.amount,
            TransactionKind::Withdrawal => -transaction.amount,
        })
        .sum()
}
