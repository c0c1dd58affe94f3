use std::collections::HashMap;

use super::{Cents, OwnerId, Transaction, TransactionKind};

/// Compute the balance for one owner from a list of transactions.
/// Balance = sum of income amounts - sum of expense amounts
pub fn compute_balance(owner: OwnerId, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.owner == owner)
        .fold(0, |balance, tx| match tx.kind {
            TransactionKind::Income => balance + tx.amount_cents,
            TransactionKind::Expense => balance - tx.amount_cents,
        })
}

/// Sum amounts per kind for one owner.
/// Kinds with no transactions are omitted from the map.
pub fn totals_by_kind(
    owner: OwnerId,
    transactions: &[Transaction],
) -> HashMap<TransactionKind, Cents> {
    let mut totals: HashMap<TransactionKind, Cents> = HashMap::new();

    for tx in transactions.iter().filter(|tx| tx.owner == owner) {
        *totals.entry(tx.kind).or_insert(0) += tx.amount_cents;
    }

    totals
}
