use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Cents, OwnerId, TransactionKind};

/// Total per kind, in a stable display order (income before expense).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindTotal {
    pub kind: TransactionKind,
    pub total_cents: Cents,
}

/// Convert a grouped-sum mapping into display order.
/// Kinds with no transactions stay absent.
pub fn kind_totals(report: &HashMap<TransactionKind, Cents>) -> Vec<KindTotal> {
    [TransactionKind::Income, TransactionKind::Expense]
        .into_iter()
        .filter_map(|kind| {
            report.get(&kind).map(|&total_cents| KindTotal {
                kind,
                total_cents,
            })
        })
        .collect()
}

/// Balance and per-kind totals for one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub owner: OwnerId,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
}

/// Result of verifying the ledger invariants against the stored rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub owner: OwnerId,
    pub transaction_count: i64,
    pub invalid_amounts: i64,
    pub blank_categories: i64,
    pub unknown_kinds: i64,
    /// SQL-aggregated balance matches a recomputation from the full listing
    pub balance_consistent: bool,
    pub balance_cents: Cents,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.invalid_amounts == 0
            && self.blank_categories == 0
            && self.unknown_kinds == 0
            && self.balance_consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_totals_orders_income_first() {
        let mut report = HashMap::new();
        report.insert(TransactionKind::Expense, 80000);
        report.insert(TransactionKind::Income, 200000);

        let totals = kind_totals(&report);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].kind, TransactionKind::Income);
        assert_eq!(totals[0].total_cents, 200000);
        assert_eq!(totals[1].kind, TransactionKind::Expense);
        assert_eq!(totals[1].total_cents, 80000);
    }

    #[test]
    fn test_kind_totals_skips_absent_kinds() {
        let mut report = HashMap::new();
        report.insert(TransactionKind::Income, 5000);

        let totals = kind_totals(&report);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].kind, TransactionKind::Income);
    }
}
