use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Identifier scoping a ledger to one user. The CLI always passes
/// [`DEFAULT_OWNER`], but every operation takes the owner explicitly so a
/// multi-user front end can reuse the same core unchanged.
pub type OwnerId = i64;

/// The single ledger owner in current scope.
pub const DEFAULT_OWNER: OwnerId = 1;

/// Row id assigned by the store; strictly increasing in insertion order.
pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering the ledger (salary, interest, etc.)
    Income,
    /// Money leaving the ledger (rent, groceries, etc.)
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single monetary event in the ledger. Transactions are immutable and
/// never deleted; the ledger is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner: OwnerId,
    /// Free-text label (e.g., "Groceries"); non-empty after trimming
    pub category: String,
    /// Amount in cents, always positive; direction is carried by `kind`
    pub amount_cents: Cents,
    pub kind: TransactionKind,
    /// When the transaction was recorded; assigned at creation
    pub recorded_at: DateTime<Utc>,
}

/// A transaction before insertion. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub owner: OwnerId,
    pub category: String,
    pub amount_cents: Cents,
    pub kind: TransactionKind,
    pub recorded_at: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        owner: OwnerId,
        category: impl Into<String>,
        amount_cents: Cents,
        kind: TransactionKind,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            owner,
            category: category.into(),
            amount_cents,
            kind,
            recorded_at,
        }
    }

    /// The stored record once the store has assigned an id.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            owner: self.owner,
            category: self.category,
            amount_cents: self.amount_cents,
            kind: self.kind,
            recorded_at: self.recorded_at,
        }
    }
}
