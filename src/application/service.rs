use std::collections::HashMap;

use chrono::Utc;

use crate::domain::{
    self, Cents, NewTransaction, OwnerId, Transaction, TransactionKind, parse_amount,
};
use crate::storage::Repository;

use super::{AppError, IntegrityReport, OwnerSummary};

/// Application service providing the ledger operations.
/// This is the only surface a front end (CLI, TUI, API, ...) talks to;
/// all parsing and validation of raw user input happens here, never in the
/// presentation layer.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database at the given path, creating file and schema as
    /// needed. Safe to call on every startup.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url)
            .await
            .map_err(AppError::StorageInit)?;
        Ok(Self::new(repo))
    }

    /// Validate raw user input and append a transaction to the ledger.
    /// All-or-nothing: every validation failure happens before the store is
    /// touched, so no partial record is ever persisted.
    pub async fn record_transaction(
        &self,
        owner: OwnerId,
        category: &str,
        amount_text: &str,
        kind_text: &str,
    ) -> Result<Transaction, AppError> {
        let amount_cents =
            parse_amount(amount_text).map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(format!(
                "amount must be positive, got '{}'",
                amount_text.trim()
            )));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(AppError::InvalidCategory(
                "category must not be empty".to_string(),
            ));
        }

        let kind = TransactionKind::from_str(kind_text)
            .ok_or_else(|| AppError::InvalidKind(kind_text.trim().to_string()))?;

        let new = NewTransaction::new(owner, category, amount_cents, kind, Utc::now());
        self.repo
            .insert_transaction(new)
            .await
            .map_err(AppError::StorageWrite)
    }

    /// Balance for an owner: income total minus expense total.
    /// An owner with no transactions has balance 0.
    pub async fn get_balance(&self, owner: OwnerId) -> Result<Cents, AppError> {
        let income = self
            .repo
            .sum_by_kind(owner, TransactionKind::Income)
            .await
            .map_err(AppError::StorageRead)?;
        let expense = self
            .repo
            .sum_by_kind(owner, TransactionKind::Expense)
            .await
            .map_err(AppError::StorageRead)?;

        Ok(income - expense)
    }

    /// List an owner's transactions, most recent first.
    pub async fn list_transactions(&self, owner: OwnerId) -> Result<Vec<Transaction>, AppError> {
        self.repo
            .list_by_owner(owner)
            .await
            .map_err(AppError::StorageRead)
    }

    /// Per-kind totals for an owner. Kinds with no transactions are absent;
    /// callers treat absence as zero. Rendering is up to the caller.
    pub async fn get_report(
        &self,
        owner: OwnerId,
    ) -> Result<HashMap<TransactionKind, Cents>, AppError> {
        self.repo
            .sum_grouped_by_kind(owner)
            .await
            .map_err(AppError::StorageRead)
    }

    /// Balance plus per-kind totals in one struct, for display and export.
    pub async fn get_summary(&self, owner: OwnerId) -> Result<OwnerSummary, AppError> {
        let total_income = self
            .repo
            .sum_by_kind(owner, TransactionKind::Income)
            .await
            .map_err(AppError::StorageRead)?;
        let total_expense = self
            .repo
            .sum_by_kind(owner, TransactionKind::Expense)
            .await
            .map_err(AppError::StorageRead)?;

        Ok(OwnerSummary {
            owner,
            total_income,
            total_expense,
            balance: total_income - total_expense,
        })
    }

    /// Verify the ledger invariants and cross-check the SQL-aggregated
    /// balance against a recomputation from the full listing.
    pub async fn check_integrity(&self, owner: OwnerId) -> Result<IntegrityReport, AppError> {
        let stats = self
            .repo
            .get_integrity_stats(owner)
            .await
            .map_err(AppError::StorageRead)?;

        let balance_cents = self.get_balance(owner).await?;
        let transactions = self.list_transactions(owner).await?;
        let recomputed = domain::compute_balance(owner, &transactions);

        Ok(IntegrityReport {
            owner,
            transaction_count: stats.transaction_count,
            invalid_amounts: stats.invalid_amounts,
            blank_categories: stats.blank_categories,
            unknown_kinds: stats.unknown_kinds,
            balance_consistent: balance_cents == recomputed,
            balance_cents,
        })
    }
}
