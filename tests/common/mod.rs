// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use moneta::application::LedgerService;
use moneta::domain::{OwnerId, Transaction};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Record a transaction from raw strings, as a front end would
pub async fn record(
    service: &LedgerService,
    owner: OwnerId,
    category: &str,
    amount: &str,
    kind: &str,
) -> Result<Transaction> {
    Ok(service
        .record_transaction(owner, category, amount, kind)
        .await?)
}

/// Test fixture: a small ledger with salary income and a few expenses
pub async fn seed_basic_ledger(service: &LedgerService, owner: OwnerId) -> Result<()> {
    record(service, owner, "Salary", "2000", "income").await?;
    record(service, owner, "Rent", "800", "expense").await?;
    record(service, owner, "Groceries", "120.50", "expense").await?;
    Ok(())
}
