mod common;

use anyhow::Result;
use common::{record, test_service};
use moneta::application::AppError;
use moneta::domain::{DEFAULT_OWNER, TransactionKind};

#[tokio::test]
async fn test_record_then_list_includes_new_entry() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let recorded = record(&service, DEFAULT_OWNER, "Groceries", "42.50", "expense").await?;

    let transactions = service.list_transactions(DEFAULT_OWNER).await?;
    assert_eq!(transactions.len(), 1);

    let listed = &transactions[0];
    assert_eq!(listed.id, recorded.id);
    assert_eq!(listed.category, "Groceries");
    assert_eq!(listed.amount_cents, 4250);
    assert_eq!(listed.kind, TransactionKind::Expense);

    Ok(())
}

#[tokio::test]
async fn test_ids_strictly_increase() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut last_id = 0;
    for i in 0..5 {
        let tx = record(&service, DEFAULT_OWNER, "Salary", "100", "income").await?;
        assert!(
            tx.id > last_id,
            "id {} at insert {} not greater than previous {}",
            tx.id,
            i,
            last_id
        );
        last_id = tx.id;
    }

    Ok(())
}

#[tokio::test]
async fn test_balance_is_income_minus_expense() -> Result<()> {
    let (service, _temp) = test_service().await?;

    record(&service, DEFAULT_OWNER, "Salary", "2000", "income").await?;
    record(&service, DEFAULT_OWNER, "Bonus", "500", "income").await?;
    record(&service, DEFAULT_OWNER, "Rent", "800", "expense").await?;

    let balance = service.get_balance(DEFAULT_OWNER).await?;
    assert_eq!(balance, 170000);

    Ok(())
}

#[tokio::test]
async fn test_balance_is_scoped_by_owner() -> Result<()> {
    let (service, _temp) = test_service().await?;

    record(&service, 1, "Salary", "2000", "income").await?;
    record(&service, 2, "Salary", "9999", "income").await?;
    record(&service, 2, "Rent", "100", "expense").await?;

    assert_eq!(service.get_balance(1).await?, 200000);
    assert_eq!(service.get_balance(2).await?, 989900);

    let owner_one = service.list_transactions(1).await?;
    assert_eq!(owner_one.len(), 1);
    assert!(owner_one.iter().all(|tx| tx.owner == 1));

    Ok(())
}

#[tokio::test]
async fn test_balance_of_empty_ledger_is_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert_eq!(service.get_balance(DEFAULT_OWNER).await?, 0);
    assert!(service.list_transactions(DEFAULT_OWNER).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_negative_amount_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .record_transaction(DEFAULT_OWNER, "Groceries", "-5", "expense")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));
    assert!(err.is_validation());

    assert!(service.list_transactions(DEFAULT_OWNER).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_zero_amount_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .record_transaction(DEFAULT_OWNER, "Groceries", "0", "expense")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));

    assert!(service.list_transactions(DEFAULT_OWNER).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unparseable_amount_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .record_transaction(DEFAULT_OWNER, "Groceries", "abc", "expense")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));

    assert!(service.list_transactions(DEFAULT_OWNER).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_blank_category_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for category in ["", "   ", "\t"] {
        let err = service
            .record_transaction(DEFAULT_OWNER, category, "10", "expense")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCategory(_)));
    }

    assert!(service.list_transactions(DEFAULT_OWNER).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_kind_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .record_transaction(DEFAULT_OWNER, "Savings", "10", "Transfer")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidKind(_)));

    assert!(service.list_transactions(DEFAULT_OWNER).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_category_is_trimmed_before_storing() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let tx = record(&service, DEFAULT_OWNER, "  Groceries  ", "10", "expense").await?;
    assert_eq!(tx.category, "Groceries");

    let listed = service.list_transactions(DEFAULT_OWNER).await?;
    assert_eq!(listed[0].category, "Groceries");

    Ok(())
}

#[tokio::test]
async fn test_recorded_transaction_round_trips_unchanged() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let recorded = record(&service, DEFAULT_OWNER, "Utilities", "63.07", "expense").await?;

    let transactions = service.list_transactions(DEFAULT_OWNER).await?;
    assert_eq!(transactions.len(), 1);
    let listed = &transactions[0];

    assert_eq!(listed.id, recorded.id);
    assert_eq!(listed.owner, recorded.owner);
    assert_eq!(listed.category, recorded.category);
    assert_eq!(listed.amount_cents, recorded.amount_cents);
    assert_eq!(listed.kind, recorded.kind);
    // RFC 3339 persistence preserves the full timestamp
    assert_eq!(
        listed.recorded_at.to_rfc3339(),
        recorded.recorded_at.to_rfc3339()
    );

    Ok(())
}

#[tokio::test]
async fn test_salary_then_rent_scenario() -> Result<()> {
    let (service, _temp) = test_service().await?;

    record(&service, DEFAULT_OWNER, "Salary", "2000", "income").await?;
    record(&service, DEFAULT_OWNER, "Rent", "800", "expense").await?;

    // Balance: 2000.00 - 800.00 = 1200.00
    assert_eq!(service.get_balance(DEFAULT_OWNER).await?, 120000);

    let report = service.get_report(DEFAULT_OWNER).await?;
    assert_eq!(report.get(&TransactionKind::Income), Some(&200000));
    assert_eq!(report.get(&TransactionKind::Expense), Some(&80000));

    // Most recent first: Rent before Salary
    let transactions = service.list_transactions(DEFAULT_OWNER).await?;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].category, "Rent");
    assert_eq!(transactions[1].category, "Salary");

    Ok(())
}

#[tokio::test]
async fn test_report_with_income_only_has_no_expense_key() -> Result<()> {
    let (service, _temp) = test_service().await?;

    record(&service, DEFAULT_OWNER, "Salary", "2000", "income").await?;
    record(&service, DEFAULT_OWNER, "Bonus", "150", "income").await?;

    let report = service.get_report(DEFAULT_OWNER).await?;
    assert_eq!(report.len(), 1);
    assert_eq!(report.get(&TransactionKind::Income), Some(&215000));
    assert!(!report.contains_key(&TransactionKind::Expense));

    Ok(())
}

#[tokio::test]
async fn test_report_of_empty_ledger_is_empty() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let report = service.get_report(DEFAULT_OWNER).await?;
    assert!(report.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_init_is_idempotent() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let path = db_path.to_str().unwrap();

    let service = moneta::application::LedgerService::init(path).await?;
    record(&service, DEFAULT_OWNER, "Salary", "2000", "income").await?;
    drop(service);

    // Re-initializing never destroys existing data
    let service = moneta::application::LedgerService::init(path).await?;
    let transactions = service.list_transactions(DEFAULT_OWNER).await?;
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].category, "Salary");

    Ok(())
}

#[tokio::test]
async fn test_kind_text_is_case_insensitive() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let income = record(&service, DEFAULT_OWNER, "Salary", "2000", "Income").await?;
    let expense = record(&service, DEFAULT_OWNER, "Rent", "800", "EXPENSE").await?;

    assert_eq!(income.kind, TransactionKind::Income);
    assert_eq!(expense.kind, TransactionKind::Expense);
    assert_eq!(service.get_balance(DEFAULT_OWNER).await?, 120000);

    Ok(())
}
