use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Cents, NewTransaction, OwnerId, Transaction, TransactionKind};

use super::MIGRATION_001_INITIAL;

/// Per-owner counts used for ledger integrity verification.
#[derive(Debug, Clone)]
pub struct IntegrityStats {
    pub transaction_count: i64,
    pub invalid_amounts: i64,
    pub blank_categories: i64,
    pub unknown_kinds: i64,
}

/// Repository for persisting and querying ledger transactions.
/// Every write goes straight to the database; an insert is visible to all
/// subsequent reads as soon as it returns.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Every statement is IF NOT EXISTS, so this is
    /// safe to run on every startup.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new transaction and return the stored record with its
    /// assigned id. Nothing is committed unless this returns Ok.
    pub async fn insert_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (owner_id, category, amount_cents, kind, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(new.owner)
        .bind(&new.category)
        .bind(new.amount_cents)
        .bind(new.kind.as_str())
        .bind(new.recorded_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert transaction")?;

        let id: i64 = row.get("id");
        Ok(new.into_transaction(id))
    }

    /// List all transactions for an owner, most recent first.
    /// Returns an empty vec (not an error) when the ledger is empty.
    pub async fn list_by_owner(&self, owner: OwnerId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, category, amount_cents, kind, recorded_at
            FROM transactions
            WHERE owner_id = ?
            ORDER BY recorded_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Sum amounts over all transactions of the given owner and kind.
    /// Returns 0 when no rows match.
    pub async fn sum_by_kind(&self, owner: OwnerId, kind: TransactionKind) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0) as total
            FROM transactions
            WHERE owner_id = ? AND kind = ?
            "#,
        )
        .bind(owner)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum transactions by kind")?;

        Ok(row.get("total"))
    }

    /// Sum amounts per kind in a single query.
    /// Kinds with no transactions are absent from the map.
    pub async fn sum_grouped_by_kind(
        &self,
        owner: OwnerId,
    ) -> Result<HashMap<TransactionKind, Cents>> {
        let rows = sqlx::query(
            r#"
            SELECT kind, SUM(amount_cents) as total
            FROM transactions
            WHERE owner_id = ?
            GROUP BY kind
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("Failed to sum transactions grouped by kind")?;

        let mut totals = HashMap::new();
        for row in rows {
            let kind_str: String = row.get("kind");
            let kind = TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?;
            totals.insert(kind, row.get("total"));
        }

        Ok(totals)
    }

    /// Count rows violating the ledger invariants for integrity checking.
    /// The schema CHECKs make violations unreachable through this crate, but
    /// the database file is plain SQLite and can be edited by other tools.
    pub async fn get_integrity_stats(&self, owner: OwnerId) -> Result<IntegrityStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as transaction_count,
                COALESCE(SUM(CASE WHEN amount_cents <= 0 THEN 1 ELSE 0 END), 0) as invalid_amounts,
                COALESCE(SUM(CASE WHEN length(trim(category)) = 0 THEN 1 ELSE 0 END), 0) as blank_categories,
                COALESCE(SUM(CASE WHEN kind NOT IN ('income', 'expense') THEN 1 ELSE 0 END), 0) as unknown_kinds
            FROM transactions
            WHERE owner_id = ?
            "#,
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .context("Failed to gather integrity stats")?;

        Ok(IntegrityStats {
            transaction_count: row.get("transaction_count"),
            invalid_amounts: row.get("invalid_amounts"),
            blank_categories: row.get("blank_categories"),
            unknown_kinds: row.get("unknown_kinds"),
        })
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let kind_str: String = row.get("kind");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Transaction {
            id: row.get("id"),
            owner: row.get("owner_id"),
            category: row.get("category"),
            amount_cents: row.get("amount_cents"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
