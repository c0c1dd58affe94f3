use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{LedgerService, OwnerSummary, kind_totals};
use crate::domain::{OwnerId, Transaction};

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub summary: OwnerSummary,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger data to CSV and JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export an owner's transactions to CSV, most recent first.
    /// Returns the number of data rows written.
    pub async fn export_transactions_csv<W: Write>(
        &self,
        owner: OwnerId,
        writer: W,
    ) -> Result<usize> {
        let transactions = self.service.list_transactions(owner).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "recorded_at", "category", "amount_cents", "kind"])?;

        let mut count = 0;
        for tx in &transactions {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.recorded_at.to_rfc3339(),
                tx.category.clone(),
                tx.amount_cents.to_string(),
                tx.kind.as_str().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export per-kind totals to CSV. Returns the number of data rows written.
    pub async fn export_report_csv<W: Write>(&self, owner: OwnerId, writer: W) -> Result<usize> {
        let report = self.service.get_report(owner).await?;
        let totals = kind_totals(&report);
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["kind", "total_cents"])?;

        let mut count = 0;
        for entry in &totals {
            csv_writer.write_record([
                entry.kind.as_str().to_string(),
                entry.total_cents.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export summary plus full transaction listing as a JSON snapshot.
    pub async fn export_summary_json<W: Write>(
        &self,
        owner: OwnerId,
        mut writer: W,
    ) -> Result<LedgerSnapshot> {
        let summary = self.service.get_summary(owner).await?;
        let transactions = self.service.list_transactions(owner).await?;

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            summary,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
