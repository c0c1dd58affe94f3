use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, kind_totals};
use crate::domain::{DEFAULT_OWNER, format_amount};

/// Width of the widest bar in the textual report chart
const REPORT_BAR_WIDTH: usize = 40;

/// Moneta - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "moneta")]
#[command(about = "A local-first income/expense tracker with an append-only ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "moneta.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database (safe to re-run)
    Init,

    /// Record a transaction
    Add {
        /// Amount (e.g., "50.00" or "50"); must be positive
        amount: String,

        /// Category label (e.g., "Groceries")
        #[arg(short, long)]
        category: String,

        /// Kind: income or expense
        #[arg(short, long)]
        kind: String,
    },

    /// Show the current balance
    Balance,

    /// List transactions, most recent first
    Transactions {
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show income vs expense totals
    Report {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, report, summary
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Verify ledger integrity
    Check,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Schema creation is idempotent, so every command opens the database
        // the same way and a missing file is never an error.
        let service = LedgerService::init(&self.database).await?;

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                category,
                kind,
            } => {
                let tx = service
                    .record_transaction(DEFAULT_OWNER, &category, &amount, &kind)
                    .await?;

                println!(
                    "Recorded {}: {} ({}) [#{}]",
                    tx.kind,
                    format_amount(tx.amount_cents),
                    tx.category,
                    tx.id
                );
                if self.verbose {
                    eprintln!("  recorded at {}", tx.recorded_at.to_rfc3339());
                }
            }

            Commands::Balance => {
                let balance = service.get_balance(DEFAULT_OWNER).await?;
                println!("Balance: {}", format_amount(balance));
            }

            Commands::Transactions { limit } => {
                run_transactions_command(&service, limit).await?;
            }

            Commands::Report { format } => {
                run_report_command(&service, &format).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }

            Commands::Check => {
                run_check_command(&service).await?;
            }
        }

        Ok(())
    }
}

async fn run_transactions_command(service: &LedgerService, limit: Option<usize>) -> Result<()> {
    let transactions = service.list_transactions(DEFAULT_OWNER).await?;

    if transactions.is_empty() {
        println!("No transactions recorded.");
        return Ok(());
    }

    let shown = limit.unwrap_or(transactions.len());

    println!(
        "{:<6} {:<20} {:<20} {:<10} {:>12}",
        "ID", "DATE", "CATEGORY", "KIND", "AMOUNT"
    );
    println!("{}", "-".repeat(72));
    for tx in transactions.iter().take(shown) {
        println!(
            "{:<6} {:<20} {:<20} {:<10} {:>12}",
            tx.id,
            tx.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            tx.category,
            tx.kind,
            format_amount(tx.amount_cents)
        );
    }

    if shown < transactions.len() {
        println!("... and {} more", transactions.len() - shown);
    }

    Ok(())
}

async fn run_report_command(service: &LedgerService, format: &str) -> Result<()> {
    let report = service.get_report(DEFAULT_OWNER).await?;
    let totals = kind_totals(&report);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
        "table" => {
            if totals.is_empty() {
                println!("No transactions recorded.");
                return Ok(());
            }

            let max_total = totals
                .iter()
                .map(|entry| entry.total_cents)
                .max()
                .unwrap_or(0)
                .max(1);

            println!("{:<10} {:>12}", "KIND", "TOTAL");
            println!("{}", "-".repeat(24 + REPORT_BAR_WIDTH));
            for entry in &totals {
                let bar_len =
                    (entry.total_cents * REPORT_BAR_WIDTH as i64 / max_total).max(1) as usize;
                println!(
                    "{:<10} {:>12}  {}",
                    entry.kind,
                    format_amount(entry.total_cents),
                    "#".repeat(bar_len)
                );
            }
        }
        _ => {
            anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format);
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(DEFAULT_OWNER, writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "report" => {
            let count = exporter.export_report_csv(DEFAULT_OWNER, writer).await?;
            if output.is_some() {
                eprintln!("Exported {} report rows", count);
            }
        }
        "summary" => {
            let snapshot = exporter.export_summary_json(DEFAULT_OWNER, writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported summary: {} transactions, balance {}",
                    snapshot.transactions.len(),
                    format_amount(snapshot.summary.balance)
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, report, summary",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_check_command(service: &LedgerService) -> Result<()> {
    let report = service.check_integrity(DEFAULT_OWNER).await?;

    println!("Ledger integrity check");
    println!("  Transactions:     {}", report.transaction_count);
    println!("  Invalid amounts:  {}", report.invalid_amounts);
    println!("  Blank categories: {}", report.blank_categories);
    println!("  Unknown kinds:    {}", report.unknown_kinds);
    println!(
        "  Balance:          {} ({})",
        format_amount(report.balance_cents),
        if report.balance_consistent {
            "consistent"
        } else {
            "INCONSISTENT"
        }
    );

    if report.is_healthy() {
        println!("OK");
    } else {
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}
