//! Expense CLI commands

use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use crate::display::separator;
use crate::export;
use crate::models::{Money, Month, TransactionId};
use crate::store::ExpenseStore;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Category name
        category: String,
        /// Amount (e.g., "28.50")
        amount: String,
        /// Expense date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// List expenses, newest first
    List {
        /// Restrict to the current month
        #[arg(long)]
        month: bool,
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete an expense by id
    Remove {
        /// Transaction id (full or short form, e.g. "txn-1a2b3c4d")
        id: String,
    },

    /// Export the current month as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(store: &mut ExpenseStore, cmd: ExpenseCommands) -> Result<()> {
    match cmd {
        ExpenseCommands::Add {
            category,
            amount,
            date,
            note,
        } => {
            let amount = Money::parse(&amount).map_err(|e| anyhow!(e.to_string()))?;
            let date = match date {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| anyhow!("Invalid date '{}': {}", s, e))?,
                None => store.today(),
            };
            let category_id = store
                .ledger()
                .category_by_name(&category)
                .ok_or_else(|| anyhow!("Category not found: {}", category))?
                .id;

            let txn = store.add_expense(category_id, amount, date, &note)?;
            println!("Recorded {} in {} on {}", txn.amount, category, txn.date);
        }
        ExpenseCommands::List { month, limit } => {
            let transactions: Vec<_> = if month {
                store.current_month_transactions()
            } else {
                store.ledger().transactions.clone()
            };

            if transactions.is_empty() {
                println!("No expenses recorded.");
                return Ok(());
            }

            println!(
                "{:<14} {:<12} {:<20} {:>12}  {:<8} note",
                "ID", "Date", "Category", "Amount", "Source"
            );
            println!("{}", separator(84));
            for txn in transactions.iter().take(limit) {
                let category = store
                    .ledger()
                    .category(txn.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                let source = if txn.is_recurring() { "recur" } else { "manual" };
                println!(
                    "{:<14} {:<12} {:<20} {:>12}  {:<8} {}",
                    txn.id.to_string(),
                    txn.date.to_string(),
                    category,
                    txn.amount.to_string(),
                    source,
                    txn.note
                );
            }
        }
        ExpenseCommands::Remove { id } => {
            let transaction_id = find_transaction(store, &id)?;
            let removed = store.remove_expense(transaction_id)?;
            println!("Removed {} from {}", removed.amount, removed.date);
        }
        ExpenseCommands::Export { out } => {
            let transactions = store.current_month_transactions();
            let month = Month::containing(store.today());
            match out {
                Some(path) => {
                    let file = File::create(&path)?;
                    export::write_transactions_csv(file, &transactions, &store.ledger().categories)?;
                    println!(
                        "Exported {} expenses for {} to {}",
                        transactions.len(),
                        month,
                        path.display()
                    );
                }
                None => {
                    export::write_transactions_csv(
                        std::io::stdout().lock(),
                        &transactions,
                        &store.ledger().categories,
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Resolve a transaction id string, accepting the short display form
fn find_transaction(store: &ExpenseStore, id: &str) -> Result<TransactionId> {
    store
        .ledger()
        .transactions
        .iter()
        .find(|t| t.id.matches(id))
        .map(|t| t.id)
        .ok_or_else(|| anyhow!("Transaction not found: {}", id))
}
