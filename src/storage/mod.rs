//! Storage layer for Outlay
//!
//! The persistence collaborator: durably mirrors the in-memory ledger as one
//! JSON file per logical record (categories, templates, transactions, schedule
//! cursor), written atomically. The ledger in memory is the source of truth;
//! storage only follows it.

pub mod file_io;

pub use file_io::{read_json_opt, write_json_atomic};

use serde::{Deserialize, Serialize};

use crate::config::paths::OutlayPaths;
use crate::error::OutlayResult;
use crate::models::{Category, Ledger, RecurringTemplate, ScheduleCursor, Transaction};

/// Serializable wrapper for the categories record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Serializable wrapper for the templates record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TemplateData {
    templates: Vec<RecurringTemplate>,
}

/// Serializable wrapper for the transactions record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// JSON-file persistence for the ledger
pub struct Storage {
    paths: OutlayPaths,
}

impl Storage {
    /// Create a new Storage instance, ensuring the data directories exist
    pub fn new(paths: OutlayPaths) -> OutlayResult<Self> {
        paths.ensure_directories()?;
        Ok(Self { paths })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &OutlayPaths {
        &self.paths
    }

    /// Load the full ledger from disk
    ///
    /// Returns `Ok(None)` on first run (no record files exist yet). A
    /// malformed record is treated the same way: the caller starts from a
    /// fresh ledger, and the damage is logged rather than propagated.
    pub fn load_ledger(&self) -> OutlayResult<Option<Ledger>> {
        let first_run = !self.paths.categories_file().exists()
            && !self.paths.templates_file().exists()
            && !self.paths.transactions_file().exists()
            && !self.paths.cursor_file().exists();
        if first_run {
            return Ok(None);
        }

        match self.try_load_ledger() {
            Ok(ledger) => Ok(Some(ledger)),
            Err(err) => {
                tracing::warn!(error = %err, "stored ledger unreadable; starting fresh");
                Ok(None)
            }
        }
    }

    fn try_load_ledger(&self) -> OutlayResult<Ledger> {
        let categories: CategoryData =
            read_json_opt(self.paths.categories_file())?.unwrap_or_default();
        let templates: TemplateData =
            read_json_opt(self.paths.templates_file())?.unwrap_or_default();
        let transactions: TransactionData =
            read_json_opt(self.paths.transactions_file())?.unwrap_or_default();
        let cursor: ScheduleCursor =
            read_json_opt(self.paths.cursor_file())?.unwrap_or_default();

        Ok(Ledger {
            categories: categories.categories,
            templates: templates.templates,
            transactions: transactions.transactions,
            cursor,
        })
    }

    /// Persist the categories record
    pub fn save_categories(&self, categories: &[Category]) -> OutlayResult<()> {
        let data = CategoryData {
            categories: categories.to_vec(),
        };
        write_json_atomic(self.paths.categories_file(), &data)
    }

    /// Persist the templates record
    pub fn save_templates(&self, templates: &[RecurringTemplate]) -> OutlayResult<()> {
        let data = TemplateData {
            templates: templates.to_vec(),
        };
        write_json_atomic(self.paths.templates_file(), &data)
    }

    /// Persist the transactions record
    pub fn save_transactions(&self, transactions: &[Transaction]) -> OutlayResult<()> {
        let data = TransactionData {
            transactions: transactions.to_vec(),
        };
        write_json_atomic(self.paths.transactions_file(), &data)
    }

    /// Persist the schedule cursor record
    pub fn save_cursor(&self, cursor: &ScheduleCursor) -> OutlayResult<()> {
        write_json_atomic(self.paths.cursor_file(), cursor)
    }

    /// Persist every record of the ledger
    pub fn save_ledger(&self, ledger: &Ledger) -> OutlayResult<()> {
        self.save_categories(&ledger.categories)?;
        self.save_templates(&ledger.templates)?;
        self.save_transactions(&ledger.transactions)?;
        self.save_cursor(&ledger.cursor)
    }
}
