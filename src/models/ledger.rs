//! The in-memory ledger
//!
//! The ledger is the single owner of all bookkeeping state: categories,
//! recurring templates, transactions, and the schedule cursor. Core components
//! read it synchronously and mutate it only by appending or updating; nothing
//! in the analytics path deletes records. Persistence mirrors the ledger,
//! never the other way around.

use chrono::NaiveDate;

use super::category::Category;
use super::cursor::ScheduleCursor;
use super::ids::{CategoryId, TemplateId, TransactionId};
use super::month::Month;
use super::template::RecurringTemplate;
use super::transaction::Transaction;

/// All bookkeeping state, owned by the store
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Spending categories; insertion order is the user-visible order
    pub categories: Vec<Category>,

    /// Recurring expense templates
    pub templates: Vec<RecurringTemplate>,

    /// Expense records, kept newest-first for presentation
    pub transactions: Vec<Transaction>,

    /// Recurrence backfill progress
    pub cursor: ScheduleCursor,
}

impl Ledger {
    /// Look up a category by id
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category by display name, case-insensitively
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Look up a template by id
    pub fn template(&self, id: TemplateId) -> Option<&RecurringTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Mutable template lookup
    pub fn template_mut(&mut self, id: TemplateId) -> Option<&mut RecurringTemplate> {
        self.templates.iter_mut().find(|t| t.id == id)
    }

    /// Look up a transaction by id
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Transactions whose occurrence day falls in the given month
    pub fn transactions_in(&self, month: Month) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| month.contains(t.date))
    }

    /// Whether a generated transaction for this `(template, day)` pair exists
    pub fn has_generated(&self, template_id: TemplateId, day: NaiveDate) -> bool {
        self.transactions
            .iter()
            .any(|t| t.source_template_id == Some(template_id) && t.date == day)
    }

    /// Templates that currently participate in scheduling and forecasting
    pub fn active_templates(&self) -> impl Iterator<Item = &RecurringTemplate> {
        self.templates.iter().filter(|t| t.active)
    }
}
