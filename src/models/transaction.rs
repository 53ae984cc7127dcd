//! Transaction model
//!
//! A transaction is a materialized expense: either entered manually or
//! generated by the backfill scheduler from a recurring template. Generated
//! transactions carry their source template id, which is what the scheduler's
//! idempotency guard keys on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TemplateId, TransactionId};
use super::money::Money;
use super::template::RecurringTemplate;

/// A concrete expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Category this expense is charged to
    pub category_id: CategoryId,

    /// Template that generated this expense, if any (`None` = manual entry)
    pub source_template_id: Option<TemplateId>,

    /// Expense amount (positive)
    pub amount: Money,

    /// Calendar day the expense occurred; time of day carries no meaning
    pub date: NaiveDate,

    /// Free-form note
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// Create a manually entered expense
    pub fn manual(
        category_id: CategoryId,
        amount: Money,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            category_id,
            source_template_id: None,
            amount,
            date,
            note: note.into(),
        }
    }

    /// Materialize an expense from a recurring template on the given day
    pub fn generated_from(template: &RecurringTemplate, date: NaiveDate) -> Self {
        Self {
            id: TransactionId::new(),
            category_id: template.category_id,
            source_template_id: Some(template.id),
            amount: template.amount,
            date,
            note: template.note.clone(),
        }
    }

    /// Whether this expense was generated from a recurring template
    pub fn is_recurring(&self) -> bool {
        self.source_template_id.is_some()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date.format("%Y-%m-%d"), self.amount, self.note)
    }
}
