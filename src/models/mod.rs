//! Core data models for Outlay
//!
//! Everything the store keeps in memory: money, IDs, calendar months,
//! categories, recurring templates, transactions, and the ledger that owns
//! them.

pub mod category;
pub mod cursor;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod month;
pub mod template;
pub mod transaction;

pub use category::{Category, CategoryValidationError};
pub use cursor::ScheduleCursor;
pub use ids::{CategoryId, TemplateId, TransactionId};
pub use ledger::Ledger;
pub use money::{Money, MoneyParseError};
pub use month::Month;
pub use template::{Frequency, RecurringTemplate, TemplateValidationError, MAX_DAY_OF_MONTH};
pub use transaction::Transaction;
