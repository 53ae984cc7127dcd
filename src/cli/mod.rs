//! CLI command handlers
//!
//! Bridges clap argument parsing to the store.

pub mod category;
pub mod expense;
pub mod insights;
pub mod recurring;
pub mod settings_cmd;

pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use insights::{handle_insights_command, InsightsCommands};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use settings_cmd::{handle_settings_command, SettingsCommands};
