//! Export collaborator
//!
//! CSV and plain-text statement rendering over a supplied transaction list
//! and category lookup.

pub mod csv;
pub mod statement;

pub use csv::write_transactions_csv;
pub use statement::write_statement;
