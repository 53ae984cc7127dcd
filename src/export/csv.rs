//! CSV export
//!
//! Writes a transaction list as CSV with the columns
//! `date,category,amount,note,source`, newest-first, amounts as plain
//! decimals, `source` marking manual versus recurring entries.

use std::io::Write;

use crate::error::OutlayResult;
use crate::models::{Category, Transaction};

/// Write transactions as CSV to any writer
///
/// The caller supplies the (already filtered) transaction list and the
/// category lookup; unknown category ids render as "Unknown".
pub fn write_transactions_csv<W: Write>(
    writer: W,
    transactions: &[Transaction],
    categories: &[Category],
) -> OutlayResult<()> {
    let mut rows: Vec<&Transaction> = transactions.iter().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["date", "category", "amount", "note", "source"])?;

    for txn in rows {
        let category = categories
            .iter()
            .find(|c| c.id == txn.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");
        let source = if txn.is_recurring() { "recurring" } else { "manual" };

        csv_writer.write_record([
            txn.date.format("%Y-%m-%d").to_string().as_str(),
            category,
            txn.amount.to_decimal_string().as_str(),
            txn.note.as_str(),
            source,
        ])?;
    }

    csv_writer.flush().map_err(crate::error::OutlayError::from)?;
    Ok(())
}
