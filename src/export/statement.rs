//! Plain-text monthly statement
//!
//! The document rendering collaborator: a paginated statement for one month
//! with totals, a per-category breakdown, and the transaction register in
//! pages of 28 rows.

use std::io::Write;

use crate::display::{format_bar, double_separator, separator};
use crate::error::{OutlayError, OutlayResult};
use crate::models::{Category, Money, Month, Transaction};

/// Transaction rows per statement page
const ROWS_PER_PAGE: usize = 28;

/// Render a monthly statement to any writer
///
/// The caller supplies the month's transactions and the category lookup;
/// rows are printed newest-first.
pub fn write_statement<W: Write>(
    mut writer: W,
    month: Month,
    transactions: &[Transaction],
    categories: &[Category],
) -> OutlayResult<()> {
    let mut rows: Vec<&Transaction> = transactions.iter().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let total: Money = rows.iter().map(|t| t.amount).sum();

    let out = |w: &mut W, line: String| -> OutlayResult<()> {
        writeln!(w, "{}", line).map_err(|e| OutlayError::Export(e.to_string()))
    };

    out(&mut writer, format!("Outlay statement - {}", month.label()))?;
    out(&mut writer, double_separator(60))?;
    out(&mut writer, format!("Total spent: {}", total))?;
    out(&mut writer, String::new())?;

    // Per-category breakdown, highest spend first.
    let mut by_category: Vec<(&Category, Money)> = categories
        .iter()
        .map(|c| {
            let spent: Money = rows
                .iter()
                .filter(|t| t.category_id == c.id)
                .map(|t| t.amount)
                .sum();
            (c, spent)
        })
        .filter(|(_, spent)| spent.is_positive())
        .collect();
    by_category.sort_by(|a, b| b.1.cmp(&a.1));

    if !by_category.is_empty() {
        let max = by_category[0].1.to_float();
        for (category, spent) in &by_category {
            out(
                &mut writer,
                format!(
                    "{:<20} {:>12}  {}",
                    category.name,
                    spent.to_string(),
                    format_bar(spent.to_float(), max, 20)
                ),
            )?;
        }
        out(&mut writer, String::new())?;
    }

    for (page, chunk) in rows.chunks(ROWS_PER_PAGE).enumerate() {
        if page > 0 {
            out(&mut writer, String::new())?;
        }
        out(&mut writer, format!("Transactions - page {}", page + 1))?;
        out(&mut writer, separator(60))?;
        for txn in chunk {
            let category = categories
                .iter()
                .find(|c| c.id == txn.category_id)
                .map(|c| c.name.as_str())
                .unwrap_or("Unknown");
            out(
                &mut writer,
                format!(
                    "{}  {:<20} {:>12}  {}",
                    txn.date.format("%Y-%m-%d"),
                    category,
                    txn.amount.to_string(),
                    txn.note
                ),
            )?;
        }
    }

    Ok(())
}
