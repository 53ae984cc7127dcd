//! Recurrence backfill scheduler
//!
//! Walks the days between the schedule cursor and "today" and materializes
//! every due recurring template into a concrete transaction, exactly once per
//! `(template, day)` pair. Safe to run any number of times per day: the first
//! run of a day does the work, later runs observe an up-to-date cursor and do
//! nothing.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::models::{Ledger, Transaction};

/// Catch-up window after an idle period. Days older than this are permanently
/// skipped; the cursor still advances past them.
pub const MAX_BACKFILL_DAYS: i64 = 120;

/// Run the backfill up to and including `today`
///
/// Mutates the ledger (prepends generated transactions newest-first, advances
/// the cursor) and returns the newly generated records. The cursor advances
/// even when nothing was generated, so a day with no due templates is not
/// retried.
pub fn run(ledger: &mut Ledger, today: NaiveDate) -> Vec<Transaction> {
    let start = match ledger.cursor.last_run_date {
        Some(last) => last + Duration::days(1),
        // First run establishes the baseline; nothing is generated
        // retroactively.
        None => today,
    };

    if start > today {
        return Vec::new();
    }

    let floor = today - Duration::days(MAX_BACKFILL_DAYS);
    let clamped = start.max(floor);
    if clamped > start {
        let skipped = (clamped - start).num_days();
        tracing::warn!(
            skipped_days = skipped,
            "backfill window capped at {} days; older recurring expenses were not generated",
            MAX_BACKFILL_DAYS
        );
    }

    // Seed the guard with every generated pair already in the ledger, so
    // overlapping windows across repeated runs never duplicate.
    let mut seen: HashSet<_> = ledger
        .transactions
        .iter()
        .filter_map(|t| t.source_template_id.map(|id| (id, t.date)))
        .collect();

    let mut generated = Vec::new();
    let mut day = clamped;
    while day <= today {
        for template in ledger.templates.iter().filter(|t| t.is_due(day)) {
            if seen.insert((template.id, day)) {
                generated.push(Transaction::generated_from(template, day));
            }
        }
        day = day + Duration::days(1);
    }

    if !generated.is_empty() {
        tracing::debug!(count = generated.len(), "generated recurring expenses");
        let mut batch = generated.clone();
        batch.sort_by(|a, b| b.date.cmp(&a.date));
        ledger.transactions.splice(0..0, batch);
    }

    ledger.cursor.advance_to(today);
    generated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryId, Money, RecurringTemplate};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_with_templates() -> (Ledger, CategoryId, CategoryId) {
        let mut ledger = Ledger::default();
        let food = Category::new("Food", Money::from_cents(50000));
        let rent = Category::new("Rent", Money::from_cents(150000));
        let (food_id, rent_id) = (food.id, rent.id);
        ledger.categories.push(food);
        ledger.categories.push(rent);

        ledger.templates.push(RecurringTemplate::monthly(
            rent_id,
            Money::from_cents(120000),
            "Rent",
            1,
        ));
        // Weekday 2 = Monday in the 1 = Sunday numbering
        ledger.templates.push(RecurringTemplate::weekly(
            food_id,
            Money::from_cents(5000),
            "Weekly groceries",
            2,
        ));
        (ledger, food_id, rent_id)
    }

    #[test]
    fn test_first_run_only_establishes_baseline() {
        let (mut ledger, _, _) = ledger_with_templates();
        let today = day(2026, 2, 20);

        let generated = run(&mut ledger, today);

        // 2026-02-20 is a Friday and not the 1st, so nothing is due today,
        // and nothing older is generated retroactively.
        assert!(generated.is_empty());
        assert_eq!(ledger.cursor.last_run_date, Some(today));
    }

    #[test]
    fn test_first_run_generates_when_due_today() {
        let (mut ledger, _, rent_id) = ledger_with_templates();
        let today = day(2026, 3, 1);

        let generated = run(&mut ledger, today);

        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].category_id, rent_id);
        assert_eq!(generated[0].date, today);
    }

    #[test]
    fn test_catch_up_window_generates_each_due_day_once() {
        let (mut ledger, _, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2026, 1, 31));

        let generated = run(&mut ledger, day(2026, 2, 28));

        // Feb 2026: rent on the 1st; Mondays are 2, 9, 16, 23.
        let rent_count = generated.iter().filter(|t| t.note == "Rent").count();
        let food_count = generated
            .iter()
            .filter(|t| t.note == "Weekly groceries")
            .count();
        assert_eq!(rent_count, 1);
        assert_eq!(food_count, 4);
        assert_eq!(ledger.transactions.len(), 5);
    }

    #[test]
    fn test_idempotent_within_a_day() {
        let (mut ledger, _, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2026, 1, 31));
        let today = day(2026, 2, 28);

        let first = run(&mut ledger, today);
        let count_after_first = ledger.transactions.len();
        let cursor_after_first = ledger.cursor;

        let second = run(&mut ledger, today);

        assert!(!first.is_empty());
        assert!(second.is_empty());
        assert_eq!(ledger.transactions.len(), count_after_first);
        assert_eq!(ledger.cursor, cursor_after_first);
    }

    #[test]
    fn test_cursor_advances_even_when_nothing_due() {
        let (mut ledger, _, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2026, 2, 17));

        // Feb 18-20 2026: Wed-Fri, no rent day, no Monday.
        let generated = run(&mut ledger, day(2026, 2, 20));

        assert!(generated.is_empty());
        assert_eq!(ledger.cursor.last_run_date, Some(day(2026, 2, 20)));
    }

    #[test]
    fn test_backfill_bound_skips_days_older_than_cap() {
        let (mut ledger, _, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2025, 1, 1));
        let today = day(2026, 2, 20);

        let generated = run(&mut ledger, today);

        let floor = today - Duration::days(MAX_BACKFILL_DAYS);
        assert!(!generated.is_empty());
        assert!(generated.iter().all(|t| t.date >= floor && t.date <= today));
        assert_eq!(ledger.cursor.last_run_date, Some(today));
    }

    #[test]
    fn test_no_duplicates_across_overlapping_windows() {
        let (mut ledger, _, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2026, 1, 31));

        run(&mut ledger, day(2026, 2, 14));
        // Rewind the cursor to force the windows to overlap.
        ledger.cursor.advance_to(day(2026, 2, 7));
        run(&mut ledger, day(2026, 2, 28));

        let mut pairs: Vec<_> = ledger
            .transactions
            .iter()
            .filter_map(|t| t.source_template_id.map(|id| (id, t.date)))
            .collect();
        let total = pairs.len();
        pairs.sort_by_key(|(id, date)| (*id.as_uuid(), *date));
        pairs.dedup();
        assert_eq!(pairs.len(), total, "duplicate (template, day) pair generated");
    }

    #[test]
    fn test_manual_entry_does_not_block_generation() {
        let (mut ledger, food_id, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2026, 2, 1));
        // A manual expense on a Monday; only generated entries participate in
        // the idempotency guard.
        ledger.transactions.push(Transaction::manual(
            food_id,
            Money::from_cents(5000),
            day(2026, 2, 2),
            "Groceries run",
        ));

        let generated = run(&mut ledger, day(2026, 2, 2));

        assert_eq!(generated.len(), 1);
        assert!(generated[0].is_recurring());
    }

    #[test]
    fn test_inactive_template_generates_nothing() {
        let (mut ledger, _, _) = ledger_with_templates();
        for tpl in &mut ledger.templates {
            tpl.active = false;
        }
        ledger.cursor.advance_to(day(2026, 1, 31));

        let generated = run(&mut ledger, day(2026, 2, 28));

        assert!(generated.is_empty());
        assert_eq!(ledger.cursor.last_run_date, Some(day(2026, 2, 28)));
    }

    #[test]
    fn test_generated_batch_is_prepended_newest_first() {
        let (mut ledger, _, _) = ledger_with_templates();
        ledger.cursor.advance_to(day(2026, 1, 31));

        run(&mut ledger, day(2026, 2, 28));

        let dates: Vec<_> = ledger.transactions.iter().map(|t| t.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }
}
