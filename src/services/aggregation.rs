//! Month-bucketed aggregation
//!
//! Pure read-only queries over the ledger. Every function here is a
//! deterministic computation on an in-memory snapshot; an empty ledger
//! produces zeros and empty maps, never an error.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Category, CategoryId, Ledger, Money, Month};

/// The calendar-month window containing a given day
pub fn month_window(day: NaiveDate) -> Month {
    Month::containing(day)
}

/// Total spend in a month
pub fn total_for_month(ledger: &Ledger, month: Month) -> Money {
    ledger.transactions_in(month).map(|t| t.amount).sum()
}

/// Spend in a month grouped by category
///
/// Categories with no activity are absent from the map; callers default to
/// zero.
pub fn total_by_category_for_month(ledger: &Ledger, month: Month) -> HashMap<CategoryId, Money> {
    let mut totals: HashMap<CategoryId, Money> = HashMap::new();
    for txn in ledger.transactions_in(month) {
        *totals.entry(txn.category_id).or_default() += txn.amount;
    }
    totals
}

/// Spend for one category in a month
pub fn category_spend(ledger: &Ledger, category_id: CategoryId, month: Month) -> Money {
    ledger
        .transactions_in(month)
        .filter(|t| t.category_id == category_id)
        .map(|t| t.amount)
        .sum()
}

/// Sum of all category budgets
pub fn total_budget(ledger: &Ledger) -> Money {
    ledger.categories.iter().map(|c| c.monthly_budget).sum()
}

/// Percentage of the combined budget spent in the month containing `today`
///
/// Defined as 0 when the total budget is 0.
pub fn budget_usage_percent(ledger: &Ledger, today: NaiveDate) -> f64 {
    let budget = total_budget(ledger);
    if !budget.is_positive() {
        return 0.0;
    }
    let spent = total_for_month(ledger, month_window(today));
    spent.to_float() / budget.to_float() * 100.0
}

/// Budget left for a category in the month containing `today`
///
/// Negative when overspent; zero for an unknown category id.
pub fn remaining_budget(ledger: &Ledger, category_id: CategoryId, today: NaiveDate) -> Money {
    let Some(category) = ledger.category(category_id) else {
        return Money::zero();
    };
    category.monthly_budget - category_spend(ledger, category_id, month_window(today))
}

/// Categories paired with their spend in the month containing `today`,
/// highest spend first; ties keep the ledger's category order
pub fn categories_ranked_by_spend(ledger: &Ledger, today: NaiveDate) -> Vec<(Category, Money)> {
    let totals = total_by_category_for_month(ledger, month_window(today));
    let mut ranked: Vec<(Category, Money)> = ledger
        .categories
        .iter()
        .map(|c| {
            let spent = totals.get(&c.id).copied().unwrap_or_default();
            (c.clone(), spent)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
