//! Trend and forecast computation
//!
//! Derives a forward-looking spend estimate from recent months plus the
//! steady-state cost implied by active recurring templates. The forecast is a
//! fixed-weight heuristic, not a statistical model: trailing three-month
//! average weighted 0.6 plus the recurring baseline weighted 0.4, with weekly
//! templates counted at 4.33 weeks per month.

use chrono::NaiveDate;

use crate::models::{CategoryId, Frequency, Ledger, Money, Month};

use super::aggregation;

/// Weight of the trailing spend average in the forecast
pub const TREND_WEIGHT: f64 = 0.6;

/// Weight of the recurring-template baseline in the forecast
pub const BASELINE_WEIGHT: f64 = 0.4;

/// Average weeks per calendar month, used to monthlyize weekly templates
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// One point of the monthly spend series
#[derive(Debug, Clone, PartialEq)]
pub struct SpendPoint {
    pub month: Month,
    pub amount: Money,
}

/// Current month versus the previous one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthComparison {
    pub current: Money,
    pub previous: Money,
}

impl MonthComparison {
    /// Spend change, current minus previous
    pub fn delta(&self) -> Money {
        self.current - self.previous
    }

    /// Percent change relative to the previous month
    ///
    /// `None` when the previous month had no spend; a ratio against zero is
    /// undefined, not 0%.
    pub fn percent_change(&self) -> Option<f64> {
        if !self.previous.is_positive() {
            return None;
        }
        Some(self.delta().to_float() / self.previous.to_float() * 100.0)
    }
}

/// Month-over-month movement of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDelta {
    pub category_id: CategoryId,
    pub category_name: String,
    pub current: Money,
    pub previous: Money,
}

impl CategoryDelta {
    /// Spend change, current minus previous
    pub fn delta(&self) -> Money {
        self.current - self.previous
    }

    /// Percent change relative to the previous month; `None` when the
    /// previous month had no spend
    pub fn percent_change(&self) -> Option<f64> {
        if !self.previous.is_positive() {
            return None;
        }
        Some(self.delta().to_float() / self.previous.to_float() * 100.0)
    }
}

/// Monthly spend totals for the `n` consecutive months ending at the month
/// containing `reference`, oldest first
///
/// Always returns at least two points so a trend is visible.
pub fn series(ledger: &Ledger, months: usize, reference: NaiveDate) -> Vec<SpendPoint> {
    let months = months.max(2);
    let current = Month::containing(reference);

    let mut month = current;
    let mut points = Vec::with_capacity(months);
    for _ in 0..months {
        points.push(SpendPoint {
            month,
            amount: aggregation::total_for_month(ledger, month),
        });
        month = month.prev();
    }
    points.reverse();
    points
}

/// Compare the month containing `reference` with the month before it
pub fn month_over_month(ledger: &Ledger, reference: NaiveDate) -> MonthComparison {
    let current = Month::containing(reference);
    MonthComparison {
        current: aggregation::total_for_month(ledger, current),
        previous: aggregation::total_for_month(ledger, current.prev()),
    }
}

/// Per-category month-over-month movement, largest absolute swing first
///
/// Categories inactive in both months are omitted.
pub fn category_deltas(ledger: &Ledger, reference: NaiveDate) -> Vec<CategoryDelta> {
    let current = Month::containing(reference);
    let current_totals = aggregation::total_by_category_for_month(ledger, current);
    let previous_totals = aggregation::total_by_category_for_month(ledger, current.prev());

    let mut deltas: Vec<CategoryDelta> = ledger
        .categories
        .iter()
        .map(|category| CategoryDelta {
            category_id: category.id,
            category_name: category.name.clone(),
            current: current_totals.get(&category.id).copied().unwrap_or_default(),
            previous: previous_totals
                .get(&category.id)
                .copied()
                .unwrap_or_default(),
        })
        .filter(|d| d.current.is_positive() || d.previous.is_positive())
        .collect();

    deltas.sort_by(|a, b| b.delta().abs().cmp(&a.delta().abs()));
    deltas
}

/// Steady-state monthly cost implied by active templates, in currency units
pub fn recurring_baseline(ledger: &Ledger) -> f64 {
    ledger
        .active_templates()
        .map(|t| match t.frequency {
            Frequency::Monthly => t.amount.to_float(),
            Frequency::Weekly => t.amount.to_float() * WEEKS_PER_MONTH,
        })
        .sum()
}

/// Estimated spend for the month after the one containing `reference`
pub fn forecast_next_month(ledger: &Ledger, reference: NaiveDate) -> f64 {
    let trend = series(ledger, 3, reference);
    let trailing_average = if trend.is_empty() {
        0.0
    } else {
        trend.iter().map(|p| p.amount.to_float()).sum::<f64>() / trend.len() as f64
    };
    trailing_average * TREND_WEIGHT + recurring_baseline(ledger) * BASELINE_WEIGHT
}
