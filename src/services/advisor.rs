//! Savings tips and monthly suggestions
//!
//! Ranks categories and periods into human-readable advice. The thresholds
//! (over budget, above 80% of budget, the 10% trim) and the fixed four-slot
//! suggestion priority come straight from the product contract; callers rely
//! on the ordering.

use chrono::NaiveDate;

use crate::models::{Ledger, Money, Month};

use super::{aggregation, forecast};

/// A ranked, actionable savings recommendation
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsTip {
    pub title: String,
    pub message: String,
    pub potential_savings: Money,
}

/// Per-category savings tips for the month containing `today`, largest
/// potential savings first
///
/// Categories with a zero budget are not scored. When every budgeted category
/// is comfortably inside its budget, a single neutral "on track" tip with zero
/// savings is returned instead of an empty list.
pub fn savings_tips(ledger: &Ledger, today: NaiveDate) -> Vec<SavingsTip> {
    let month = Month::containing(today);
    let mut tips = Vec::new();

    for category in &ledger.categories {
        if !category.monthly_budget.is_positive() {
            continue;
        }

        let spent = aggregation::category_spend(ledger, category.id, month);
        let usage = spent.to_float() / category.monthly_budget.to_float();

        if usage > 1.0 {
            let overspend = spent - category.monthly_budget;
            tips.push(SavingsTip {
                title: format!("Reduce {}", category.name),
                message: format!(
                    "You are over budget in {}. Cap this by planning a weekly limit.",
                    category.name
                ),
                potential_savings: overspend,
            });
        } else if usage > 0.8 {
            tips.push(SavingsTip {
                title: format!("Optimize {}", category.name),
                message: format!(
                    "{} is nearing its limit. A 10% cut can keep you in control.",
                    category.name
                ),
                potential_savings: Money::from_float(category.monthly_budget.to_float() * 0.1),
            });
        }
    }

    if tips.is_empty() {
        tips.push(SavingsTip {
            title: "Spending on track".to_string(),
            message: "Your category spending is healthy. Keep tracking daily to maintain this trend."
                .to_string(),
            potential_savings: Money::zero(),
        });
    }

    tips.sort_by(|a, b| b.potential_savings.cmp(&a.potential_savings));
    tips
}

/// Up to four suggestion lines for the month containing `reference`, in fixed
/// priority order
///
/// 1. Month-over-month movement (omitted only when the delta is exactly zero;
///    worded by amount when the previous month had no spend).
/// 2. The single most-over-budget category, if any.
/// 3. The category with the largest spend increase, if any.
/// 4. Forecast versus income: a shortfall warning or a savings target.
pub fn monthly_suggestions(
    ledger: &Ledger,
    monthly_income: Money,
    reference: NaiveDate,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    let summary = forecast::month_over_month(ledger, reference);
    let delta = summary.delta();
    if delta.is_positive() {
        match summary.percent_change() {
            Some(pct) => suggestions.push(format!(
                "Spending is up {:.1}% vs last month. Set tighter weekly limits this month.",
                pct
            )),
            None => suggestions.push(format!(
                "Spending is up {} vs last month. Set tighter weekly limits this month.",
                delta
            )),
        }
    } else if delta.is_negative() {
        suggestions.push(format!(
            "Great progress. You reduced spending by {} compared with last month.",
            delta.abs()
        ));
    }

    let month = Month::containing(reference);
    let worst_overspend = ledger
        .categories
        .iter()
        .filter(|c| c.monthly_budget.is_positive())
        .filter_map(|c| {
            let overspend =
                aggregation::category_spend(ledger, c.id, month) - c.monthly_budget;
            overspend.is_positive().then_some((c, overspend))
        })
        .max_by_key(|(_, overspend)| *overspend);
    if let Some((category, overspend)) = worst_overspend {
        suggestions.push(format!(
            "You're over budget in {} by {}. Add a hard cap for this category.",
            category.name, overspend
        ));
    }

    let deltas = forecast::category_deltas(ledger, reference);
    if let Some(rise) = deltas.iter().find(|d| d.delta().is_positive()) {
        suggestions.push(format!(
            "{} increased most this month (+{}). Review these transactions first.",
            rise.category_name,
            rise.delta()
        ));
    }

    let projected = forecast::forecast_next_month(ledger, reference);
    let income = monthly_income.to_float();
    if projected > income {
        suggestions.push(format!(
            "Forecasted spend ({}) is above income. Reduce discretionary categories by at least {}.",
            Money::from_float(projected),
            Money::from_float(projected - income)
        ));
    } else {
        suggestions.push(format!(
            "Forecasted spend is {}. You can target savings of {} next month.",
            Money::from_float(projected),
            Money::from_float((income - projected).max(0.0))
        ));
    }

    suggestions.truncate(4);
    suggestions
}

/// What is left of the income after the current month's spend, floored at zero
pub fn monthly_savings_estimate(ledger: &Ledger, monthly_income: Money, today: NaiveDate) -> Money {
    let spent = aggregation::total_for_month(ledger, Month::containing(today));
    let estimate = monthly_income - spent;
    if estimate.is_negative() {
        Money::zero()
    } else {
        estimate
    }
}
