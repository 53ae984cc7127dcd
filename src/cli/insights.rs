//! Insights CLI commands

use anyhow::Result;
use clap::Subcommand;

use crate::display::{double_separator, format_bar, format_percentage, format_signed, separator};
use crate::models::Money;
use crate::store::ExpenseStore;

/// Insights subcommands
#[derive(Subcommand)]
pub enum InsightsCommands {
    /// Current-month overview: totals, budget usage, savings estimate
    Summary,

    /// Ranked savings tips
    Tips,

    /// Monthly suggestions
    Suggestions,

    /// Monthly spend trend
    Trend {
        /// Number of months to show
        #[arg(short, long, default_value = "6")]
        months: usize,
    },

    /// Next-month spend forecast
    Forecast,
}

/// Handle an insights command
pub fn handle_insights_command(store: &ExpenseStore, cmd: InsightsCommands) -> Result<()> {
    match cmd {
        InsightsCommands::Summary => {
            println!("Month overview");
            println!("{}", double_separator(50));
            println!("Spent this month:   {}", store.current_month_total());
            println!(
                "Budget usage:       {}",
                format_percentage(store.budget_usage_percent())
            );
            println!(
                "Savings estimate:   {}",
                store.monthly_savings_estimate()
            );

            let summary = store.month_over_month();
            print!("Vs last month:      {}", format_signed(summary.delta()));
            match summary.percent_change() {
                Some(pct) => println!(" ({})", format_percentage(pct.abs())),
                None => println!(),
            }
        }
        InsightsCommands::Tips => {
            for tip in store.savings_tips() {
                println!("{} (save {})", tip.title, tip.potential_savings);
                println!("  {}", tip.message);
            }
        }
        InsightsCommands::Suggestions => {
            for (i, suggestion) in store.monthly_suggestions().iter().enumerate() {
                println!("{}. {}", i + 1, suggestion);
            }
        }
        InsightsCommands::Trend { months } => {
            let series = store.monthly_spend_series(months);
            let max = series
                .iter()
                .map(|p| p.amount.to_float())
                .fold(0.0_f64, f64::max);

            println!("Monthly spend, oldest first");
            println!("{}", separator(50));
            for point in &series {
                println!(
                    "{:<10} {:>12}  {}",
                    point.month.label(),
                    point.amount.to_string(),
                    format_bar(point.amount.to_float(), max, 20)
                );
            }

            let deltas = store.category_deltas();
            if !deltas.is_empty() {
                println!();
                println!("Largest category swings vs last month");
                println!("{}", separator(50));
                for delta in deltas.iter().take(5) {
                    print!(
                        "{:<20} {}",
                        delta.category_name,
                        format_signed(delta.delta())
                    );
                    match delta.percent_change() {
                        Some(pct) => println!(" ({})", format_percentage(pct.abs())),
                        None => println!(),
                    }
                }
            }
        }
        InsightsCommands::Forecast => {
            let forecast = Money::from_float(store.forecast_next_month());
            let income = store.settings().monthly_income;
            println!("Forecast next month: {}", forecast);
            println!("Monthly income:      {}", income);
            if forecast > income {
                println!("Projected shortfall: {}", forecast - income);
            } else {
                println!("Projected savings:   {}", income - forecast);
            }
        }
    }
    Ok(())
}
