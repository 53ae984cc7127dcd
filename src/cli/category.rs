//! Category CLI commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::display::{format_bar, format_money_colored, separator};
use crate::models::Money;
use crate::store::ExpenseStore;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a new category
    Add {
        /// Category name
        name: String,
        /// Monthly budget (e.g., "500" or "500.00")
        budget: String,
    },

    /// List categories with current-month spend and remaining budget
    List,

    /// Change a category's monthly budget
    Budget {
        /// Category name
        name: String,
        /// New monthly budget
        amount: String,
    },
}

/// Handle a category command
pub fn handle_category_command(store: &mut ExpenseStore, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Add { name, budget } => {
            let budget = Money::parse(&budget).map_err(|e| anyhow!(e.to_string()))?;
            let category = store.add_category(&name, budget)?;
            println!(
                "Added category '{}' with monthly budget {}",
                category.name, category.monthly_budget
            );
        }
        CategoryCommands::List => {
            let ranked = store.categories_ranked_by_spend();
            if ranked.is_empty() {
                println!("No categories yet. Add one with 'outlay category add <name> <budget>'.");
                return Ok(());
            }

            println!(
                "{:<20} {:>12} {:>12} {:>12}  usage",
                "Category", "Budget", "Spent", "Remaining"
            );
            println!("{}", separator(76));
            for (category, spent) in ranked {
                let remaining = store.remaining_budget(category.id);
                let usage = if category.monthly_budget.is_positive() {
                    spent.to_float() / category.monthly_budget.to_float()
                } else {
                    0.0
                };
                println!(
                    "{:<20} {:>12} {:>12} {:>12}  {}",
                    category.name,
                    category.monthly_budget.to_string(),
                    spent.to_string(),
                    format_money_colored(remaining),
                    format_bar(usage, 1.0, 10)
                );
            }
        }
        CategoryCommands::Budget { name, amount } => {
            let amount = Money::parse(&amount).map_err(|e| anyhow!(e.to_string()))?;
            let category_id = store
                .ledger()
                .category_by_name(&name)
                .ok_or_else(|| anyhow!("Category not found: {}", name))?
                .id;
            let updated = store.update_budget(category_id, amount)?;
            println!(
                "Updated '{}' monthly budget to {}",
                updated.name, updated.monthly_budget
            );
        }
    }
    Ok(())
}
