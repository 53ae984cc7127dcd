//! Recurring template CLI commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::display::separator;
use crate::models::{Frequency, Money, RecurringTemplate, TemplateId};
use crate::store::ExpenseStore;

/// Recurring template subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Add a recurring expense template
    Add {
        /// Category name
        category: String,
        /// Amount of each generated expense
        amount: String,
        /// Fire monthly on this day (1-28)
        #[arg(long, conflicts_with = "weekly", value_name = "DAY")]
        monthly: Option<u32>,
        /// Fire weekly on this weekday (1 = Sunday ... 7 = Saturday)
        #[arg(long, conflicts_with = "monthly", value_name = "WEEKDAY")]
        weekly: Option<u32>,
        /// Note copied onto generated expenses
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// List recurring templates
    List,

    /// Pause a template (it stops firing)
    Pause {
        /// Template id (full or short form, e.g. "tpl-1a2b3c4d")
        id: String,
    },

    /// Resume a paused template
    Resume {
        /// Template id
        id: String,
    },

    /// Run the recurrence backfill now
    Run,
}

/// Handle a recurring-template command
pub fn handle_recurring_command(store: &mut ExpenseStore, cmd: RecurringCommands) -> Result<()> {
    match cmd {
        RecurringCommands::Add {
            category,
            amount,
            monthly,
            weekly,
            note,
        } => {
            let amount = Money::parse(&amount).map_err(|e| anyhow!(e.to_string()))?;
            let category_id = store
                .ledger()
                .category_by_name(&category)
                .ok_or_else(|| anyhow!("Category not found: {}", category))?
                .id;

            let template = match (monthly, weekly) {
                (Some(day), None) => {
                    RecurringTemplate::monthly(category_id, amount, note.as_str(), day)
                }
                (None, Some(weekday)) => {
                    RecurringTemplate::weekly(category_id, amount, note.as_str(), weekday)
                }
                _ => return Err(anyhow!("Specify exactly one of --monthly or --weekly")),
            };

            let (created, generated) = store.add_template(template)?;
            println!(
                "Added {} template {} for {} in {}",
                created.frequency, created.id, created.amount, category
            );
            if !generated.is_empty() {
                println!("Generated {} expense(s) due today.", generated.len());
            }
        }
        RecurringCommands::List => {
            let templates = &store.ledger().templates;
            if templates.is_empty() {
                println!("No recurring templates.");
                return Ok(());
            }

            println!(
                "{:<14} {:<20} {:>12} {:<10} {:<10} {:<7} note",
                "ID", "Category", "Amount", "Frequency", "Anchor", "Active"
            );
            println!("{}", separator(90));
            for tpl in templates {
                let category = store
                    .ledger()
                    .category(tpl.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                let anchor = match tpl.frequency {
                    Frequency::Weekly => format!("wday {}", tpl.weekday.unwrap_or(0)),
                    Frequency::Monthly => format!("day {}", tpl.day_of_month.unwrap_or(0)),
                };
                println!(
                    "{:<14} {:<20} {:>12} {:<10} {:<10} {:<7} {}",
                    tpl.id.to_string(),
                    category,
                    tpl.amount.to_string(),
                    tpl.frequency.to_string(),
                    anchor,
                    if tpl.active { "yes" } else { "paused" },
                    tpl.note
                );
            }
        }
        RecurringCommands::Pause { id } => {
            let template_id = find_template(store, &id)?;
            let tpl = store.set_template_active(template_id, false)?;
            println!("Paused template {}", tpl.id);
        }
        RecurringCommands::Resume { id } => {
            let template_id = find_template(store, &id)?;
            let tpl = store.set_template_active(template_id, true)?;
            println!("Resumed template {}", tpl.id);
        }
        RecurringCommands::Run => {
            let generated = store.run_recurrence()?;
            if generated.is_empty() {
                println!("Schedule already up to date.");
            } else {
                println!("Generated {} expense(s).", generated.len());
                for txn in generated {
                    println!("  {}", txn);
                }
            }
        }
    }
    Ok(())
}

/// Resolve a template id string, accepting the short display form
fn find_template(store: &ExpenseStore, id: &str) -> Result<TemplateId> {
    store
        .ledger()
        .templates
        .iter()
        .find(|t| t.id.matches(id))
        .map(|t| t.id)
        .ok_or_else(|| anyhow!("Template not found: {}", id))
}
