use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use outlay::cli::{
    handle_category_command, handle_expense_command, handle_insights_command,
    handle_recurring_command, handle_settings_command, CategoryCommands, ExpenseCommands,
    InsightsCommands, RecurringCommands, SettingsCommands,
};
use outlay::config::paths::OutlayPaths;
use outlay::export;
use outlay::models::{Money, Month, RecurringTemplate};
use outlay::store::ExpenseStore;

#[derive(Parser)]
#[command(
    name = "outlay",
    version,
    about = "Command-line personal expense tracker",
    long_about = "Outlay tracks spending by category, materializes recurring \
                  expenses on schedule, and turns the ledger into monthly \
                  insights: budget usage, trends, a next-month forecast, and \
                  savings suggestions."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Recurring template commands
    #[command(subcommand, alias = "rec")]
    Recurring(RecurringCommands),

    /// Spending insights and forecasts
    #[command(subcommand)]
    Insights(InsightsCommands),

    /// Print the current-month statement
    Report,

    /// Settings (income, reminder, sync)
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Initialize the data directory, optionally with starter categories
    Init {
        /// Seed the starter category set and a rent template
        #[arg(long)]
        seed: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let paths = OutlayPaths::new()?;
    let mut store = ExpenseStore::open(paths.clone())?;

    match cli.command {
        Some(Commands::Category(cmd)) => handle_category_command(&mut store, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&mut store, cmd)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&mut store, cmd)?,
        Some(Commands::Insights(cmd)) => handle_insights_command(&store, cmd)?,
        Some(Commands::Report) => {
            let transactions = store.current_month_transactions();
            let month = Month::containing(store.today());
            export::write_statement(
                std::io::stdout().lock(),
                month,
                &transactions,
                &store.ledger().categories,
            )?;
        }
        Some(Commands::Settings(cmd)) => handle_settings_command(&mut store, cmd)?,
        Some(Commands::Init { seed }) => {
            store.settings().clone().save(&paths)?;
            println!("Initialized Outlay at {}", paths.base_dir().display());
            if seed {
                seed_starter_ledger(&mut store)?;
                println!("Seeded starter categories and a monthly rent template.");
                println!("Run 'outlay category list' to see them.");
            }
        }
        Some(Commands::Config) => {
            println!("Outlay configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            let settings = store.settings();
            println!("Monthly income:  {}", settings.monthly_income);
            println!(
                "Reminder:        {}",
                if settings.reminder.enabled {
                    format!(
                        "daily at {:02}:{:02}",
                        settings.reminder.hour, settings.reminder.minute
                    )
                } else {
                    "disabled".to_string()
                }
            );
            println!(
                "Cloud sync:      {}",
                if settings.cloud_sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
        }
        None => {
            println!("Outlay - command-line personal expense tracker");
            println!();
            println!("Run 'outlay --help' for usage information.");
            println!("Run 'outlay init --seed' to start with a sample budget.");
        }
    }

    Ok(())
}

/// Starter ledger for first-time users: the default category set and a
/// monthly rent template
fn seed_starter_ledger(store: &mut ExpenseStore) -> Result<()> {
    let defaults: &[(&str, i64)] = &[
        ("Food", 60000),
        ("Transport", 35000),
        ("Rent", 170000),
        ("Shopping", 40000),
        ("Health", 25000),
        ("Entertainment", 30000),
    ];

    for (name, budget_cents) in defaults {
        if store.ledger().category_by_name(name).is_none() {
            store.add_category(name, Money::from_cents(*budget_cents))?;
        }
    }

    if store.ledger().templates.is_empty() {
        let rent_id = store.ledger().category_by_name("Rent").map(|c| c.id);
        if let Some(rent_id) = rent_id {
            let template =
                RecurringTemplate::monthly(rent_id, Money::from_cents(170000), "Rent", 1);
            store.add_template(template)?;
        }
    }

    Ok(())
}
