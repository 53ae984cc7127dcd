//! Settings CLI commands

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::models::Money;
use crate::store::ExpenseStore;

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Set the monthly income used by savings suggestions
    Income {
        /// Monthly income (e.g., "5000")
        amount: String,
    },

    /// Configure the daily budget check-in reminder
    Reminder {
        /// Disable the reminder
        #[arg(long, conflicts_with_all = ["hour", "minute"])]
        off: bool,
        /// Hour of day (0-23)
        #[arg(long, default_value = "20")]
        hour: u32,
        /// Minute of hour (0-59)
        #[arg(long, default_value = "0")]
        minute: u32,
    },

    /// Enable or disable the cloud sync mirror
    Sync {
        /// Turn the mirror on
        #[arg(long, conflicts_with = "off")]
        on: bool,
        /// Turn the mirror off
        #[arg(long)]
        off: bool,
        /// Directory backing the sync channel (any cloud-synced folder)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Handle a settings command
pub fn handle_settings_command(store: &mut ExpenseStore, cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Income { amount } => {
            let income = Money::parse(&amount).map_err(|e| anyhow!(e.to_string()))?;
            store.set_monthly_income(income)?;
            println!("Monthly income set to {}", income);
        }
        SettingsCommands::Reminder { off, hour, minute } => {
            store.set_reminder(!off, hour, minute)?;
            let schedule = store.settings().reminder;
            if schedule.enabled {
                println!(
                    "Reminder armed daily at {:02}:{:02}",
                    schedule.hour, schedule.minute
                );
                let now = chrono::Local::now().naive_local();
                if let Some(next) = schedule.next_occurrence(now) {
                    println!("Next check-in: {}", next.format("%Y-%m-%d %H:%M"));
                }
            } else {
                println!("Reminder disabled");
            }
        }
        SettingsCommands::Sync { on, off, dir } => {
            if on == off {
                return Err(anyhow!("Specify exactly one of --on or --off"));
            }
            store.set_cloud_sync(on, dir)?;
            if on {
                println!(
                    "Sync mirror enabled at {}",
                    store
                        .settings()
                        .sync_dir
                        .clone()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "default sync directory".to_string())
                );
            } else {
                println!("Sync mirror disabled");
            }
        }
    }
    Ok(())
}
