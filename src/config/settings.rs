//! User settings for Outlay
//!
//! The user profile: monthly income, reminder schedule, cloud sync toggle,
//! and display preferences. Stored as pretty JSON in `config.json` next to
//! the data directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::OutlayPaths;
use crate::error::OutlayError;
use crate::models::Money;
use crate::notify::ReminderSchedule;

/// User settings for Outlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Monthly income, used by the forecast-vs-income suggestion
    #[serde(default = "default_monthly_income")]
    pub monthly_income: Money,

    /// Daily budget check-in reminder
    #[serde(default)]
    pub reminder: ReminderSchedule,

    /// Whether the ledger is mirrored to the sync channel
    #[serde(default)]
    pub cloud_sync_enabled: bool,

    /// Directory backing the sync channel; defaults next to the data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_dir: Option<PathBuf>,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_monthly_income() -> Money {
    Money::from_cents(500000) // 5000.00
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            monthly_income: default_monthly_income(),
            reminder: ReminderSchedule::default(),
            cloud_sync_enabled: false,
            sync_dir: None,
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &OutlayPaths) -> Result<Self, OutlayError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| OutlayError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| OutlayError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &OutlayPaths) -> Result<(), OutlayError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| OutlayError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| OutlayError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Directory backing the sync channel
    pub fn sync_dir(&self, paths: &OutlayPaths) -> PathBuf {
        self.sync_dir
            .clone()
            .unwrap_or_else(|| paths.default_sync_dir())
    }
}
