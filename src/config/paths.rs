//! Path management for Outlay
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `OUTLAY_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/outlay` or `~/.config/outlay`
//! 3. Windows: `%APPDATA%\outlay`

use std::path::PathBuf;

use crate::error::OutlayError;

/// Manages all paths used by Outlay
#[derive(Debug, Clone)]
pub struct OutlayPaths {
    /// Base directory for all Outlay data
    base_dir: PathBuf,
}

impl OutlayPaths {
    /// Create a new OutlayPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, OutlayError> {
        let base_dir = if let Ok(custom) = std::env::var("OUTLAY_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create OutlayPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/outlay/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/outlay/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to templates.json (recurring expense templates)
    pub fn templates_file(&self) -> PathBuf {
        self.data_dir().join("templates.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to cursor.json (recurrence schedule cursor)
    pub fn cursor_file(&self) -> PathBuf {
        self.data_dir().join("cursor.json")
    }

    /// Default directory for the sync channel when none is configured
    pub fn default_sync_dir(&self) -> PathBuf {
        self.base_dir.join("sync")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), OutlayError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| OutlayError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| OutlayError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Outlay has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, OutlayError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .map_err(|_| OutlayError::Config("Could not determine home directory".into()))
        })?;
    Ok(config_base.join("outlay"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, OutlayError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| OutlayError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("outlay"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.categories_file(),
            temp_dir.path().join("data").join("categories.json")
        );
        assert_eq!(
            paths.cursor_file(),
            temp_dir.path().join("data").join("cursor.json")
        );
    }
}
