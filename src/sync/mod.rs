//! Cloud sync collaborator
//!
//! Mirrors the four ledger records through an external key-value channel with
//! last-writer-wins semantics. The core only requires that after a pull the
//! ledger is replaced wholesale and local persistence is re-synced to match;
//! there is no merging and no conflict detection.
//!
//! The shipped channel is a directory of files, one per logical key. Point it
//! at any folder a cloud client replicates (Dropbox, Syncthing, a mounted
//! drive) and the channel rides along.

use std::fs;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{OutlayError, OutlayResult};
use crate::models::{Category, Ledger, RecurringTemplate, ScheduleCursor, Transaction};

const KEY_CATEGORIES: &str = "cloud.categories";
const KEY_TEMPLATES: &str = "cloud.templates";
const KEY_TRANSACTIONS: &str = "cloud.transactions";
const KEY_CURSOR: &str = "cloud.cursor";

/// An external key-value channel keyed by logical record name
pub trait SyncChannel {
    /// Fetch the value stored under a key, if any
    fn get(&self, key: &str) -> OutlayResult<Option<Vec<u8>>>;

    /// Store a value under a key, overwriting any previous writer
    fn set(&self, key: &str, value: &[u8]) -> OutlayResult<()>;
}

/// A key-value channel backed by files in a directory
pub struct DirectoryChannel {
    root: PathBuf,
}

impl DirectoryChannel {
    /// Create a channel rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl SyncChannel for DirectoryChannel {
    fn get(&self, key: &str) -> OutlayResult<Option<Vec<u8>>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read(&path)
            .map(Some)
            .map_err(|e| OutlayError::Sync(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn set(&self, key: &str, value: &[u8]) -> OutlayResult<()> {
        fs::create_dir_all(&self.root)
            .map_err(|e| OutlayError::Sync(format!("Failed to create sync directory: {}", e)))?;
        let path = self.key_path(key);
        fs::write(&path, value)
            .map_err(|e| OutlayError::Sync(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Push/pull of the whole ledger over a sync channel
pub struct SyncService {
    channel: Box<dyn SyncChannel>,
}

impl SyncService {
    /// Create a sync service over the given channel
    pub fn new(channel: Box<dyn SyncChannel>) -> Self {
        Self { channel }
    }

    /// Convenience constructor for the directory-backed channel
    pub fn with_directory(root: PathBuf) -> Self {
        Self::new(Box::new(DirectoryChannel::new(root)))
    }

    /// Fetch the remote ledger
    ///
    /// All four records must be present and decodable; a partial or damaged
    /// channel yields `None` and the local ledger stays authoritative.
    pub fn pull(&self) -> OutlayResult<Option<Ledger>> {
        let Some(categories) = self.get_record::<Vec<Category>>(KEY_CATEGORIES)? else {
            return Ok(None);
        };
        let Some(templates) = self.get_record::<Vec<RecurringTemplate>>(KEY_TEMPLATES)? else {
            return Ok(None);
        };
        let Some(transactions) = self.get_record::<Vec<Transaction>>(KEY_TRANSACTIONS)? else {
            return Ok(None);
        };
        let Some(cursor) = self.get_record::<ScheduleCursor>(KEY_CURSOR)? else {
            return Ok(None);
        };

        tracing::debug!(
            categories = categories.len(),
            transactions = transactions.len(),
            "pulled ledger from sync channel"
        );
        Ok(Some(Ledger {
            categories,
            templates,
            transactions,
            cursor,
        }))
    }

    /// Overwrite the channel with the local ledger (last writer wins)
    pub fn push(&self, ledger: &Ledger) -> OutlayResult<()> {
        self.set_record(KEY_CATEGORIES, &ledger.categories)?;
        self.set_record(KEY_TEMPLATES, &ledger.templates)?;
        self.set_record(KEY_TRANSACTIONS, &ledger.transactions)?;
        self.set_record(KEY_CURSOR, &ledger.cursor)?;
        tracing::debug!("pushed ledger to sync channel");
        Ok(())
    }

    fn get_record<T: DeserializeOwned>(&self, key: &str) -> OutlayResult<Option<T>> {
        let Some(bytes) = self.channel.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::debug!(key, error = %err, "undecodable sync record ignored");
                Ok(None)
            }
        }
    }

    fn set_record<T: Serialize>(&self, key: &str, value: &T) -> OutlayResult<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| OutlayError::Sync(format!("Failed to encode {}: {}", key, e)))?;
        self.channel.set(key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::default();
        let food = Category::new("Food", Money::from_cents(50000));
        let food_id = food.id;
        ledger.categories.push(food);
        ledger.templates.push(RecurringTemplate::monthly(
            food_id,
            Money::from_cents(9900),
            "Meal kit",
            15,
        ));
        ledger.transactions.push(Transaction::manual(
            food_id,
            Money::from_cents(2850),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "Lunch",
        ));
        ledger
            .cursor
            .advance_to(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        ledger
    }

    #[test]
    fn test_pull_from_empty_channel_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let sync = SyncService::with_directory(temp_dir.path().to_path_buf());
        assert!(sync.pull().unwrap().is_none());
    }

    #[test]
    fn test_push_then_pull_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let sync = SyncService::with_directory(temp_dir.path().to_path_buf());
        let ledger = sample_ledger();

        sync.push(&ledger).unwrap();
        let pulled = sync.pull().unwrap().expect("ledger present");

        assert_eq!(pulled.categories.len(), 1);
        assert_eq!(pulled.categories[0].name, "Food");
        assert_eq!(pulled.templates.len(), 1);
        assert_eq!(pulled.transactions.len(), 1);
        assert_eq!(pulled.cursor, ledger.cursor);
    }

    #[test]
    fn test_partial_channel_yields_none() {
        let temp_dir = TempDir::new().unwrap();
        let channel = DirectoryChannel::new(temp_dir.path().to_path_buf());
        channel.set(KEY_CATEGORIES, b"[]").unwrap();

        let sync = SyncService::with_directory(temp_dir.path().to_path_buf());
        assert!(sync.pull().unwrap().is_none());
    }

    #[test]
    fn test_damaged_record_yields_none() {
        let temp_dir = TempDir::new().unwrap();
        let sync = SyncService::with_directory(temp_dir.path().to_path_buf());
        sync.push(&sample_ledger()).unwrap();

        let channel = DirectoryChannel::new(temp_dir.path().to_path_buf());
        channel.set(KEY_TRANSACTIONS, b"{ garbage").unwrap();

        assert!(sync.pull().unwrap().is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let temp_dir = TempDir::new().unwrap();
        let sync = SyncService::with_directory(temp_dir.path().to_path_buf());

        let first = sample_ledger();
        sync.push(&first).unwrap();

        let mut second = sample_ledger();
        second.categories[0].name = "Dining".to_string();
        sync.push(&second).unwrap();

        let pulled = sync.pull().unwrap().expect("ledger present");
        assert_eq!(pulled.categories[0].name, "Dining");
    }
}
