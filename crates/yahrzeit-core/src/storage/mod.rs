mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{Config, NotificationsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::entry::YahrzeitEntry;
use crate::error::{ConfigError, Result};

/// Returns `~/.config/yahrzeit[-dev]/` based on YAHRZEIT_ENV.
///
/// Set YAHRZEIT_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("YAHRZEIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("yahrzeit-dev")
    } else {
        base_dir.join("yahrzeit")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// A stored row that could not be decoded into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRecord {
    pub id: i64,
    pub reason: String,
}

/// Persistence for yahrzeit entries.
///
/// Stores hand out ids; the `id` of an entry passed to [`EntryStore::insert`]
/// is ignored.
pub trait EntryStore {
    /// Persist a new entry and return its id.
    fn insert(&self, entry: &YahrzeitEntry) -> Result<i64>;

    fn get(&self, id: i64) -> Result<Option<YahrzeitEntry>>;

    /// All entries in id order.
    fn list(&self) -> Result<Vec<YahrzeitEntry>>;

    /// Replace the stored entry with the same id. Returns `false` if absent.
    fn update(&self, entry: &YahrzeitEntry) -> Result<bool>;

    /// Returns `false` if no entry had this id.
    fn delete(&self, id: i64) -> Result<bool>;

    /// Like [`EntryStore::list`], but rows that fail to decode are returned
    /// separately instead of failing the call.
    fn scan(&self) -> Result<(Vec<YahrzeitEntry>, Vec<CorruptRecord>)> {
        Ok((self.list()?, Vec::new()))
    }
}

impl<S: EntryStore + ?Sized> EntryStore for &S {
    fn insert(&self, entry: &YahrzeitEntry) -> Result<i64> {
        (**self).insert(entry)
    }

    fn get(&self, id: i64) -> Result<Option<YahrzeitEntry>> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<YahrzeitEntry>> {
        (**self).list()
    }

    fn update(&self, entry: &YahrzeitEntry) -> Result<bool> {
        (**self).update(entry)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        (**self).delete(id)
    }

    fn scan(&self) -> Result<(Vec<YahrzeitEntry>, Vec<CorruptRecord>)> {
        (**self).scan()
    }
}
