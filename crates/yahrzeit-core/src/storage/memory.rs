//! In-process entry store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::EntryStore;
use crate::entry::YahrzeitEntry;
use crate::error::Result;

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<i64, YahrzeitEntry>,
    next_id: i64,
}

/// [`EntryStore`] kept in memory. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl EntryStore for MemoryStore {
    fn insert(&self, entry: &YahrzeitEntry) -> Result<i64> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = inner.next_id;
        let mut stored = entry.clone();
        stored.id = id;
        inner.entries.insert(id, stored);
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<YahrzeitEntry>> {
        Ok(self.inner.read().entries.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<YahrzeitEntry>> {
        Ok(self.inner.read().entries.values().cloned().collect())
    }

    fn update(&self, entry: &YahrzeitEntry) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.entries.get_mut(&entry.id) {
            Some(stored) => {
                *stored = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().entries.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn sample() -> YahrzeitEntry {
        let now = Utc::now();
        YahrzeitEntry {
            id: 0,
            name: "Test".into(),
            hebrew_name: None,
            death_date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
            hebrew_day: 1,
            hebrew_month: 7,
            hebrew_year: 5784,
            notify_days_before: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.insert(&sample()).unwrap();
        assert!(store.delete(first).unwrap());
        let second = store.insert(&sample()).unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_existing_only() {
        let store = MemoryStore::new();
        let id = store.insert(&sample()).unwrap();
        let mut entry = store.get(id).unwrap().unwrap();
        entry.name = "Renamed".into();
        assert!(store.update(&entry).unwrap());
        assert_eq!(store.get(id).unwrap().unwrap().name, "Renamed");

        entry.id = 77;
        assert!(!store.update(&entry).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }
}
