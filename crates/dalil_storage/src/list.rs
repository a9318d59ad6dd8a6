//! Capacity-bounded, deduplicated, persisted list of ids.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::StorageError;
use crate::entry::{self, ListEntry};
use crate::store::KeyValueStore;

/// Ordered list of [`ListEntry`] kept in a [`KeyValueStore`] under one key.
///
/// Invariants: ids are unique and the length never exceeds `capacity`.
/// Every mutation path rewrites the full stored value.
#[derive(Debug)]
pub struct BoundedList<S> {
    store: S,
    key: String,
    capacity: usize,
    entries: Vec<ListEntry>,
}

impl<S: KeyValueStore> BoundedList<S> {
    /// Recovers the list stored under `key`, keeping stored order.
    ///
    /// Never fails: unreadable storage yields an empty list, and content that
    /// does not parse is removed from the store before starting empty.
    pub fn load(store: S, key: impl Into<String>, capacity: usize) -> Self {
        Self::load_ordered(store, key.into(), capacity, |_| {})
    }

    /// Like [`BoundedList::load`], but orders entries by `added_at`, newest
    /// first, before duplicates are dropped and the list is cut to capacity.
    /// The newest occurrence of each id wins.
    pub fn load_newest_first(store: S, key: impl Into<String>, capacity: usize) -> Self {
        Self::load_ordered(store, key.into(), capacity, sort_newest_first)
    }

    fn load_ordered(
        store: S,
        key: String,
        capacity: usize,
        order: fn(&mut [ListEntry]),
    ) -> Self {
        let entries = match store.get(&key) {
            Ok(Some(raw)) => match entry::decode(&raw) {
                Ok(mut entries) => {
                    order(&mut entries);
                    normalize(entries, capacity)
                }
                Err(e) => {
                    warn!("Discarding corrupted list '{}': {}", key, e);
                    if let Err(e) = store.remove(&key) {
                        warn!("Failed to remove corrupted list '{}': {}", key, e);
                    }
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored list for '{}'", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read list '{}', starting empty: {}", key, e);
                Vec::new()
            }
        };

        debug!("Loaded {} entries for '{}'", entries.len(), key);
        Self {
            store,
            key,
            capacity,
            entries,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Ids in list order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Moves `entry` to the front, dropping any older entry with the same id,
    /// then evicts from the back down to capacity.
    pub fn push_front(&mut self, entry: ListEntry) -> Result<(), StorageError> {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.persist()
    }

    /// Appends `entry` if the id is new and there is room. Returns whether it
    /// was added; nothing is written otherwise.
    pub fn push_back(&mut self, entry: ListEntry) -> Result<bool, StorageError> {
        if self.contains(&entry.id) || self.is_full() {
            return Ok(false);
        }
        self.entries.push(entry);
        self.persist().map(|_| true)
    }

    /// Removes `id`. Returns whether it was present; absent ids write nothing.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist().map(|_| true)
    }

    /// Replaces the whole list. Duplicate ids keep their first occurrence and
    /// the result is truncated to capacity.
    pub fn replace(&mut self, entries: Vec<ListEntry>) -> Result<(), StorageError> {
        self.entries = normalize(entries, self.capacity);
        self.persist()
    }

    /// Empties the list and removes the stored key.
    pub fn clear_and_remove(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.store.remove(&self.key)
    }

    /// Empties the list and stores the empty state.
    pub fn clear_and_persist(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    /// Writes the full list to the store.
    pub fn persist(&self) -> Result<(), StorageError> {
        let encoded = entry::encode(&self.entries)?;
        self.store.set(&self.key, &encoded).inspect_err(|e| {
            warn!("Failed to persist list '{}': {}", self.key, e);
        })?;
        info!("Saved {} entries to '{}'", self.entries.len(), self.key);
        Ok(())
    }
}

/// Stable: entries with equal timestamps keep their relative order.
fn sort_newest_first(entries: &mut [ListEntry]) {
    entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
}

fn normalize(entries: Vec<ListEntry>, capacity: usize) -> Vec<ListEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<ListEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect();
    entries.truncate(capacity);
    entries
}
