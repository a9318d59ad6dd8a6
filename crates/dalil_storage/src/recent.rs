//! Recently viewed tools.

use crate::StorageError;
use crate::entry::ListEntry;
use crate::list::BoundedList;
use crate::store::KeyValueStore;

/// Storage key for the recently viewed list.
pub const RECENTLY_VIEWED_KEY: &str = "recently_viewed_tools";

/// Default number of remembered tools.
pub const RECENTLY_VIEWED_CAPACITY: usize = 10;

/// Most-recent-first list of viewed tool ids.
///
/// Viewing a tool again moves it to the front with a fresh timestamp; the
/// oldest entry is evicted once the list is full.
#[derive(Debug)]
pub struct RecentlyViewed<S> {
    list: BoundedList<S>,
}

impl<S: KeyValueStore> RecentlyViewed<S> {
    /// Loads the list with the default capacity.
    pub fn open(store: S) -> Self {
        Self::with_capacity(store, RECENTLY_VIEWED_CAPACITY)
    }

    pub fn with_capacity(store: S, capacity: usize) -> Self {
        Self {
            list: BoundedList::load_newest_first(store, RECENTLY_VIEWED_KEY, capacity),
        }
    }

    /// Records a view of `id`.
    pub fn add(&mut self, id: impl Into<String>) -> Result<(), StorageError> {
        self.list.push_front(ListEntry::now(id))
    }

    /// Forgets `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        self.list.remove(id)
    }

    /// Forgets everything and drops the stored key.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.list.clear_and_remove()
    }

    /// Ids, most recent first.
    pub fn ids(&self) -> Vec<String> {
        self.list.ids()
    }

    pub fn entries(&self) -> &[ListEntry] {
        self.list.entries()
    }

    pub fn has_recent(&self) -> bool {
        !self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn add_puts_newest_first() {
        let mut recent = RecentlyViewed::open(MemoryStore::new());
        recent.add("a").unwrap();
        recent.add("b").unwrap();
        recent.add("c").unwrap();

        assert_eq!(recent.ids(), vec!["c", "b", "a"]);
        assert!(recent.has_recent());
    }

    #[test]
    fn re_adding_moves_to_front_without_duplicate() {
        let mut recent = RecentlyViewed::open(MemoryStore::new());
        recent.add("a").unwrap();
        recent.add("b").unwrap();
        recent.add("a").unwrap();

        assert_eq!(recent.ids(), vec!["a", "b"]);
    }

    #[test]
    fn clear_removes_stored_key() {
        let store = Arc::new(MemoryStore::new());
        let mut recent = RecentlyViewed::open(Arc::clone(&store));
        recent.add("a").unwrap();
        assert!(store.contains_key(RECENTLY_VIEWED_KEY));

        recent.clear().unwrap();

        assert!(recent.is_empty());
        assert!(!store.contains_key(RECENTLY_VIEWED_KEY));
    }

    #[test]
    fn stored_entries_are_read_newest_first() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                RECENTLY_VIEWED_KEY,
                r#"[{"id":"a","addedAt":100},{"id":"c","addedAt":300},{"id":"b","addedAt":200}]"#,
            )
            .unwrap();

        let recent = RecentlyViewed::open(Arc::clone(&store));
        assert_eq!(recent.ids(), vec!["c", "b", "a"]);
    }

    #[test]
    fn over_capacity_storage_keeps_newest_entries() {
        let store = Arc::new(MemoryStore::new());
        let stored: Vec<String> = (0..11)
            .map(|i| format!(r#"{{"id":"t{i}","addedAt":{}}}"#, 1_000 + i))
            .collect();
        store
            .set(RECENTLY_VIEWED_KEY, &format!("[{}]", stored.join(",")))
            .unwrap();

        let recent = RecentlyViewed::open(Arc::clone(&store));

        let expected: Vec<String> = (1..11).rev().map(|i| format!("t{i}")).collect();
        assert_eq!(recent.ids(), expected);
    }

    #[test]
    fn duplicate_in_storage_resolves_to_latest_view() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                RECENTLY_VIEWED_KEY,
                r#"[{"id":"a","addedAt":1},{"id":"b","addedAt":5},{"id":"a","addedAt":9}]"#,
            )
            .unwrap();

        let recent = RecentlyViewed::open(Arc::clone(&store));

        assert_eq!(recent.ids(), vec!["a", "b"]);
        assert_eq!(recent.entries()[0].added_at.timestamp_millis(), 9);
    }
}
