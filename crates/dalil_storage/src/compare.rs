//! Tools selected for side-by-side comparison.

use tracing::debug;

use crate::StorageError;
use crate::entry::ListEntry;
use crate::list::BoundedList;
use crate::notify::{Notice, Notifier};
use crate::store::KeyValueStore;

/// Storage key for the compare selection.
pub const COMPARE_KEY: &str = "compare_tools";

/// Default maximum number of compared tools.
pub const COMPARE_CAPACITY: usize = 3;

/// Result of [`CompareList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    Added,
    /// The id was already selected; the list is unchanged.
    AlreadyPresent,
    /// The list was full; the list is unchanged.
    Full,
}

/// Insertion-ordered selection of tool ids with a hard cap.
///
/// Single additions that would duplicate an id or overflow the cap are
/// rejected with a notice. Bulk replacement via [`CompareList::set_list`]
/// truncates instead.
#[derive(Debug)]
pub struct CompareList<S, N> {
    list: BoundedList<S>,
    notifier: N,
}

impl<S: KeyValueStore, N: Notifier> CompareList<S, N> {
    /// Loads the selection with the default capacity.
    pub fn open(store: S, notifier: N) -> Self {
        Self::with_capacity(store, notifier, COMPARE_CAPACITY)
    }

    pub fn with_capacity(store: S, notifier: N, capacity: usize) -> Self {
        Self {
            list: BoundedList::load(store, COMPARE_KEY, capacity),
            notifier,
        }
    }

    /// Selects `id` for comparison.
    ///
    /// A rejection is reported through the notifier and as the outcome; it is
    /// not an error. The error case is only a failed write, after which the
    /// id is still selected in memory.
    pub fn add(&mut self, id: impl Into<String>) -> Result<CompareOutcome, StorageError> {
        let id = id.into();

        if self.list.contains(&id) {
            debug!("'{}' already selected for compare", id);
            self.notifier.notify(&Notice::AlreadyInCompare);
            return Ok(CompareOutcome::AlreadyPresent);
        }
        if self.list.is_full() {
            debug!("Compare list full, rejecting '{}'", id);
            self.notifier.notify(&Notice::CompareFull {
                max: self.list.capacity(),
            });
            return Ok(CompareOutcome::Full);
        }

        let persisted = self.list.push_back(ListEntry::now(id));
        self.notifier.notify(&Notice::AddedToCompare);
        persisted.map(|_| CompareOutcome::Added)
    }

    /// Deselects `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        self.list.remove(id)
    }

    /// Replaces the selection, keeping at most the first `capacity` ids.
    pub fn set_list<I, T>(&mut self, ids: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let entries = ids.into_iter().map(ListEntry::now).collect();
        self.list.replace(entries)
    }

    /// Deselects everything and stores the empty selection.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.list.clear_and_persist()
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.list.ids()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list.contains(id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.list.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, RecordingNotifier};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn fixture() -> (
        Arc<MemoryStore>,
        Arc<RecordingNotifier>,
        CompareList<Arc<MemoryStore>, Arc<RecordingNotifier>>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let list = CompareList::open(Arc::clone(&store), Arc::clone(&notifier));
        (store, notifier, list)
    }

    #[test]
    fn add_appends_and_notifies() {
        let (_, notifier, mut list) = fixture();

        assert_eq!(list.add("a").unwrap(), CompareOutcome::Added);
        assert_eq!(list.add("b").unwrap(), CompareOutcome::Added);

        assert_eq!(list.ids(), vec!["a", "b"]);
        assert_eq!(
            notifier.take(),
            vec![Notice::AddedToCompare, Notice::AddedToCompare]
        );
    }

    #[test]
    fn clear_persists_empty_selection() {
        let (store, _, mut list) = fixture();
        list.add("a").unwrap();

        list.clear().unwrap();

        assert!(list.is_empty());
        assert_eq!(store.get(COMPARE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn set_list_drops_duplicates_before_truncating() {
        let (_, _, mut list) = fixture();

        list.set_list(["a", "a", "b", "c", "d"]).unwrap();

        assert_eq!(list.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let (_, _, mut list) = fixture();
        list.add("a").unwrap();

        assert!(!list.remove("zzz").unwrap());
        assert!(list.remove("a").unwrap());
        assert!(list.is_empty());
    }
}
