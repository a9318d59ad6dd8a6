//! # dalil_storage
//!
//! User-local selection state that survives restarts.
//!
//! This crate provides:
//! - The [`KeyValueStore`] capability with [`MemoryStore`] and [`FileStore`]
//!   backends
//! - [`BoundedList`], a deduplicated, capacity-bounded id list that heals
//!   corrupted storage on load
//! - The two lists the directory keeps: [`RecentlyViewed`] and [`CompareList`]
//! - [`Notice`]s and the [`Notifier`] sink for compare-list feedback
//!
//! ## Storage
//!
//! Each list is one JSON array under a fixed key, rewritten in full after
//! every mutation:
//!
//! ```json
//! [{"id": "42", "addedAt": 1700000000123}]
//! ```

mod compare;
mod entry;
mod error;
mod file_store;
mod list;
mod notify;
mod recent;
mod store;

pub use compare::{COMPARE_CAPACITY, COMPARE_KEY, CompareList, CompareOutcome};
pub use entry::ListEntry;
pub use error::StorageError;
pub use file_store::FileStore;
pub use list::BoundedList;
pub use notify::{Locale, LogNotifier, Notice, Notifier, RecordingNotifier};
pub use recent::{RECENTLY_VIEWED_CAPACITY, RECENTLY_VIEWED_KEY, RecentlyViewed};
pub use store::{KeyValueStore, MemoryStore};
