//! Key-value storage capability and the in-memory backend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::StorageError;

/// Synchronous string key-value store, durable for as long as the backend is.
///
/// Implementations use interior mutability so that several lists can share
/// one store behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value for `key`, `None` if it was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Process-local store, optionally limited to a byte quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock();

        if let Some(quota) = self.quota {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn quota_rejects_oversized_writes_and_keeps_old_value() {
        let store = MemoryStore::with_quota(8);
        store.set("k", "1234").unwrap();

        let err = store.set("k", "123456789").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 10,
                quota: 8
            }
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(6);
        store.set("k", "12345").unwrap();
        // Replacing the value must not count the old one.
        store.set("k", "54321").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn arc_store_delegates() {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<MemoryStore> = Arc::clone(&store);

        shared.set("k", "v").unwrap();
        assert!(store.contains_key("k"));
    }
}
