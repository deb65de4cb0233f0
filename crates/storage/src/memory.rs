//! In-memory key-value store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::kv::{KeyValueStore, StorageError};

/// In-memory string store.
///
/// An optional capacity budget (total bytes across keys and values) simulates
/// the quota failures of a real host store.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    capacity_bytes: Option<usize>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that fails any write pushing total size past `capacity_bytes`.
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity_bytes: Some(capacity_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;

        if let Some(capacity) = self.capacity_bytes {
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let projected = Self::used_bytes(&entries) - replaced + key.len() + value.len();
            if projected > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{load_json, save_json};

    #[test]
    fn set_get_remove_round_trip() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn removing_a_missing_key_is_a_no_op() {
        let store = InMemoryKvStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn quota_is_enforced() {
        let store = InMemoryKvStore::with_capacity(8);
        store.set("k", "small").unwrap();

        let err = store.set("k2", "way too large for the budget").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { key } if key == "k2"));

        // Replacing an existing value within budget still works.
        store.set("k", "tiny").unwrap();
    }

    #[test]
    fn json_helpers_round_trip() {
        let store = InMemoryKvStore::new();
        let values = vec![1u32, 2, 3];

        save_json(&store, "numbers", &values).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, "numbers").unwrap();
        assert_eq!(loaded, Some(values));

        let missing: Option<Vec<u32>> = load_json(&store, "missing").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let store = InMemoryKvStore::new();
        store.set("bad", "{not json").unwrap();

        let err = load_json::<Vec<u32>>(&store, "bad").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
