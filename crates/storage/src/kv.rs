//! Key-value store contract and JSON helpers.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage-boundary error.
///
/// Non-fatal by policy: callers log/notify and keep their in-memory state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store refused the write because its capacity budget is exhausted.
    #[error("storage quota exceeded writing key '{key}'")]
    QuotaExceeded { key: String },

    /// The backing store is unavailable (lock poisoned, host store gone).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be encoded or decoded.
    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

/// Synchronous string key-value store.
///
/// The contract mirrors the host store: `get` yields the stored string if
/// present, `set` and `remove` report success through `Result` instead of
/// silently throwing.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
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

/// Read a JSON value from the store. A missing key is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string())),
    }
}

/// Serialize a value to JSON and write it under `key`.
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.set(key, &raw)
}
