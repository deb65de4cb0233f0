//! Order-history persistence over the key-value store contract.

use std::sync::Arc;

use tracing::warn;

use vrstore_storage::{KeyValueStore, StorageError, load_json, save_json};

use crate::history::OrderHistory;
use crate::order::Order;

/// Storage key for the serialized history (a JSON array of orders).
pub const DEFAULT_ORDERS_KEY: &str = "vr-store-orders";

/// Loads and saves the whole history as a JSON array under one key.
///
/// The history is small (bounded by storage capacity only), so it is written
/// whole on each append/delete rather than incrementally.
pub struct OrderHistoryRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl OrderHistoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_ORDERS_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load the persisted history, or an empty one when nothing (or
    /// unreadable data) is stored.
    pub fn load(&self) -> OrderHistory {
        match load_json::<Vec<Order>>(self.store.as_ref(), &self.key) {
            Ok(Some(orders)) => OrderHistory::from_orders(orders),
            Ok(None) => OrderHistory::new(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding unreadable order history");
                OrderHistory::new()
            }
        }
    }

    pub fn save(&self, history: &OrderHistory) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), &self.key, &history.orders())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}

impl core::fmt::Debug for OrderHistoryRepository {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderHistoryRepository")
            .field("key", &self.key)
            .finish()
    }
}
