//! Cart persistence over the key-value store contract.

use std::sync::Arc;

use tracing::warn;

use vrstore_storage::{KeyValueStore, StorageError, load_json, save_json};

use crate::cart::{Cart, CartLine, QuantityLimits};

/// Storage key for the serialized cart (a JSON array of lines).
pub const DEFAULT_CART_KEY: &str = "vr-store-cart";

/// Loads and saves the cart as a JSON array under one key.
pub struct CartRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load the persisted cart, or an empty one if nothing (or garbage) is
    /// stored. A read failure also falls back to empty: the session must
    /// start even when the host store is broken.
    pub fn load(&self, limits: QuantityLimits) -> Cart {
        match load_json::<Vec<CartLine>>(self.store.as_ref(), &self.key) {
            Ok(Some(lines)) => Cart::from_lines(lines, limits),
            Ok(None) => Cart::with_limits(limits),
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding unreadable cart data");
                Cart::with_limits(limits)
            }
        }
    }

    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), &self.key, &cart.lines())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}

impl core::fmt::Debug for CartRepository {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartRepository")
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use vrstore_core::{Money, ProductId};
    use vrstore_storage::InMemoryKvStore;

    fn repo() -> CartRepository {
        CartRepository::new(Arc::new(InMemoryKvStore::new()))
    }

    #[test]
    fn round_trip_preserves_the_cart() {
        let repo = repo();
        let mut cart = Cart::new();
        cart.add_item(
            ProductId::new("p1"),
            "Widget",
            Money::from_cents(2999),
            Utc::now(),
        )
        .unwrap();
        cart.add_item(
            ProductId::new("p2"),
            "Gadget",
            Money::from_cents(500),
            Utc::now(),
        )
        .unwrap();
        cart.update_quantity(&ProductId::new("p1"), 2);

        repo.save(&cart).unwrap();
        let reloaded = repo.load(QuantityLimits::default());
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn missing_key_loads_an_empty_cart() {
        assert!(repo().load(QuantityLimits::default()).is_empty());
    }

    #[test]
    fn garbage_data_loads_an_empty_cart() {
        let store = Arc::new(InMemoryKvStore::new());
        store.set(DEFAULT_CART_KEY, "{definitely not json").unwrap();

        let repo = CartRepository::new(store);
        assert!(repo.load(QuantityLimits::default()).is_empty());
    }

    #[test]
    fn quota_failure_surfaces_as_an_error() {
        let repo = CartRepository::new(Arc::new(InMemoryKvStore::with_capacity(4)));
        let mut cart = Cart::new();
        cart.add_item(
            ProductId::new("p1"),
            "Widget",
            Money::from_cents(100),
            Utc::now(),
        )
        .unwrap();

        assert!(matches!(
            repo.save(&cart),
            Err(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn clear_removes_the_key() {
        let store = Arc::new(InMemoryKvStore::new());
        let repo = CartRepository::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        let mut cart = Cart::new();
        cart.add_item(
            ProductId::new("p1"),
            "Widget",
            Money::from_cents(100),
            Utc::now(),
        )
        .unwrap();
        repo.save(&cart).unwrap();
        assert!(store.get(DEFAULT_CART_KEY).unwrap().is_some());

        repo.clear().unwrap();
        assert!(store.get(DEFAULT_CART_KEY).unwrap().is_none());
    }
}
