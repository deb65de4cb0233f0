//! Session configuration.

use vrstore_cart::{DEFAULT_CART_KEY, QuantityLimits};
use vrstore_delivery::CourierConfig;
use vrstore_orders::DEFAULT_ORDERS_KEY;
use vrstore_validation::ValidationRules;

/// Everything tunable about one store session.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage key for the serialized cart.
    pub cart_key: String,
    /// Storage key for the serialized order history.
    pub orders_key: String,
    /// Days before a persisted cart auto-clears (measured from its oldest
    /// line).
    pub cart_expiry_days: i64,
    pub limits: QuantityLimits,
    pub rules: ValidationRules,
    pub courier: CourierConfig,
    /// Seed the courier RNG for deterministic sessions (tests/demos).
    pub courier_seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            orders_key: DEFAULT_ORDERS_KEY.to_string(),
            cart_expiry_days: 7,
            limits: QuantityLimits::default(),
            rules: ValidationRules::french(),
            courier: CourierConfig::default(),
            courier_seed: None,
        }
    }
}
