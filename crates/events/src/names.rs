//! Well-known event names published by the store core.

/// Scene lifecycle transition; payload `{old, new}`.
pub const STATE_CHANGED: &str = "state:changed";

/// A product entered the cart; payload `{product_id, name, quantity}`.
pub const PRODUCT_ADDED: &str = "product:added";

/// A line item left the cart; payload `{product_id, name}`.
pub const PRODUCT_REMOVED: &str = "product:removed";

/// Cart contents changed; payload `{item_count, total, free_shipping}`.
pub const CART_UPDATED: &str = "cart:updated";

/// Cart emptied (explicit clear, expiry, or checkout commit).
pub const CART_CLEARED: &str = "cart:cleared";

/// Checkout committed an order; payload `{order_number, total, item_count}`.
pub const ORDER_PLACED: &str = "order:placed";

/// Courier accepted an order; payload `{order_number, tracking_number, carrier}`.
pub const ORDER_CONFIRMED: &str = "order:confirmed";

/// Transient user-facing message; payload `{message, kind}`.
pub const UI_NOTIFICATION: &str = "ui:notification";
