//! `vrstore-orders` — order entity, append-only history, checkout.
//!
//! An order is materialized from a validated cart snapshot at checkout and
//! is immutable afterwards except for its status and tracking number, which
//! courier confirmations update.

pub mod checkout;
pub mod history;
pub mod order;
pub mod repository;

pub use checkout::{CheckoutError, place_order};
pub use history::{OrderHistory, OrderStatistics};
pub use order::{CustomerDetails, Order, OrderStatus};
pub use repository::{DEFAULT_ORDERS_KEY, OrderHistoryRepository};
