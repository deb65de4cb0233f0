//! `vrstore-events` — synchronous in-process pub/sub.
//!
//! The bus decouples UI triggers from cart/order mutations. It is strictly
//! same-thread: `publish` invokes every current subscriber before returning.
//! No cross-thread or cross-process semantics.

pub mod bus;
pub mod history;
pub mod names;

pub use bus::{EventBus, EventRecord, HandlerId};
pub use history::EventHistory;
