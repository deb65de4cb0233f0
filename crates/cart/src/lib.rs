//! `vrstore-cart` — the shopping cart aggregate.
//!
//! The cart is an insertion-ordered list of line items, unique by product id,
//! with quantities bounded to `[1, 99]`. It is persisted after every
//! mutation through [`CartRepository`]; a failed write is reported, never
//! fatal; the in-memory cart stays authoritative for the session.

pub mod cart;
pub mod repository;

pub use cart::{AddOutcome, Cart, CartLine, CartSnapshot, QuantityLimits, QuantityOutcome};
pub use repository::{CartRepository, DEFAULT_CART_KEY};
