//! `vrstore-storage` — persistent key-value store contract.
//!
//! Wraps the host's synchronous string store (browser local storage in the
//! original environment). Every call can fail (quota, availability) and
//! failures are surfaced as values, never as panics; callers decide whether
//! a failed write is fatal (it never is for the cart: in-memory state stays
//! authoritative for the session).

pub mod kv;
pub mod memory;

pub use kv::{KeyValueStore, StorageError, load_json, save_json};
pub use memory::InMemoryKvStore;
