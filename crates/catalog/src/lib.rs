//! `vrstore-catalog` — static product reference data.
//!
//! Products are read-only: the catalog is built once at startup and only
//! queried afterwards. User state (cart, orders) lives elsewhere.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, DEFAULT_WEIGHT_GRAMS};
pub use product::{Category, Product};
