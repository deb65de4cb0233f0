//! `vrstore-validation` — pure customer-field validators.
//!
//! No side effects: every function takes strings in and returns booleans or a
//! [`ValidationReport`]. Formats default to the French locale (5-digit postal
//! codes, `+33`/`0`-prefixed phone numbers) and are configurable per country
//! through [`ValidationRules`].

pub mod report;
pub mod rules;

pub use report::{CustomerField, ValidationReport};
pub use rules::{CustomerFields, ValidationRules};
