//! Checkout: guard, validate, materialize.
//!
//! The surrounding pipeline (persist, dispatch, commit) is orchestrated by
//! the composition root; this module owns the failure modes that must leave
//! the cart untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;

use vrstore_cart::CartSnapshot;
use vrstore_core::OrderNumber;
use vrstore_validation::{ValidationReport, ValidationRules};

use crate::order::{CustomerDetails, Order};

/// Checkout failures. Neither creates an order nor mutates the cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer details failed validation ({} field(s))", .report.len())]
    Invalid { report: ValidationReport },
}

/// Guard + validate + materialize a new order from a cart snapshot.
///
/// All five customer fields are validated together; the returned report
/// carries one message per failing field.
pub fn place_order(
    snapshot: CartSnapshot,
    customer: CustomerDetails,
    rules: &ValidationRules,
    now: DateTime<Utc>,
) -> Result<Order, CheckoutError> {
    if snapshot.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let report = rules.validate_customer(customer.fields());
    if !report.is_valid() {
        return Err(CheckoutError::Invalid { report });
    }

    Ok(Order::from_snapshot(
        OrderNumber::generate(),
        customer,
        snapshot,
        now,
    ))
}
