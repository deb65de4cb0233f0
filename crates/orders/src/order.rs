//! Order entity and status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vrstore_cart::{CartLine, CartSnapshot};
use vrstore_core::{Money, OrderNumber};
use vrstore_validation::CustomerFields;

/// Delivery recipient as entered in the checkout form (already validated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

impl CustomerDetails {
    /// Borrowed view for the aggregate validator.
    pub fn fields(&self) -> CustomerFields<'_> {
        CustomerFields {
            name: &self.name,
            address: &self.address,
            city: &self.city,
            postal_code: &self.postal_code,
            phone: &self.phone,
        }
    }
}

/// Order status lifecycle; only ever moves forward (or to `Cancelled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// A finalized order.
///
/// Items and total are a snapshot of the cart at checkout time; later cart
/// mutations never touch them. Only `status` and `tracking_number` change
/// after creation, via courier updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_number: OrderNumber,
    customer: CustomerDetails,
    items: Vec<CartLine>,
    total: Money,
    order_date: DateTime<Utc>,
    status: OrderStatus,
    tracking_number: Option<String>,
}

impl Order {
    /// Materialize an order from a cart snapshot and validated customer.
    pub fn from_snapshot(
        order_number: OrderNumber,
        customer: CustomerDetails,
        snapshot: CartSnapshot,
        order_date: DateTime<Utc>,
    ) -> Self {
        Self {
            order_number,
            customer,
            total: snapshot.total,
            items: snapshot.items,
            order_date,
            status: OrderStatus::Pending,
            tracking_number: None,
        }
    }

    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Courier accepted the order.
    pub fn confirm(&mut self, tracking_number: impl Into<String>) {
        self.status = OrderStatus::Confirmed;
        self.tracking_number = Some(tracking_number.into());
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}
