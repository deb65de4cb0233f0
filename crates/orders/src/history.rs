//! Append-only order history.

use serde::Serialize;

use vrstore_core::{Money, OrderNumber};

use crate::order::{Order, OrderStatus};

/// Aggregate figures over the history (expansion of the debug overlay data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderStatistics {
    pub total_orders: usize,
    pub total_spent: Money,
    pub total_items: u32,
    pub average_order_value: Money,
}

/// Ordered list of finalized orders.
///
/// Append-only in spirit: orders are never mutated after the fact except for
/// status/tracking updates, and the only removals are explicit user deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn append(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn get(&self, number: &OrderNumber) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_number() == number)
    }

    pub fn contains(&self, number: &OrderNumber) -> bool {
        self.get(number).is_some()
    }

    /// Remove one order. Returns it if it was present.
    pub fn delete(&mut self, number: &OrderNumber) -> Option<Order> {
        let index = self
            .orders
            .iter()
            .position(|o| o.order_number() == number)?;
        Some(self.orders.remove(index))
    }

    /// Drop everything; returns how many orders were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.orders.len();
        self.orders.clear();
        count
    }

    /// Apply a courier confirmation if the order is still present.
    ///
    /// Returns `false` when the order has been deleted in the meantime; the
    /// caller must treat the confirmation as stale and drop it.
    pub fn confirm(&mut self, number: &OrderNumber, tracking_number: &str) -> bool {
        match self.orders.iter_mut().find(|o| o.order_number() == number) {
            Some(order) => {
                order.confirm(tracking_number);
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, number: &OrderNumber, status: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|o| o.order_number() == number) {
            Some(order) => {
                order.set_status(status);
                true
            }
            None => false,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders sorted newest first (display order).
    pub fn newest_first(&self) -> Vec<&Order> {
        let mut sorted: Vec<&Order> = self.orders.iter().collect();
        sorted.sort_by(|a, b| b.order_date().cmp(&a.order_date()));
        sorted
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn statistics(&self) -> OrderStatistics {
        let total_orders = self.orders.len();
        let total_spent: Money = self.orders.iter().map(Order::total).sum();
        let total_items: u32 = self.orders.iter().map(Order::item_count).sum();
        let average_order_value = if total_orders == 0 {
            Money::ZERO
        } else {
            Money::from_cents(total_spent.cents() / total_orders as u64)
        };

        OrderStatistics {
            total_orders,
            total_spent,
            total_items,
            average_order_value,
        }
    }

    /// Pretty-printed JSON of the full history (data export).
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.orders)
    }
}
