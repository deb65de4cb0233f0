//! Courier request payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vrstore_core::Money;

/// Orders above this value require a signature on delivery.
pub const SIGNATURE_THRESHOLD: Money = Money::from_cents(50_000);

/// Delivery recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

/// One order line as the courier sees it: quantity plus unit weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub unit_weight_grams: u32,
}

impl ParcelItem {
    pub fn total_weight_grams(&self) -> u32 {
        self.unit_weight_grams.saturating_mul(self.quantity)
    }
}

/// Everything the courier needs to dispatch one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub order_number: String,
    pub recipient: Recipient,
    pub items: Vec<ParcelItem>,
    pub order_total: Money,
    pub placed_at: DateTime<Utc>,
    pub requires_signature: bool,
}

impl DeliveryRequest {
    pub fn new(
        order_number: impl Into<String>,
        recipient: Recipient,
        items: Vec<ParcelItem>,
        order_total: Money,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            recipient,
            items,
            order_total,
            placed_at,
            requires_signature: order_total > SIGNATURE_THRESHOLD,
        }
    }

    pub fn total_weight_grams(&self) -> u32 {
        self.items
            .iter()
            .map(ParcelItem::total_weight_grams)
            .fold(0, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient {
            name: "Marie Dupont".to_string(),
            address: "12 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75001".to_string(),
            phone: "06 12 34 56 78".to_string(),
        }
    }

    #[test]
    fn weight_sums_across_quantities() {
        let request = DeliveryRequest::new(
            "VR-1",
            recipient(),
            vec![
                ParcelItem {
                    product_id: "laptop".to_string(),
                    name: "Laptop".to_string(),
                    quantity: 2,
                    unit_price: Money::from_cents(89_999),
                    unit_weight_grams: 2_500,
                },
                ParcelItem {
                    product_id: "phone".to_string(),
                    name: "Smartphone".to_string(),
                    quantity: 1,
                    unit_price: Money::from_cents(69_999),
                    unit_weight_grams: 200,
                },
            ],
            Money::from_cents(249_997),
            Utc::now(),
        );

        assert_eq!(request.total_weight_grams(), 5_200);
        assert!(request.requires_signature);
    }

    #[test]
    fn small_orders_skip_the_signature() {
        let request = DeliveryRequest::new(
            "VR-2",
            recipient(),
            vec![],
            Money::from_cents(2_999),
            Utc::now(),
        );
        assert!(!request.requires_signature);
    }
}
