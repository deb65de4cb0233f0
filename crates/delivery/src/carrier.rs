//! Carrier selection and shipping rates.

use serde::{Deserialize, Serialize};

use vrstore_core::Money;

/// Delivery provider, selected by total parcel weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Colissimo,
    Chronopost,
    Dhl,
}

impl core::fmt::Display for Carrier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Carrier::Colissimo => "Colissimo",
            Carrier::Chronopost => "Chronopost",
            Carrier::Dhl => "DHL",
        };
        f.write_str(label)
    }
}

/// Weight tiers and cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRates {
    /// Flat cost applied to every paid shipment.
    pub base_cost: Money,
    /// Surcharge per kilogram above `surcharge_threshold_grams`, pro-rated
    /// per gram.
    pub per_kg_surcharge: Money,
    pub surcharge_threshold_grams: u32,
    /// Order value at which shipping becomes free.
    pub free_shipping_threshold: Money,
    /// Parcels up to this weight go with the light carrier.
    pub light_parcel_max_grams: u32,
    /// Parcels up to this weight go with the medium carrier.
    pub medium_parcel_max_grams: u32,
    pub default_delivery_days: u32,
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self {
            base_cost: Money::from_cents(500),
            per_kg_surcharge: Money::from_cents(200),
            surcharge_threshold_grams: 5_000,
            free_shipping_threshold: Money::from_cents(10_000),
            light_parcel_max_grams: 5_000,
            medium_parcel_max_grams: 10_000,
            default_delivery_days: 3,
        }
    }
}

impl ShippingRates {
    /// Pick the carrier tier for a total parcel weight.
    pub fn carrier_for(&self, total_weight_grams: u32) -> Carrier {
        if total_weight_grams <= self.light_parcel_max_grams {
            Carrier::Colissimo
        } else if total_weight_grams <= self.medium_parcel_max_grams {
            Carrier::Chronopost
        } else {
            Carrier::Dhl
        }
    }

    /// Shipping cost for a parcel: free above the order-value threshold,
    /// otherwise base cost plus the per-gram-pro-rated weight surcharge.
    pub fn quote(&self, total_weight_grams: u32, order_total: Money) -> Money {
        if order_total >= self.free_shipping_threshold {
            return Money::ZERO;
        }

        let over_grams =
            u64::from(total_weight_grams.saturating_sub(self.surcharge_threshold_grams));
        let surcharge = self.per_kg_surcharge.cents() * over_grams / 1_000;
        self.base_cost.saturating_add(Money::from_cents(surcharge))
    }
}
