//! Product reference data.

use serde::{Deserialize, Serialize};

use vrstore_core::{Money, ProductId};

/// Merchandising category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Home,
    Food,
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Home => "home",
            Category::Food => "food",
        };
        f.write_str(label)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub category: Category,
    /// Shipping weight in grams.
    pub weight_grams: u32,
    /// Parcel dimensions, e.g. `"35x25x2 cm"`.
    pub dimensions: String,
    pub description: String,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: Category,
        weight_grams: u32,
        dimensions: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            weight_grams,
            dimensions: dimensions.into(),
            description: description.into(),
        }
    }
}
