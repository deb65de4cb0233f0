//! Catalog container and queries.

use vrstore_core::{Money, ProductId};

use crate::product::{Category, Product};

/// Weight assumed for products without catalog data (grams).
pub const DEFAULT_WEIGHT_GRAMS: u32 = 1_000;

/// Ordered collection of products, unique by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The demo store shelf.
    pub fn demo() -> Self {
        let cents = Money::from_cents;
        Self::new(vec![
            Product::new(
                "laptop",
                "Laptop",
                cents(89_999),
                Category::Electronics,
                2_500,
                "35x25x2 cm",
                "13-inch ultrabook",
            ),
            Product::new(
                "phone",
                "Smartphone",
                cents(69_999),
                Category::Electronics,
                200,
                "15x7x0.8 cm",
                "6.1-inch smartphone",
            ),
            Product::new(
                "tshirt",
                "T-Shirt",
                cents(2_999),
                Category::Clothing,
                200,
                "30x25x5 cm",
                "Organic cotton t-shirt",
            ),
            Product::new(
                "jeans",
                "Jeans",
                cents(5_999),
                Category::Clothing,
                600,
                "35x30x5 cm",
                "Slim-fit denim",
            ),
            Product::new(
                "lamp",
                "Desk Lamp",
                cents(4_999),
                Category::Home,
                1_500,
                "40x20x20 cm",
                "Adjustable LED desk lamp",
            ),
            Product::new(
                "vase",
                "Ceramic Vase",
                cents(3_999),
                Category::Home,
                1_200,
                "25x15x15 cm",
                "Hand-glazed ceramic vase",
            ),
            Product::new(
                "coffee",
                "Coffee Beans",
                cents(1_999),
                Category::Food,
                500,
                "20x10x10 cm",
                "Single-origin arabica, 500 g",
            ),
            Product::new(
                "chocolate",
                "Dark Chocolate",
                cents(999),
                Category::Food,
                200,
                "15x10x2 cm",
                "70% dark chocolate bar",
            ),
        ])
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Shipping weight for `id`, falling back to [`DEFAULT_WEIGHT_GRAMS`]
    /// for products the catalog does not know.
    pub fn weight_of(&self, id: &ProductId) -> u32 {
        self.get(id)
            .map(|p| p.weight_grams)
            .unwrap_or(DEFAULT_WEIGHT_GRAMS)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Case-insensitive substring search over names and descriptions.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn price_between(&self, min: Money, max: Money) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.price >= min && p.price <= max)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_lookup() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.len(), 8);

        let laptop = catalog.get(&ProductId::new("laptop")).unwrap();
        assert_eq!(laptop.weight_grams, 2_500);
        assert_eq!(laptop.category, Category::Electronics);
    }

    #[test]
    fn unknown_products_get_the_default_weight() {
        let catalog = Catalog::demo();
        assert_eq!(
            catalog.weight_of(&ProductId::new("mystery")),
            DEFAULT_WEIGHT_GRAMS
        );
    }

    #[test]
    fn category_and_search_queries() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.by_category(Category::Clothing).len(), 2);

        let hits = catalog.search("chocolate");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ProductId::new("chocolate"));

        // Description text is searched too.
        assert!(!catalog.search("arabica").is_empty());
        // Blank query returns the full shelf.
        assert_eq!(catalog.search("  ").len(), 8);
    }

    #[test]
    fn price_window_query() {
        let catalog = Catalog::demo();
        let affordable =
            catalog.price_between(Money::from_cents(1_000), Money::from_cents(5_000));
        assert!(
            affordable
                .iter()
                .all(|p| p.price >= Money::from_cents(1_000))
        );
        assert!(affordable.iter().any(|p| p.id == ProductId::new("tshirt")));
    }
}
