//! Cart aggregate: line items, quantity bounds, derived totals, snapshots.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use vrstore_core::{CURRENCY, DomainError, DomainResult, Money, ProductId};

/// Quantity bounds for a single line item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityLimits {
    pub min: u32,
    pub max: u32,
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self { min: 1, max: 99 }
    }
}

/// One product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Result of an add: either the line's new quantity, or the cap was hit.
///
/// `LimitReached` is a signal, not an error; the caller surfaces it as a
/// notification and the cart is left unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { quantity: u32, new_line: bool },
    LimitReached { max: u32 },
}

/// Result of a quantity adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated { quantity: u32 },
    /// The adjustment drove the quantity below the minimum; the line is gone.
    Removed,
    /// Clamped at the maximum; quantity now sits at the cap.
    LimitReached { max: u32 },
    /// No such product in the cart.
    Missing,
}

/// Deep, independent copy of cart state at a point in time.
///
/// Snapshots never alias the live cart: later mutations do not affect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub item_count: u32,
    pub total: Money,
    pub currency: String,
    pub exported_at: DateTime<Utc>,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The cart aggregate.
///
/// Invariants: at most one line per product id; every quantity within the
/// configured bounds. All timestamps are passed in by the caller so tests
/// stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLine>,
    limits: QuantityLimits,
}

impl Cart {
    pub fn new() -> Self {
        Self::with_limits(QuantityLimits::default())
    }

    pub fn with_limits(limits: QuantityLimits) -> Self {
        Self {
            items: Vec::new(),
            limits,
        }
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Storage contents are untrusted: duplicate product ids collapse into
    /// the first occurrence and out-of-bounds quantities are clamped, with a
    /// warning, rather than poisoning the session.
    pub fn from_lines(lines: Vec<CartLine>, limits: QuantityLimits) -> Self {
        let mut cart = Self::with_limits(limits);
        for mut line in lines {
            if cart.contains(&line.product_id) {
                warn!(product_id = %line.product_id, "dropping duplicate persisted cart line");
                continue;
            }
            if line.quantity < limits.min || line.quantity > limits.max {
                warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "clamping out-of-bounds persisted quantity"
                );
                line.quantity = line.quantity.clamp(limits.min, limits.max);
            }
            cart.items.push(line);
        }
        cart
    }

    pub fn limits(&self) -> QuantityLimits {
        self.limits
    }

    /// Add one unit of a product.
    ///
    /// An existing line increments by 1, capped at the maximum (the cap is
    /// reported as [`AddOutcome::LimitReached`], leaving the line unchanged);
    /// otherwise a new line is appended with quantity 1.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<AddOutcome> {
        let name = name.into();
        if product_id.is_blank() {
            return Err(DomainError::validation("product id must not be blank"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be blank"));
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product_id) {
            if line.quantity >= self.limits.max {
                return Ok(AddOutcome::LimitReached {
                    max: self.limits.max,
                });
            }
            line.quantity += 1;
            return Ok(AddOutcome::Added {
                quantity: line.quantity,
                new_line: false,
            });
        }

        self.items.push(CartLine {
            product_id,
            name,
            unit_price,
            quantity: 1,
            added_at: now,
        });
        Ok(AddOutcome::Added {
            quantity: 1,
            new_line: true,
        })
    }

    /// Remove a line; returns it if present, `None` otherwise.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let index = self.items.iter().position(|l| &l.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Adjust a line's quantity by `delta`.
    ///
    /// A result below the minimum removes the line; above the maximum clamps
    /// to the cap and reports [`QuantityOutcome::LimitReached`].
    pub fn update_quantity(&mut self, product_id: &ProductId, delta: i64) -> QuantityOutcome {
        let Some(index) = self.items.iter().position(|l| &l.product_id == product_id) else {
            return QuantityOutcome::Missing;
        };

        let current = i64::from(self.items[index].quantity);
        let requested = current.saturating_add(delta);

        if requested < i64::from(self.limits.min) {
            self.items.remove(index);
            return QuantityOutcome::Removed;
        }
        if requested > i64::from(self.limits.max) {
            self.items[index].quantity = self.limits.max;
            return QuantityOutcome::LimitReached {
                max: self.limits.max,
            };
        }

        self.items[index].quantity = requested as u32;
        QuantityOutcome::Updated {
            quantity: requested as u32,
        }
    }

    /// Empty the cart. Returns `false` when it was already empty.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    /// Σ(unit price × quantity), recomputed from the lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity across lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.items.iter().find(|l| &l.product_id == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn oldest_added_at(&self) -> Option<DateTime<Utc>> {
        self.items.iter().map(|l| l.added_at).min()
    }

    /// Whether the oldest line is past the expiry budget.
    pub fn expired(&self, now: DateTime<Utc>, expiry_days: i64) -> bool {
        self.oldest_added_at()
            .is_some_and(|oldest| now - oldest > Duration::days(expiry_days))
    }

    /// Deep copy of the current state for checkout or export.
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            item_count: self.item_count(),
            total: self.total(),
            currency: CURRENCY.to_string(),
            exported_at: now,
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc::now()
    }

    fn cents(c: u64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn adding_three_times_yields_one_line_quantity_three() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(ProductId::new("p1"), "Widget", cents(2999), t0())
                .unwrap();
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("p1")).unwrap().quantity, 3);
        assert_eq!(cart.total(), cents(8997));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn blank_id_or_name_is_rejected() {
        let mut cart = Cart::new();
        assert!(
            cart.add_item(ProductId::new(""), "Widget", cents(100), t0())
                .is_err()
        );
        assert!(
            cart.add_item(ProductId::new("p1"), "  ", cents(100), t0())
                .is_err()
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn add_at_cap_is_a_no_op_signal() {
        let mut cart = Cart::with_limits(QuantityLimits { min: 1, max: 3 });
        for _ in 0..3 {
            cart.add_item(ProductId::new("p1"), "Widget", cents(100), t0())
                .unwrap();
        }

        let outcome = cart
            .add_item(ProductId::new("p1"), "Widget", cents(100), t0())
            .unwrap();
        assert_eq!(outcome, AddOutcome::LimitReached { max: 3 });
        assert_eq!(cart.line(&ProductId::new("p1")).unwrap().quantity, 3);
    }

    #[test]
    fn update_quantity_to_zero_removes_the_line() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("p1"), "Widget", cents(100), t0())
            .unwrap();

        let outcome = cart.update_quantity(&ProductId::new("p1"), -1);
        assert_eq!(outcome, QuantityOutcome::Removed);
        assert!(!cart.contains(&ProductId::new("p1")));
    }

    #[test]
    fn update_quantity_clamps_at_the_cap() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("p1"), "Widget", cents(100), t0())
            .unwrap();

        let outcome = cart.update_quantity(&ProductId::new("p1"), 1_000);
        assert_eq!(outcome, QuantityOutcome::LimitReached { max: 99 });
        assert_eq!(cart.line(&ProductId::new("p1")).unwrap().quantity, 99);
    }

    #[test]
    fn update_quantity_on_missing_product_reports_missing() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.update_quantity(&ProductId::new("ghost"), 1),
            QuantityOutcome::Missing
        );
    }

    #[test]
    fn remove_returns_the_line() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("p1"), "Widget", cents(100), t0())
            .unwrap();

        let removed = cart.remove_item(&ProductId::new("p1")).unwrap();
        assert_eq!(removed.name, "Widget");
        assert!(cart.remove_item(&ProductId::new("p1")).is_none());
    }

    #[test]
    fn clear_reports_whether_anything_changed() {
        let mut cart = Cart::new();
        assert!(!cart.clear());

        cart.add_item(ProductId::new("p1"), "Widget", cents(100), t0())
            .unwrap();
        assert!(cart.clear());
        assert!(cart.is_empty());
    }

    #[test]
    fn snapshot_does_not_alias_live_state() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::new("p1"), "Widget", cents(2999), t0())
            .unwrap();

        let snapshot = cart.export_snapshot(t0());
        cart.add_item(ProductId::new("p1"), "Widget", cents(2999), t0())
            .unwrap();
        cart.add_item(ProductId::new("p2"), "Gadget", cents(500), t0())
            .unwrap();

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].quantity, 1);
        assert_eq!(snapshot.total, cents(2999));
        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.currency, "EUR");
    }

    #[test]
    fn expiry_is_measured_from_the_oldest_line() {
        let mut cart = Cart::new();
        let old = Utc::now() - Duration::days(10);
        let fresh = Utc::now();
        cart.add_item(ProductId::new("p1"), "Widget", cents(100), old)
            .unwrap();
        cart.add_item(ProductId::new("p2"), "Gadget", cents(100), fresh)
            .unwrap();

        assert!(cart.expired(Utc::now(), 7));
        assert!(!cart.expired(Utc::now(), 30));
        assert!(!Cart::new().expired(Utc::now(), 7));
    }

    #[test]
    fn from_lines_repairs_untrusted_storage_data() {
        let limits = QuantityLimits::default();
        let line = |id: &str, quantity: u32| CartLine {
            product_id: ProductId::new(id),
            name: id.to_string(),
            unit_price: cents(100),
            quantity,
            added_at: t0(),
        };

        let cart = Cart::from_lines(vec![line("a", 5), line("a", 2), line("b", 500)], limits);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.line(&ProductId::new("a")).unwrap().quantity, 5);
        assert_eq!(cart.line(&ProductId::new("b")).unwrap().quantity, 99);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(u8),
            Remove(u8),
            Update(u8, i64),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..8).prop_map(Op::Add),
                (0u8..8).prop_map(Op::Remove),
                ((0u8..8), -120i64..120).prop_map(|(p, d)| Op::Update(p, d)),
            ]
        }

        fn product(n: u8) -> ProductId {
            ProductId::new(format!("p{n}"))
        }

        proptest! {
            /// Any op sequence preserves the aggregate invariants: product
            /// ids stay unique and quantities stay inside [min, max].
            #[test]
            fn invariants_hold_for_all_op_sequences(ops in proptest::collection::vec(op_strategy(), 0..64)) {
                let mut cart = Cart::new();
                for op in ops {
                    match op {
                        Op::Add(p) => {
                            cart.add_item(product(p), format!("product {p}"), cents(999), t0()).unwrap();
                        }
                        Op::Remove(p) => {
                            cart.remove_item(&product(p));
                        }
                        Op::Update(p, d) => {
                            cart.update_quantity(&product(p), d);
                        }
                    }

                    let mut seen = std::collections::HashSet::new();
                    for line in cart.lines() {
                        prop_assert!(seen.insert(line.product_id.clone()), "duplicate product id");
                        prop_assert!(line.quantity >= 1 && line.quantity <= 99);
                    }
                }
            }

            /// The derived total always equals a fresh recomputation; no
            /// drift from incremental updates.
            #[test]
            fn total_never_drifts(ops in proptest::collection::vec(op_strategy(), 0..64)) {
                let mut cart = Cart::new();
                for op in ops {
                    match op {
                        Op::Add(p) => {
                            let price = cents(100 + u64::from(p) * 50);
                            cart.add_item(product(p), format!("product {p}"), price, t0()).unwrap();
                        }
                        Op::Remove(p) => {
                            cart.remove_item(&product(p));
                        }
                        Op::Update(p, d) => {
                            cart.update_quantity(&product(p), d);
                        }
                    }
                }

                let recomputed: Money = cart
                    .lines()
                    .iter()
                    .map(|l| l.unit_price.times(l.quantity))
                    .sum();
                prop_assert_eq!(cart.total(), recomputed);
            }
        }
    }
}
