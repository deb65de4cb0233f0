//! The store application: collaborator interface + lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use vrstore_cart::{AddOutcome, Cart, CartLine, CartRepository, CartSnapshot, QuantityOutcome};
use vrstore_catalog::Catalog;
use vrstore_core::{DomainError, DomainResult, Money, OrderNumber, ProductId};
use vrstore_delivery::{
    DeliveryEstimate, DeliveryRequest, ParcelItem, Recipient, SimulatedCourier, TrackingReport,
};
use vrstore_events::{EventBus, names};
use vrstore_orders::{
    CheckoutError, CustomerDetails, Order, OrderHistory, OrderHistoryRepository, OrderStatistics,
    OrderStatus, place_order,
};
use vrstore_runtime::{CallbackId, GameLoop, GamePhase, SceneStateMachine, Scheduler, StateError};
use vrstore_storage::KeyValueStore;

use crate::config::StoreConfig;
use crate::world::{NotificationKind, StoreWorld};

/// The VR store session.
///
/// Owns the world, the frame loop, and the deferred-work scheduler. The
/// rendering layer calls the methods below in response to user gestures and
/// re-renders from the accessors; nothing here touches a display.
pub struct VrStore {
    world: StoreWorld,
    scheduler: Scheduler<StoreWorld>,
    game_loop: GameLoop<StoreWorld>,
}

impl VrStore {
    /// Build a session over the given persistent store. Cart and order
    /// history are loaded from storage; an expired cart is discarded.
    pub fn new(store: Arc<dyn KeyValueStore>, config: StoreConfig) -> Self {
        let cart_repo = CartRepository::with_key(Arc::clone(&store), config.cart_key.clone());
        let history_repo = OrderHistoryRepository::with_key(store, config.orders_key.clone());

        let mut cart = cart_repo.load(config.limits);
        if cart.expired(Utc::now(), config.cart_expiry_days) {
            info!("persisted cart expired; clearing");
            cart.clear();
            if let Err(err) = cart_repo.clear() {
                warn!(error = %err, "failed to remove expired cart from storage");
            }
        }

        let history = history_repo.load();
        let courier = match config.courier_seed {
            Some(seed) => SimulatedCourier::with_seed(config.courier.clone(), seed),
            None => SimulatedCourier::new(config.courier.clone()),
        };

        Self {
            world: StoreWorld {
                catalog: Catalog::demo(),
                cart,
                cart_repo,
                history,
                history_repo,
                bus: EventBus::new(),
                scene: SceneStateMachine::new(),
                courier,
                config,
            },
            scheduler: Scheduler::new(),
            game_loop: GameLoop::new(),
        }
    }

    // ---- lifecycle -------------------------------------------------------

    pub fn start(&mut self, now: f64) {
        self.game_loop.start(now);
    }

    pub fn stop(&mut self) {
        self.game_loop.stop();
    }

    /// Scene assets finished loading.
    pub fn scene_ready(&mut self) -> Result<(), StateError> {
        let StoreWorld { scene, bus, .. } = &mut self.world;
        scene.transition_to(GamePhase::Ready, bus)
    }

    pub fn play(&mut self) -> Result<(), StateError> {
        let StoreWorld { scene, bus, .. } = &mut self.world;
        scene.transition_to(GamePhase::Playing, bus)
    }

    /// Suspend the update phase; permitted only while playing.
    pub fn pause(&mut self) -> bool {
        let StoreWorld { scene, bus, .. } = &mut self.world;
        scene.pause(bus)
    }

    pub fn resume(&mut self) -> bool {
        let StoreWorld { scene, bus, .. } = &mut self.world;
        scene.resume(bus)
    }

    /// Unrecoverable scene-load failure.
    pub fn fail_scene(&mut self) {
        let StoreWorld { scene, bus, .. } = &mut self.world;
        scene.fail(bus);
    }

    /// Advance one frame: run due deferred work, then the update/render
    /// phases. Update callbacks are skipped while paused; deferred courier
    /// completions are not (pause suspends gameplay, not the network).
    pub fn frame(&mut self, now: f64) {
        if !self.game_loop.is_running() {
            return;
        }
        self.scheduler
            .advance(Duration::from_secs_f64(now.max(0.0)), &mut self.world);
        let suspended = self.world.scene.is(GamePhase::Paused);
        self.game_loop.tick(now, &mut self.world, suspended);
    }

    /// Tear the session down: stop the loop, drop callbacks, hooks,
    /// subscriptions, and any parked continuations.
    pub fn cleanup(&mut self) {
        self.game_loop.stop();
        self.game_loop.clear_callbacks();
        self.scheduler.clear();
        self.world.scene.clear_hooks();
        self.world.bus.clear_all();
    }

    pub fn on_update<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&mut StoreWorld, f64) -> anyhow::Result<()> + 'static,
    {
        self.game_loop.on_update(callback)
    }

    pub fn on_render<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&mut StoreWorld, f64) -> anyhow::Result<()> + 'static,
    {
        self.game_loop.on_render(callback)
    }

    // ---- cart operations -------------------------------------------------

    /// Add one unit of a product to the cart.
    pub fn add_to_cart(
        &mut self,
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
    ) -> DomainResult<()> {
        let id = id.into();
        let name = name.into();
        let world = &mut self.world;

        match world.cart.add_item(id.clone(), name.clone(), price, Utc::now()) {
            Ok(AddOutcome::Added { quantity, .. }) => {
                world.persist_cart();
                world.bus.publish(
                    names::PRODUCT_ADDED,
                    json!({ "product_id": id, "name": name, "quantity": quantity }),
                );
                world.publish_cart_updated();
                world.notify(NotificationKind::Info, format!("{name} added to cart!"));
                Ok(())
            }
            Ok(AddOutcome::LimitReached { max }) => {
                world.notify(
                    NotificationKind::Warning,
                    format!("maximum quantity reached ({max})"),
                );
                Ok(())
            }
            Err(err) => {
                world.notify(
                    NotificationKind::Error,
                    "could not add this product to the cart",
                );
                Err(err)
            }
        }
    }

    /// Add a catalog product by id (the product-click path).
    pub fn add_product(&mut self, id: &ProductId) -> DomainResult<()> {
        let product = self
            .world
            .catalog
            .get(id)
            .map(|p| (p.name.clone(), p.price));
        match product {
            Some((name, price)) => self.add_to_cart(id.clone(), name, price),
            None => {
                self.world
                    .notify(NotificationKind::Warning, "product not found");
                Err(DomainError::not_found())
            }
        }
    }

    /// Remove a line item. Returns whether anything was removed.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let world = &mut self.world;
        match world.cart.remove_item(id) {
            Some(line) => {
                world.persist_cart();
                world.bus.publish(
                    names::PRODUCT_REMOVED,
                    json!({ "product_id": line.product_id, "name": line.name }),
                );
                world.publish_cart_updated();
                world.notify(
                    NotificationKind::Info,
                    format!("{} removed from cart", line.name),
                );
                true
            }
            None => false,
        }
    }

    /// Adjust a line's quantity by `delta` (e.g. `+1`/`-1` stepper buttons).
    pub fn update_quantity(&mut self, id: &ProductId, delta: i64) -> QuantityOutcome {
        let removed_name = self.world.cart.line(id).map(|l| l.name.clone());
        let outcome = self.world.cart.update_quantity(id, delta);
        let world = &mut self.world;

        match outcome {
            QuantityOutcome::Updated { .. } => {
                world.persist_cart();
                world.publish_cart_updated();
            }
            QuantityOutcome::LimitReached { max } => {
                world.persist_cart();
                world.publish_cart_updated();
                world.notify(
                    NotificationKind::Warning,
                    format!("maximum quantity reached ({max})"),
                );
            }
            QuantityOutcome::Removed => {
                world.persist_cart();
                world.bus.publish(
                    names::PRODUCT_REMOVED,
                    json!({ "product_id": id, "name": removed_name.clone() }),
                );
                world.publish_cart_updated();
                if let Some(name) = removed_name {
                    world.notify(NotificationKind::Info, format!("{name} removed from cart"));
                }
            }
            QuantityOutcome::Missing => {}
        }
        outcome
    }

    /// Empty the cart. Returns whether it held anything.
    pub fn clear_cart(&mut self) -> bool {
        let world = &mut self.world;
        if world.cart.clear() {
            world.persist_cart();
            world.bus.publish(names::CART_CLEARED, json!(null));
            world.publish_cart_updated();
            world.notify(NotificationKind::Info, "cart cleared");
            true
        } else {
            world.notify(NotificationKind::Info, "cart is already empty");
            false
        }
    }

    pub fn calculate_total(&self) -> Money {
        self.world.cart.total()
    }

    pub fn item_count(&self) -> u32 {
        self.world.cart.item_count()
    }

    pub fn get_cart(&self) -> &[CartLine] {
        self.world.cart.lines()
    }

    /// Deep copy of the cart for data export.
    pub fn export_cart(&self) -> CartSnapshot {
        self.world.cart.export_snapshot(Utc::now())
    }

    // ---- checkout --------------------------------------------------------

    /// Run the checkout pipeline: guard, validate, materialize, persist,
    /// dispatch, commit. Failures before the commit leave the cart intact.
    pub fn checkout(&mut self, customer: CustomerDetails) -> Result<OrderNumber, CheckoutError> {
        let now = Utc::now();
        let snapshot = self.world.cart.export_snapshot(now);

        let placed = place_order(snapshot, customer, self.world.rules(), now);
        let order = match placed {
            Ok(order) => order,
            Err(err) => {
                match &err {
                    CheckoutError::EmptyCart => {
                        self.world
                            .notify(NotificationKind::Warning, "your cart is empty!");
                    }
                    CheckoutError::Invalid { report } => {
                        self.world.notify(
                            NotificationKind::Error,
                            format!(
                                "please correct {} field(s) in the delivery form",
                                report.len()
                            ),
                        );
                    }
                }
                return Err(err);
            }
        };

        let number = order.order_number().clone();
        let total = order.total();
        let item_count = order.item_count();
        let request = build_delivery_request(&self.world.catalog, &order);

        // Persist the order first; a storage failure is non-fatal.
        self.world.history.append(order);
        self.world.persist_history();

        self.dispatch(request, number.clone());

        // Commit: the order exists, the cart empties.
        let world = &mut self.world;
        world.cart.clear();
        world.persist_cart();
        world.bus.publish(
            names::ORDER_PLACED,
            json!({ "order_number": number, "total": total, "item_count": item_count }),
        );
        world.bus.publish(names::CART_CLEARED, json!(null));
        world.notify(
            NotificationKind::Info,
            format!("order confirmed! number {number}"),
        );
        info!(order_number = %number, %total, "order placed");

        Ok(number)
    }

    /// Checkout step 5, fire-and-forget: the courier call starts on the next
    /// frame and is not cancellable once started. Its completion runs after
    /// the reported simulated latency and re-checks that the order still
    /// exists before touching it.
    fn dispatch(&mut self, request: DeliveryRequest, number: OrderNumber) {
        self.scheduler.schedule_in(Duration::ZERO, move |world, scheduler| {
            match world.courier.create_order(&request, Utc::now()) {
                Ok(receipt) => {
                    let wait = receipt.simulated_latency;
                    scheduler.schedule_in(wait, move |world, _| {
                        if !world.history.confirm(&number, &receipt.tracking_number) {
                            info!(
                                order_number = %number,
                                "dropping courier confirmation for a deleted order"
                            );
                            return;
                        }
                        world.persist_history();
                        world.bus.publish(
                            names::ORDER_CONFIRMED,
                            json!({
                                "order_number": number,
                                "tracking_number": receipt.tracking_number,
                                "carrier": receipt.carrier.to_string(),
                                "shipping_cost": receipt.shipping_cost,
                                "estimated_delivery": receipt.estimated_delivery.to_string(),
                            }),
                        );
                        world.notify(
                            NotificationKind::Info,
                            format!(
                                "order shipped via {} — tracking {}",
                                receipt.carrier, receipt.tracking_number
                            ),
                        );
                    });
                }
                Err(err) => {
                    warn!(
                        order_number = %number,
                        error = %err,
                        "courier dispatch failed; order stays recorded locally"
                    );
                    world.notify(
                        NotificationKind::Warning,
                        "delivery service is unavailable — your order is saved and will ship later",
                    );
                }
            }
        });
    }

    // ---- order history ---------------------------------------------------

    pub fn orders(&self) -> &OrderHistory {
        &self.world.history
    }

    /// Remove one order from the history.
    pub fn delete_order(&mut self, number: &OrderNumber) -> bool {
        if self.world.history.delete(number).is_none() {
            return false;
        }
        self.world.persist_history();
        self.world
            .notify(NotificationKind::Info, "order removed from history");
        true
    }

    /// Drop the whole history; returns how many orders were removed.
    pub fn clear_orders(&mut self) -> usize {
        let count = self.world.history.clear();
        if count > 0 {
            self.world.persist_history();
            self.world.notify(NotificationKind::Info, "history cleared");
        } else {
            self.world
                .notify(NotificationKind::Info, "history is already empty");
        }
        count
    }

    pub fn order_statistics(&self) -> OrderStatistics {
        self.world.history.statistics()
    }

    pub fn export_orders(&self) -> Result<String, serde_json::Error> {
        self.world.history.export_json()
    }

    /// Current journey data for a confirmed order.
    pub fn track_order(&mut self, number: &OrderNumber) -> Option<TrackingReport> {
        let tracking = self
            .world
            .history
            .get(number)?
            .tracking_number()?
            .to_string();
        Some(self.world.courier.track_order(&tracking, Utc::now()))
    }

    /// Cancel a confirmed order's shipment; the mock always refunds.
    pub fn cancel_delivery(&mut self, number: &OrderNumber, reason: &str) -> bool {
        let Some(tracking) = self
            .world
            .history
            .get(number)
            .and_then(|o| o.tracking_number().map(str::to_string))
        else {
            return false;
        };

        let receipt = self.world.courier.cancel_order(&tracking, reason, Utc::now());
        self.world.history.set_status(number, OrderStatus::Cancelled);
        self.world.persist_history();
        self.world.notify(
            NotificationKind::Info,
            format!(
                "order cancelled — refund expected by {}",
                receipt.refund.estimated_date
            ),
        );
        true
    }

    pub fn delivery_estimate(&self, postal_code: &str) -> DeliveryEstimate {
        self.world.courier.delivery_estimate(postal_code, Utc::now())
    }

    // ---- accessors -------------------------------------------------------

    pub fn cart(&self) -> &Cart {
        &self.world.cart
    }

    pub fn catalog(&self) -> &Catalog {
        &self.world.catalog
    }

    pub fn scene_phase(&self) -> GamePhase {
        self.world.scene.state()
    }

    pub fn bus(&self) -> &EventBus {
        &self.world.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.world.bus
    }

    pub fn courier_mut(&mut self) -> &mut SimulatedCourier {
        &mut self.world.courier
    }

    pub fn config(&self) -> &StoreConfig {
        &self.world.config
    }

    pub fn frame_count(&self) -> u64 {
        self.game_loop.frame_count()
    }

    pub fn fps(&self) -> f64 {
        self.game_loop.fps()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}

impl core::fmt::Debug for VrStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VrStore")
            .field("world", &self.world)
            .field("scheduler", &self.scheduler)
            .field("game_loop", &self.game_loop)
            .finish()
    }
}

/// Resolve catalog weights into the courier request payload.
fn build_delivery_request(catalog: &Catalog, order: &Order) -> DeliveryRequest {
    let customer = order.customer();
    let items = order
        .items()
        .iter()
        .map(|line| ParcelItem {
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            unit_weight_grams: catalog.weight_of(&line.product_id),
        })
        .collect();

    DeliveryRequest::new(
        order.order_number().as_str(),
        Recipient {
            name: customer.name.clone(),
            address: customer.address.clone(),
            city: customer.city.clone(),
            postal_code: customer.postal_code.clone(),
            phone: customer.phone.clone(),
        },
        items,
        order.total(),
        order.order_date(),
    )
}
