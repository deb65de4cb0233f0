//! Session state owned by the composition root.

use serde::Serialize;
use serde_json::json;
use tracing::error;

use vrstore_cart::{Cart, CartRepository};
use vrstore_catalog::Catalog;
use vrstore_delivery::SimulatedCourier;
use vrstore_events::{EventBus, names};
use vrstore_orders::{OrderHistory, OrderHistoryRepository};
use vrstore_runtime::SceneStateMachine;
use vrstore_validation::ValidationRules;

use crate::config::StoreConfig;

/// Severity of a transient user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// All mutable session state, threaded through the frame loop and deferred
/// continuations as a single writer.
pub struct StoreWorld {
    pub config: StoreConfig,
    pub catalog: Catalog,
    pub cart: Cart,
    pub cart_repo: CartRepository,
    pub history: OrderHistory,
    pub history_repo: OrderHistoryRepository,
    pub bus: EventBus,
    pub scene: SceneStateMachine,
    pub courier: SimulatedCourier,
}

impl StoreWorld {
    pub fn rules(&self) -> &ValidationRules {
        &self.config.rules
    }

    /// Publish a transient user-facing message.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        self.bus.publish(
            names::UI_NOTIFICATION,
            json!({ "message": message, "kind": kind }),
        );
    }

    /// Persist the cart. A write failure is reported, never fatal: the
    /// in-memory cart stays authoritative for the session.
    pub(crate) fn persist_cart(&mut self) {
        if let Err(err) = self.cart_repo.save(&self.cart) {
            error!(error = %err, "failed to persist cart");
            self.notify(
                NotificationKind::Error,
                "could not save your cart — changes may not survive a reload",
            );
        }
    }

    /// Persist the order history; same non-fatal policy as the cart.
    pub(crate) fn persist_history(&mut self) {
        if let Err(err) = self.history_repo.save(&self.history) {
            error!(error = %err, "failed to persist order history");
            self.notify(
                NotificationKind::Error,
                "could not save your order history",
            );
        }
    }

    pub(crate) fn publish_cart_updated(&mut self) {
        let total = self.cart.total();
        let free_shipping = total >= self.config.courier.rates.free_shipping_threshold;
        self.bus.publish(
            names::CART_UPDATED,
            json!({
                "item_count": self.cart.item_count(),
                "total": total,
                "free_shipping": free_shipping,
            }),
        );
    }
}

impl core::fmt::Debug for StoreWorld {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreWorld")
            .field("cart_lines", &self.cart.len())
            .field("orders", &self.history.len())
            .field("scene", &self.scene.state())
            .finish()
    }
}
