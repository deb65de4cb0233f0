//! Scripted headless demo session.
//!
//! Drives a full shopping flow against the in-memory store: browse, fill
//! the cart, pause/resume, check out, and tick frames until the courier
//! confirmation lands.

use std::sync::Arc;

use tracing::info;

use vrstore_app::{StoreConfig, VrStore};
use vrstore_core::ProductId;
use vrstore_orders::CustomerDetails;
use vrstore_storage::InMemoryKvStore;

const FRAME_STEP: f64 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    vrstore_observability::init();

    let store = Arc::new(InMemoryKvStore::new());
    let mut app = VrStore::new(store, StoreConfig::default());

    let mut clock = 0.0;
    app.start(clock);
    app.scene_ready()?;
    app.play()?;

    // Browse the shelf.
    for product in app.catalog().iter() {
        info!(id = %product.id, name = %product.name, price = %product.price, "on shelf");
    }

    // Fill the cart: one laptop, three t-shirts.
    app.add_product(&ProductId::new("laptop"))?;
    for _ in 0..3 {
        app.add_product(&ProductId::new("tshirt"))?;
    }
    info!(
        items = app.item_count(),
        total = %app.calculate_total(),
        "cart filled"
    );

    // A short pause mid-session; updates suspend, the clock keeps going.
    app.pause();
    for _ in 0..30 {
        clock += FRAME_STEP;
        app.frame(clock);
    }
    app.resume();

    let estimate = app.delivery_estimate("75001");
    info!(days = estimate.days, date = %estimate.date, "delivery estimate for Paris");

    let number = app.checkout(CustomerDetails {
        name: "Marie Dupont".to_string(),
        address: "12 rue de la Paix".to_string(),
        city: "Paris".to_string(),
        postal_code: "75001".to_string(),
        phone: "06 12 34 56 78".to_string(),
    })?;

    // Tick until the courier confirmation lands.
    for _ in 0..120 {
        clock += FRAME_STEP;
        app.frame(clock);
    }

    if let Some(order) = app.orders().get(&number) {
        info!(
            order_number = %number,
            status = %order.status(),
            tracking = order.tracking_number().unwrap_or("-"),
            "order after courier round-trip"
        );
    }

    if let Some(report) = app.track_order(&number) {
        info!(
            location = %report.current_location,
            eta = %report.estimated_delivery,
            "tracking report"
        );
    }

    let stats = app.order_statistics();
    info!(
        orders = stats.total_orders,
        spent = %stats.total_spent,
        items = stats.total_items,
        "session statistics"
    );

    app.cleanup();
    Ok(())
}
