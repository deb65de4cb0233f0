//! `vrstore-app` — composition root for the VR store core.
//!
//! [`VrStore`] owns every piece of session state explicitly (cart, order
//! history, event bus, scene state machine, courier, scheduler) and exposes
//! the interface the rendering layer calls in response to user gestures.
//! There are no hidden globals: collaborators hold a reference to the app.

pub mod config;
pub mod store;
pub mod world;

pub use config::StoreConfig;
pub use store::VrStore;
pub use world::{NotificationKind, StoreWorld};
