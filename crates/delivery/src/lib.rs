//! `vrstore-delivery` — simulated delivery courier.
//!
//! The courier is an external collaborator: the store hands it a
//! [`DeliveryRequest`] and receives tracking/cost/ETA data back. Everything
//! here is an in-memory mock; latency is reported, not slept, so callers
//! can model the wait on their own scheduler.

pub mod carrier;
pub mod request;
pub mod simulator;

pub use carrier::{Carrier, ShippingRates};
pub use request::{DeliveryRequest, ParcelItem, Recipient};
pub use simulator::{
    CancellationReceipt, CourierConfig, DeliveryError, DeliveryEstimate, DispatchReceipt,
    RefundStub, SimulatedCourier, TrackingEvent, TrackingReport, TrackingStatus,
};
