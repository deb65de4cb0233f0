//! The simulated courier service.

use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use vrstore_core::{CURRENCY, Money};

use crate::carrier::{Carrier, ShippingRates};
use crate::request::DeliveryRequest;

/// Courier failure after retry exhaustion.
///
/// The order remains recorded locally regardless; this error only means no
/// tracking data was obtained.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("delivery service unavailable after {attempts} attempt(s)")]
    Unavailable { attempts: u32 },
}

/// Courier behavior knobs.
#[derive(Debug, Clone)]
pub struct CourierConfig {
    pub max_attempts: u32,
    /// Base wait before a retry; grows linearly with the attempt number.
    pub base_backoff: Duration,
    /// Simulated round-trip for a dispatch attempt.
    pub request_latency: Duration,
    /// Simulated round-trip for tracking/cancellation lookups.
    pub tracking_latency: Duration,
    pub rates: ShippingRates,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
            request_latency: Duration::from_millis(500),
            tracking_latency: Duration::from_millis(300),
            rates: ShippingRates::default(),
        }
    }
}

impl CourierConfig {
    /// Wait before retrying after failed attempt `attempt` (1-indexed).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        self.base_backoff * attempt
    }
}

/// Successful dispatch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub order_number: String,
    pub tracking_number: String,
    pub carrier: Carrier,
    pub shipping_cost: Money,
    pub estimated_delivery: NaiveDate,
    /// How many attempts the dispatch took (1 = no retries).
    pub attempts: u32,
    /// Total simulated wait: per-attempt latency plus backoffs.
    pub simulated_latency: Duration,
}

/// Parcel journey milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    OrderPlaced,
    Dispatched,
    InTransit,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub at: DateTime<Utc>,
    pub status: TrackingStatus,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingReport {
    pub tracking_number: String,
    pub status: TrackingStatus,
    pub estimated_delivery: NaiveDate,
    pub current_location: String,
    pub history: Vec<TrackingEvent>,
    pub simulated_latency: Duration,
}

/// Placeholder refund: the mock never charges, so the amount is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundStub {
    pub amount: Money,
    pub currency: String,
    pub method: String,
    pub estimated_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationReceipt {
    pub tracking_number: String,
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
    pub refund: RefundStub,
    pub simulated_latency: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryEstimate {
    pub days: u32,
    pub date: NaiveDate,
}

/// In-memory courier mock.
///
/// No call ever blocks: "latency" is reported on each receipt so the caller
/// can defer the completion on its own scheduler. Failures are injected
/// explicitly (there is no hidden flakiness), which keeps retry behavior
/// fully deterministic under a seeded RNG.
#[derive(Debug)]
pub struct SimulatedCourier {
    config: CourierConfig,
    rng: StdRng,
    pending_failures: u32,
}

impl SimulatedCourier {
    pub fn new(config: CourierConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
            pending_failures: 0,
        }
    }

    /// Deterministic courier for tests.
    pub fn with_seed(config: CourierConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            pending_failures: 0,
        }
    }

    pub fn config(&self) -> &CourierConfig {
        &self.config
    }

    /// Make the next `count` dispatch attempts fail.
    pub fn inject_failures(&mut self, count: u32) {
        self.pending_failures += count;
    }

    fn attempt_fails(&mut self) -> bool {
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            true
        } else {
            false
        }
    }

    /// Dispatch an order, retrying with increasing backoff.
    pub fn create_order(
        &mut self,
        request: &DeliveryRequest,
        now: DateTime<Utc>,
    ) -> Result<DispatchReceipt, DeliveryError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut latency = Duration::ZERO;

        for attempt in 1..=max_attempts {
            latency += self.config.request_latency;

            if self.attempt_fails() {
                warn!(
                    order_number = %request.order_number,
                    attempt,
                    "courier dispatch attempt failed"
                );
                if attempt < max_attempts {
                    latency += self.config.backoff_for_attempt(attempt);
                }
                continue;
            }

            let weight = request.total_weight_grams();
            let receipt = DispatchReceipt {
                order_number: request.order_number.clone(),
                tracking_number: self.next_tracking_number(),
                carrier: self.config.rates.carrier_for(weight),
                shipping_cost: self.config.rates.quote(weight, request.order_total),
                estimated_delivery: self.estimated_delivery(now),
                attempts: attempt,
                simulated_latency: latency,
            };
            info!(
                order_number = %receipt.order_number,
                tracking_number = %receipt.tracking_number,
                carrier = %receipt.carrier,
                "courier accepted order"
            );
            return Ok(receipt);
        }

        Err(DeliveryError::Unavailable {
            attempts: max_attempts,
        })
    }

    /// Current journey data for a tracking number. Idempotent per call; the
    /// mock fabricates a plausible in-transit journey.
    pub fn track_order(&mut self, tracking_number: &str, now: DateTime<Utc>) -> TrackingReport {
        let history = vec![
            TrackingEvent {
                at: now - ChronoDuration::hours(2),
                status: TrackingStatus::OrderPlaced,
                location: "VR store".to_string(),
            },
            TrackingEvent {
                at: now - ChronoDuration::hours(1),
                status: TrackingStatus::Dispatched,
                location: "warehouse".to_string(),
            },
        ];

        TrackingReport {
            tracking_number: tracking_number.to_string(),
            status: TrackingStatus::InTransit,
            estimated_delivery: self.estimated_delivery(now),
            current_location: "sorting facility".to_string(),
            history,
            simulated_latency: self.config.tracking_latency,
        }
    }

    /// Cancel a shipment. Always succeeds in the mock and returns a refund
    /// stub dated a week out.
    pub fn cancel_order(
        &mut self,
        tracking_number: &str,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> CancellationReceipt {
        let reason = reason.into();
        info!(tracking_number, reason = %reason, "courier cancelled shipment");

        CancellationReceipt {
            tracking_number: tracking_number.to_string(),
            reason,
            cancelled_at: now,
            refund: RefundStub {
                amount: Money::ZERO,
                currency: CURRENCY.to_string(),
                method: "original_payment".to_string(),
                estimated_date: (now + ChronoDuration::days(7)).date_naive(),
            },
            simulated_latency: self.config.tracking_latency,
        }
    }

    /// Days-to-deliver estimate from the destination postal code: Paris
    /// (75xxx) is next-day, overseas prefixes (9xxxx) take a week.
    pub fn delivery_estimate(&self, postal_code: &str, now: DateTime<Utc>) -> DeliveryEstimate {
        let postal = postal_code.trim();
        let days = if postal.starts_with("75") {
            1
        } else if postal.starts_with('9') {
            7
        } else {
            self.config.rates.default_delivery_days
        };

        DeliveryEstimate {
            days,
            date: (now + ChronoDuration::days(i64::from(days))).date_naive(),
        }
    }

    fn next_tracking_number(&mut self) -> String {
        format!("FR{}", self.rng.gen_range(100_000_000u64..1_000_000_000))
    }

    fn estimated_delivery(&mut self, now: DateTime<Utc>) -> NaiveDate {
        (now + ChronoDuration::days(self.rng.gen_range(2..=4))).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ParcelItem, Recipient};

    fn recipient() -> Recipient {
        Recipient {
            name: "Marie Dupont".to_string(),
            address: "12 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75001".to_string(),
            phone: "06 12 34 56 78".to_string(),
        }
    }

    fn request(weight_grams: u32, total_cents: u64) -> DeliveryRequest {
        DeliveryRequest::new(
            "VR-test",
            recipient(),
            vec![ParcelItem {
                product_id: "p1".to_string(),
                name: "Widget".to_string(),
                quantity: 1,
                unit_price: Money::from_cents(total_cents),
                unit_weight_grams: weight_grams,
            }],
            Money::from_cents(total_cents),
            Utc::now(),
        )
    }

    fn courier() -> SimulatedCourier {
        SimulatedCourier::with_seed(CourierConfig::default(), 42)
    }

    #[test]
    fn dispatch_succeeds_first_try_without_injected_failures() {
        let mut courier = courier();
        let receipt = courier.create_order(&request(200, 2_999), Utc::now()).unwrap();

        assert_eq!(receipt.attempts, 1);
        assert_eq!(receipt.carrier, Carrier::Colissimo);
        assert_eq!(receipt.simulated_latency, Duration::from_millis(500));
        assert!(receipt.tracking_number.starts_with("FR"));
        assert_eq!(receipt.tracking_number.len(), 11);
    }

    #[test]
    fn dispatch_retries_then_succeeds() {
        let mut courier = courier();
        courier.inject_failures(2);

        let receipt = courier.create_order(&request(200, 2_999), Utc::now()).unwrap();
        assert_eq!(receipt.attempts, 3);
        // 3 × 500 ms request latency + 1 s + 2 s backoff.
        assert_eq!(receipt.simulated_latency, Duration::from_millis(4_500));
    }

    #[test]
    fn dispatch_exhausts_retries() {
        let mut courier = courier();
        courier.inject_failures(3);

        let err = courier
            .create_order(&request(200, 2_999), Utc::now())
            .unwrap_err();
        assert_eq!(err, DeliveryError::Unavailable { attempts: 3 });

        // The failure budget is spent; the next dispatch goes through.
        assert!(courier.create_order(&request(200, 2_999), Utc::now()).is_ok());
    }

    #[test]
    fn free_shipping_above_the_order_value_threshold() {
        let mut courier = courier();
        let receipt = courier
            .create_order(&request(6_000, 10_000), Utc::now())
            .unwrap();
        assert_eq!(receipt.shipping_cost, Money::ZERO);
    }

    #[test]
    fn heavy_cheap_order_pays_the_weight_surcharge() {
        let mut courier = courier();
        let receipt = courier
            .create_order(&request(6_000, 9_000), Utc::now())
            .unwrap();
        assert_eq!(receipt.shipping_cost, Money::from_cents(700));
        assert_eq!(receipt.carrier, Carrier::Chronopost);
    }

    #[test]
    fn seeded_couriers_are_deterministic() {
        let now = Utc::now();
        let mut a = SimulatedCourier::with_seed(CourierConfig::default(), 7);
        let mut b = SimulatedCourier::with_seed(CourierConfig::default(), 7);

        let ra = a.create_order(&request(200, 2_999), now).unwrap();
        let rb = b.create_order(&request(200, 2_999), now).unwrap();
        assert_eq!(ra.tracking_number, rb.tracking_number);
        assert_eq!(ra.estimated_delivery, rb.estimated_delivery);
    }

    #[test]
    fn estimated_delivery_lands_two_to_four_days_out() {
        let mut courier = courier();
        let now = Utc::now();
        for _ in 0..20 {
            let receipt = courier.create_order(&request(200, 2_999), now).unwrap();
            let days = (receipt.estimated_delivery - now.date_naive()).num_days();
            assert!((2..=4).contains(&days), "unexpected ETA offset {days}");
        }
    }

    #[test]
    fn tracking_reports_an_in_transit_journey() {
        let mut courier = courier();
        let report = courier.track_order("FR123456789", Utc::now());

        assert_eq!(report.status, TrackingStatus::InTransit);
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history[0].status, TrackingStatus::OrderPlaced);
        assert_eq!(report.history[1].status, TrackingStatus::Dispatched);
        assert!(report.history[0].at < report.history[1].at);
    }

    #[test]
    fn cancellation_always_succeeds_with_a_refund_stub() {
        let mut courier = courier();
        let now = Utc::now();
        let receipt = courier.cancel_order("FR123456789", "changed my mind", now);

        assert_eq!(receipt.refund.amount, Money::ZERO);
        assert_eq!(receipt.refund.method, "original_payment");
        assert_eq!(
            receipt.refund.estimated_date,
            (now + ChronoDuration::days(7)).date_naive()
        );
    }

    #[test]
    fn postal_code_drives_the_delivery_estimate() {
        let courier = courier();
        let now = Utc::now();
        assert_eq!(courier.delivery_estimate("75001", now).days, 1);
        assert_eq!(courier.delivery_estimate("97400", now).days, 7);
        assert_eq!(courier.delivery_estimate("13006", now).days, 3);
    }
}
