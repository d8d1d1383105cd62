//! Wait-dependent abandonment of queued customers.
//!
//! The base probability rises with the simulated wait:
//!
//! ```text
//! wait ≤ 5          p = 0
//! 5 < wait ≤ 10     p = 0.05 × (wait − 5)
//! wait > 10         p = 0.15 × (wait − 5)
//! always            p ≤ 0.5
//! ```
//!
//! [`AbandonmentCalibration`] decides how `p` turns into a draw for a single
//! tick.

use pq_core::{AbandonmentCalibration, SimRng, SimTime};

use crate::{Customer, ServiceQueues};

/// Minutes a customer waits before abandonment becomes possible.
pub const GRACE_MINUTES: f64 = 5.0;

/// Wait beyond which the steep rate applies.
pub const STEEP_AFTER_MINUTES: f64 = 10.0;

pub const GENTLE_RATE: f64 = 0.05;
pub const STEEP_RATE: f64 = 0.15;
pub const MAX_PROBABILITY: f64 = 0.5;

/// Base abandonment probability for a customer who has waited `wait` minutes.
pub fn abandonment_probability(wait: f64) -> f64 {
    let p = if wait <= GRACE_MINUTES {
        0.0
    } else if wait <= STEEP_AFTER_MINUTES {
        GENTLE_RATE * (wait - GRACE_MINUTES)
    } else {
        STEEP_RATE * (wait - GRACE_MINUTES)
    };
    p.min(MAX_PROBABILITY)
}

/// Per-tick abandonment model.
#[derive(Copy, Clone, Debug)]
pub struct AbandonmentModel {
    pub calibration:  AbandonmentCalibration,
    pub acceleration: f64,
}

impl AbandonmentModel {
    pub fn new(calibration: AbandonmentCalibration, acceleration: f64) -> Self {
        Self { calibration, acceleration }
    }

    /// Probability that a customer who has waited `wait` minutes leaves
    /// during a tick covering `delta_minutes` of simulated time.
    pub fn tick_probability(&self, wait: f64, delta_minutes: f64) -> f64 {
        let p = abandonment_probability(wait);
        match self.calibration {
            AbandonmentCalibration::TickScaled => p / self.acceleration,
            AbandonmentCalibration::TimeScaled => 1.0 - (1.0 - p).powf(delta_minutes.max(0.0)),
        }
    }

    /// Draw once for every waiting customer; evict and mark the losers.
    ///
    /// Evicted customers come back in queue order with `outcome = Abandoned`
    /// and `service_end = now`.
    pub fn sweep(
        &self,
        queues:        &mut ServiceQueues,
        now:           SimTime,
        delta_minutes: f64,
        rng:           &mut SimRng,
    ) -> Vec<Customer> {
        let mut evicted = queues.evict_where(|customer| {
            let p = self.tick_probability(customer.waited_at(now), delta_minutes);
            // Customers inside the grace period consume no draw.
            p > 0.0 && rng.gen_bool(p)
        });
        for customer in &mut evicted {
            customer.abandon(now);
        }
        evicted
    }
}
