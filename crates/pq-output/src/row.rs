//! Plain data row types written by output backends.

use std::time::{SystemTime, UNIX_EPOCH};

use pq_core::SimConfig;
use pq_sim::{Customer, ServerEvent};

/// Seconds since the Unix epoch, or 0 if the system clock is before it.
pub fn unix_secs_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// One simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub run_id:              u64,
    pub policy:              String,
    pub acceleration:        f64,
    pub start_unix_secs:     i64,
    /// Set when the run is closed.
    pub end_unix_secs:       Option<i64>,
    /// Base service minutes per category, in category order.
    pub service_minutes:     Vec<(String, f64)>,
    pub abandonment_enabled: bool,
}

impl RunRow {
    pub fn from_config(run_id: u64, config: &SimConfig, start_unix_secs: i64) -> Self {
        Self {
            run_id,
            policy:              config.policy.as_str().to_owned(),
            acceleration:        config.acceleration,
            start_unix_secs,
            end_unix_secs:       None,
            service_minutes:     config
                .categories
                .iter()
                .map(|c| (c.name.clone(), c.service_minutes))
                .collect(),
            abandonment_enabled: config.abandonment_enabled,
        }
    }

    /// `standard_post=2;passports=5;parcels=3`
    pub fn service_minutes_text(&self) -> String {
        self.service_minutes
            .iter()
            .map(|(name, minutes)| format!("{name}={minutes}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// The full journey of one finished customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerJourneyRow {
    pub run_id:           u64,
    pub customer_id:      u64,
    pub category:         String,
    pub arrival_time:     f64,
    pub queue_join_time:  f64,
    pub service_start:    Option<f64>,
    pub service_end:      Option<f64>,
    pub wait_duration:    Option<f64>,
    pub service_duration: Option<f64>,
    /// `completed` or `abandoned`.
    pub outcome:          &'static str,
    pub server:           Option<u32>,
    pub booth:            Option<u32>,
}

impl CustomerJourneyRow {
    pub fn new(run_id: u64, customer: &Customer, category: &str) -> Self {
        Self {
            run_id,
            customer_id:      customer.id.0,
            category:         category.to_owned(),
            arrival_time:     customer.arrival_time.minutes(),
            queue_join_time:  customer.queue_join_time.minutes(),
            service_start:    customer.service_start.map(|t| t.minutes()),
            service_end:      customer.service_end.map(|t| t.minutes()),
            wait_duration:    customer.wait_duration(),
            service_duration: customer.service_duration(),
            outcome:          customer.outcome.map_or("unfinished", |o| o.as_str()),
            server:           customer.server.map(|s| s.0),
            booth:            customer.booth.map(|b| b.0),
        }
    }
}

/// A server starting or finishing a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEventRow {
    pub run_id:   u64,
    pub server:   u32,
    /// `service_started` or `service_finished`.
    pub kind:     &'static str,
    pub time:     f64,
    pub booth:    u32,
    pub customer: u64,
    pub category: String,
}

impl ServerEventRow {
    pub fn new(run_id: u64, event: &ServerEvent, category: &str) -> Self {
        Self {
            run_id,
            server:   event.server.0,
            kind:     event.kind.as_str(),
            time:     event.time.minutes(),
            booth:    event.booth.0,
            customer: event.customer.0,
            category: category.to_owned(),
        }
    }
}

/// Length of one category's queue at a simulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshotRow {
    pub run_id:   u64,
    pub time:     f64,
    pub category: String,
    pub length:   u64,
}

/// Per-category totals for one stored run.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummaryRow {
    pub category:  String,
    pub customers: u64,
    pub completed: u64,
    pub abandoned: u64,
    /// Mean wait over customers that were served; `None` if none were.
    pub mean_wait: Option<f64>,
}
