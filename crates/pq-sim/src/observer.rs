//! Simulation observer trait for persistence and progress reporting.

use std::fmt;

use pq_core::{BoothId, CategoryId, CustomerId, ServerId, SimTime};

use crate::{Customer, ServiceQueues};

/// A server state change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ServerEventKind {
    ServiceStarted,
    ServiceFinished,
}

impl ServerEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerEventKind::ServiceStarted  => "service_started",
            ServerEventKind::ServiceFinished => "service_finished",
        }
    }
}

impl fmt::Display for ServerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ServerEvent {
    pub kind:     ServerEventKind,
    pub server:   ServerId,
    pub booth:    BoothId,
    pub customer: CustomerId,
    pub category: CategoryId,
    pub time:     SimTime,
}

/// What one advancing tick did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickReport {
    /// 1-based count of advancing ticks since construction or reset.
    pub tick:          u64,
    pub now:           SimTime,
    pub delta_minutes: f64,
    pub completed:     usize,
    pub abandoned:     usize,
    pub assigned:      usize,
}

/// Callbacks invoked by [`QueueSim::tick_with`][crate::QueueSim::tick_with].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: journey printer
///
/// ```rust,ignore
/// struct JourneyPrinter;
///
/// impl SimObserver for JourneyPrinter {
///     fn on_customer_finished(&mut self, customer: &Customer) {
///         println!("{} {:?} at {:?}", customer.id, customer.outcome, customer.service_end);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after the clock advanced, before any sweep.
    fn on_tick_start(&mut self, _tick: u64, _now: SimTime) {}

    /// Called for every service start (assignment sweep) and finish
    /// (completion sweep).
    fn on_server_event(&mut self, _event: &ServerEvent) {}

    /// Called once per customer when its outcome is set, completed or
    /// abandoned.  The record is final.
    fn on_customer_finished(&mut self, _customer: &Customer) {}

    /// Called at the end of every advancing tick with the post-tick queues.
    fn on_tick_end(&mut self, _report: &TickReport, _queues: &ServiceQueues) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
