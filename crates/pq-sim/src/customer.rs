//! The `Customer` record: one visit's lifecycle timestamps and outcome.

use std::fmt;

use pq_core::{BoothId, CategoryId, CustomerId, ServerId, SimTime};

/// Terminal outcome of a visit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    Completed,
    Abandoned,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One customer visit.
///
/// Owned by exactly one place at a time: its category's queue while waiting,
/// the simulator's in-service table while being served, then the completed
/// or abandoned history.  Once `outcome` is set the record is never touched
/// again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    pub id:              CustomerId,
    pub category:        CategoryId,
    pub arrival_time:    SimTime,
    pub queue_join_time: SimTime,
    pub service_start:   Option<SimTime>,
    pub service_end:     Option<SimTime>,
    pub server:          Option<ServerId>,
    pub booth:           Option<BoothId>,
    pub outcome:         Option<Outcome>,
}

impl Customer {
    pub fn new(id: CustomerId, category: CategoryId, now: SimTime) -> Self {
        Self {
            id,
            category,
            arrival_time:    now,
            queue_join_time: now,
            service_start:   None,
            service_end:     None,
            server:          None,
            booth:           None,
            outcome:         None,
        }
    }

    /// Minutes between joining the queue and starting service.
    pub fn wait_duration(&self) -> Option<f64> {
        self.service_start.map(|start| start - self.queue_join_time)
    }

    /// Minutes between starting and finishing service.
    pub fn service_duration(&self) -> Option<f64> {
        match (self.service_start, self.service_end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Minutes spent in the queue so far, as seen at `now`.
    #[inline]
    pub fn waited_at(&self, now: SimTime) -> f64 {
        now - self.queue_join_time
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub(crate) fn start_service(&mut self, server: ServerId, booth: BoothId, now: SimTime) {
        self.service_start = Some(now);
        self.server = Some(server);
        self.booth = Some(booth);
    }

    pub(crate) fn complete(&mut self, now: SimTime) {
        self.service_end = Some(now);
        self.outcome = Some(Outcome::Completed);
    }

    pub(crate) fn abandon(&mut self, now: SimTime) {
        self.service_end = Some(now);
        self.outcome = Some(Outcome::Abandoned);
    }
}
