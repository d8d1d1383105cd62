//! Servers, booths and their read-only snapshots.
//!
//! A busy server carries its whole assignment inside its state, so "busy
//! without a booth" or "busy without a customer" cannot be represented.  The
//! booth side stores the occupying server id; the simulator keeps the two
//! sides in step.

use std::fmt;

use pq_core::{BoothId, CategoryId, CustomerId, ServerId, SimTime};

// ── Server ────────────────────────────────────────────────────────────────────

/// What a busy server is doing.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub customer:    CustomerId,
    pub category:    CategoryId,
    pub booth:       BoothId,
    /// Absolute simulated time at which service ends.
    pub service_end: SimTime,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServerState {
    #[default]
    Spare,
    Busy(Assignment),
}

#[derive(Clone, Debug)]
pub struct Server {
    pub id:    ServerId,
    pub state: ServerState,
}

impl Server {
    pub fn new(id: ServerId) -> Self {
        Self { id, state: ServerState::Spare }
    }

    #[inline]
    pub fn is_spare(&self) -> bool {
        matches!(self.state, ServerState::Spare)
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.state {
            ServerState::Busy(a) => Some(a),
            ServerState::Spare => None,
        }
    }

    /// `true` if busy and the service end time has been reached at `now`.
    pub fn is_due(&self, now: SimTime) -> bool {
        self.assignment().is_some_and(|a| now >= a.service_end)
    }

    pub(crate) fn start(&mut self, assignment: Assignment) {
        debug_assert!(self.is_spare(), "server {} assigned while busy", self.id);
        self.state = ServerState::Busy(assignment);
    }

    /// Return to `Spare`, handing back the finished assignment.
    pub(crate) fn finish(&mut self) -> Option<Assignment> {
        match std::mem::take(&mut self.state) {
            ServerState::Busy(a) => Some(a),
            ServerState::Spare => None,
        }
    }
}

// ── Booth ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Booth {
    pub id:       BoothId,
    /// Server working at this booth, if any.
    pub occupant: Option<ServerId>,
}

impl Booth {
    pub fn new(id: BoothId) -> Self {
        Self { id, occupant: None }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub(crate) fn occupy(&mut self, server: ServerId) {
        debug_assert!(self.occupant.is_none(), "booth {} occupied twice", self.id);
        self.occupant = Some(server);
    }

    pub(crate) fn release(&mut self) -> Option<ServerId> {
        self.occupant.take()
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServerStatus {
    Spare,
    Busy,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServerStatus::Spare => "spare",
            ServerStatus::Busy => "busy",
        })
    }
}

/// One server as seen by a polling UI.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ServerSnapshot {
    pub id:             ServerId,
    pub status:         ServerStatus,
    pub booth:          Option<BoothId>,
    pub customer:       Option<CustomerId>,
    pub category:       Option<CategoryId>,
    /// Simulated minutes until service ends; `0.0` when spare or overdue.
    pub time_remaining: f64,
}

impl ServerSnapshot {
    pub fn of(server: &Server, now: SimTime) -> Self {
        match server.assignment() {
            Some(a) => Self {
                id:             server.id,
                status:         ServerStatus::Busy,
                booth:          Some(a.booth),
                customer:       Some(a.customer),
                category:       Some(a.category),
                time_remaining: (a.service_end - now).max(0.0),
            },
            None => Self {
                id:             server.id,
                status:         ServerStatus::Spare,
                booth:          None,
                customer:       None,
                category:       None,
                time_remaining: 0.0,
            },
        }
    }
}

/// One booth as seen by a polling UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoothSnapshot {
    pub id:       BoothId,
    pub occupied: bool,
    pub server:   Option<ServerId>,
}

impl From<&Booth> for BoothSnapshot {
    fn from(booth: &Booth) -> Self {
        Self {
            id:       booth.id,
            occupied: booth.is_occupied(),
            server:   booth.occupant,
        }
    }
}
