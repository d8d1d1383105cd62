//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a floating-point count of simulated minutes since the
//! run started (or was last reset).  It is advanced only by polling: the
//! driver hands [`SimClock::advance`] the current wall-clock instant and the
//! clock converts the real elapsed time into simulated minutes:
//!
//!   delta_minutes = wall_delta_secs * acceleration / 60
//!
//! The first poll after construction or reset only records the wall-clock
//! reference point.  Otherwise the first tick would jump by however long the
//! simulator sat idle after being built.

use std::fmt;
use std::time::Instant;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute point in simulated time, in minutes.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn minutes(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn hours(self) -> f64 {
        self.0 / 60.0
    }

    /// Minutes elapsed from `earlier` to `self`.  Negative if `earlier` is
    /// actually later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, minutes: f64) -> SimTime {
        SimTime(self.0 + minutes)
    }
}

impl std::ops::AddAssign<f64> for SimTime {
    #[inline]
    fn add_assign(&mut self, minutes: f64) {
        self.0 += minutes;
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} min", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Result of one successful [`SimClock::advance`] call.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ClockStep {
    /// Simulated minutes added by this step (never negative).
    pub delta_minutes: f64,
    /// `true` if the wall-clock input was earlier than the reference point
    /// and the delta was clamped to zero.
    pub clamped: bool,
}

/// Converts polled wall-clock instants into simulated minutes.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated minutes per real minute.  Strictly positive.
    pub acceleration: f64,
    /// Current simulated time.
    pub now: SimTime,
    /// Number of advancing polls (the priming poll is not counted).
    pub ticks: u64,
    /// Latest wall-clock instant seen.  `None` until the priming poll.
    reference: Option<Instant>,
}

impl SimClock {
    pub fn new(acceleration: f64) -> Self {
        Self {
            acceleration,
            now: SimTime::ZERO,
            ticks: 0,
            reference: None,
        }
    }

    /// `true` once the priming poll has recorded a reference point.
    #[inline]
    pub fn is_primed(&self) -> bool {
        self.reference.is_some()
    }

    /// Advance simulated time to match `wall_now`.
    ///
    /// Returns `None` on the priming poll.  A `wall_now` earlier than the
    /// reference point yields a zero-length step; the reference never moves
    /// backwards, so the regressed interval is not counted twice later.
    pub fn advance(&mut self, wall_now: Instant) -> Option<ClockStep> {
        let Some(reference) = self.reference else {
            self.reference = Some(wall_now);
            return None;
        };

        let step = match wall_now.checked_duration_since(reference) {
            Some(elapsed) => {
                self.reference = Some(wall_now);
                ClockStep {
                    delta_minutes: self.minutes_for_secs(elapsed.as_secs_f64()),
                    clamped:       false,
                }
            }
            None => ClockStep { delta_minutes: 0.0, clamped: true },
        };

        self.now += step.delta_minutes;
        self.ticks += 1;
        Some(step)
    }

    /// Simulated minutes represented by `secs` real seconds.
    #[inline]
    pub fn minutes_for_secs(&self, secs: f64) -> f64 {
        secs * self.acceleration / 60.0
    }

    /// Back to simulated time zero, unprimed.
    pub fn reset(&mut self) {
        self.now = SimTime::ZERO;
        self.ticks = 0;
        self.reference = None;
    }

    /// Break simulated time into (hours, minutes, seconds) for logging.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total_secs = (self.now.0 * 60.0).max(0.0) as u64;
        let hours = total_secs / 3_600;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        let seconds = (total_secs % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "tick {} ({}:{:02}:{:02} simulated)", self.ticks, h, m, s)
    }
}
