//! Simulator configuration.
//!
//! Typically built in code or loaded from JSON by the application crate
//! (feature `serde`) and handed to the simulator, which calls
//! [`SimConfig::validate`] before constructing any state.

use std::fmt;
use std::str::FromStr;

use crate::category::{PARCELS, PASSPORTS, STANDARD_POST};
use crate::{CategorySpec, CategoryTable, CoreError, CoreResult};

// ── DispatchPolicy ────────────────────────────────────────────────────────────

/// Rule choosing which waiting customer is served next.  Fixed for a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DispatchPolicy {
    #[default]
    LongestWaitFirst,
    ShortestJobFirst,
    RoundRobin,
    PriorityOrder,
}

impl DispatchPolicy {
    pub const ALL: [DispatchPolicy; 4] = [
        DispatchPolicy::LongestWaitFirst,
        DispatchPolicy::ShortestJobFirst,
        DispatchPolicy::RoundRobin,
        DispatchPolicy::PriorityOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DispatchPolicy::LongestWaitFirst => "longest_wait_first",
            DispatchPolicy::ShortestJobFirst => "shortest_job_first",
            DispatchPolicy::RoundRobin       => "round_robin",
            DispatchPolicy::PriorityOrder    => "priority_order",
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        DispatchPolicy::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::Parse(format!("unknown dispatch policy `{s}`")))
    }
}

// ── AbandonmentCalibration ────────────────────────────────────────────────────

/// How the wait-dependent abandonment probability becomes a per-tick draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AbandonmentCalibration {
    /// Per-tick probability `p / acceleration`, regardless of how much
    /// simulated time the tick covered.  The empirical rate therefore depends
    /// on the polling frequency.
    #[default]
    TickScaled,
    /// `p` is a per-simulated-minute hazard; a tick covering `dt` minutes
    /// evicts with probability `1 - (1 - p)^dt`.
    TimeScaled,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulator configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of servers (staff).  Must be > 0.
    pub servers: usize,

    /// Number of booths.  Must be > 0; may differ from `servers`.
    pub booths: usize,

    pub policy: DispatchPolicy,

    /// Service categories in iteration order.
    pub categories: Vec<CategorySpec>,

    /// PriorityOrder precedence by category name, highest first.  Categories
    /// not listed rank after all listed ones, in category order.  Empty means
    /// the stock ranking, limited to the configured categories.
    pub priority: Vec<String>,

    /// Simulated minutes per real minute.  Must be finite and > 0.
    pub acceleration: f64,

    pub abandonment_enabled: bool,

    pub abandonment_calibration: AbandonmentCalibration,

    /// Master RNG seed.  The same seed always produces identical results for
    /// identical arrival and tick sequences.
    pub seed: u64,
}

impl Default for SimConfig {
    /// The stock post office: 5 servers, 4 booths, three counters, ×20.
    fn default() -> Self {
        Self {
            servers:                 5,
            booths:                  4,
            policy:                  DispatchPolicy::LongestWaitFirst,
            categories:              vec![
                CategorySpec::new(STANDARD_POST, 2.0),
                CategorySpec::new(PASSPORTS, 5.0),
                CategorySpec::new(PARCELS, 3.0),
            ],
            priority:                Vec::new(),
            acceleration:            20.0,
            abandonment_enabled:     true,
            abandonment_calibration: AbandonmentCalibration::TickScaled,
            seed:                    42,
        }
    }
}

impl SimConfig {
    /// Check every constraint a simulator relies on.
    pub fn validate(&self) -> CoreResult<()> {
        if self.servers == 0 {
            return Err(CoreError::Config("server count must be positive".into()));
        }
        if self.booths == 0 {
            return Err(CoreError::Config("booth count must be positive".into()));
        }
        if self.servers > u32::MAX as usize || self.booths > u32::MAX as usize {
            return Err(CoreError::Config("server/booth count out of range".into()));
        }
        if !(self.acceleration.is_finite() && self.acceleration > 0.0) {
            return Err(CoreError::Config(format!(
                "acceleration factor must be positive, got {}",
                self.acceleration
            )));
        }
        self.category_table().map(|_| ())
    }

    /// Build the validated category lookup table for this configuration.
    pub fn category_table(&self) -> CoreResult<CategoryTable> {
        CategoryTable::new(&self.categories, &self.priority)
    }

    /// Base service minutes configured for `name`, if it exists.
    pub fn service_minutes(&self, name: &str) -> Option<f64> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.service_minutes)
    }

    /// Override the base service time of an existing category.
    pub fn set_service_minutes(&mut self, name: &str, minutes: f64) -> CoreResult<()> {
        let spec = self
            .categories
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::UnknownCategory(name.to_owned()))?;
        spec.service_minutes = minutes;
        Ok(())
    }

    /// Parse a JSON document and validate it.  Missing fields take their
    /// [`Default`] values.
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> CoreResult<Self> {
        let config: SimConfig = serde_json::from_reader(reader)
            .map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
