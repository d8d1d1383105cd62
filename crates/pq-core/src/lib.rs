//! `pq-core` — foundational types for the post-office queue simulator.
//!
//! This crate is a dependency of every other `pq-*` crate.  It has no `pq-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`/`serde_json`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `CustomerId`, `ServerId`, `BoothId`, `CategoryId`         |
//! | [`time`]        | `SimTime`, `SimClock`, `ClockStep`                        |
//! | [`rng`]         | `SimRng`                                                  |
//! | [`category`]    | `CategorySpec`, `CategoryTable`, stock category names     |
//! | [`config`]      | `SimConfig`, `DispatchPolicy`, `AbandonmentCalibration`   |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                         |
//! |---------|----------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public types and enables     |
//! |         | [`SimConfig::from_json_reader`].                               |

pub mod category;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use category::{CategorySpec, CategoryTable};
pub use config::{AbandonmentCalibration, DispatchPolicy, SimConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{BoothId, CategoryId, CustomerId, ServerId};
pub use rng::SimRng;
pub use time::{ClockStep, SimClock, SimTime};
