//! `pq-sim` — dispatch and time-advancement engine for the post-office queue
//! simulator.
//!
//! # Tick
//!
//! ```text
//! tick(wall_now):
//!   first call after new/reset → record reference, return None
//!   now += wall_delta_secs × acceleration / 60
//!   ① Completion  — busy servers past their service end free their booth;
//!                   customer → completed history.
//!   ② Abandonment — (if enabled) one Bernoulli draw per waiting customer;
//!                   losers → abandoned history.
//!   ③ Assignment  — while a spare server AND a free booth exist:
//!                   Dispatcher::select → bind customer, server, booth.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use pq_core::SimConfig;
//! use pq_sim::QueueSim;
//!
//! let mut sim = QueueSim::new(SimConfig::default())?;
//! sim.tick(Instant::now());          // primes the clock
//! sim.add_customer("passports")?;
//! sim.tick(Instant::now());          // assigns the customer
//! println!("{:?}", sim.statistics());
//! ```

pub mod abandonment;
pub mod customer;
pub mod dispatch;
pub mod error;
pub mod observer;
pub mod queues;
pub mod resources;
pub mod sim;
pub mod stats;


pub use abandonment::{AbandonmentModel, abandonment_probability};
pub use customer::{Customer, Outcome};
pub use dispatch::Dispatcher;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ServerEvent, ServerEventKind, SimObserver, TickReport};
pub use queues::ServiceQueues;
pub use resources::{
    Assignment, Booth, BoothSnapshot, Server, ServerSnapshot, ServerState, ServerStatus,
};
pub use sim::QueueSim;
pub use stats::{CategoryStats, Statistics, StatsView};
