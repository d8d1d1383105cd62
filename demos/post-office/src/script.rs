//! Deterministic arrival script and a synthetic-clock driver.
//!
//! The same script drives the recorded run and every run of the policy
//! comparison, so differences in the results come from the policy alone.

use std::time::{Duration, Instant};

use pq_core::SimRng;
use pq_sim::{QueueSim, SimObserver, SimResult};

/// Wall-clock length of one tick, as a 20 Hz UI refresh would produce.
pub const TICK: Duration = Duration::from_millis(50);

/// Ticks allowed after the last scripted arrival for queues to empty.
const DRAIN_LIMIT_TICKS: usize = 50_000;

/// Arrivals per tick, by category name.
pub struct ArrivalScript {
    per_tick: Vec<Vec<String>>,
}

impl ArrivalScript {
    /// `ticks` ticks; each tick has one arrival with probability
    /// `arrival_prob`, category chosen uniformly.
    pub fn generate(categories: &[String], ticks: usize, arrival_prob: f64, seed: u64) -> Self {
        let mut rng = SimRng::new(seed);
        let per_tick = (0..ticks)
            .map(|_| {
                if categories.is_empty() || !rng.gen_bool(arrival_prob) {
                    return Vec::new();
                }
                vec![categories[rng.gen_range(0..categories.len())].clone()]
            })
            .collect();
        Self { per_tick }
    }

    pub fn ticks(&self) -> usize {
        self.per_tick.len()
    }

    pub fn total_arrivals(&self) -> usize {
        self.per_tick.iter().map(Vec::len).sum()
    }
}

fn is_idle(sim: &QueueSim) -> bool {
    sim.queues().is_empty() && sim.in_service().next().is_none()
}

/// Play `script` into `sim` on a synthetic clock advancing `TICK` per step,
/// then keep ticking until the office is empty.  Returns the number of
/// advancing ticks.
pub fn run_script<O: SimObserver>(
    sim:      &mut QueueSim,
    script:   &ArrivalScript,
    observer: &mut O,
) -> SimResult<u64> {
    let mut wall = Instant::now();
    sim.tick_with(wall, observer);

    for arrivals in &script.per_tick {
        for category in arrivals {
            sim.add_customer(category)?;
        }
        wall += TICK;
        sim.tick_with(wall, observer);
    }

    for _ in 0..DRAIN_LIMIT_TICKS {
        if is_idle(sim) {
            break;
        }
        wall += TICK;
        sim.tick_with(wall, observer);
    }
    Ok(sim.clock().ticks)
}

/// Drive `sim` in real time from an external arrival feed until the feed
/// closes and the office is empty.
pub fn run_feed<O: SimObserver>(
    sim:      &mut QueueSim,
    feed:     &mut pq_input::ArrivalFeed,
    observer: &mut O,
) -> pq_input::DrainReport {
    let mut total = pq_input::DrainReport::default();
    sim.tick_with(Instant::now(), observer);
    loop {
        total += feed.drain_into(sim);
        sim.tick_with(Instant::now(), observer);
        if feed.is_closed() && is_idle(sim) {
            return total;
        }
        std::thread::sleep(TICK);
    }
}
