//! The `QueueSim` driver and its tick.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, info, trace, warn};
use pq_core::{
    BoothId, CategoryTable, CustomerId, ServerId, SimClock, SimConfig, SimRng, SimTime,
};

use crate::observer::{ServerEvent, ServerEventKind, TickReport};
use crate::{
    AbandonmentModel, Assignment, Booth, BoothSnapshot, Customer, Dispatcher, NoopObserver,
    Server, ServerSnapshot, ServiceQueues, SimError, SimObserver, SimResult, Statistics,
    StatsView,
};

/// Child-stream offsets derived from the root seed.
const JITTER_STREAM: u64 = 1;
const ABANDON_STREAM: u64 = 2;

/// Multiplicative jitter applied to every base service time.
const JITTER_RANGE: std::ops::RangeInclusive<f64> = 0.8..=1.2;

fn seeded_streams(seed: u64) -> (SimRng, SimRng) {
    let mut root = SimRng::new(seed);
    let jitter = root.child(JITTER_STREAM);
    let abandon = root.child(ABANDON_STREAM);
    (jitter, abandon)
}

// ── QueueSim ──────────────────────────────────────────────────────────────────

/// The simulator: owns servers, booths, queues, history and the clock.
///
/// Each advancing [`tick`][Self::tick] runs three sweeps in fixed order:
///
/// 1. **Completion**: busy servers whose service end has been reached
///    release their booth and finish their customer.
/// 2. **Abandonment** (if enabled): every waiting customer draws once.
/// 3. **Assignment**: while a spare server and a free booth both exist, the
///    dispatcher picks a customer and the three are bound together.
///
/// A booth freed in step 1 is available to step 3 of the same tick, and a
/// customer finished in step 1 is no longer waiting when step 2 runs.
///
/// All mutation goes through `&mut self`, so callers that feed arrivals from
/// another thread must marshal them onto the ticking thread (see `pq-input`).
pub struct QueueSim {
    config:        SimConfig,
    table:         CategoryTable,
    clock:         SimClock,
    servers:       Vec<Server>,
    booths:        Vec<Booth>,
    queues:        ServiceQueues,
    /// Customers currently being served, keyed by id.
    in_service:    BTreeMap<CustomerId, Customer>,
    completed:     Vec<Customer>,
    abandoned:     Vec<Customer>,
    dispatcher:    Dispatcher,
    abandonment:   AbandonmentModel,
    jitter_rng:    SimRng,
    abandon_rng:   SimRng,
    next_customer: CustomerId,
}

impl QueueSim {
    /// Validate `config` and build an idle simulator at simulated time zero.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let table = config.category_table()?;
        let (jitter_rng, abandon_rng) = seeded_streams(config.seed);

        info!(
            "queue sim: {} servers, {} booths, {} categories, policy {}, ×{} acceleration, abandonment {}",
            config.servers,
            config.booths,
            table.len(),
            config.policy,
            config.acceleration,
            if config.abandonment_enabled { "on" } else { "off" },
        );

        Ok(Self {
            clock:         SimClock::new(config.acceleration),
            servers:       (0..config.servers).map(|i| Server::new(ServerId(i as u32))).collect(),
            booths:        (0..config.booths).map(|i| Booth::new(BoothId(i as u32))).collect(),
            queues:        ServiceQueues::new(table.len()),
            in_service:    BTreeMap::new(),
            completed:     Vec::new(),
            abandoned:     Vec::new(),
            dispatcher:    Dispatcher::new(config.policy),
            abandonment:   AbandonmentModel::new(config.abandonment_calibration, config.acceleration),
            jitter_rng,
            abandon_rng,
            next_customer: CustomerId::FIRST,
            table,
            config,
        })
    }

    // ── Mutating entry points ─────────────────────────────────────────────

    /// Enqueue a new customer for `category` at the current simulated time.
    ///
    /// Fails with [`SimError::InvalidCategory`] and changes nothing if the
    /// category is not configured.
    pub fn add_customer(&mut self, category: &str) -> SimResult<Customer> {
        let Some(category_id) = self.table.lookup(category) else {
            return Err(SimError::InvalidCategory(category.to_owned()));
        };
        let id = self.next_customer;
        self.next_customer = id.next();

        let customer = Customer::new(id, category_id, self.clock.now);
        trace!("{id} joins {category} queue at {}", self.clock.now);
        self.queues.push(customer.clone());
        Ok(customer)
    }

    /// Advance to `wall_now` and run the three sweeps.
    ///
    /// Returns `None` on the priming call after construction or reset.
    pub fn tick(&mut self, wall_now: Instant) -> Option<TickReport> {
        self.tick_with(wall_now, &mut NoopObserver)
    }

    /// [`tick`][Self::tick] with observer callbacks.
    pub fn tick_with<O: SimObserver>(
        &mut self,
        wall_now: Instant,
        observer: &mut O,
    ) -> Option<TickReport> {
        let Some(step) = self.clock.advance(wall_now) else {
            debug!("clock primed; no state advanced");
            return None;
        };
        if step.clamped {
            warn!("wall clock went backwards at {}; tick clamped to zero length", self.clock);
        }

        let now = self.clock.now;
        observer.on_tick_start(self.clock.ticks, now);

        let completed = self.completion_sweep(observer);
        let abandoned = if self.config.abandonment_enabled {
            self.abandonment_sweep(step.delta_minutes, observer)
        } else {
            0
        };
        let assigned = self.assignment_sweep(observer);

        let report = TickReport {
            tick:          self.clock.ticks,
            now,
            delta_minutes: step.delta_minutes,
            completed,
            abandoned,
            assigned,
        };
        if completed + abandoned + assigned > 0 {
            debug!(
                "{}: {completed} completed, {abandoned} abandoned, {assigned} assigned, {} waiting",
                self.clock,
                self.queues.total_len(),
            );
        }
        observer.on_tick_end(&report, &self.queues);
        Some(report)
    }

    /// Clear queues and history, free every server and booth, and return
    /// the clock, id counter, dispatcher cursor and RNG streams to their
    /// freshly constructed state.
    pub fn reset(&mut self) {
        for server in &mut self.servers {
            server.finish();
        }
        for booth in &mut self.booths {
            booth.release();
        }
        self.queues.clear();
        self.in_service.clear();
        self.completed.clear();
        self.abandoned.clear();
        self.clock.reset();
        self.dispatcher.reset();
        (self.jitter_rng, self.abandon_rng) = seeded_streams(self.config.seed);
        self.next_customer = CustomerId::FIRST;
        info!("queue sim reset");
    }

    // ── Sweeps ────────────────────────────────────────────────────────────

    fn completion_sweep<O: SimObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.now;
        let mut finished = 0;

        for server in &mut self.servers {
            if !server.is_due(now) {
                continue;
            }
            let Some(assignment) = server.finish() else { continue };
            self.booths[assignment.booth.index()].release();

            let Some(mut customer) = self.in_service.remove(&assignment.customer) else {
                warn!("{} finished {} which was not in service", server.id, assignment.customer);
                continue;
            };
            customer.complete(now);
            finished += 1;

            observer.on_server_event(&ServerEvent {
                kind:     ServerEventKind::ServiceFinished,
                server:   server.id,
                booth:    assignment.booth,
                customer: customer.id,
                category: customer.category,
                time:     now,
            });
            observer.on_customer_finished(&customer);
            self.completed.push(customer);
        }
        finished
    }

    fn abandonment_sweep<O: SimObserver>(&mut self, delta_minutes: f64, observer: &mut O) -> usize {
        let now = self.clock.now;
        let evicted = self
            .abandonment
            .sweep(&mut self.queues, now, delta_minutes, &mut self.abandon_rng);
        let count = evicted.len();
        for customer in evicted {
            trace!("{} abandoned after {:.2} min", customer.id, customer.waited_at(now));
            observer.on_customer_finished(&customer);
            self.abandoned.push(customer);
        }
        count
    }

    fn assignment_sweep<O: SimObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.now;

        // Lowest free ids first.  Zipping bounds the sweep by
        // min(free servers, free booths) and never repeats a server or booth.
        let free_servers: Vec<ServerId> =
            self.servers.iter().filter(|s| s.is_spare()).map(|s| s.id).collect();
        let free_booths: Vec<BoothId> =
            self.booths.iter().filter(|b| !b.is_occupied()).map(|b| b.id).collect();
        let pairs: Vec<(ServerId, BoothId)> = free_servers.into_iter().zip(free_booths).collect();

        let mut assigned = 0;
        for (server_id, booth_id) in pairs {
            let Some(mut customer) = self.dispatcher.select(&mut self.queues, &self.table, now)
            else {
                break;
            };

            let base = self.table.service_minutes(customer.category);
            let duration = base * self.jitter_rng.gen_range(JITTER_RANGE);

            customer.start_service(server_id, booth_id, now);
            self.servers[server_id.index()].start(Assignment {
                customer:    customer.id,
                category:    customer.category,
                booth:       booth_id,
                service_end: now + duration,
            });
            self.booths[booth_id.index()].occupy(server_id);

            observer.on_server_event(&ServerEvent {
                kind:     ServerEventKind::ServiceStarted,
                server:   server_id,
                booth:    booth_id,
                customer: customer.id,
                category: customer.category,
                time:     now,
            });
            trace!("{} → {server_id} at {booth_id} for {duration:.2} min", customer.id);
            self.in_service.insert(customer.id, customer);
            assigned += 1;
        }
        assigned
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    /// Waiting customers per category, in category order.
    pub fn queue_lengths(&self) -> Vec<(&str, usize)> {
        self.table
            .ids()
            .map(|id| (self.table.name(id), self.queues.len(id)))
            .collect()
    }

    pub fn server_states(&self) -> Vec<ServerSnapshot> {
        self.servers
            .iter()
            .map(|s| ServerSnapshot::of(s, self.clock.now))
            .collect()
    }

    pub fn booth_states(&self) -> Vec<BoothSnapshot> {
        self.booths.iter().map(BoothSnapshot::from).collect()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::aggregate(&StatsView {
            completed: &self.completed,
            abandoned: &self.abandoned,
            queues:    &self.queues,
            servers:   &self.servers,
            booths:    &self.booths,
            table:     &self.table,
            now:       self.clock.now,
        })
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.table
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn queues(&self) -> &ServiceQueues {
        &self.queues
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn booths(&self) -> &[Booth] {
        &self.booths
    }

    /// Customers currently being served, in id order.
    pub fn in_service(&self) -> impl Iterator<Item = &Customer> + '_ {
        self.in_service.values()
    }

    /// Completed customers in completion order.
    pub fn completed(&self) -> &[Customer] {
        &self.completed
    }

    /// Abandoned customers in abandonment order.
    pub fn abandoned(&self) -> &[Customer] {
        &self.abandoned
    }
}
