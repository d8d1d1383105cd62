//! Dispatch policies: which waiting customer is served next.
//!
//! Every policy only *chooses a category*; [`Dispatcher::select`] then pops
//! that category's head.  Selection and removal therefore happen in one call
//! and no customer is ever left both selected and enqueued.
//!
//! | Policy             | Chooses                                               |
//! |--------------------|-------------------------------------------------------|
//! | `LongestWaitFirst` | head with the largest wait; ties → category order     |
//! | `ShortestJobFirst` | head whose base service time is smallest; ties → order|
//! | `RoundRobin`       | next non-empty line from a persistent cursor          |
//! | `PriorityOrder`    | first non-empty line in the precedence list           |

use pq_core::{CategoryId, CategoryTable, DispatchPolicy, SimTime};

use crate::{Customer, ServiceQueues};

/// A dispatch policy plus the state it carries across selections.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    policy: DispatchPolicy,
    /// RoundRobin: index of the first category to look at next time.
    cursor: usize,
}

impl Dispatcher {
    pub fn new(policy: DispatchPolicy) -> Self {
        Self { policy, cursor: 0 }
    }

    #[inline]
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// RoundRobin cursor position (always 0 for the other policies).
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Remove and return the next customer to serve, or `None` if every line
    /// is empty.
    pub fn select(
        &mut self,
        queues: &mut ServiceQueues,
        table:  &CategoryTable,
        now:    SimTime,
    ) -> Option<Customer> {
        let category = match self.policy {
            DispatchPolicy::LongestWaitFirst => longest_wait_first(queues, now),
            DispatchPolicy::ShortestJobFirst => shortest_job_first(queues, table),
            DispatchPolicy::RoundRobin       => self.round_robin(queues),
            DispatchPolicy::PriorityOrder    => priority_order(queues, table),
        }?;
        queues.pop_head(category)
    }

    fn round_robin(&mut self, queues: &ServiceQueues) -> Option<CategoryId> {
        let n = queues.category_count();
        for step in 0..n {
            let idx = (self.cursor + step) % n;
            let category = CategoryId(idx as u16);
            if queues.len(category) > 0 {
                self.cursor = (idx + 1) % n;
                return Some(category);
            }
        }
        None
    }
}

fn longest_wait_first(queues: &ServiceQueues, now: SimTime) -> Option<CategoryId> {
    let mut best: Option<(CategoryId, f64)> = None;
    for (category, head) in queues.heads() {
        let wait = head.waited_at(now);
        // Strict `>`: on a tie the earlier category keeps the slot.
        if best.is_none_or(|(_, w)| wait > w) {
            best = Some((category, wait));
        }
    }
    best.map(|(category, _)| category)
}

fn shortest_job_first(queues: &ServiceQueues, table: &CategoryTable) -> Option<CategoryId> {
    let mut best: Option<(CategoryId, f64)> = None;
    for (category, _) in queues.heads() {
        let job = table.service_minutes(category);
        if best.is_none_or(|(_, j)| job < j) {
            best = Some((category, job));
        }
    }
    best.map(|(category, _)| category)
}

fn priority_order(queues: &ServiceQueues, table: &CategoryTable) -> Option<CategoryId> {
    table
        .precedence()
        .iter()
        .copied()
        .find(|&category| queues.len(category) > 0)
}
