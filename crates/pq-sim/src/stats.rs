//! Summary statistics derived from history and live state.

use pq_core::{CategoryId, CategoryTable, SimTime};

use crate::{Booth, Customer, Server, ServiceQueues};

/// Per-category breakdown.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CategoryStats {
    pub category:  CategoryId,
    pub name:      String,
    pub waiting:   usize,
    pub served:    usize,
    pub abandoned: usize,
    /// Mean wait of completed customers in this category.
    pub mean_wait: Option<f64>,
}

/// Simulator-wide summary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Statistics {
    /// completed + abandoned + waiting + in service.
    pub total_customers:     usize,
    pub served:              usize,
    pub abandoned:           usize,
    pub waiting:             usize,
    pub in_service:          usize,
    /// Mean wait over completed customers; `None` before the first completion.
    pub mean_wait:           Option<f64>,
    /// Mean service duration over completed customers.
    pub mean_service:        Option<f64>,
    pub simulated_time:      SimTime,
    pub busy_servers:        usize,
    pub server_count:        usize,
    pub occupied_booths:     usize,
    pub booth_count:         usize,
    /// Completed customers per simulated hour; 0 before time has advanced.
    pub throughput_per_hour: f64,
    /// abandoned / total_customers; 0 with no customers.
    pub abandonment_rate:    f64,
    pub by_category:         Vec<CategoryStats>,
}

/// Borrowed view of everything the aggregator reads.
pub struct StatsView<'a> {
    pub completed: &'a [Customer],
    pub abandoned: &'a [Customer],
    pub queues:    &'a ServiceQueues,
    pub servers:   &'a [Server],
    pub booths:    &'a [Booth],
    pub table:     &'a CategoryTable,
    pub now:       SimTime,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl Statistics {
    /// Derive statistics from `view`.  Reads only.
    pub fn aggregate(view: &StatsView<'_>) -> Self {
        let served = view.completed.len();
        let abandoned = view.abandoned.len();
        let waiting = view.queues.total_len();
        let busy_servers = view.servers.iter().filter(|s| !s.is_spare()).count();
        let occupied_booths = view.booths.iter().filter(|b| b.is_occupied()).count();
        let total_customers = served + abandoned + waiting + busy_servers;

        let hours = view.now.hours();
        let throughput_per_hour = if hours > 0.0 { served as f64 / hours } else { 0.0 };
        let abandonment_rate = if total_customers > 0 {
            abandoned as f64 / total_customers as f64
        } else {
            0.0
        };

        let by_category = view
            .table
            .ids()
            .map(|category| {
                let completed = view.completed.iter().filter(|c| c.category == category);
                CategoryStats {
                    category,
                    name:      view.table.name(category).to_owned(),
                    waiting:   view.queues.len(category),
                    served:    completed.clone().count(),
                    abandoned: view.abandoned.iter().filter(|c| c.category == category).count(),
                    mean_wait: mean(completed.filter_map(Customer::wait_duration)),
                }
            })
            .collect();

        Self {
            total_customers,
            served,
            abandoned,
            waiting,
            in_service: busy_servers,
            mean_wait: mean(view.completed.iter().filter_map(Customer::wait_duration)),
            mean_service: mean(view.completed.iter().filter_map(Customer::service_duration)),
            simulated_time: view.now,
            busy_servers,
            server_count: view.servers.len(),
            occupied_booths,
            booth_count: view.booths.len(),
            throughput_per_hour,
            abandonment_rate,
            by_category,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryStats> {
        self.by_category.iter().find(|c| c.name == name)
    }
}
