//! `RunRecorder<W>` — bridges `SimObserver` to an `OutputWriter`.

use log::{debug, warn};
use pq_core::{CategoryId, CategoryTable};
use pq_sim::{Customer, ServerEvent, ServiceQueues, SimObserver, TickReport};

use crate::row::{CustomerJourneyRow, QueueSnapshotRow, RunRow, ServerEventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records one run to any [`OutputWriter`] backend.
///
/// Every finished customer becomes a journey row and every service start or
/// finish a server-event row.  Queue lengths are sampled every
/// `snapshot_every` advancing ticks.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  Check them with [`take_error`][Self::take_error],
/// or let [`close`][Self::close] report them.
pub struct RunRecorder<W: OutputWriter> {
    writer:         W,
    run_id:         u64,
    /// Category names indexed by `CategoryId`.
    names:          Vec<String>,
    snapshot_every: u64,
    closed:         bool,
    last_error:     Option<OutputError>,
}

impl<W: OutputWriter> RunRecorder<W> {
    /// Begin `run` on `writer`.  `categories` must be the table of the
    /// simulator this recorder will observe.
    pub fn start(mut writer: W, run: &RunRow, categories: &CategoryTable) -> Self {
        let result = writer.begin_run(run);
        debug!("recording run {} ({} policy)", run.run_id, run.policy);
        let mut recorder = Self {
            writer,
            run_id:         run.run_id,
            names:          categories.ids().map(|id| categories.name(id).to_owned()).collect(),
            snapshot_every: 1,
            closed:         false,
            last_error:     None,
        };
        recorder.store_err(result);
        recorder
    }

    /// Sample queue lengths every `ticks` advancing ticks (0 disables).
    pub fn snapshot_every(mut self, ticks: u64) -> Self {
        self.snapshot_every = ticks;
        self
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Stamp the run's end time and flush the writer.
    ///
    /// Returns the first error seen during the run, if any, otherwise any
    /// error from closing.  Idempotent.
    pub fn close(&mut self, end_unix_secs: i64) -> OutputResult<()> {
        if !self.closed {
            self.closed = true;
            let ended = self.writer.end_run(self.run_id, end_unix_secs);
            self.store_err(ended);
            let flushed = self.writer.finish();
            self.store_err(flushed);
        }
        match self.last_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Unwrap the inner writer (e.g. to query it after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn name(&self, category: CategoryId) -> &str {
        self.names.get(category.index()).map_or("unknown", String::as_str)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!("run {}: output write failed: {e}", self.run_id);
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for RunRecorder<W> {
    fn on_server_event(&mut self, event: &ServerEvent) {
        let row = ServerEventRow::new(self.run_id, event, self.name(event.category));
        let result = self.writer.write_server_event(&row);
        self.store_err(result);
    }

    fn on_customer_finished(&mut self, customer: &Customer) {
        let row = CustomerJourneyRow::new(self.run_id, customer, self.name(customer.category));
        let result = self.writer.write_customer(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, report: &TickReport, queues: &ServiceQueues) {
        if self.snapshot_every == 0 || report.tick % self.snapshot_every != 0 {
            return;
        }
        let rows: Vec<QueueSnapshotRow> = queues
            .lengths()
            .into_iter()
            .enumerate()
            .map(|(i, length)| QueueSnapshotRow {
                run_id:   self.run_id,
                time:     report.now.minutes(),
                category: self.names.get(i).cloned().unwrap_or_default(),
                length:   length as u64,
            })
            .collect();
        let result = self.writer.write_queue_snapshot(&rows);
        self.store_err(result);
    }
}
