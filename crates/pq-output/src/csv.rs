//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `runs.csv`
//! - `customers.csv`
//! - `server_events.csv`
//! - `queue_snapshots.csv`
//!
//! A run row is written once, when the run ends (or at `finish` for runs
//! that were never closed, with an empty `end_unix_secs`).  Missing values
//! are empty fields.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{
    CustomerJourneyRow, OutputError, OutputResult, QueueSnapshotRow, RunRow, ServerEventRow,
};

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes run history to four CSV files.
pub struct CsvWriter {
    runs:      Writer<File>,
    customers: Writer<File>,
    events:    Writer<File>,
    snapshots: Writer<File>,
    /// Runs begun but not yet written.
    open_runs: BTreeMap<u64, RunRow>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the four CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut runs = Writer::from_path(dir.join("runs.csv"))?;
        runs.write_record([
            "run_id",
            "policy",
            "acceleration",
            "start_unix_secs",
            "end_unix_secs",
            "service_minutes",
            "abandonment_enabled",
        ])?;

        let mut customers = Writer::from_path(dir.join("customers.csv"))?;
        customers.write_record([
            "run_id",
            "customer_id",
            "category",
            "arrival_time",
            "queue_join_time",
            "service_start",
            "service_end",
            "wait_duration",
            "service_duration",
            "outcome",
            "server",
            "booth",
        ])?;

        let mut events = Writer::from_path(dir.join("server_events.csv"))?;
        events.write_record(["run_id", "server", "kind", "time", "booth", "customer", "category"])?;

        let mut snapshots = Writer::from_path(dir.join("queue_snapshots.csv"))?;
        snapshots.write_record(["run_id", "time", "category", "length"])?;

        Ok(Self {
            runs,
            customers,
            events,
            snapshots,
            open_runs: BTreeMap::new(),
            finished:  false,
        })
    }

    fn write_run(&mut self, run: &RunRow) -> OutputResult<()> {
        self.runs.write_record(&[
            run.run_id.to_string(),
            run.policy.clone(),
            run.acceleration.to_string(),
            run.start_unix_secs.to_string(),
            opt(run.end_unix_secs),
            run.service_minutes_text(),
            (run.abandonment_enabled as u8).to_string(),
        ])?;
        Ok(())
    }
}

impl OutputWriter for CsvWriter {
    fn begin_run(&mut self, run: &RunRow) -> OutputResult<()> {
        self.open_runs.insert(run.run_id, run.clone());
        Ok(())
    }

    fn write_customer(&mut self, row: &CustomerJourneyRow) -> OutputResult<()> {
        self.customers.write_record(&[
            row.run_id.to_string(),
            row.customer_id.to_string(),
            row.category.clone(),
            row.arrival_time.to_string(),
            row.queue_join_time.to_string(),
            opt(row.service_start),
            opt(row.service_end),
            opt(row.wait_duration),
            opt(row.service_duration),
            row.outcome.to_owned(),
            opt(row.server),
            opt(row.booth),
        ])?;
        Ok(())
    }

    fn write_server_event(&mut self, row: &ServerEventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.run_id.to_string(),
            row.server.to_string(),
            row.kind.to_owned(),
            row.time.to_string(),
            row.booth.to_string(),
            row.customer.to_string(),
            row.category.clone(),
        ])?;
        Ok(())
    }

    fn write_queue_snapshot(&mut self, rows: &[QueueSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.run_id.to_string(),
                row.time.to_string(),
                row.category.clone(),
                row.length.to_string(),
            ])?;
        }
        Ok(())
    }

    fn end_run(&mut self, run_id: u64, end_unix_secs: i64) -> OutputResult<()> {
        let mut run = self
            .open_runs
            .remove(&run_id)
            .ok_or(OutputError::RunNotStarted(run_id))?;
        run.end_unix_secs = Some(end_unix_secs);
        self.write_run(&run)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        for run in std::mem::take(&mut self.open_runs).into_values() {
            self.write_run(&run)?;
        }
        self.runs.flush()?;
        self.customers.flush()?;
        self.events.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
