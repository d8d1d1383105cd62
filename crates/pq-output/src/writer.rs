//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CustomerJourneyRow, OutputResult, QueueSnapshotRow, RunRow, ServerEventRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// A writer may hold history for several runs; each run is opened with
/// [`begin_run`][Self::begin_run] and closed with [`end_run`][Self::end_run].
/// Errors are returned to the caller; [`RunRecorder`][crate::RunRecorder]
/// keeps the first one for later inspection.
pub trait OutputWriter {
    /// Record the start of a run.
    fn begin_run(&mut self, run: &RunRow) -> OutputResult<()>;

    /// Write one finished customer journey.
    fn write_customer(&mut self, row: &CustomerJourneyRow) -> OutputResult<()>;

    /// Write one server state change.
    fn write_server_event(&mut self, row: &ServerEventRow) -> OutputResult<()>;

    /// Write a batch of queue-length samples.
    fn write_queue_snapshot(&mut self, rows: &[QueueSnapshotRow]) -> OutputResult<()>;

    /// Stamp the end time of a run started with `begin_run`.
    fn end_run(&mut self, run_id: u64, end_unix_secs: i64) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; calling it again does nothing.
    fn finish(&mut self) -> OutputResult<()>;
}
