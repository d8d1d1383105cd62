//! `pq-output` — run history writers for the post-office queue simulator.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                        |
//! |-----------|---------|----------------------------------------------------------------------|
//! | *(none)*  | CSV     | `runs.csv`, `customers.csv`, `server_events.csv`, `queue_snapshots.csv` |
//! | `sqlite`  | SQLite  | `history.db`                                                         |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`RunRecorder`], which implements `pq_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pq_output::{CsvWriter, RunRecorder, RunRow, unix_secs_now};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let run = RunRow::from_config(1, sim.config(), unix_secs_now());
//! let mut rec = RunRecorder::start(writer, &run, sim.categories()).snapshot_every(20);
//! sim.tick_with(Instant::now(), &mut rec);
//! rec.close(unix_secs_now())?;
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::RunRecorder;
pub use row::{
    CategorySummaryRow, CustomerJourneyRow, QueueSnapshotRow, RunRow, ServerEventRow,
    unix_secs_now,
};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
