//! SQLite output backend (feature `sqlite`).
//!
//! Opens (or creates) a database file holding the history of any number of
//! runs in four tables: `simulation_runs`, `customers`, `server_events` and
//! `queue_snapshots`.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::writer::OutputWriter;
use crate::{
    CategorySummaryRow, CustomerJourneyRow, OutputError, OutputResult, QueueSnapshotRow, RunRow,
    ServerEventRow,
};

const SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS simulation_runs (
        run_id              INTEGER PRIMARY KEY,
        policy              TEXT    NOT NULL,
        acceleration        REAL    NOT NULL,
        start_unix_secs     INTEGER NOT NULL,
        end_unix_secs       INTEGER,
        service_minutes     TEXT    NOT NULL,
        abandonment_enabled INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS customers (
        run_id           INTEGER NOT NULL REFERENCES simulation_runs(run_id),
        customer_id      INTEGER NOT NULL,
        category         TEXT    NOT NULL,
        arrival_time     REAL    NOT NULL,
        queue_join_time  REAL    NOT NULL,
        service_start    REAL,
        service_end      REAL,
        wait_duration    REAL,
        service_duration REAL,
        outcome          TEXT    NOT NULL,
        server           INTEGER,
        booth            INTEGER,
        PRIMARY KEY (run_id, customer_id)
    );
    CREATE TABLE IF NOT EXISTS server_events (
        event_id INTEGER PRIMARY KEY AUTOINCREMENT,
        run_id   INTEGER NOT NULL REFERENCES simulation_runs(run_id),
        server   INTEGER NOT NULL,
        kind     TEXT    NOT NULL,
        time     REAL    NOT NULL,
        booth    INTEGER NOT NULL,
        customer INTEGER NOT NULL,
        category TEXT    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS queue_snapshots (
        snapshot_id INTEGER PRIMARY KEY AUTOINCREMENT,
        run_id      INTEGER NOT NULL REFERENCES simulation_runs(run_id),
        time        REAL    NOT NULL,
        category    TEXT    NOT NULL,
        length      INTEGER NOT NULL
    );";

/// Writes run history to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, finished: false })
    }

    /// Open (or create) `history.db` in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Self::open(&dir.join("history.db"))
    }

    /// One past the highest run id already stored (1 for a new database).
    pub fn next_run_id(&self) -> OutputResult<u64> {
        let max: Option<u64> = self
            .conn
            .query_row("SELECT MAX(run_id) FROM simulation_runs", [], |row| row.get(0))?;
        Ok(max.map_or(1, |id| id + 1))
    }

    /// The stored run row for `run_id`, if any.
    pub fn run(&self, run_id: u64) -> OutputResult<Option<RunRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT policy, acceleration, start_unix_secs, end_unix_secs, \
                        service_minutes, abandonment_enabled \
                 FROM simulation_runs WHERE run_id = ?1",
                params![run_id],
                |row| {
                    let text: String = row.get(4)?;
                    Ok(RunRow {
                        run_id,
                        policy:              row.get(0)?,
                        acceleration:        row.get(1)?,
                        start_unix_secs:     row.get(2)?,
                        end_unix_secs:       row.get(3)?,
                        service_minutes:     parse_service_minutes(&text),
                        abandonment_enabled: row.get::<_, i64>(5)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Per-category customer totals and mean wait for one stored run,
    /// ordered by category name.
    pub fn category_summary(&self, run_id: u64) -> OutputResult<Vec<CategorySummaryRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT category, \
                    COUNT(*), \
                    SUM(CASE WHEN outcome = 'completed' THEN 1 ELSE 0 END), \
                    SUM(CASE WHEN outcome = 'abandoned' THEN 1 ELSE 0 END), \
                    AVG(wait_duration) \
             FROM customers \
             WHERE run_id = ?1 \
             GROUP BY category \
             ORDER BY category",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(CategorySummaryRow {
                category:  row.get(0)?,
                customers: row.get(1)?,
                completed: row.get(2)?,
                abandoned: row.get(3)?,
                mean_wait: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

/// Inverse of [`RunRow::service_minutes_text`]; malformed pairs are skipped.
fn parse_service_minutes(text: &str) -> Vec<(String, f64)> {
    text.split(';')
        .filter_map(|pair| {
            let (name, minutes) = pair.split_once('=')?;
            Some((name.to_owned(), minutes.parse().ok()?))
        })
        .collect()
}

impl OutputWriter for SqliteWriter {
    fn begin_run(&mut self, run: &RunRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO simulation_runs \
             (run_id, policy, acceleration, start_unix_secs, end_unix_secs, \
              service_minutes, abandonment_enabled) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run.run_id,
                run.policy,
                run.acceleration,
                run.start_unix_secs,
                run.end_unix_secs,
                run.service_minutes_text(),
                run.abandonment_enabled as i64,
            ],
        )?;
        Ok(())
    }

    fn write_customer(&mut self, row: &CustomerJourneyRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO customers \
             (run_id, customer_id, category, arrival_time, queue_join_time, \
              service_start, service_end, wait_duration, service_duration, \
              outcome, server, booth) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;
        stmt.execute(params![
            row.run_id,
            row.customer_id,
            row.category,
            row.arrival_time,
            row.queue_join_time,
            row.service_start,
            row.service_end,
            row.wait_duration,
            row.service_duration,
            row.outcome,
            row.server,
            row.booth,
        ])?;
        Ok(())
    }

    fn write_server_event(&mut self, row: &ServerEventRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO server_events \
             (run_id, server, kind, time, booth, customer, category) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        stmt.execute(params![
            row.run_id,
            row.server,
            row.kind,
            row.time,
            row.booth,
            row.customer,
            row.category,
        ])?;
        Ok(())
    }

    fn write_queue_snapshot(&mut self, rows: &[QueueSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO queue_snapshots (run_id, time, category, length) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(params![row.run_id, row.time, row.category, row.length])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn end_run(&mut self, run_id: u64, end_unix_secs: i64) -> OutputResult<()> {
        let updated = self.conn.execute(
            "UPDATE simulation_runs SET end_unix_secs = ?1 WHERE run_id = ?2",
            params![end_unix_secs, run_id],
        )?;
        if updated == 0 {
            return Err(OutputError::RunNotStarted(run_id));
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
