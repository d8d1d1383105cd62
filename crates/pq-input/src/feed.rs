//! `ArrivalFeed` — reads arrival lines on a background thread and hands them
//! to the ticking thread over a channel.
//!
//! `QueueSim` is driven through `&mut self`, so arrivals detected elsewhere
//! are never applied directly.  The reader thread only parses; the thread
//! that owns the simulator calls [`ArrivalFeed::drain_into`] between ticks.

use std::io::{BufRead, ErrorKind};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};
use pq_sim::QueueSim;

use crate::{ArrivalRequest, InputError, InputResult, parse_line};

/// Outcome counts for one [`ArrivalFeed::drain_into`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Customers added to the simulator.
    pub accepted:    usize,
    /// Well-formed requests naming an unknown category.
    pub rejected:    usize,
    /// Lines that failed to decode as UTF-8 or to parse.
    pub malformed:   usize,
    /// Read errors that ended the reader thread.
    pub read_errors: usize,
}

impl std::ops::AddAssign for DrainReport {
    fn add_assign(&mut self, rhs: Self) {
        self.accepted += rhs.accepted;
        self.rejected += rhs.rejected;
        self.malformed += rhs.malformed;
        self.read_errors += rhs.read_errors;
    }
}

/// Handle to a background arrival reader.
pub struct ArrivalFeed {
    rx:     Receiver<InputResult<ArrivalRequest>>,
    handle: Option<JoinHandle<()>>,
    closed: bool,
}

impl ArrivalFeed {
    /// Start reading `reader` line by line on a new thread.
    ///
    /// Lines that are not valid UTF-8 are reported as malformed and skipped.
    /// The thread exits at end of input, on the first read error (which is
    /// forwarded), or once the feed is dropped.
    pub fn spawn<R>(mut reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = tx.send(Err(InputError::Io(e)));
                        return;
                    }
                }
                let message = match decode_line(&buf) {
                    Ok(Some(request)) => Ok(request),
                    Ok(None) => continue,
                    Err(e) => Err(e),
                };
                if tx.send(message).is_err() {
                    return;
                }
            }
            debug!("arrival reader reached end of input");
        });
        Self { rx, handle: Some(handle), closed: false }
    }

    /// Next pending message without blocking.
    pub fn try_next(&mut self) -> Option<InputResult<ArrivalRequest>> {
        if self.closed {
            return None;
        }
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                info!("arrival feed closed");
                None
            }
        }
    }

    /// `true` once the reader has exited and every message was consumed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply every pending request to `sim`.
    ///
    /// Unknown categories, malformed lines and read errors are logged and
    /// counted; they never stop the drain.
    pub fn drain_into(&mut self, sim: &mut QueueSim) -> DrainReport {
        let mut report = DrainReport::default();
        while let Some(message) = self.try_next() {
            match message {
                Ok(request) => match sim.add_customer(&request.category) {
                    Ok(customer) => {
                        debug!("{} arrived for {}", customer.id, request.category);
                        report.accepted += 1;
                    }
                    Err(e) => {
                        warn!("arrival rejected: {e}");
                        report.rejected += 1;
                    }
                },
                Err(e @ InputError::Malformed(_)) => {
                    warn!("{e}");
                    report.malformed += 1;
                }
                Err(e @ InputError::Io(_)) => {
                    error!("{e}; no further arrivals will be read");
                    report.read_errors += 1;
                }
            }
        }
        report
    }
}

/// Decode one raw line; bytes that are not UTF-8 make it malformed.
fn decode_line(raw: &[u8]) -> InputResult<Option<ArrivalRequest>> {
    match std::str::from_utf8(raw) {
        Ok(line) => parse_line(line),
        Err(_) => Err(InputError::Malformed(String::from_utf8_lossy(raw).trim_end().to_owned())),
    }
}

impl Drop for ArrivalFeed {
    fn drop(&mut self) {
        // A reader blocked on input cannot be interrupted; only join it if
        // it has already finished.
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}
