//! `pq-input` — external arrival source for the post-office queue simulator.
//!
//! Devices report arrivals as text lines (`SERVICE_REQUEST,<category>,...`).
//! [`parse_line`] decodes one line; [`ArrivalFeed`] reads a whole stream on
//! a background thread and applies the requests on the ticking thread.
//!
//! ```rust,ignore
//! let mut feed = ArrivalFeed::spawn(BufReader::new(std::io::stdin()));
//! loop {
//!     feed.drain_into(&mut sim);
//!     sim.tick(Instant::now());
//! }
//! ```

pub mod error;
pub mod feed;
pub mod message;

#[cfg(test)]
mod tests;

pub use error::{InputError, InputResult};
pub use feed::{ArrivalFeed, DrainReport};
pub use message::{ArrivalRequest, SERVICE_REQUEST, parse_line};
