//! Error types for pq-input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// A non-blank line that is not a well-formed service request.
    #[error("malformed arrival line: {0:?}")]
    Malformed(String),

    #[error("I/O error reading arrivals: {0}")]
    Io(#[from] std::io::Error),
}

pub type InputResult<T> = Result<T, InputError>;
