use pq_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// `add_customer` was given a category outside the configured set.
    /// Nothing was enqueued.
    #[error("invalid service category `{0}`")]
    InvalidCategory(String),

    #[error(transparent)]
    Config(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
