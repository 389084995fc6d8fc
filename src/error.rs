//! Errors of the benchmark harness.
//!
//! The trees themselves never fail: missing keys and duplicates are no-ops, and broken
//! invariants are bugs that panic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("nothing to run: no sizes or no repetitions")]
    EmptyTaskSet,
}

pub type BenchResult<T> = Result<T, BenchError>;
