//! Error types for simpar.
//!
//! Everything that can go wrong happens before the first iteration: bad run
//! parameters, unreadable run files, or storage that cannot be allocated.
//! The time-stepping loop itself has no failure path.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("cannot allocate {what} for {requested} entries: {source}")]
    ResourceExhaustion {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("run file parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SimError>;
