//! Error types for the statistics core.

use thiserror::Error;

/// Errors raised while resolving, fetching or aggregating pet metrics.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid clock time: {0}")]
    InvalidClockTime(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid weight: {0} kg")]
    InvalidWeight(f64),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type StatsResult<T> = Result<T, StatsError>;
