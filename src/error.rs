//! Error taxonomy of the craft search engine.
//!
//! Hard failures only originate while a request is validated and turned into
//! jobs. Once workers are running, failures are reported next to the (possibly
//! partial) result list instead of aborting the whole search.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed request parameters (NaN/negative price, zero combination size,
    /// negative tolerance, empty pool, ...).
    #[error("invalid job: {0}")]
    InvalidJob(String),

    /// Structurally impossible request: pool smaller than the combination size,
    /// or no outcome template reachable from the pool's wear span.
    #[error("infeasible job: {0}")]
    InfeasibleJob(String),

    /// Running price sum of a combination no longer fits the fixed-point accumulator.
    #[error("worker {thread_id}: price sum overflowed")]
    PriceOverflow { thread_id: usize },

    #[error("worker {thread_id} panicked: {message}")]
    WorkerPanicked { thread_id: usize, message: String },
}

impl SearchError {
    /// True for the "could not even be attempted" class that callers render as
    /// an empty result rather than an error.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SearchError::InfeasibleJob(_))
    }
}
