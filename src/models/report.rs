//! Aggregated output of one logical search.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::search_result::SearchResult;
use crate::error::SearchError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Every worker finished its slice
    Completed,
    /// At least one worker failed; results come from the others
    Partial,
    /// Cancellation was requested; results are whatever was found until then
    Cancelled,
    /// The request could not be attempted (reason attached); no worker ran
    Infeasible(String),
}

/// A worker that did not deliver its slice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    pub thread_id: usize,
    pub message: String,
}

impl WorkerFailure {
    /// Failure of the worker that ran slice `thread_id`.
    pub fn new(thread_id: usize, err: &SearchError) -> Self {
        Self {
            thread_id,
            message: err.to_string(),
        }
    }
}

/// Immutable snapshot handed back to the caller.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchReport {
    pub status: SearchStatus,
    /// Ranked, deduplicated, truncated to the requested maximum
    pub results: Vec<SearchResult>,
    pub failures: Vec<WorkerFailure>,
    pub workers_dispatched: usize,
    /// Search-tree nodes evaluated across all workers
    pub visited: u64,
    /// Subtrees abandoned by wear or price bounds
    pub pruned: u64,
    pub duration_ms: u128,
}

impl SearchReport {
    pub fn infeasible(reason: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Infeasible(reason.into()),
            results: Vec::new(),
            failures: Vec::new(),
            workers_dispatched: 0,
            visited: 0,
            pruned: 0,
            duration_ms: 0,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self.status, SearchStatus::Infeasible(_))
    }

    pub fn best(&self) -> Option<&SearchResult> {
        self.results.first()
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchStatus::Completed => write!(f, "completed"),
            SearchStatus::Partial => write!(f, "partial (worker failure)"),
            SearchStatus::Cancelled => write!(f, "cancelled"),
            SearchStatus::Infeasible(reason) => write!(f, "infeasible: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_failure_keeps_slice_thread_id() {
        // Errors that carry no thread id of their own still name the failing slice
        let err = SearchError::InvalidJob("rank 7 is outside C(4, 2)".to_string());
        let failure = WorkerFailure::new(5, &err);
        assert_eq!(failure.thread_id, 5);
        assert!(failure.message.contains("rank 7"));
    }

    #[test]
    fn test_infeasible_report_is_empty() {
        let report = SearchReport::infeasible("pool too small");
        assert!(report.is_infeasible());
        assert!(report.best().is_none());
        assert_eq!(report.workers_dispatched, 0);
    }
}
