use std::sync::Arc;

use crate::error::SearchError;
use crate::models::{SearchReport, SearchRequest};
use crate::search::CancelToken;

/// A request to run one logical search in the background
#[derive(Debug, Clone)]
pub struct SearchCommand {
    /// Monotonic id; outcomes carrying an older ticket are stale
    pub ticket: u64,
    pub request: Arc<SearchRequest>,
    pub worker_count: usize,
    pub cancel: CancelToken,
}

/// The result returned by the coordinator thread
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub ticket: u64,
    pub duration_ms: u128,

    // Success: the new front buffer
    // Failure: the validation error (InvalidJob)
    pub result: Result<Arc<SearchReport>, SearchError>,
}
