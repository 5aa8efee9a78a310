use std::sync::Arc;

use crate::models::SearchReport;
use crate::search::CancelToken;

/// Engine-side bookkeeping for the search the UI is looking at.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// THE FRONT BUFFER.
    /// The UI reads this every frame. A finished search replaces the Arc, never mutates it.
    pub report: Option<Arc<SearchReport>>,

    /// Ticket of the most recent submission
    pub current_ticket: u64,
    /// Cancellation handle of the running search, if any
    pub cancel: Option<CancelToken>,

    pub is_searching: bool,

    /// Last error (if any) to show in UI
    pub last_error: Option<String>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            report: None,
            current_ticket: 0,
            cancel: None,
            is_searching: false,
            last_error: None,
        }
    }

    /// Promotes a finished report to the front buffer.
    pub fn update_buffer(&mut self, report: Arc<SearchReport>) {
        self.report = Some(report);
        self.is_searching = false;
        self.cancel = None;
        self.last_error = None;
    }

    pub fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.is_searching = false;
        self.cancel = None;
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}
