use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};

use crate::models::{SearchReport, SearchRequest};
use crate::search::CancelToken;

use super::messages::{SearchCommand, SearchOutcome};
use super::state::SearchState;
use super::worker;

/// Background search service. Owns one coordinator thread; every submission
/// supersedes the previous one, so the front buffer only ever shows the
/// newest request's report.
pub struct CraftEngine {
    pub state: SearchState,

    /// Workers each logical search fans out to
    pub worker_count: usize,

    /// Worker Communication
    job_tx: Sender<SearchCommand>,
    result_rx: Receiver<SearchOutcome>,
}

impl CraftEngine {
    /// Spawns the coordinator thread. A `worker_count` of 0 is raised to 1.
    pub fn new(worker_count: usize) -> Self {
        let (job_tx, job_rx) = channel::<SearchCommand>();
        let (result_tx, result_rx) = channel::<SearchOutcome>();

        worker::spawn_worker_thread(job_rx, result_tx);

        Self {
            state: SearchState::new(),
            worker_count: worker_count.max(1),
            job_tx,
            result_rx,
        }
    }

    /// Queues a search and returns its ticket. A search still running is cancelled first.
    pub fn submit(&mut self, request: SearchRequest) -> u64 {
        self.cancel();

        self.state.current_ticket += 1;
        let ticket = self.state.current_ticket;
        let cancel = CancelToken::new();

        let cmd = SearchCommand {
            ticket,
            request: Arc::new(request),
            worker_count: self.worker_count,
            cancel: cancel.clone(),
        };

        // If the coordinator is gone there is nothing to wait for
        if self.job_tx.send(cmd).is_err() {
            log::error!("Coordinator thread is not running; search {} dropped", ticket);
            self.state
                .record_error("search coordinator is not running".to_string());
            return ticket;
        }

        self.state.cancel = Some(cancel);
        self.state.is_searching = true;
        log::info!("Search {} submitted ({} workers)", ticket, self.worker_count);
        ticket
    }

    /// Signals the running search, if any, to stop at its next cancellation check.
    pub fn cancel(&mut self) {
        if let Some(token) = self.state.cancel.take() {
            token.cancel();
            log::info!("Search {} cancelled", self.state.current_ticket);
        }
    }

    /// THE POLL.
    /// Drains finished searches and returns TRUE while a search is still running.
    pub fn update(&mut self) -> bool {
        while let Ok(outcome) = self.result_rx.try_recv() {
            self.handle_outcome(outcome);
        }
        self.state.is_searching
    }

    /// Blocks until the current search finishes or `timeout` elapses.
    /// Returns TRUE if the engine is idle afterwards.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.update() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.result_rx.recv_timeout(remaining) {
                Ok(outcome) => self.handle_outcome(outcome),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    self.state
                        .record_error("search coordinator stopped".to_string());
                    return true;
                }
            }
        }
        true
    }

    /// Accessor for UI
    pub fn latest(&self) -> Option<Arc<SearchReport>> {
        self.state.report.clone()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.state.is_searching
    }

    // --- TELEMETRY ---

    pub fn status_message(&self) -> Option<String> {
        if self.state.is_searching {
            Some(format!(
                "Searching (ticket {}, {} workers)",
                self.state.current_ticket, self.worker_count
            ))
        } else if let Some(e) = &self.state.last_error {
            Some(format!("Error: {}", e))
        } else {
            self.state
                .report
                .as_ref()
                .map(|r| format!("{}: {} results", r.status, r.results.len()))
        }
    }

    // --- INTERNAL LOGIC ---

    fn handle_outcome(&mut self, outcome: SearchOutcome) {
        // Results of superseded searches never reach the front buffer
        if outcome.ticket != self.state.current_ticket {
            log::info!("Dropping stale result for search {}", outcome.ticket);
            return;
        }
        match outcome.result {
            Ok(report) => {
                log::info!(
                    "Search {} finished in {} ms: {}",
                    outcome.ticket,
                    outcome.duration_ms,
                    report.status
                );
                self.state.update_buffer(report);
            }
            Err(e) => {
                log::error!("Search {} failed: {}", outcome.ticket, e);
                self.state.record_error(e.to_string());
            }
        }
    }
}

impl Drop for CraftEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}
