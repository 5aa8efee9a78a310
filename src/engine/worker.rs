use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use super::messages::{SearchCommand, SearchOutcome};
use super::pool::run_search;

#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;

/// Spawns the coordinator thread. It runs one logical search at a time (each
/// of which fans out to its own worker pool) and exits once the command
/// channel or the outcome channel is closed.
pub fn spawn_worker_thread(rx: Receiver<SearchCommand>, tx: Sender<SearchOutcome>) {
    thread::Builder::new()
        .name("craft-coordinator".to_string())
        .spawn(move || {
            while let Ok(cmd) = rx.recv() {
                let start = Instant::now();

                // A superseded search finds its token already set and returns early as Cancelled
                let result = run_search(&cmd.request, cmd.worker_count, &cmd.cancel).map(Arc::new);

                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_engine_events {
                    log::info!(
                        "Coordinator finished ticket {} in {:?}",
                        cmd.ticket,
                        start.elapsed()
                    );
                }

                let outcome = SearchOutcome {
                    ticket: cmd.ticket,
                    duration_ms: start.elapsed().as_millis(),
                    result,
                };

                // Receiver gone means the engine was dropped
                if tx.send(outcome).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| log::error!("Failed to spawn coordinator thread: {}", e));
}
