//! Parallel execution of one logical search.
//!
//! One job per slice on a dedicated rayon pool sized to the machine, so a
//! thread count far above the core count costs queued jobs, not OS threads.
//! Slices with an empty rank range are never scheduled. Workers share the
//! prepared pool read-only and own everything else.
//! A worker that errors or panics is reported next to the results of the
//! others; it never takes the whole search down.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;

use crate::config::pool_thread_count;
use crate::error::SearchError;
use crate::models::{SearchJob, SearchReport, SearchRequest, SearchStatus, WorkerFailure};
use crate::search::{CancelToken, SliceOutcome, aggregate, search_slice};

/// Validates the request, runs every slice in parallel, waits for all of them,
/// and merges the ranked lists once.
///
/// `InvalidJob` is returned as an error. An infeasible request is not an error:
/// it comes back as a report with [`SearchStatus::Infeasible`] and no worker dispatched.
pub fn run_search(
    request: &SearchRequest,
    thread_count: usize,
    cancel: &CancelToken,
) -> Result<SearchReport, SearchError> {
    let start = Instant::now();

    let jobs = match request.build_jobs(thread_count) {
        Ok(jobs) => jobs,
        Err(SearchError::InfeasibleJob(reason)) => {
            log::info!("Search not attempted: {}", reason);
            return Ok(SearchReport::infeasible(reason));
        }
        Err(e) => return Err(e),
    };

    let shared = jobs[0].shared();
    let mode = shared.mode;
    let max_results = shared.max_results;
    log::info!(
        "Search started: {} items, K={}, {} combinations, {} mode, {} workers",
        shared.pool_len(),
        shared.combination_size,
        shared.total_combinations,
        mode,
        thread_count
    );

    // Join barrier: collect() returns only once every worker is done
    let slices = run_jobs(&jobs, cancel);

    let mut lists = Vec::with_capacity(slices.len());
    let mut failures = Vec::new();
    let mut visited = 0u64;
    let mut pruned = 0u64;
    let mut any_cancelled = false;

    for (thread_id, slice) in slices {
        match slice {
            Ok(outcome) => {
                visited += outcome.visited;
                pruned += outcome.pruned;
                any_cancelled |= outcome.cancelled;
                lists.push(outcome.results);
            }
            Err(e) => {
                log::warn!("Worker failed, continuing with the others: {}", e);
                failures.push(WorkerFailure::new(thread_id, &e));
            }
        }
    }

    let results = aggregate(mode, lists, max_results);

    let status = if any_cancelled || cancel.is_cancelled() {
        SearchStatus::Cancelled
    } else if !failures.is_empty() {
        SearchStatus::Partial
    } else {
        SearchStatus::Completed
    };

    let report = SearchReport {
        status,
        results,
        failures,
        workers_dispatched: jobs.len(),
        visited,
        pruned,
        duration_ms: start.elapsed().as_millis(),
    };

    log::info!(
        "Search {}: {} results, {} nodes visited, {} pruned, {} ms",
        report.status,
        report.results.len(),
        report.visited,
        report.pruned,
        report.duration_ms
    );

    Ok(report)
}

/// Runs every job with a non-empty slice and returns `(thread_id, outcome)`
/// pairs in thread order.
pub fn run_jobs(
    jobs: &[SearchJob],
    cancel: &CancelToken,
) -> Vec<(usize, Result<SliceOutcome, SearchError>)> {
    let runnable: Vec<&SearchJob> = jobs.iter().filter(|job| !job.range().is_empty()).collect();
    if runnable.is_empty() {
        return Vec::new();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_thread_count(runnable.len()))
        .thread_name(|i| format!("craft-worker-{}", i))
        .build();

    let run = || -> Vec<(usize, Result<SliceOutcome, SearchError>)> {
        runnable
            .par_iter()
            .map(|job| (job.thread_id(), run_isolated(job, cancel)))
            .collect()
    };

    match pool {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!("Could not build a dedicated worker pool ({}), using the global one", e);
            run()
        }
    }
}

/// One slice, with a panic turned into a reported failure.
fn run_isolated(job: &SearchJob, cancel: &CancelToken) -> Result<SliceOutcome, SearchError> {
    match panic::catch_unwind(AssertUnwindSafe(|| search_slice(job, cancel))) {
        Ok(result) => result,
        Err(payload) => Err(SearchError::WorkerPanicked {
            thread_id: job.thread_id(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
