//! Combination search over one worker's rank slice.
//!
//! Combinations are walked in lexicographic order over the wear-sorted pool.
//! Partial wear and price sums are kept per position, so moving to the next
//! combination only recomputes the positions that changed. Because the pool
//! is sorted, the smallest and largest wear sum any completion of a prefix can
//! reach are two window sums over the prefix array, which lets whole subtrees
//! be skipped (and their ranks accounted for) as soon as the tolerance window
//! is out of reach.

use std::collections::BinaryHeap;
use std::time::Instant;

use crate::config::SEARCH;
use crate::error::SearchError;
use crate::models::{SearchJob, SearchMode, SearchResult, SharedSearchData};
use crate::utils::BinomialTable;

use super::cancel::CancelToken;
use super::partition::{RankRange, Unranked, unrank};

#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;

/// What one worker hands to the aggregator.
#[derive(Debug, Clone)]
pub struct SliceOutcome {
    pub thread_id: usize,
    pub range: RankRange,
    /// Ranked best-first
    pub results: Vec<SearchResult>,
    pub visited: u64,
    pub pruned: u64,
    /// Stopped early on a cancellation request; `results` holds what was found so far
    pub cancelled: bool,
    pub duration_ms: u128,
}

/// Top-N keeper: a max-heap whose root is the worst retained result.
#[derive(Debug)]
struct BoundedResults {
    cap: usize,
    heap: BinaryHeap<SearchResult>,
}

impl BoundedResults {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            heap: BinaryHeap::with_capacity(cap.min(1024) + 1),
        }
    }

    fn is_full(&self) -> bool {
        self.heap.len() >= self.cap
    }

    fn worst(&self) -> Option<&SearchResult> {
        self.heap.peek()
    }

    fn push(&mut self, result: SearchResult) {
        if !self.is_full() {
            self.heap.push(result);
        } else if self.worst().is_some_and(|worst| result < *worst) {
            self.heap.pop();
            self.heap.push(result);
        }
    }

    fn clear(&mut self) {
        self.heap.clear();
    }

    fn into_sorted(self) -> Vec<SearchResult> {
        self.heap.into_sorted_vec()
    }
}

/// Per-worker result state. Each worker owns one; nothing is shared across slices.
#[derive(Debug)]
enum Collector {
    Exhaustive(BoundedResults),
    BestPrice {
        best: Option<u64>,
        results: BoundedResults,
    },
}

impl Collector {
    fn new(mode: SearchMode, cap: usize) -> Self {
        match mode {
            SearchMode::Exhaustive => Collector::Exhaustive(BoundedResults::new(cap)),
            SearchMode::BestPrice => Collector::BestPrice {
                best: None,
                results: BoundedResults::new(cap),
            },
        }
    }

    /// Partial price above which no completion can be kept.
    fn price_bound(&self) -> Option<u64> {
        match self {
            Collector::Exhaustive(results) => {
                if results.is_full() {
                    results.worst().map(|r| r.price_units)
                } else {
                    None
                }
            }
            Collector::BestPrice { best, .. } => *best,
        }
    }

    fn accept(&mut self, result: SearchResult) {
        match self {
            Collector::Exhaustive(results) => results.push(result),
            Collector::BestPrice { best, results } => match *best {
                Some(current) if result.price_units > current => {}
                Some(current) if result.price_units == current => results.push(result),
                _ => {
                    *best = Some(result.price_units);
                    results.clear();
                    results.push(result);
                }
            },
        }
    }

    fn into_sorted(self) -> Vec<SearchResult> {
        match self {
            Collector::Exhaustive(results) => results.into_sorted(),
            Collector::BestPrice { results, .. } => results.into_sorted(),
        }
    }
}

/// Lexicographic walk position with the rank bookkeeping needed to skip subtrees.
struct Cursor<'a> {
    table: &'a BinomialTable,
    n: usize,
    k: usize,
    combination: Vec<usize>,
    prefix_ranks: Vec<u128>,
}

impl<'a> Cursor<'a> {
    fn new(start: Unranked, n: usize, k: usize, table: &'a BinomialTable) -> Self {
        Self {
            table,
            n,
            k,
            combination: start.combination,
            prefix_ranks: start.prefix_ranks,
        }
    }

    /// Rank of the current combination.
    #[inline]
    fn rank(&self) -> u128 {
        self.prefix_ranks[self.k]
    }

    /// Skips the rest of the subtree rooted at `position` and moves to the
    /// next combination after it, carrying into earlier positions as needed.
    /// Returns the first position whose value changed, or `None` once the
    /// whole space is exhausted.
    fn advance(&mut self, mut position: usize) -> Option<usize> {
        loop {
            let value = self.combination[position];
            if value < self.n - self.k + position {
                let subtree = self.table.get(self.n - 1 - value, self.k - 1 - position);
                self.prefix_ranks[position + 1] += subtree;
                self.combination[position] = value + 1;
                let first_rank = self.prefix_ranks[position + 1];
                for tail in position + 1..self.k {
                    self.combination[tail] = self.combination[tail - 1] + 1;
                    self.prefix_ranks[tail + 1] = first_rank;
                }
                return Some(position);
            }
            if position == 0 {
                return None;
            }
            position -= 1;
        }
    }

    /// Pool positions (into the sorted entries) of the current combination.
    fn values(&self) -> &[usize] {
        &self.combination
    }
}

/// Runs the combination search over the job's slice.
///
/// A slice with nothing feasible yields an empty list. Cancellation yields the
/// partial list with `cancelled` set. The only error is a price-sum overflow.
pub fn search_slice(job: &SearchJob, cancel: &CancelToken) -> Result<SliceOutcome, SearchError> {
    let start_time = Instant::now();
    let shared = job.shared();
    let thread_id = job.thread_id();
    let range = job.range();

    let mut outcome = SliceOutcome {
        thread_id,
        range,
        results: Vec::new(),
        visited: 0,
        pruned: 0,
        cancelled: false,
        duration_ms: 0,
    };

    if range.is_empty() {
        return Ok(outcome);
    }

    let n = shared.pool_len();
    let k = shared.combination_size;
    let start = unrank(range.start, n, k, &shared.binomials).ok_or_else(|| {
        SearchError::InvalidJob(format!(
            "rank {} is outside C({}, {})",
            range.start, n, k
        ))
    })?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_partition_slices {
        log::info!(
            "Worker {}/{}: ranks [{}, {}) starting at {:?}",
            thread_id,
            job.thread_count(),
            range.start,
            range.end,
            start.combination
        );
    }

    let mut cursor = Cursor::new(start, n, k, &shared.binomials);
    let mut collector = Collector::new(shared.mode, shared.max_results);
    let (window_lo, window_hi) = shared.sum_window;
    let target_sum = shared.target_sum();
    let check_interval = SEARCH.cancel_check_interval.max(1);

    // wear_sums[i] / price_sums[i]: totals of the first i chosen items
    let mut wear_sums = vec![0u64; k + 1];
    let mut price_sums = vec![0u64; k + 1];
    let mut depth = 0usize;
    let mut iterations = 0u64;

    loop {
        if iterations % check_interval == 0 && cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }
        iterations += 1;

        if cursor.rank() >= range.end {
            break;
        }
        outcome.visited += 1;

        if depth == k {
            let wear_sum = wear_sums[k];
            let outcome_index = if shared.has_outcomes() {
                shared.match_outcome(wear_sum)
            } else {
                None
            };
            if !shared.has_outcomes() || outcome_index.is_some() {
                let result = build_result(
                    shared,
                    cursor.values(),
                    wear_sum,
                    target_sum,
                    price_sums[k],
                    outcome_index,
                );

                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_accepted_combinations {
                    log::info!("Worker {} accepted {}", thread_id, result);
                }

                collector.accept(result);
            }
            match cursor.advance(k - 1) {
                Some(changed) => depth = changed,
                None => break,
            }
            continue;
        }

        let position = depth;
        let value = cursor.values()[position];
        let entry = &shared.entries[value];
        let wear_sum = wear_sums[position] + entry.wear;
        let price_sum = price_sums[position]
            .checked_add(entry.price)
            .ok_or(SearchError::PriceOverflow { thread_id })?;

        let rest = k - 1 - position;
        let lowest_total = wear_sum + shared.window_sum(value + 1, rest);
        let highest_total = wear_sum + shared.window_sum(n - rest, rest);

        if lowest_total > window_hi {
            // Larger values at this position only raise the lowest completion further
            outcome.pruned += 1;
            if position == 0 {
                break;
            }
            match cursor.advance(position - 1) {
                Some(changed) => depth = changed,
                None => break,
            }
            continue;
        }

        let over_budget = collector
            .price_bound()
            .is_some_and(|bound| price_sum > bound);
        if highest_total < window_lo || over_budget {
            outcome.pruned += 1;
            match cursor.advance(position) {
                Some(changed) => depth = changed,
                None => break,
            }
            continue;
        }

        wear_sums[position + 1] = wear_sum;
        price_sums[position + 1] = price_sum;
        depth = position + 1;
    }

    outcome.results = collector.into_sorted();
    outcome.duration_ms = start_time.elapsed().as_millis();

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_worker_stats {
        log::debug!(
            "Worker {}: {} results, {} nodes visited, {} pruned, {} ms{}",
            thread_id,
            outcome.results.len(),
            outcome.visited,
            outcome.pruned,
            outcome.duration_ms,
            if outcome.cancelled { " (cancelled)" } else { "" }
        );
    }

    Ok(outcome)
}

fn build_result(
    shared: &SharedSearchData,
    values: &[usize],
    wear_sum: u64,
    target_sum: u64,
    price_sum: u64,
    outcome: Option<usize>,
) -> SearchResult {
    let mut indices: Vec<usize> = values
        .iter()
        .map(|&v| shared.entries[v].source_index)
        .collect();
    indices.sort_unstable();
    SearchResult::new(
        indices,
        wear_sum,
        target_sum,
        price_sum,
        shared.currency,
        outcome,
    )
}
