//! Search and numeric precision configuration

/// The Master Search Configuration
pub struct SearchConfig {
    // Items consumed by one craft (the trade-up contract takes ten)
    pub combination_size: usize,
    // Per-worker and merged result cap when the request does not specify one
    pub max_results: usize,
    // Worker count used when the caller does not ask for one (capped by available cores)
    pub default_worker_count: usize,
    // Loop iterations between two polls of the cancellation flag.
    // Pruned nodes count as iterations, so latency stays bounded on huge pools.
    pub cancel_check_interval: u64,
    // Fixed-point units per 1.0 of wear (9 decimal places)
    pub wear_scale: u64,
    // Fixed-point units per 1.0 of currency (4 decimal places)
    pub price_scale: u64,
}

pub const SEARCH: SearchConfig = SearchConfig {
    combination_size: 10,
    max_results: 50,
    default_worker_count: 8,
    cancel_check_interval: 4096,
    wear_scale: 1_000_000_000,
    price_scale: 10_000,
};

/// Threads backing one search's worker pool: one per runnable slice, never
/// more than the machine can run in parallel. Slices beyond that queue on the pool.
pub fn pool_thread_count(slices: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    slices.min(cores).max(1)
}

/// Worker count to use when none is requested: the configured default,
/// never more than the machine can run in parallel.
pub fn default_worker_count() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    SEARCH.default_worker_count.min(cores).max(1)
}
