//! Shared fixtures for search tests: the demo pool and a brute-force reference.

use itertools::Itertools;

use crate::config::SEARCH;
use crate::models::{SearchMode, SearchRequest, SearchResult};
use crate::utils::to_fixed;

pub use crate::data::demo_request;

/// Enumerates every combination of the caller's pool in input order, with no
/// pruning and no partitioning, and ranks what is feasible.
pub fn naive_search(request: &SearchRequest) -> Vec<SearchResult> {
    let shared = request.prepare().expect("reference request must be valid");
    let k = request.combination_size;
    let target = to_fixed(request.target, SEARCH.wear_scale).unwrap() * k as u64;
    let tolerance = to_fixed(request.tolerance.min(1.0), SEARCH.wear_scale).unwrap() * k as u64;

    let mut results: Vec<SearchResult> = (0..request.pool.len())
        .combinations(k)
        .filter_map(|indices| {
            let wear_sum: u64 = indices
                .iter()
                .map(|&i| to_fixed(request.pool[i].wear, SEARCH.wear_scale).unwrap())
                .sum();
            let price_sum: u64 = indices
                .iter()
                .map(|&i| to_fixed(request.pool[i].price, SEARCH.price_scale).unwrap())
                .sum();
            if wear_sum.abs_diff(target) > tolerance {
                return None;
            }
            let outcome = if request.outcomes.is_empty() {
                None
            } else {
                Some(shared.match_outcome(wear_sum)?)
            };
            Some(SearchResult::new(
                indices,
                wear_sum,
                target,
                price_sum,
                shared.currency,
                outcome,
            ))
        })
        .collect();

    if request.mode == SearchMode::BestPrice
        && let Some(min_price) = results.iter().map(|r| r.price_units).min()
    {
        results.retain(|r| r.price_units == min_price);
    }
    results.sort();
    results.truncate(request.max_results);
    results
}
