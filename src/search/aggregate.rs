//! Merging of per-worker ranked lists into the final ranking.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::models::{SearchMode, SearchResult};

/// k-way merge of already-ranked lists, dropping index-identical combinations
/// and stopping at `max_results`.
pub fn merge_ranked(lists: Vec<Vec<SearchResult>>, max_results: usize) -> Vec<SearchResult> {
    debug_assert!(
        lists.iter().all(|l| l.windows(2).all(|w| w[0] <= w[1])),
        "worker lists must be ranked before merging"
    );

    let mut sources: Vec<std::vec::IntoIter<SearchResult>> =
        lists.into_iter().map(Vec::into_iter).collect();
    let mut heads: BinaryHeap<Reverse<(SearchResult, usize)>> = BinaryHeap::new();
    for (source, iter) in sources.iter_mut().enumerate() {
        if let Some(first) = iter.next() {
            heads.push(Reverse((first, source)));
        }
    }

    let mut merged: Vec<SearchResult> = Vec::new();
    while merged.len() < max_results {
        let Some(Reverse((next, source))) = heads.pop() else {
            break;
        };
        if let Some(following) = sources[source].next() {
            heads.push(Reverse((following, source)));
        }
        // Identical combinations share every ranking key, so duplicates arrive back to back
        if merged.last().is_some_and(|last| last.same_combination(&next)) {
            continue;
        }
        merged.push(next);
    }
    merged
}

/// Final ranking for one logical search. In best-price mode only the results
/// at the global minimum price survive, whichever worker found them.
pub fn aggregate(
    mode: SearchMode,
    lists: Vec<Vec<SearchResult>>,
    max_results: usize,
) -> Vec<SearchResult> {
    match mode {
        SearchMode::Exhaustive => merge_ranked(lists, max_results),
        SearchMode::BestPrice => {
            let Some(global_min) = lists
                .iter()
                .filter_map(|list| list.first())
                .map(|r| r.price_units)
                .min()
            else {
                return Vec::new();
            };
            let cheapest: Vec<Vec<SearchResult>> = lists
                .into_iter()
                .map(|list| {
                    list.into_iter()
                        .take_while(|r| r.price_units == global_min)
                        .collect()
                })
                .collect();
            merge_ranked(cheapest, max_results)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    fn result(indices: Vec<usize>, price_units: u64, wear_sum: u64) -> SearchResult {
        SearchResult::new(indices, wear_sum, 500_000_000, price_units, Currency::Usd, None)
    }

    #[test]
    fn test_merge_interleaves_in_rank_order() {
        let a = vec![result(vec![0, 1], 10, 500_000_000), result(vec![0, 2], 30, 500_000_000)];
        let b = vec![result(vec![1, 2], 20, 500_000_000), result(vec![1, 3], 40, 500_000_000)];
        let merged = merge_ranked(vec![a, b], 10);
        let prices: Vec<u64> = merged.iter().map(|r| r.price_units).collect();
        assert_eq!(prices, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_merge_truncates() {
        let a = vec![result(vec![0, 1], 10, 500_000_000), result(vec![0, 2], 30, 500_000_000)];
        let b = vec![result(vec![1, 2], 20, 500_000_000)];
        let merged = merge_ranked(vec![a, b, Vec::new()], 2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].price_units, 20);
    }

    #[test]
    fn test_merge_drops_duplicate_combinations() {
        let a = vec![result(vec![0, 1], 10, 500_000_000), result(vec![2, 3], 50, 500_000_000)];
        let overlap = vec![result(vec![0, 1], 10, 500_000_000)];
        let merged = merge_ranked(vec![a, overlap], 10);
        assert_eq!(merged.len(), 2, "Duplicate from an overlapping slice must be dropped");
    }

    #[test]
    fn test_best_price_keeps_global_minimum_only() {
        let worker_a = vec![result(vec![0, 1], 25, 500_000_000)];
        let worker_b = vec![
            result(vec![2, 3], 15, 510_000_000),
            result(vec![2, 4], 15, 500_000_000),
        ];
        let worker_c = Vec::new();
        let merged = aggregate(SearchMode::BestPrice, vec![worker_a, worker_b, worker_c], 10);
        let indices: Vec<Vec<usize>> = merged.iter().map(|r| r.indices.clone()).collect();
        assert_eq!(indices, vec![vec![2, 4], vec![2, 3]]);
    }

    #[test]
    fn test_all_empty_lists_merge_to_empty() {
        assert!(aggregate(SearchMode::BestPrice, vec![Vec::new(), Vec::new()], 5).is_empty());
        assert!(aggregate(SearchMode::Exhaustive, Vec::new(), 5).is_empty());
    }
}
