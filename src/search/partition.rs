//! Partitioning of the combination rank space.
//!
//! Combinations of `K` indices out of `[0, N)` are ranked lexicographically
//! (combinatorial number system), giving the rank space `[0, C(N, K))`. Each
//! worker receives one contiguous rank range and seeks straight to its first
//! combination with [`unrank`], without walking the ranks before it.

use crate::utils::BinomialTable;

/// Half-open rank range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    pub start: u128,
    pub end: u128,
}

impl RankRange {
    pub fn len(&self) -> u128 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// First rank owned by `thread_id`: `floor(thread_id * total / thread_count)`,
/// computed without forming the (possibly overflowing) product.
fn slice_start(total: u128, thread_id: usize, thread_count: usize) -> u128 {
    let t = thread_count as u128;
    let i = thread_id as u128;
    let quotient = total / t;
    let remainder = total % t;
    quotient * i + (remainder * i) / t
}

/// Rank range of one worker. Consecutive workers get adjacent ranges and the
/// last one ends exactly at `total`. Workers beyond `total` get an empty range.
pub fn slice_for(total: u128, thread_id: usize, thread_count: usize) -> RankRange {
    debug_assert!(thread_count > 0 && thread_id < thread_count);
    RankRange {
        start: slice_start(total, thread_id, thread_count),
        end: slice_start(total, thread_id + 1, thread_count),
    }
}

/// Every worker's range, in thread order.
pub fn partition(total: u128, thread_count: usize) -> Vec<RankRange> {
    (0..thread_count)
        .map(|id| slice_for(total, id, thread_count))
        .collect()
}

/// A decoded rank: the combination plus, for every prefix length `j`, the rank
/// of the first combination that shares the prefix `combination[..j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unranked {
    pub combination: Vec<usize>,
    /// `prefix_ranks[0] == 0`, `prefix_ranks[k] == rank`
    pub prefix_ranks: Vec<u128>,
}

/// Decodes a lexicographic rank into its `k`-combination of `[0, n)`.
/// `table` must cover `n` and `k`. Returns `None` when the rank is out of range.
pub fn unrank(rank: u128, n: usize, k: usize, table: &BinomialTable) -> Option<Unranked> {
    if k > n {
        return None;
    }
    let mut combination = Vec::with_capacity(k);
    let mut prefix_ranks = Vec::with_capacity(k + 1);
    prefix_ranks.push(0);

    let mut remaining = rank;
    let mut value = 0usize;
    for position in 0..k {
        let last_allowed = n - k + position;
        loop {
            if value > last_allowed {
                return None;
            }
            // Combinations that put `value` at this position
            let count = table.get(n - 1 - value, k - 1 - position);
            if remaining < count {
                break;
            }
            remaining -= count;
            value += 1;
        }
        combination.push(value);
        prefix_ranks.push(rank - remaining);
        value += 1;
    }

    if remaining != 0 {
        return None;
    }
    Some(Unranked {
        combination,
        prefix_ranks,
    })
}

/// Lexicographic rank of a strictly increasing `k`-combination of `[0, n)`.
pub fn rank_of(combination: &[usize], n: usize, table: &BinomialTable) -> u128 {
    let k = combination.len();
    let mut rank = 0u128;
    let mut lowest = 0usize;
    for (position, &value) in combination.iter().enumerate() {
        for skipped in lowest..value {
            rank += table.get(n - 1 - skipped, k - 1 - position);
        }
        lowest = value + 1;
    }
    rank
}
