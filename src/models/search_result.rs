use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::config::SEARCH;
use crate::domain::Currency;
use crate::utils::from_fixed;

/// One feasible combination.
///
/// Ranking is by total price, then by distance from the target, then by the
/// index tuple, all compared on the fixed-point values so the order is exact.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResult {
    /// Indices into the caller's pool, ascending
    pub indices: Vec<usize>,
    /// Achieved mean wear
    pub achieved: f64,
    pub total_price: f64,
    pub currency: Currency,
    /// Index into the request's outcome templates, when templates were given
    pub outcome: Option<usize>,

    // Fixed-point ranking keys
    pub price_units: u64,
    /// `K * |mean - target|` in wear units
    pub distance_units: u64,
    pub wear_sum: u64,
}

impl SearchResult {
    pub fn new(
        indices: Vec<usize>,
        wear_sum: u64,
        target_sum: u64,
        price_units: u64,
        currency: Currency,
        outcome: Option<usize>,
    ) -> Self {
        let k = indices.len();
        Self {
            achieved: from_fixed(wear_sum, k, SEARCH.wear_scale),
            total_price: price_units as f64 / SEARCH.price_scale as f64,
            distance_units: wear_sum.abs_diff(target_sum),
            indices,
            currency,
            outcome,
            price_units,
            wear_sum,
        }
    }

    /// `|achieved - target|` as a real number.
    pub fn distance(&self) -> f64 {
        from_fixed(self.distance_units, self.indices.len(), SEARCH.wear_scale)
    }

    /// Same combination of pool items.
    pub fn same_combination(&self, other: &SearchResult) -> bool {
        self.indices == other.indices
    }
}

impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price_units
            .cmp(&other.price_units)
            .then(self.distance_units.cmp(&other.distance_units))
            .then_with(|| self.indices.cmp(&other.indices))
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchResult {}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:>12.4} {} | mean {:.9} (Δ {:.9}) | items {:?}",
            self.total_price,
            self.currency,
            self.achieved,
            self.distance(),
            self.indices
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(indices: Vec<usize>, wear_sum: u64, price_units: u64) -> SearchResult {
        SearchResult::new(indices, wear_sum, 500_000_000, price_units, Currency::Usd, None)
    }

    #[test]
    fn test_price_is_primary_key() {
        let cheap_far = result(vec![5, 6], 540_000_000, 100);
        let dear_near = result(vec![0, 1], 500_000_000, 200);
        assert!(cheap_far < dear_near);
    }

    #[test]
    fn test_distance_breaks_price_ties() {
        let near = result(vec![7, 8], 510_000_000, 100);
        let far = result(vec![0, 1], 470_000_000, 100);
        assert!(near < far, "distance 10M must rank before 30M");
    }

    #[test]
    fn test_index_tuple_breaks_full_ties() {
        // Same price, same distance on either side of the target
        let above = result(vec![0, 3], 520_000_000, 100);
        let below = result(vec![0, 2], 480_000_000, 100);
        assert!(below < above, "lexicographically smaller tuple ranks first");
        assert_eq!(above.distance_units, below.distance_units);
    }

    #[test]
    fn test_derived_reals() {
        let r = result(vec![0, 1], 460_000_000, 12_345);
        assert!((r.achieved - 0.23).abs() < 1e-12);
        assert!((r.distance() - 0.02).abs() < 1e-12);
        assert!((r.total_price - 1.2345).abs() < 1e-12);
    }
}
