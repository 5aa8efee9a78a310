//! Search request, validation, and the per-worker job descriptor.
//!
//! A [`SearchRequest`] is what the caller fills in. [`SearchRequest::build_jobs`]
//! validates it once, converts every real value to fixed point, sorts the pool
//! by wear and hands out one [`SearchJob`] per worker. All jobs of one logical
//! search share the same read-only [`SharedSearchData`] through an `Arc`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SEARCH;
use crate::domain::{Currency, FloatRange, InputSkin, OutcomeFilter, OutcomeTemplate};
use crate::error::SearchError;
use crate::search::{RankRange, slice_for};
use crate::utils::{BinomialTable, binomial, from_fixed, to_fixed};

#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;

/// Search strategy. New strategies are added here and matched exhaustively
/// by the combination search.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SearchMode {
    /// Every feasible combination, capped at the best `max_results`.
    #[default]
    Exhaustive,
    /// Only combinations at the lowest feasible total price.
    BestPrice,
}

fn default_combination_size() -> usize {
    SEARCH.combination_size
}

fn default_max_results() -> usize {
    SEARCH.max_results
}

/// One logical search as requested by the caller.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchRequest {
    /// Desired mean wear of the chosen combination
    pub target: f64,
    /// Maximum allowed distance between the achieved mean and `target`
    pub tolerance: f64,
    /// Free text narrowing the eligible outcome templates (see [`OutcomeFilter`])
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub outcomes: Vec<OutcomeTemplate>,
    pub pool: Vec<InputSkin>,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "default_combination_size")]
    pub combination_size: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Pool item after validation, in fixed-point units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolEntry {
    /// Position of the item in the caller's pool
    pub source_index: usize,
    pub wear: u64,
    pub price: u64,
}

/// Outcome template that passed the filter and can be reached from the pool.
/// Bounds are expressed as wear sums over `K` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachableOutcome {
    /// Index into the request's `outcomes`
    pub index: usize,
    pub sum_min: u64,
    pub sum_max: u64,
}

/// Read-only state shared by every worker of one logical search.
#[derive(Debug)]
pub struct SharedSearchData {
    pub combination_size: usize,
    pub mode: SearchMode,
    pub max_results: usize,
    pub currency: Currency,

    // Fixed-point target statistic and tolerance (per item, not summed)
    pub target: u64,
    pub tolerance: u64,
    /// Inclusive bounds on the wear sum of a feasible combination, narrowed by
    /// the reachable outcome templates.
    pub sum_window: (u64, u64),

    /// Pool sorted by wear ascending (stable)
    pub entries: Vec<PoolEntry>,
    /// `wear_prefix[j]` is the wear sum of the first `j` entries
    pub wear_prefix: Vec<u64>,

    pub outcomes: Vec<OutcomeTemplate>,
    pub reachable: Vec<ReachableOutcome>,

    /// `C(N, K)`, the size of the rank space
    pub total_combinations: u128,
    pub binomials: BinomialTable,
}

impl SharedSearchData {
    #[inline]
    pub fn pool_len(&self) -> usize {
        self.entries.len()
    }

    /// Wear sum of `len` consecutive sorted entries starting at `start`.
    #[inline]
    pub fn window_sum(&self, start: usize, len: usize) -> u64 {
        self.wear_prefix[start + len] - self.wear_prefix[start]
    }

    /// `K * target`, the wear sum of a combination exactly on target.
    #[inline]
    pub fn target_sum(&self) -> u64 {
        self.target * self.combination_size as u64
    }

    pub fn has_outcomes(&self) -> bool {
        !self.outcomes.is_empty()
    }

    /// First reachable outcome (request order) whose range contains the given wear sum.
    pub fn match_outcome(&self, wear_sum: u64) -> Option<usize> {
        self.reachable
            .iter()
            .find(|o| o.sum_min <= wear_sum && wear_sum <= o.sum_max)
            .map(|o| o.index)
    }
}

/// Job descriptor handed to one worker: the shared search plus this worker's
/// partition coordinates.
#[derive(Debug, Clone)]
pub struct SearchJob {
    shared: Arc<SharedSearchData>,
    thread_id: usize,
    thread_count: usize,
}

impl SearchJob {
    pub fn shared(&self) -> &SharedSearchData {
        &self.shared
    }

    pub fn thread_id(&self) -> usize {
        self.thread_id
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Rank slice this job covers.
    pub fn range(&self) -> RankRange {
        slice_for(self.shared.total_combinations, self.thread_id, self.thread_count)
    }
}

impl SearchRequest {
    /// Validates the request and produces `thread_count` jobs, one per worker,
    /// all sharing the same prepared pool.
    pub fn build_jobs(&self, thread_count: usize) -> Result<Vec<SearchJob>, SearchError> {
        if thread_count == 0 {
            return Err(SearchError::InvalidJob(
                "thread count must be at least 1".to_string(),
            ));
        }
        let shared = Arc::new(self.prepare()?);

        Ok((0..thread_count)
            .map(|thread_id| SearchJob {
                shared: Arc::clone(&shared),
                thread_id,
                thread_count,
            })
            .collect())
    }

    /// Validation and fixed-point conversion. Malformed input is `InvalidJob`;
    /// a well-formed request that cannot be searched is `InfeasibleJob`.
    pub fn prepare(&self) -> Result<SharedSearchData, SearchError> {
        let k = self.combination_size;
        let scale = SEARCH.wear_scale;

        if k == 0 {
            return Err(invalid("combination size must be at least 1"));
        }
        if self.max_results == 0 {
            return Err(invalid("max results must be at least 1"));
        }
        if !self.target.is_finite() || !(0.0..=1.0).contains(&self.target) {
            return Err(invalid(format!(
                "target {} is outside the wear domain [0, 1]",
                self.target
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(invalid(format!(
                "tolerance {} must be a non-negative real",
                self.tolerance
            )));
        }
        if self.pool.is_empty() {
            return Err(invalid("candidate pool is empty"));
        }

        let currency = self.pool[0].currency;
        let mut entries = Vec::with_capacity(self.pool.len());
        for (source_index, skin) in self.pool.iter().enumerate() {
            if !skin.wear.is_finite() || !(0.0..=1.0).contains(&skin.wear) {
                return Err(invalid(format!(
                    "item {} has wear {} outside [0, 1]",
                    source_index, skin.wear
                )));
            }
            let price = to_fixed(skin.price, SEARCH.price_scale).ok_or_else(|| {
                invalid(format!(
                    "item {} has unusable price {}",
                    source_index, skin.price
                ))
            })?;
            if skin.currency != currency {
                return Err(invalid(format!(
                    "item {} is priced in {} but the pool is in {}",
                    source_index, skin.currency, currency
                )));
            }
            // Wear is already checked to be in [0, 1], so conversion cannot fail
            let wear = to_fixed(skin.wear, scale).unwrap_or(0);
            entries.push(PoolEntry {
                source_index,
                wear,
                price,
            });
        }

        for (index, outcome) in self.outcomes.iter().enumerate() {
            if !outcome.range.is_valid() {
                return Err(invalid(format!(
                    "outcome {} ({}) has malformed range {}",
                    index, outcome.name, outcome.range
                )));
            }
        }

        let n = entries.len();
        if k > n {
            return Err(SearchError::InfeasibleJob(format!(
                "pool holds {} items but a combination needs {}",
                n, k
            )));
        }

        let total_combinations = binomial(n, k).ok_or_else(|| {
            invalid(format!(
                "search space C({}, {}) is too large to rank",
                n, k
            ))
        })?;

        // Stable: equal-wear items keep their input order
        entries.sort_by(|a, b| self.pool[a.source_index].cmp_by_wear(&self.pool[b.source_index]));

        let mut wear_prefix = Vec::with_capacity(n + 1);
        wear_prefix.push(0u64);
        let mut running = 0u64;
        for entry in &entries {
            running = running
                .checked_add(entry.wear)
                .ok_or_else(|| invalid("pool is too large to sum its wear"))?;
            wear_prefix.push(running);
        }

        // Anything above 1.0 already spans the whole domain
        let target = to_fixed(self.target, scale).unwrap_or(0);
        let tolerance = to_fixed(self.tolerance.min(1.0), scale).unwrap_or(0);
        let k64 = k as u64;
        let mut sum_window = (
            (target * k64).saturating_sub(tolerance * k64),
            target * k64 + tolerance * k64,
        );

        let filter = OutcomeFilter::parse(&self.filter);
        let mut reachable = Vec::new();
        if !self.outcomes.is_empty() {
            let lowest_mean = from_fixed(wear_prefix[k], k, scale);
            let highest_mean = from_fixed(wear_prefix[n] - wear_prefix[n - k], k, scale);
            let pool_span = FloatRange::new(lowest_mean, highest_mean);
            let target_window =
                FloatRange::new(self.target - self.tolerance, self.target + self.tolerance);

            let eligible: Vec<(usize, &OutcomeTemplate)> = self
                .outcomes
                .iter()
                .enumerate()
                .filter(|(_, o)| filter.matches(o))
                .collect();
            if eligible.is_empty() {
                return Err(SearchError::InfeasibleJob(format!(
                    "no outcome template matches filter '{}'",
                    self.filter
                )));
            }

            for (index, outcome) in eligible {
                let reaches = outcome.range.is_overlapped(&pool_span)
                    && outcome.range.is_overlapped(&target_window);

                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_outcome_reachability {
                    log::info!(
                        "Outcome {} {} vs pool span {} / target window {}: {}",
                        outcome.name,
                        outcome.range,
                        pool_span,
                        target_window,
                        if reaches { "reachable" } else { "unreachable" }
                    );
                }

                let clipped = outcome.range.intersection(&FloatRange::new(0.0, 1.0));
                if reaches && let Some(clipped) = clipped {
                    let lo = to_fixed(clipped.min, scale).unwrap_or(0);
                    let hi = to_fixed(clipped.max, scale).unwrap_or(0);
                    reachable.push(ReachableOutcome {
                        index,
                        sum_min: lo * k64,
                        sum_max: hi * k64,
                    });
                }
            }

            if reachable.is_empty() {
                return Err(SearchError::InfeasibleJob(format!(
                    "no outcome template is reachable from pool wear span {}",
                    pool_span
                )));
            }

            let outcome_lo = reachable.iter().map(|o| o.sum_min).min().unwrap_or(0);
            let outcome_hi = reachable.iter().map(|o| o.sum_max).max().unwrap_or(u64::MAX);
            sum_window = (sum_window.0.max(outcome_lo), sum_window.1.min(outcome_hi));
        }

        Ok(SharedSearchData {
            combination_size: k,
            mode: self.mode,
            max_results: self.max_results,
            currency,
            target,
            tolerance,
            sum_window,
            entries,
            wear_prefix,
            outcomes: self.outcomes.clone(),
            reachable,
            total_combinations,
            binomials: BinomialTable::new(n, k),
        })
    }
}

fn invalid(reason: impl Into<String>) -> SearchError {
    SearchError::InvalidJob(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(wears: &[f64]) -> Vec<InputSkin> {
        wears
            .iter()
            .enumerate()
            .map(|(i, &w)| InputSkin::new(format!("item{}", i), w, 1.0 + i as f64, Currency::Usd))
            .collect()
    }

    fn request(wears: &[f64], k: usize) -> SearchRequest {
        SearchRequest {
            target: 0.25,
            tolerance: 0.02,
            filter: String::new(),
            outcomes: Vec::new(),
            pool: pool(wears),
            mode: SearchMode::Exhaustive,
            combination_size: k,
            max_results: 10,
        }
    }

    fn expect_invalid(req: &SearchRequest) {
        match req.build_jobs(1) {
            Err(SearchError::InvalidJob(_)) => {}
            other => panic!("expected InvalidJob, got {:?}", other),
        }
    }

    #[test]
    fn test_jobs_share_data_and_differ_in_thread_id() {
        let jobs = request(&[0.1, 0.2, 0.3, 0.4], 2).build_jobs(3).unwrap();
        assert_eq!(jobs.len(), 3);
        for (i, job) in jobs.iter().enumerate() {
            assert_eq!(job.thread_id(), i);
            assert_eq!(job.thread_count(), 3);
            assert!(std::ptr::eq(job.shared(), jobs[0].shared()));
        }
        assert_eq!(jobs[0].shared().total_combinations, 6);
    }

    #[test]
    fn test_pool_sorted_stably_with_source_indices() {
        let shared = request(&[0.4, 0.1, 0.4, 0.0], 2).prepare().unwrap();
        let order: Vec<usize> = shared.entries.iter().map(|e| e.source_index).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
        assert_eq!(shared.wear_prefix.last().copied(), Some(900_000_000));
    }

    #[test]
    fn test_pool_order_follows_real_wear_below_fixed_point_precision() {
        // Both wears round to the same fixed-point value; the real values still decide
        let shared = request(&[0.300_000_000_2, 0.300_000_000_1, 0.1], 2).prepare().unwrap();
        let order: Vec<usize> = shared.entries.iter().map(|e| e.source_index).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert_eq!(shared.entries[1].wear, shared.entries[2].wear);
    }

    #[test]
    fn test_outcome_range_is_clipped_to_wear_domain() {
        let mut req = request(&[0.1, 0.2, 0.3, 0.4], 2);
        req.outcomes = vec![OutcomeTemplate::new("wide", "c", FloatRange::new(0.2, 1.5))];
        let shared = req.prepare().unwrap();

        assert_eq!(shared.reachable.len(), 1);
        assert_eq!(shared.reachable[0].sum_min, 400_000_000);
        assert_eq!(shared.reachable[0].sum_max, 2_000_000_000, "Clipped at 1.0 per item");
        assert_eq!(shared.sum_window, (460_000_000, 540_000_000));
    }

    #[test]
    fn test_job_ranges_tile_the_rank_space() {
        let jobs = request(&[0.1, 0.2, 0.3, 0.4, 0.5], 2).build_jobs(4).unwrap();
        let ranges: Vec<RankRange> = jobs.iter().map(|j| j.range()).collect();
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[3].end, 10);
        assert!(ranges.windows(2).all(|p| p[0].end == p[1].start));
    }

    #[test]
    fn test_k_larger_than_pool_is_infeasible() {
        let err = request(&[0.1, 0.2], 3).build_jobs(4).unwrap_err();
        assert!(err.is_infeasible(), "got {:?}", err);
    }

    #[test]
    fn test_malformed_requests_are_invalid() {
        expect_invalid(&request(&[0.1, 0.2], 0));
        expect_invalid(&request(&[], 1));

        let mut req = request(&[0.1, 0.2], 1);
        req.tolerance = -0.1;
        expect_invalid(&req);

        let mut req = request(&[0.1, 0.2], 1);
        req.pool[1].price = f64::NAN;
        expect_invalid(&req);

        let mut req = request(&[0.1, 0.2], 1);
        req.pool[0].price = -3.0;
        expect_invalid(&req);

        let mut req = request(&[0.1, 0.2], 1);
        req.pool[1].currency = Currency::Eur;
        expect_invalid(&req);

        let mut req = request(&[0.1, 1.2], 1);
        req.target = 0.5;
        expect_invalid(&req);

        assert!(matches!(
            request(&[0.1, 0.2], 1).build_jobs(0),
            Err(SearchError::InvalidJob(_))
        ));
    }

    #[test]
    fn test_empty_pool_is_invalid_not_infeasible() {
        let err = request(&[], 10).build_jobs(1).unwrap_err();
        assert!(matches!(err, SearchError::InvalidJob(_)), "got {:?}", err);
    }

    #[test]
    fn test_unreachable_outcomes_are_infeasible() {
        let mut req = request(&[0.0, 0.05, 0.10, 0.15], 2);
        req.target = 0.1;
        req.outcomes = vec![OutcomeTemplate::new(
            "Battle-Scarred only",
            "Test",
            FloatRange::new(0.45, 1.0),
        )];
        let err = req.prepare().unwrap_err();
        assert!(err.is_infeasible(), "got {:?}", err);
    }

    #[test]
    fn test_filter_excluding_all_outcomes_is_infeasible() {
        let mut req = request(&[0.2, 0.25, 0.3], 2);
        req.outcomes = vec![OutcomeTemplate::new(
            "AK-47 | Redline",
            "Phoenix",
            FloatRange::new(0.0, 1.0),
        )];
        req.filter = "asiimov".to_string();
        assert!(req.prepare().unwrap_err().is_infeasible());
    }

    #[test]
    fn test_reachable_outcomes_narrow_sum_window() {
        let mut req = request(&[0.2, 0.22, 0.25, 0.3], 2);
        req.outcomes = vec![
            OutcomeTemplate::new("low", "c", FloatRange::new(0.0, 0.24)),
            OutcomeTemplate::new("far", "c", FloatRange::new(0.9, 1.0)),
        ];
        let shared = req.prepare().unwrap();
        assert_eq!(shared.reachable.len(), 1);
        assert_eq!(shared.reachable[0].index, 0);
        // Tolerance window is [0.23, 0.27] * 2, outcome caps it at 0.24 * 2
        assert_eq!(shared.sum_window, (460_000_000, 480_000_000));
        assert_eq!(shared.match_outcome(470_000_000), Some(0));
        assert_eq!(shared.match_outcome(490_000_000), None);
    }

    #[test]
    fn test_request_parses_from_json_with_defaults() {
        let json = r#"{
            "target": 0.2,
            "tolerance": 0.01,
            "pool": [{"wear": 0.1, "price": 2.5, "currency": "EUR"}],
            "mode": "best-price"
        }"#;
        let req: SearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, SearchMode::BestPrice);
        assert_eq!(req.combination_size, SEARCH.combination_size);
        assert_eq!(req.max_results, SEARCH.max_results);
        assert_eq!(req.pool[0].currency, Currency::Eur);
        assert!(req.outcomes.is_empty());
    }
}
