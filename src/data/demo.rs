//! The demonstration pool described by [`DEMO`].

use crate::config::{DEMO, SEARCH};
use crate::domain::{Currency, FloatRange, InputSkin, OutcomeTemplate};
use crate::models::{SearchMode, SearchRequest};

/// Twelve items, wear 0.00..0.55 in 0.05 steps, price rising with wear.
pub fn demo_pool() -> Vec<InputSkin> {
    (0..DEMO.pool_size)
        .map(|i| {
            InputSkin::new(
                format!("demo-{}", i),
                DEMO.wear_step * i as f64,
                DEMO.base_price + DEMO.price_step * i as f64,
                Currency::Usd,
            )
        })
        .collect()
}

/// Demo pool and target, without outcome templates.
pub fn demo_request(mode: SearchMode) -> SearchRequest {
    SearchRequest {
        target: DEMO.target,
        tolerance: DEMO.tolerance,
        filter: String::new(),
        outcomes: Vec::new(),
        pool: demo_pool(),
        mode,
        combination_size: SEARCH.combination_size,
        max_results: SEARCH.max_results,
    }
}

/// Demo request with the bundled outcome templates, as written by `make_demo_job`.
pub fn demo_job(mode: SearchMode) -> SearchRequest {
    let outcomes = DEMO
        .outcomes
        .iter()
        .map(|&(name, collection, min, max)| {
            OutcomeTemplate::new(name, collection, FloatRange::new(min, max))
        })
        .collect();
    SearchRequest {
        outcomes,
        ..demo_request(mode)
    }
}
