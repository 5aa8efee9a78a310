//! config/demo.rs Demo job configuration.
//!
//! Parameters of the small demonstration pool written by `make_demo_job`:
//! twelve items with evenly spaced wear and prices rising with wear.

/// Default output path for the demo job file
pub const DEMO_JOB_PATH: &str = "demo_job.json";

/// The Master Demo Configuration
pub struct DemoConfig {
    /// Number of items in the demo pool
    pub pool_size: usize,
    /// Wear step between consecutive items (first item has wear 0.0)
    pub wear_step: f64,
    /// Price of the first item
    pub base_price: f64,
    /// Price increase per item
    pub price_step: f64,
    pub target: f64,
    pub tolerance: f64,
    /// Outcome templates bundled with the demo: (name, collection, min wear, max wear)
    pub outcomes: &'static [(&'static str, &'static str, f64, f64)],
}

pub const DEMO: DemoConfig = DemoConfig {
    pool_size: 12,
    wear_step: 0.05,
    base_price: 1.0,
    price_step: 0.5,
    target: 0.25,
    tolerance: 0.02,
    outcomes: &[
        ("AK-47 | Redline", "Phoenix", 0.10, 0.70),
        ("M4A4 | Asiimov", "Phoenix", 0.18, 1.00),
    ],
};
