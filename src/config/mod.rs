//! Configuration module for the craft search engine.

pub mod search;

mod debug; // Private: use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod demo;

// Re-export commonly used items
pub use demo::{DEMO, DEMO_JOB_PATH};
pub use search::{SEARCH, SearchConfig, default_worker_count, pool_thread_count};
