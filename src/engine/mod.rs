pub mod core;
pub mod messages;
pub mod pool;
pub mod state;
pub mod worker;

// Re-export key components
pub use core::CraftEngine;
pub use pool::run_search;
pub use state::SearchState;
