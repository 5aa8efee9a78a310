// Search algorithms: partitioning, per-slice combination search, merging
pub mod aggregate;
pub mod cancel;
pub mod combination;
pub mod partition;

// Re-export commonly used types
pub use aggregate::{aggregate, merge_ranked};
pub use cancel::CancelToken;
pub use combination::{SliceOutcome, search_slice};
pub use partition::{RankRange, partition, slice_for, unrank};

#[cfg(test)]
pub(crate) mod test_support;
