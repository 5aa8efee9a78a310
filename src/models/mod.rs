// Search models: the request/job descriptors and what comes back out.
// Pure data, no threading.

pub mod report;
pub mod search_job;
pub mod search_result;

// Re-export key types for convenience
pub use report::{SearchReport, SearchStatus, WorkerFailure};
pub use search_job::{
    PoolEntry, ReachableOutcome, SearchJob, SearchMode, SearchRequest, SharedSearchData,
};
pub use search_result::SearchResult;
