pub mod demo;
pub mod job_file;

pub use demo::{demo_job, demo_pool, demo_request};
pub use job_file::{load_request, save_request};
