#![allow(clippy::type_complexity)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod search;
pub mod utils;

// The background search service
pub mod engine;

use std::path::PathBuf;

use anyhow::{Context, Result};
use itertools::Itertools;

// Re-export commonly used types
pub use domain::{Currency, FloatRange, InputSkin, OutcomeFilter, OutcomeTemplate};
pub use engine::{CraftEngine, run_search};
pub use error::SearchError;
pub use models::{SearchJob, SearchMode, SearchReport, SearchRequest, SearchResult, SearchStatus};
pub use search::CancelToken;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON job file to run; the built-in demo job when omitted
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Worker threads (defaults to the available parallelism, capped by config)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Override the job's search mode
    #[arg(long)]
    pub mode: Option<SearchMode>,

    /// Override the job's result cap
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Override the job's outcome filter
    #[arg(long)]
    pub filter: Option<String>,

    /// Print the report as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Loads the job named on the command line, applies overrides, runs it and prints the report.
pub fn run_cli(args: &Cli) -> Result<()> {
    let mut request = match &args.job {
        Some(path) => data::load_request(path)?,
        None => {
            log::info!("No job file given, running the demo job");
            data::demo_job(SearchMode::default())
        }
    };
    if let Some(mode) = args.mode {
        request.mode = mode;
    }
    if let Some(max_results) = args.max_results {
        request.max_results = max_results;
    }
    if let Some(filter) = &args.filter {
        request.filter = filter.clone();
    }

    let threads = args.threads.unwrap_or_else(config::default_worker_count);
    let report = run_search(&request, threads, &CancelToken::new())
        .context("Search request rejected")?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", text);
    } else {
        print_report(&request, &report);
    }
    Ok(())
}

fn print_report(request: &SearchRequest, report: &SearchReport) {
    println!(
        "{} | {} results | {} workers | {} visited, {} pruned | {} ms",
        report.status,
        report.results.len(),
        report.workers_dispatched,
        report.visited,
        report.pruned,
        report.duration_ms
    );
    for failure in &report.failures {
        println!("  worker {} failed: {}", failure.thread_id, failure.message);
    }
    for (rank, result) in report.results.iter().enumerate() {
        let outcome = result
            .outcome
            .and_then(|i| request.outcomes.get(i))
            .map(|o| o.name.as_str())
            .unwrap_or("-");
        let items = result
            .indices
            .iter()
            .map(|&i| match request.pool.get(i) {
                Some(skin) if !skin.name.is_empty() => skin.name.clone(),
                _ => format!("#{}", i),
            })
            .join(", ");
        println!(
            "{:>3}. {:>10.2} {} | mean {:.6} (off {:.6}) | {} | {}",
            rank + 1,
            result.total_price,
            result.currency,
            result.achieved,
            result.distance(),
            outcome,
            items
        );
    }
}
