use anyhow::Result;
use clap::Parser;
use craft_sniper::SearchMode;
use craft_sniper::config::DEMO_JOB_PATH;
use craft_sniper::data::{demo_job, save_request};
use std::path::PathBuf;

/// Writes the demonstration job (twelve items, two outcome templates) as JSON.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEMO_JOB_PATH)]
    output: PathBuf,

    #[arg(long, default_value_t = SearchMode::Exhaustive)]
    mode: SearchMode,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let request = demo_job(args.mode);
    save_request(&args.output, &request)?;

    println!(
        "✅ Demo job written to {:?}: {} items, K={}, {} outcomes, {} mode.",
        args.output,
        request.pool.len(),
        request.combination_size,
        request.outcomes.len(),
        request.mode
    );
    Ok(())
}
