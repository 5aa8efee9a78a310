use clap::Parser;

use craft_sniper::{Cli, run_cli};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Cli::parse();
    log::info!("craft-sniper starting");
    run_cli(&args)
}
