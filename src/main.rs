use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use geotally::cli::{Cli, Commands};
use geotally::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env() // RUST_LOG overrides -v
        .init();

    match &cli.command {
        Commands::Levels => commands::levels(&cli),
        Commands::Topics => commands::topics(&cli),
        Commands::Query(args) => commands::query(&cli, args),
        Commands::Aggregate(args) => commands::aggregate(&cli, args),
    }
}
