use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::{Level, Topic};

/// Level/topic aggregation over administrative boundaries
#[derive(Parser, Debug)]
#[command(name = "geotally", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML configuration file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List administrative levels with their key columns and boundary datasets
    Levels,

    /// List topics with their count columns and feature tables
    Topics,

    /// Print the server-side spatial count SQL for a selection
    Query(QueryArgs),

    /// Aggregate the enriched dataset and join it onto boundaries
    Aggregate(AggregateArgs),
}

/// A level/topic selection, e.g. `--level Subdistricts --topic Roads`.
#[derive(Args, Debug)]
pub struct Selection {
    /// Administrative level (Country, States, Districts, Subdistricts, ...)
    #[arg(short, long)]
    pub level: Level,

    /// Topic to count (Roads, Habitations, Facilities, ...)
    #[arg(short, long)]
    pub topic: Topic,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub selection: Selection,

    /// Cap the number of returned rows
    #[arg(long)]
    pub limit: Option<u64>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum OutputFormat { Geojson, Csv }

#[derive(Args, Debug)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub selection: Selection,

    /// Directory of `<dataset>.csv` files (overrides the config)
    #[arg(long, value_hint = ValueHint::DirPath, conflicts_with = "url")]
    pub data: Option<PathBuf>,

    /// Base URL serving `<dataset>.csv` files (overrides the config)
    #[arg(long, value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// Output file ("-" is rejected); a summary is printed when omitted
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Geojson)]
    pub format: OutputFormat,

    /// Keep only features intersecting MIN_LON,MIN_LAT,MAX_LON,MAX_LAT
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub bbox: Option<Vec<f64>>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,
}
