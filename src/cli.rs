use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "testrank",
    version,
    about = "Rank functions by how urgently they need unit tests"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score the targets in a scan file and write the priority report
    Rank(RankCommand),
    /// Load and validate the scoring config without ranking
    Validate(ValidateCommand),
}

#[derive(Args)]
pub struct RankCommand {
    /// Project root that target paths are relative to
    pub root: PathBuf,
    /// Scanner output (JSON) listing targets and their signals
    #[arg(short, long)]
    pub input: PathBuf,
    /// Use this file instead of the repo's testrank.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Report destination, relative to the root unless absolute
    #[arg(short, long, default_value = "TEST_PRIORITY.md")]
    pub output: PathBuf,
    /// Report format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

#[derive(Args)]
pub struct ValidateCommand {
    pub root: PathBuf,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Md,
    Csv,
    Json,
}
