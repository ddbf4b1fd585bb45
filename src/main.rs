mod analyze;
mod cli;
mod config;
mod error;
mod graph;
mod matching;
mod metrics;
mod report;
mod types;

use crate::error::TestRankError;
use crate::graph::source::FsSource;
use crate::types::config::ScoringConfig;
use crate::types::target::ScanInput;
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Loads the layered config, falling back to the built-in tables. The flag is
/// true when no config file was found.
fn load_scoring_config(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<(ScoringConfig, bool), TestRankError> {
    match config::load_config(root, explicit)? {
        Some(cfg) => Ok((cfg, false)),
        None => {
            warn!(
                root = %root.display(),
                "no {} found; using built-in unified scoring",
                config::DEFAULT_CONFIG_FILE
            );
            Ok((ScoringConfig::builtin(), true))
        }
    }
}

fn run() -> Result<i32, TestRankError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Rank(cmd) => {
            if !cmd.root.exists() {
                return Err(TestRankError::PathNotFound(cmd.root.display().to_string()));
            }
            let (scoring, missing_config) =
                load_scoring_config(&cmd.root, cmd.config.as_deref())?;
            let input = ScanInput::load(&cmd.input)?;

            let outcome = analyze::rank(&input, &scoring, &FsSource::new(&cmd.root))?;
            info!(
                targets = input.targets.len(),
                source_files = outcome.graph_nodes,
                "analysis finished"
            );

            let output = cmd.root.join(&cmd.output);
            let format = match cmd.format {
                Some(cli::ReportFormat::Md) => report::OutputFormat::Md,
                Some(cli::ReportFormat::Csv) => report::OutputFormat::Csv,
                Some(cli::ReportFormat::Json) => report::OutputFormat::Json,
                None => report::OutputFormat::from_path(&output),
            };
            let summary =
                report::write_report(&output, &outcome.scored, &outcome.skipped, format)?;

            if !cli.quiet {
                println!("{}", summary.headline());
                for entry in &outcome.skipped {
                    println!("skipped {}: {}", entry.key, entry.reason);
                }
                println!("report: {}", output.display());
            }

            if missing_config || !outcome.skipped.is_empty() {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Validate(cmd) => {
            if !cmd.root.exists() {
                return Err(TestRankError::PathNotFound(cmd.root.display().to_string()));
            }
            let (scoring, missing_config) =
                load_scoring_config(&cmd.root, cmd.config.as_deref())?;
            scoring.validate()?;

            if !cli.quiet {
                println!(
                    "config ok: mode={:?} layers={}",
                    scoring.mode,
                    scoring.layers.len()
                );
            }
            if missing_config {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
    }
}

fn exit_code_for(error: &TestRankError) -> i32 {
    match error {
        TestRankError::ConfigParse(_)
        | TestRankError::MissingConfigFields(_)
        | TestRankError::InvalidPattern { .. }
        | TestRankError::Toml(_) => exit_code::INVALID_CONFIG,
        _ => exit_code::RUNTIME_FAILURE,
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}
