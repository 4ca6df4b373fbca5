//! Tennis simulator CLI - Command-line interface
//!
//! Commands:
//! - simulate: Run a bracket and write the fantasy points table
//! - head-to-head: Simulate one pairing many times
//! - match: Play a single match from explicit serve probabilities

mod head_to_head_cmd;
mod match_cmd;
mod simulate_cmd;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tennis-sim")]
#[command(about = "Tennis tournament fantasy points simulator")]
struct Cli {
    /// Random seed (omit for a random run)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Derive the seed from a date as YYYYMMDD ("today" for the local date);
    /// ignored when --seed is given
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    seed_date: Option<String>,

    /// Per-round and per-match logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a tournament bracket and accumulate fantasy points
    Simulate(simulate_cmd::SimulateArgs),
    /// Simulate one pairing many times with surface and form adjustments
    HeadToHead(head_to_head_cmd::HeadToHeadArgs),
    /// Play a single match and print its statistics
    Match(match_cmd::MatchArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let seed = resolve_seed(cli.seed, cli.seed_date.as_deref())?;
    if let Some(seed) = seed {
        tracing::debug!("Using seed {}", seed);
    }

    match cli.command {
        Commands::Simulate(args) => simulate_cmd::run(args, seed, cli.verbose),
        Commands::HeadToHead(args) => head_to_head_cmd::run(args, seed),
        Commands::Match(args) => match_cmd::run(args, seed),
    }
}

/// Logs go to stderr so JSON on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_seed(seed: Option<u64>, seed_date: Option<&str>) -> Result<Option<u64>> {
    match (seed, seed_date) {
        (Some(seed), _) => Ok(Some(seed)),
        (None, Some("today")) => Ok(Some(date_seed(Local::now().date_naive()))),
        (None, Some(text)) => {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .with_context(|| format!("Invalid --seed-date '{}', expected YYYY-MM-DD", text))?;
            Ok(Some(date_seed(date)))
        }
        (None, None) => Ok(None),
    }
}

/// 2024-07-01 becomes 20240701
fn date_seed(date: NaiveDate) -> u64 {
    date.year().max(0) as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64
}
