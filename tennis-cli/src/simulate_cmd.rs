//! Simulate command - run a bracket and accumulate fantasy points
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_inputs(), build_config(), simulate(), write_outputs()
//! - Level 3: progress bar, text summary
//! - Level 4: argument enums

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use tennis_tournament::{
    run_simulation_with_progress, save_json, Bracket, MarginSplit, MissingPlayerPolicy,
    PointsScheme, ProbabilityConfig, Roster, SimulationConfig, SimulationResult, Tour, UnresolvedPolicy,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Player roster JSON file (name -> {seed, cost, power})
    #[arg(long, value_name = "FILE")]
    pub players: PathBuf,

    /// First-round bracket JSON file ([[name, name], ...])
    #[arg(long, value_name = "FILE")]
    pub bracket: PathBuf,

    /// Tour: men play best of five, women best of three
    #[arg(long, value_enum, default_value = "men")]
    pub tour: TourArg,

    /// Number of tournament runs to average
    #[arg(long, default_value = "1")]
    pub runs: usize,

    /// Player who wins every match they play
    #[arg(long)]
    pub watch: Option<String>,

    /// Replay each pairing and take the majority winner
    #[arg(long)]
    pub replays: bool,

    /// Probability model
    #[arg(long, value_enum, default_value = "basic")]
    pub model: ModelArg,

    /// How the seed edge is split between the two players
    #[arg(long, value_enum, default_value = "favorite")]
    pub split: SplitArg,

    /// Top player (repeatable); top players do not get boosted against each other
    #[arg(long = "top-player", value_name = "NAME")]
    pub top_players: Vec<String>,

    /// Serve probability boost for top players
    #[arg(long, default_value = "0.02")]
    pub boost: f64,

    /// Points scheme for simulated matches
    #[arg(long, value_enum, default_value = "fixed")]
    pub scheme: SchemeArg,

    /// Reject brackets naming players missing from the roster
    #[arg(long)]
    pub strict_roster: bool,

    /// Pairings where neither player is in the roster
    #[arg(long, value_enum, default_value = "error")]
    pub unresolved: UnresolvedArg,

    /// Points table output file (printed to stdout when omitted)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Bracket history output file (single run only)
    #[arg(long, value_name = "FILE")]
    pub brackets_output: Option<PathBuf>,

    /// Run tournaments one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TourArg {
    Men,
    Women,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModelArg {
    /// 0.5 baseline, no jitter
    Basic,
    /// 0.64 baseline with jitter
    Enhanced,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SplitArg {
    /// Weaker seed keeps the baseline, the favorite gets the whole edge
    Favorite,
    /// Each side moves half the edge away from the baseline
    Symmetric,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SchemeArg {
    /// 55 to the winner, 45 to the loser
    Fixed,
    /// Percentage of points won
    PointShare,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UnresolvedArg {
    Error,
    CoinFlip,
    FirstListed,
}

impl From<TourArg> for Tour {
    fn from(arg: TourArg) -> Self {
        match arg {
            TourArg::Men => Tour::Men,
            TourArg::Women => Tour::Women,
        }
    }
}

impl From<SplitArg> for MarginSplit {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Favorite => MarginSplit::Favorite,
            SplitArg::Symmetric => MarginSplit::Symmetric,
        }
    }
}

impl From<UnresolvedArg> for UnresolvedPolicy {
    fn from(arg: UnresolvedArg) -> Self {
        match arg {
            UnresolvedArg::Error => UnresolvedPolicy::Error,
            UnresolvedArg::CoinFlip => UnresolvedPolicy::CoinFlip,
            UnresolvedArg::FirstListed => UnresolvedPolicy::FirstListed,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Load roster and bracket
/// 2. Build the configuration
/// 3. Simulate all runs
/// 4. Write points (and bracket history)
pub fn run(args: SimulateArgs, seed: Option<u64>, verbose: bool) -> Result<()> {
    let (roster, bracket) = load_inputs(&args)?;
    let config = build_config(&args, seed, verbose);

    tracing::info!(
        "Simulating {} players, {} first-round pairings, {} run(s)",
        roster.len(),
        bracket.len(),
        config.num_runs
    );

    let result = simulate(&roster, &bracket, &config)?;
    write_outputs(&result, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_inputs(args: &SimulateArgs) -> Result<(Roster, Bracket)> {
    let roster = Roster::load(&args.players)
        .with_context(|| format!("Failed to load roster: {}", args.players.display()))?;
    let bracket = Bracket::load(&args.bracket)
        .with_context(|| format!("Failed to load bracket: {}", args.bracket.display()))?;
    Ok((roster, bracket))
}

fn build_config(args: &SimulateArgs, seed: Option<u64>, verbose: bool) -> SimulationConfig {
    let tour = Tour::from(args.tour);
    let probability = match args.model {
        ModelArg::Basic => ProbabilityConfig::basic(),
        ModelArg::Enhanced => ProbabilityConfig::enhanced(),
    };

    let mut config = SimulationConfig::for_tour(tour)
        .with_probability(probability.with_split(args.split.into()))
        .with_runs(args.runs)
        .with_verbose(verbose)
        .with_replay_majority(args.replays)
        .with_unresolved(args.unresolved.into())
        .with_parallel(!args.sequential)
        .with_points(match args.scheme {
            SchemeArg::Fixed => PointsScheme::default(),
            SchemeArg::PointShare => PointsScheme::point_share(),
        });
    config.seed = seed;
    config.top_player_boost = args.boost;

    if args.strict_roster {
        config = config.with_missing_player(MissingPlayerPolicy::Reject);
    }
    if let Some(watch) = &args.watch {
        config = config.with_watch_player(watch.clone());
    }
    if !args.top_players.is_empty() {
        config = config.with_top_players(&args.top_players);
    }
    config
}

fn simulate(roster: &Roster, bracket: &Bracket, config: &SimulationConfig) -> Result<SimulationResult> {
    let progress = create_progress_bar(config.num_runs);
    let result = run_simulation_with_progress(roster, bracket, config, || {
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    })
    .context("Simulation failed")?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    Ok(result)
}

fn write_outputs(result: &SimulationResult, args: &SimulateArgs) -> Result<()> {
    match &args.output {
        Some(path) => {
            result
                .points
                .save(path)
                .with_context(|| format!("Failed to write points: {}", path.display()))?;
            tracing::info!("Points written to {}", path.display());
            print_summary(result);
        }
        None => println!("{}", result.points.to_json_pretty()?),
    }

    if let Some(path) = &args.brackets_output {
        match &result.single_run {
            Some(run) => {
                save_json(path, &run.history())
                    .with_context(|| format!("Failed to write brackets: {}", path.display()))?;
                tracing::info!("Bracket history written to {}", path.display());
            }
            None => tracing::warn!("Bracket history is only kept for single runs; skipping"),
        }
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Progress bar for multi-run simulations only
fn create_progress_bar(runs: usize) -> Option<ProgressBar> {
    if runs <= 1 {
        return None;
    }
    let bar = ProgressBar::new(runs as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} runs ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    Some(bar)
}

fn print_summary(result: &SimulationResult) {
    println!("\n=== Simulation Results ({} run(s)) ===", result.runs);
    if let Some(run) = &result.single_run {
        if let Some(champion) = &run.champion {
            println!("Champion:  {}", champion);
        }
        if let Some(runner_up) = &run.runner_up {
            println!("Runner-up: {}", runner_up);
        }
    } else if let Some((name, titles)) = result.favorite() {
        println!(
            "Most titles: {} ({} of {}, {:.1}%)",
            name,
            titles,
            result.runs,
            titles as f64 / result.runs as f64 * 100.0
        );
    }

    println!("\nTop players by points:");
    for (rank, (name, points)) in result.points.ranked().into_iter().take(10).enumerate() {
        println!("{:>3}. {:<24} {:>8.2}", rank + 1, name, points);
    }
}
