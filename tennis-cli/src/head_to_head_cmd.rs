//! Head-to-head command - many simulated matches between two roster players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: roster_head_to_head() (library), report_results()
//! - Level 4: formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tennis_tournament::{
    create_rng, roster_head_to_head, to_json_indented, HeadToHeadSummary, Roster, Surface, Tour,
};

use crate::simulate_cmd::TourArg;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct HeadToHeadArgs {
    /// Player roster JSON file; p_factor / n_factor entries set form
    #[arg(long, value_name = "FILE")]
    pub players: PathBuf,

    /// First player
    #[arg(long = "one", value_name = "NAME")]
    pub player_one: String,

    /// Second player
    #[arg(long = "two", value_name = "NAME")]
    pub player_two: String,

    /// Court surface (grass adds to serve strength, clay takes from it)
    #[arg(long, value_enum, default_value = "grass")]
    pub surface: SurfaceArg,

    #[arg(long, value_enum, default_value = "men")]
    pub tour: TourArg,

    /// Number of matches to simulate
    #[arg(long, default_value = "1000")]
    pub simulations: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SurfaceArg {
    Grass,
    Clay,
    Hard,
}

impl From<SurfaceArg> for Surface {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Grass => Surface::Grass,
            SurfaceArg::Clay => Surface::Clay,
            SurfaceArg::Hard => Surface::Hard,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: HeadToHeadArgs, seed: Option<u64>) -> Result<()> {
    let roster = Roster::load(&args.players)
        .with_context(|| format!("Failed to load roster: {}", args.players.display()))?;

    tracing::info!(
        "Head to head: {} vs {} on {:?} ({} simulations)",
        args.player_one,
        args.player_two,
        args.surface,
        args.simulations
    );

    let mut rng = create_rng(seed);
    let summary = roster_head_to_head(
        &roster,
        [args.player_one.as_str(), args.player_two.as_str()],
        args.surface.into(),
        Tour::from(args.tour).format(),
        args.simulations,
        &mut rng,
    )
    .context("Head-to-head simulation failed")?;

    report_results(&summary, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_results(summary: &HeadToHeadSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json_indented(summary)?);
    } else {
        print_text_results(summary);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(summary: &HeadToHeadSummary) {
    println!("\n=== Head to Head ({} matches) ===", summary.simulations);
    for index in 0..2 {
        println!(
            "{:<24} wins {:>5} ({:>5.1}%)  avg points {:>5.1}%  avg sets {:.2}",
            summary.players[index],
            summary.wins[index],
            summary.win_percentage[index],
            summary.average_points_won[index],
            summary.average_sets_won[index]
        );
    }
    let leader = summary.leader().index();
    println!("\nFavorite: {}", summary.players[leader]);
}
