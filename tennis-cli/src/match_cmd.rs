//! Match command - play one match point by point
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_match(), report_results()
//! - Level 4: argument validation

use anyhow::{bail, Result};
use clap::Args;
use rand::Rng;

use tennis_core::{MatchFormat, PointModel, ServeProfile, Side, SimplePlayer, TennisMatch};
use tennis_tournament::{create_rng, to_json_indented};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First player's name
    #[arg(long, default_value = "Player 1")]
    pub one: String,

    /// Second player's name
    #[arg(long, default_value = "Player 2")]
    pub two: String,

    /// First player's probability of winning a point on serve
    #[arg(long, default_value = "0.6")]
    pub one_serve: f64,

    /// Second player's probability of winning a point on serve
    #[arg(long, default_value = "0.6")]
    pub two_serve: f64,

    /// Sets needed to win (2 = best of three, 3 = best of five)
    #[arg(long, default_value = "3")]
    pub sets_to_win: u32,

    /// Use the first/second serve model: first in, second in, first won, second won
    #[arg(long, num_args = 4, value_name = "P", conflicts_with = "one_serve")]
    pub one_detailed: Option<Vec<f64>>,

    /// Same as --one-detailed for the second player
    #[arg(long, num_args = 4, value_name = "P", conflicts_with = "two_serve")]
    pub two_detailed: Option<Vec<f64>>,

    /// Output the match summary as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let mut rng = create_rng(seed);
    let first_server = if rng.gen_bool(0.5) { Side::One } else { Side::Two };
    let mut tennis_match = build_match(&args, first_server)?;

    tracing::info!(
        "{} vs {}, {} serves first",
        args.one,
        args.two,
        tennis_match.name(first_server)
    );

    tennis_match.simulate(&mut rng);
    report_results(&tennis_match, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_match(args: &MatchArgs, first_server: Side) -> Result<TennisMatch> {
    let format = MatchFormat::new(args.sets_to_win)?;
    let names = [args.one.clone(), args.two.clone()];

    let model = if args.one_detailed.is_none() && args.two_detailed.is_none() {
        let one = SimplePlayer::new(args.one.clone(), args.one_serve);
        let two = SimplePlayer::new(args.two.clone(), args.two_serve);
        one.validate()?;
        two.validate()?;
        PointModel::simple(one.points_won_on_serve, two.points_won_on_serve)
    } else {
        PointModel::detailed(
            serve_profile(args.one_detailed.as_deref(), args.one_serve)?,
            serve_profile(args.two_detailed.as_deref(), args.two_serve)?,
        )
    };

    // Rejects pairs of servers that would leave a tiebreak running forever
    Ok(TennisMatch::checked(names, model, format, first_server)?)
}

fn report_results(tennis_match: &TennisMatch, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json_indented(&tennis_match.summary())?);
    } else {
        println!("{}", tennis_match.statistics_report());
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Detailed profile from four values, or one that reproduces a flat serve
/// probability when none were given
fn serve_profile(values: Option<&[f64]>, serve: f64) -> Result<ServeProfile> {
    let profile = match values {
        Some([first_in, second_in, first_won, second_won]) => {
            ServeProfile::new(*first_in, *second_in, *first_won, *second_won)
        }
        Some(other) => bail!("expected 4 serve probabilities, got {}", other.len()),
        None => ServeProfile::new(1.0, 1.0, serve, serve),
    };
    profile.validate()?;
    Ok(profile)
}
