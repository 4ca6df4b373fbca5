//! Tennis Tournament - Bracket simulation and fantasy points
//!
//! This crate drives the match engine across a single-elimination draw:
//! - Roster and bracket model (JSON in, JSON out)
//! - Seed-difference serve probability model with jitter and boosts
//! - Pairing resolution (watch player, walkovers, replay majority)
//! - Round-by-round bracket advancement and fantasy points
//! - Multi-run averaging and head-to-head simulation
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_simulation, run_tournament (orchestration)
//! - Level 2: play_round, head_to_head (phases)
//! - Level 3: PairingResolver::resolve, serve_probabilities (steps)
//! - Level 4: configuration, roster, points table, JSON helpers

mod config;
mod error;
mod head_to_head;
mod json;
mod match_play;
mod points;
mod probability;
mod roster;
mod simulation;
mod tournament;

pub use config::{
    AwardMode, MissingPlayerPolicy, PointsScheme, SimulationConfig, Tour, UnresolvedPolicy,
};
pub use error::{Result, TournamentError};
pub use head_to_head::{
    head_to_head, roster_head_to_head, serve_profile_for, FormFactors, HeadToHeadSummary, Surface,
};
pub use json::{load_json, save_json, to_json_indented};
pub use match_play::{OutcomeKind, PairingOutcome, PairingResolver};
pub use points::PointsTable;
pub use probability::{BoostRule, MarginSplit, ProbabilityConfig, ProbabilityModel};
pub use roster::{Bracket, Pairing, PlayerEntry, Roster};
pub use simulation::{create_rng, run_simulation, run_simulation_with_progress, SimulationResult};
pub use tournament::{
    play_round, run_tournament, validate_inputs, BracketHistory, RoundRecord, TournamentResult,
};
