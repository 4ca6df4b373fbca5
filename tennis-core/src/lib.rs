//! Tennis Core - Match simulation engine
//!
//! This crate provides the point-by-point match engine:
//! - Point resolution (single serve probability or first/second serve model)
//! - Game, tiebreak and set state machines with server rotation
//! - Match orchestration and statistics accumulation
//! - Score formatting for logs and reports
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: TennisMatch::simulate (orchestration)
//! - Level 2: play_set (phases)
//! - Level 3: play_game, play_tiebreak, play_point (steps)
//! - Level 4: formats, statistics, score text

pub mod error;
pub mod format;
pub mod engine;
pub mod player;
pub mod point;
pub mod score;
pub mod stats;

// Re-exports for convenient access
pub use error::{EngineError, Result};
pub use format::MatchFormat;
pub use engine::{GameOutcome, MatchSummary, TennisMatch};
pub use player::{DetailedPlayer, SimplePlayer};
pub use point::{PointModel, PointOutcome, PointSource, RandomPoints, ServeEvent, ServeProfile, Side};
pub use score::{format_scoreline, game_score, tiebreak_score};
pub use stats::{round2, PlayerStats, SetScore};
