//! Configuration types for bracket simulation
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};
use tennis_core::MatchFormat;

use crate::error::{Result, TournamentError};
use crate::probability::{BoostRule, ProbabilityConfig};

/// Maximum number of replays for a replay-majority pairing
pub const MAX_REPLAYS: usize = 5;

/// Default boost for top players
pub const DEFAULT_TOP_PLAYER_BOOST: f64 = 0.02;

/// Tour, which fixes the match length
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tour {
    /// Best of five sets
    Men,
    /// Best of three sets
    Women,
}

impl Tour {
    pub fn sets_to_win(self) -> u32 {
        match self {
            Tour::Men => 3,
            Tour::Women => 2,
        }
    }

    pub fn format(self) -> MatchFormat {
        match self {
            Tour::Men => MatchFormat::best_of_five(),
            Tour::Women => MatchFormat::best_of_three(),
        }
    }
}

/// How simulated matches are scored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardMode {
    /// Winner and loser receive fixed amounts
    #[default]
    Fixed,
    /// Each side receives its percentage of points won
    PointShare,
}

/// Fantasy points awarded per pairing
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointsScheme {
    pub award: AwardMode,
    pub win_points: f64,
    pub loss_points: f64,
}

impl Default for PointsScheme {
    fn default() -> Self {
        Self {
            award: AwardMode::Fixed,
            win_points: 55.0,
            loss_points: 45.0,
        }
    }
}

impl PointsScheme {
    pub fn fixed(win_points: f64, loss_points: f64) -> Self {
        Self {
            award: AwardMode::Fixed,
            win_points,
            loss_points,
        }
    }

    /// Point share for simulated matches, 55/45 for forced outcomes
    pub fn point_share() -> Self {
        Self {
            award: AwardMode::PointShare,
            ..Default::default()
        }
    }
}

/// What to do with a bracket player that is missing from the roster
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPlayerPolicy {
    /// The listed opponent advances by walkover
    #[default]
    Walkover,
    /// Reject the bracket before play starts
    Reject,
}

/// What to do when neither player of a pairing is in the roster
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Reject the bracket (or fail the round, for later rounds)
    #[default]
    Error,
    /// Pick a winner uniformly at random
    CoinFlip,
    /// Advance the first listed player
    FirstListed,
}

/// Full simulation configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Match length for every pairing
    pub format: MatchFormat,
    /// Number of full tournament runs to average
    pub num_runs: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Player who wins every match they appear in
    pub watch_player: Option<String>,
    /// Per-round logging (only honored for a single run)
    pub verbose: bool,
    /// Play several replays per pairing and take the majority
    pub replay_majority: bool,
    /// Boost used when building top-player rules
    pub top_player_boost: f64,
    pub probability: ProbabilityConfig,
    pub boost_rules: Vec<BoostRule>,
    pub points: PointsScheme,
    pub missing_player: MissingPlayerPolicy,
    pub unresolved: UnresolvedPolicy,
    /// Run multiple tournaments in parallel
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            format: MatchFormat::best_of_five(),
            num_runs: 1,
            seed: None,
            watch_player: None,
            verbose: false,
            replay_majority: false,
            top_player_boost: DEFAULT_TOP_PLAYER_BOOST,
            probability: ProbabilityConfig::basic(),
            boost_rules: Vec::new(),
            points: PointsScheme::default(),
            missing_player: MissingPlayerPolicy::Walkover,
            unresolved: UnresolvedPolicy::Error,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Basic model for the given tour
    pub fn for_tour(tour: Tour) -> Self {
        Self {
            format: tour.format(),
            ..Default::default()
        }
    }

    /// Enhanced model: jittered baseline, replay majority, point share
    pub fn enhanced(tour: Tour) -> Self {
        Self {
            format: tour.format(),
            replay_majority: true,
            probability: ProbabilityConfig::enhanced(),
            points: PointsScheme::point_share(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = num_runs;
        self
    }

    pub fn with_watch_player(mut self, name: impl Into<String>) -> Self {
        self.watch_player = Some(name.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_replay_majority(mut self, enabled: bool) -> Self {
        self.replay_majority = enabled;
        self
    }

    pub fn with_probability(mut self, probability: ProbabilityConfig) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_points(mut self, points: PointsScheme) -> Self {
        self.points = points;
        self
    }

    pub fn with_missing_player(mut self, policy: MissingPlayerPolicy) -> Self {
        self.missing_player = policy;
        self
    }

    pub fn with_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_boost_rule(mut self, rule: BoostRule) -> Self {
        self.boost_rules.push(rule);
        self
    }

    /// Add a group of top players who are each other's rivals
    pub fn with_top_players(mut self, names: &[String]) -> Self {
        self.boost_rules
            .extend(BoostRule::top_group(names, self.top_player_boost));
        self
    }

    /// Verbose logging is forced off for multi-run simulations
    pub fn effective_verbose(&self) -> bool {
        self.verbose && self.num_runs == 1
    }

    /// Replays for a pairing in a round of `bracket_len` pairings
    pub fn replays_for_round(&self, bracket_len: usize) -> usize {
        if !self.replay_majority || bracket_len <= 1 {
            1
        } else {
            (bracket_len + 1).min(MAX_REPLAYS)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_runs == 0 {
            return Err(TournamentError::InvalidConfig(
                "num_runs must be at least 1".to_string(),
            ));
        }
        if self.format.sets_to_win == 0 {
            return Err(TournamentError::InvalidConfig(
                "sets_to_win must be at least 1".to_string(),
            ));
        }
        if self.points.win_points < 0.0 || self.points.loss_points < 0.0 {
            return Err(TournamentError::InvalidConfig(
                "fixed points must not be negative".to_string(),
            ));
        }
        for rule in &self.boost_rules {
            if !rule.boost.is_finite() || rule.boost < 0.0 {
                return Err(TournamentError::InvalidConfig(format!(
                    "boost for '{}' must be a non-negative number",
                    rule.player
                )));
            }
        }
        self.probability.validate()
    }
}
