//! Match play - resolving one bracket pairing
//!
//! Level 3 - Step-level implementation
//!
//! Resolution order for a pairing:
//! 1. Both slots empty: the pairing advances nobody
//! 2. Watch player present: they win
//! 3. Only one player known to the roster: walkover
//! 4. Neither player known: unresolved policy
//! 5. Otherwise: simulate (replay majority when enabled)

use rand::Rng;
use serde::Serialize;
use tennis_core::{PointModel, Side, TennisMatch};
use tracing::{debug, info, warn};

use crate::config::{AwardMode, MissingPlayerPolicy, SimulationConfig, UnresolvedPolicy};
use crate::error::{Result, TournamentError};
use crate::probability::ProbabilityModel;
use crate::roster::{Pairing, PlayerEntry, Roster};

/// How a pairing was decided
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Played out on court
    Simulated {
        replays: usize,
        wins: [u32; 2],
        scoreline: String,
    },
    /// The watch player always advances
    WatchPlayer,
    /// Opponent missing from the roster
    Walkover,
    /// Neither player in the roster; decided by policy
    Unresolved,
    /// One or both slots empty
    Bye,
}

/// Result of resolving one pairing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairingOutcome {
    pub pairing: Pairing,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub winner_points: f64,
    pub loser_points: f64,
    pub kind: OutcomeKind,
}

impl PairingOutcome {
    fn bye(pairing: &Pairing, winner: Option<String>) -> Self {
        Self {
            pairing: pairing.clone(),
            winner,
            loser: None,
            winner_points: 0.0,
            loser_points: 0.0,
            kind: OutcomeKind::Bye,
        }
    }

    pub fn was_simulated(&self) -> bool {
        matches!(self.kind, OutcomeKind::Simulated { .. })
    }
}

/// Resolves pairings against a roster and configuration
pub struct PairingResolver<'a> {
    roster: &'a Roster,
    config: &'a SimulationConfig,
    model: ProbabilityModel<'a>,
}

impl<'a> PairingResolver<'a> {
    pub fn new(roster: &'a Roster, config: &'a SimulationConfig) -> Self {
        Self {
            roster,
            config,
            model: ProbabilityModel::new(&config.probability, &config.boost_rules),
        }
    }

    /// Resolve pairing `index` of a round with `bracket_len` pairings
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        index: usize,
        pairing: &Pairing,
        bracket_len: usize,
        rng: &mut R,
    ) -> Result<PairingOutcome> {
        let names = pairing.names();
        let (one, two) = match names {
            [None, None] => return Ok(PairingOutcome::bye(pairing, None)),
            [Some(one), None] => return Ok(PairingOutcome::bye(pairing, Some(one.to_string()))),
            [None, Some(two)] => return Ok(PairingOutcome::bye(pairing, Some(two.to_string()))),
            [Some(one), Some(two)] => (one, two),
        };

        if let Some(watch) = self.config.watch_player.as_deref() {
            for side in Side::BOTH {
                if names[side.index()] == Some(watch) {
                    if self.config.effective_verbose() {
                        info!("Watch player {} advances past {}", watch, pairing.label());
                    }
                    return Ok(self.forced(pairing, side, OutcomeKind::WatchPlayer));
                }
            }
        }

        match (self.roster.get(one), self.roster.get(two)) {
            (Some(first), Some(second)) => {
                self.simulate(pairing, [one, two], [first, second], bracket_len, rng)
            }
            (Some(_), None) => self.walkover(index, pairing, Side::One, two),
            (None, Some(_)) => self.walkover(index, pairing, Side::Two, one),
            (None, None) => self.unresolved(pairing, rng),
        }
    }

    /// Fixed points for an outcome that was not played out
    fn forced(&self, pairing: &Pairing, winner: Side, kind: OutcomeKind) -> PairingOutcome {
        PairingOutcome {
            pairing: pairing.clone(),
            winner: pairing.slots[winner.index()].clone(),
            loser: pairing.slots[winner.opponent().index()].clone(),
            winner_points: self.config.points.win_points,
            loser_points: self.config.points.loss_points,
            kind,
        }
    }

    fn walkover(
        &self,
        index: usize,
        pairing: &Pairing,
        winner: Side,
        missing: &str,
    ) -> Result<PairingOutcome> {
        if self.config.missing_player == MissingPlayerPolicy::Reject {
            return Err(TournamentError::RosterMismatch {
                player: missing.to_string(),
                pairing: index,
            });
        }
        warn!("{} is not in the roster; walkover in {}", missing, pairing.label());
        Ok(self.forced(pairing, winner, OutcomeKind::Walkover))
    }

    fn unresolved<R: Rng + ?Sized>(
        &self,
        pairing: &Pairing,
        rng: &mut R,
    ) -> Result<PairingOutcome> {
        let winner = match self.config.unresolved {
            UnresolvedPolicy::Error => {
                return Err(TournamentError::UnresolvedMatch(pairing.label()))
            }
            UnresolvedPolicy::FirstListed => Side::One,
            UnresolvedPolicy::CoinFlip => {
                if rng.gen_bool(0.5) {
                    Side::One
                } else {
                    Side::Two
                }
            }
        };
        warn!("Neither player in {} is in the roster", pairing.label());
        Ok(self.forced(pairing, winner, OutcomeKind::Unresolved))
    }

    /// Play the pairing once, or several times and take the majority
    ///
    /// Each replay draws jitter, then the first server, then the points.
    /// The reported points come from the last replay won by the majority
    /// winner.
    fn simulate<R: Rng + ?Sized>(
        &self,
        pairing: &Pairing,
        names: [&str; 2],
        entries: [&PlayerEntry; 2],
        bracket_len: usize,
        rng: &mut R,
    ) -> Result<PairingOutcome> {
        let replays = self.config.replays_for_round(bracket_len);
        let seeds = [entries[0].seed, entries[1].seed];
        let mut wins = [0u32; 2];
        let mut shares = [[0.0; 2]; 2];
        let mut scorelines = [String::new(), String::new()];
        let mut last_winner = Side::One;

        for _ in 0..replays {
            let probs = self.model.serve_probabilities(names, seeds, rng);
            let first_server = if rng.gen_bool(0.5) { Side::One } else { Side::Two };
            let mut tennis_match = TennisMatch::checked(
                [names[0].to_string(), names[1].to_string()],
                PointModel::simple(probs[0], probs[1]),
                self.config.format,
                first_server,
            )?;
            let winner = tennis_match.simulate(rng);
            wins[winner.index()] += 1;
            shares[winner.index()] = [
                tennis_match.points_won_percentage(winner),
                tennis_match.points_won_percentage(winner.opponent()),
            ];
            scorelines[winner.index()] = tennis_match.scoreline();
            last_winner = winner;

            debug!(
                "{} vs {}: p=({:.4}, {:.4}) winner {} {}",
                names[0],
                names[1],
                probs[0],
                probs[1],
                names[winner.index()],
                scorelines[winner.index()]
            );
        }

        let winner = match wins[0].cmp(&wins[1]) {
            std::cmp::Ordering::Greater => Side::One,
            std::cmp::Ordering::Less => Side::Two,
            std::cmp::Ordering::Equal => last_winner,
        };
        let [winner_share, loser_share] = shares[winner.index()];
        let (winner_points, loser_points) = match self.config.points.award {
            AwardMode::Fixed => (self.config.points.win_points, self.config.points.loss_points),
            AwardMode::PointShare => (winner_share, loser_share),
        };

        if self.config.effective_verbose() {
            info!(
                "{} def. {} {} ({}-{} over {} replays)",
                names[winner.index()],
                names[winner.opponent().index()],
                scorelines[winner.index()],
                wins[winner.index()],
                wins[winner.opponent().index()],
                replays
            );
        }

        Ok(PairingOutcome {
            pairing: pairing.clone(),
            winner: Some(names[winner.index()].to_string()),
            loser: Some(names[winner.opponent().index()].to_string()),
            winner_points,
            loser_points,
            kind: OutcomeKind::Simulated {
                replays,
                wins,
                scoreline: scorelines[winner.index()].clone(),
            },
        })
    }
}
