//! Bracket advancement driver
//!
//! Level 1 - Orchestration for one tournament run: resolve every pairing of
//! the current round in order, award points, pair consecutive winners into
//! the next round, and stop once the final has been played.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{MissingPlayerPolicy, SimulationConfig, UnresolvedPolicy};
use crate::error::{Result, TournamentError};
use crate::match_play::{PairingOutcome, PairingResolver};
use crate::points::PointsTable;
use crate::roster::{Bracket, Roster};

/// Every round's pairings followed by the champion
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BracketHistory {
    pub rounds: Vec<Bracket>,
    pub champion: Option<String>,
}

/// One completed round
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundRecord {
    /// 1-based round number
    pub round: usize,
    pub bracket: Bracket,
    pub outcomes: Vec<PairingOutcome>,
}

impl RoundRecord {
    pub fn points_awarded(&self) -> f64 {
        self.outcomes
            .iter()
            .map(|outcome| outcome.winner_points + outcome.loser_points)
            .sum()
    }
}

/// Result of one tournament run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentResult {
    pub champion: Option<String>,
    pub runner_up: Option<String>,
    pub points: PointsTable,
    pub rounds: Vec<RoundRecord>,
}

impl TournamentResult {
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }

    pub fn history(&self) -> BracketHistory {
        BracketHistory {
            rounds: self.rounds.iter().map(|round| round.bracket.clone()).collect(),
            champion: self.champion.clone(),
        }
    }
}

/// Check the bracket, configuration and roster before any play
pub fn validate_inputs(roster: &Roster, bracket: &Bracket, config: &SimulationConfig) -> Result<()> {
    config.validate()?;
    bracket.validate()?;

    for (index, pairing) in bracket.pairings.iter().enumerate() {
        let watched = config
            .watch_player
            .as_deref()
            .is_some_and(|watch| pairing.contains(watch));
        let named: Vec<&str> = pairing.names().into_iter().flatten().collect();
        let missing: Vec<&str> = named
            .iter()
            .copied()
            .filter(|name| !roster.contains(name))
            .collect();

        if config.missing_player == MissingPlayerPolicy::Reject && !watched {
            if let Some(player) = missing.first() {
                return Err(TournamentError::RosterMismatch {
                    player: player.to_string(),
                    pairing: index,
                });
            }
        }
        if config.unresolved == UnresolvedPolicy::Error
            && !watched
            && named.len() == 2
            && missing.len() == 2
        {
            return Err(TournamentError::UnresolvedMatch(pairing.label()));
        }
    }
    Ok(())
}

/// Run one full tournament from the first-round bracket
pub fn run_tournament<R: Rng + ?Sized>(
    roster: &Roster,
    bracket: &Bracket,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<TournamentResult> {
    validate_inputs(roster, bracket, config)?;
    drive_bracket(roster, bracket, config, rng)
}

/// Round loop over already validated inputs
pub(crate) fn drive_bracket<R: Rng + ?Sized>(
    roster: &Roster,
    bracket: &Bracket,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<TournamentResult> {
    let resolver = PairingResolver::new(roster, config);
    let verbose = config.effective_verbose();
    let mut points = PointsTable::for_roster(roster);
    let mut rounds = Vec::with_capacity(bracket.rounds_remaining());
    let mut current = bracket.clone();

    loop {
        let round = rounds.len() + 1;
        if verbose {
            info!("Round {}: {} pairings", round, current.len());
        }

        let outcomes = play_round(&resolver, &current, rng)?;
        for outcome in &outcomes {
            points.award(outcome.winner.as_deref(), outcome.winner_points);
            points.award(outcome.loser.as_deref(), outcome.loser_points);
        }

        if current.is_final() {
            let (champion, runner_up) = outcomes
                .first()
                .map(|outcome| (outcome.winner.clone(), outcome.loser.clone()))
                .unwrap_or_default();
            if verbose {
                info!("Champion: {}", champion.as_deref().unwrap_or("none"));
            }
            rounds.push(RoundRecord {
                round,
                bracket: current,
                outcomes,
            });
            return Ok(TournamentResult {
                champion,
                runner_up,
                points,
                rounds,
            });
        }

        let winners = outcomes.iter().map(|outcome| outcome.winner.clone()).collect();
        let next = Bracket::next_round(winners);
        debug!("Round {} complete, {} pairings advance", round, next.len());
        rounds.push(RoundRecord {
            round,
            bracket: std::mem::replace(&mut current, next),
            outcomes,
        });
    }
}

/// Resolve every pairing of a round in bracket order
pub fn play_round<R: Rng + ?Sized>(
    resolver: &PairingResolver<'_>,
    bracket: &Bracket,
    rng: &mut R,
) -> Result<Vec<PairingOutcome>> {
    bracket
        .pairings
        .iter()
        .enumerate()
        .map(|(index, pairing)| resolver.resolve(index, pairing, bracket.len(), &mut *rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Pairing;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn eight_players() -> (Roster, Bracket) {
        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let mut roster = Roster::new();
        for (seed, name) in names.iter().enumerate() {
            roster = roster.with_player(*name, seed as u32 + 1);
        }
        let bracket = Bracket::new(
            names
                .chunks(2)
                .map(|pair| Pairing::new(pair[0], pair[1]))
                .collect(),
        );
        (roster, bracket)
    }

    #[test]
    fn test_rounds_halve_until_final() {
        let (roster, bracket) = eight_players();
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = run_tournament(&roster, &bracket, &config, &mut rng).unwrap();

        assert_eq!(result.rounds_played(), 3);
        let sizes: Vec<usize> = result.rounds.iter().map(|r| r.bracket.len()).collect();
        assert_eq!(sizes, vec![4, 2, 1]);
        assert!(result.champion.is_some());
        assert_ne!(result.champion, result.runner_up);
    }

    #[test]
    fn test_fixed_points_conserved_per_round() {
        let (roster, bracket) = eight_players();
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let result = run_tournament(&roster, &bracket, &config, &mut rng).unwrap();

        for round in &result.rounds {
            assert_eq!(round.points_awarded(), round.bracket.len() as f64 * 100.0);
        }
        assert_eq!(result.points.total(), 700.0);
        let champion = result.champion.clone().unwrap();
        assert_eq!(result.points.get(&champion), Some(165.0));
    }

    #[test]
    fn test_history_ends_with_champion() {
        let (roster, bracket) = eight_players();
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let result = run_tournament(&roster, &bracket, &config, &mut rng).unwrap();
        let history = result.history();
        assert_eq!(history.rounds.len(), 3);
        assert_eq!(history.rounds[0], bracket);
        assert_eq!(history.champion, result.champion);
    }

    #[test]
    fn test_validate_rejects_bad_bracket() {
        let (roster, _) = eight_players();
        let bracket = Bracket::new(vec![Pairing::new("A", "B"); 3]);
        let config = SimulationConfig::default();
        assert!(matches!(
            validate_inputs(&roster, &bracket, &config),
            Err(TournamentError::InvalidBracket(_))
        ));
    }

    #[test]
    fn test_validate_unresolved_first_round() {
        let (roster, _) = eight_players();
        let bracket = Bracket::new(vec![Pairing::new("A", "B"), Pairing::new("X", "Y")]);
        let config = SimulationConfig::default();
        assert!(matches!(
            validate_inputs(&roster, &bracket, &config),
            Err(TournamentError::UnresolvedMatch(_))
        ));

        let lenient = config.with_unresolved(UnresolvedPolicy::CoinFlip);
        assert!(validate_inputs(&roster, &bracket, &lenient).is_ok());
    }

    #[test]
    fn test_validate_reject_missing_player() {
        let (roster, _) = eight_players();
        let bracket = Bracket::new(vec![Pairing::new("A", "B"), Pairing::new("C", "Z")]);
        let config = SimulationConfig::default().with_missing_player(MissingPlayerPolicy::Reject);
        match validate_inputs(&roster, &bracket, &config) {
            Err(TournamentError::RosterMismatch { player, pairing }) => {
                assert_eq!(player, "Z");
                assert_eq!(pairing, 1);
            }
            other => panic!("expected roster mismatch, got {:?}", other),
        }
    }
}
