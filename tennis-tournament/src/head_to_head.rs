//! Head-to-head simulation with surface and form adjustments
//!
//! Level 2 - Phase: plays one pairing many times with the detailed serve
//! model and reports win rates, average points share and average sets.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tennis_core::{DetailedPlayer, MatchFormat, PointModel, ServeProfile, Side, TennisMatch};

use crate::error::{Result, TournamentError};
use crate::roster::Roster;

const BASE_FIRST_SERVE_IN: f64 = 0.65;
const BASE_SECOND_SERVE_IN: f64 = 0.90;
const BASE_FIRST_SERVE_WON: f64 = 0.70;
const BASE_SECOND_SERVE_WON: f64 = 0.55;

/// Court surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    Grass,
    Clay,
    Hard,
}

impl Surface {
    /// Additive (first serve in, first serve won, second serve won)
    fn adjustments(self) -> (f64, f64, f64) {
        match self {
            Surface::Grass => (0.02, 0.05, 0.02),
            Surface::Clay => (-0.01, -0.02, 0.01),
            Surface::Hard => (0.0, 0.0, 0.0),
        }
    }
}

impl FromStr for Surface {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "grass" => Ok(Surface::Grass),
            "clay" => Ok(Surface::Clay),
            "hard" => Ok(Surface::Hard),
            other => Err(TournamentError::InvalidConfig(format!(
                "unknown surface '{}'",
                other
            ))),
        }
    }
}

/// Recent form: positive and negative factors
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormFactors {
    pub positive: f64,
    pub negative: f64,
}

impl FormFactors {
    pub fn new(positive: f64, negative: f64) -> Self {
        Self { positive, negative }
    }
}

/// Serve profile for a surface and form
pub fn serve_profile_for(surface: Surface, form: FormFactors) -> ServeProfile {
    let (first_in, first_won, second_won) = surface.adjustments();
    let FormFactors { positive: p, negative: n } = form;
    ServeProfile {
        first_serve_in: (BASE_FIRST_SERVE_IN + first_in + 2.0 * p - 2.0 * n).clamp(0.4, 0.8),
        second_serve_in: BASE_SECOND_SERVE_IN,
        first_serve_won: (BASE_FIRST_SERVE_WON + first_won + 5.0 * p - 3.0 * n).clamp(0.5, 0.85),
        second_serve_won: (BASE_SECOND_SERVE_WON + second_won + 3.0 * p - 2.0 * n)
            .clamp(0.35, 0.70),
    }
}

/// Aggregate of many simulated matches between two players
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeadToHeadSummary {
    pub players: [String; 2],
    pub simulations: usize,
    pub wins: [u32; 2],
    /// Win rate in percent, one decimal
    pub win_percentage: [f64; 2],
    /// Mean share of points won, one decimal
    pub average_points_won: [f64; 2],
    /// Mean sets won, two decimals
    pub average_sets_won: [f64; 2],
}

impl HeadToHeadSummary {
    pub fn leader(&self) -> Side {
        if self.wins[0] >= self.wins[1] {
            Side::One
        } else {
            Side::Two
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Simulate `simulations` matches with a random first server each time
pub fn head_to_head<R: Rng + ?Sized>(
    one: &DetailedPlayer,
    two: &DetailedPlayer,
    format: MatchFormat,
    simulations: usize,
    rng: &mut R,
) -> Result<HeadToHeadSummary> {
    if simulations == 0 {
        return Err(TournamentError::InvalidConfig(
            "simulations must be at least 1".to_string(),
        ));
    }
    PointModel::detailed(one.serve, two.serve).validate()?;

    let mut wins = [0u32; 2];
    let mut points = [0.0f64; 2];
    let mut sets = [0u32; 2];

    for _ in 0..simulations {
        let first_server = if rng.gen_bool(0.5) { Side::One } else { Side::Two };
        let mut tennis_match = TennisMatch::detailed(one, two, format, first_server);
        let winner = tennis_match.simulate(rng);
        wins[winner.index()] += 1;
        for side in Side::BOTH {
            points[side.index()] += tennis_match.points_won_percentage(side);
            sets[side.index()] += tennis_match.stats(side).sets_won;
        }
    }

    let n = simulations as f64;
    Ok(HeadToHeadSummary {
        players: [one.name.clone(), two.name.clone()],
        simulations,
        wins,
        win_percentage: wins.map(|w| round_to(w as f64 / n * 100.0, 1)),
        average_points_won: points.map(|p| round_to(p / n, 1)),
        average_sets_won: sets.map(|s| round_to(s as f64 / n, 2)),
    })
}

/// Head-to-head between two roster players using their form factors
pub fn roster_head_to_head<R: Rng + ?Sized>(
    roster: &Roster,
    names: [&str; 2],
    surface: Surface,
    format: MatchFormat,
    simulations: usize,
    rng: &mut R,
) -> Result<HeadToHeadSummary> {
    let mut players = Vec::with_capacity(2);
    for (index, name) in names.iter().enumerate() {
        let entry = roster
            .get(name)
            .ok_or_else(|| TournamentError::RosterMismatch {
                player: name.to_string(),
                pairing: index,
            })?;
        let form = FormFactors::new(entry.p_factor, entry.n_factor);
        players.push(DetailedPlayer::new(*name, serve_profile_for(surface, form)));
    }
    head_to_head(&players[0], &players[1], format, simulations, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::PlayerEntry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_surface_adjustments() {
        let hard = serve_profile_for(Surface::Hard, FormFactors::default());
        assert!(approx(hard.first_serve_in, 0.65));
        assert!(approx(hard.first_serve_won, 0.70));
        assert!(approx(hard.second_serve_won, 0.55));

        let grass = serve_profile_for(Surface::Grass, FormFactors::default());
        assert!(approx(grass.first_serve_in, 0.67));
        assert!(approx(grass.first_serve_won, 0.75));
        assert!(approx(grass.second_serve_won, 0.57));

        let clay = serve_profile_for(Surface::Clay, FormFactors::default());
        assert!(approx(clay.first_serve_in, 0.64));
        assert!(approx(clay.first_serve_won, 0.68));
        assert!(approx(clay.second_serve_won, 0.56));
    }

    #[test]
    fn test_form_factors_clamped() {
        let hot = serve_profile_for(Surface::Grass, FormFactors::new(1.0, 0.0));
        assert_eq!(hot.first_serve_in, 0.8);
        assert_eq!(hot.first_serve_won, 0.85);
        assert_eq!(hot.second_serve_won, 0.70);

        let cold = serve_profile_for(Surface::Clay, FormFactors::new(0.0, 1.0));
        assert_eq!(cold.first_serve_in, 0.4);
        assert_eq!(cold.first_serve_won, 0.5);
        assert_eq!(cold.second_serve_won, 0.35);
    }

    #[test]
    fn test_surface_from_str() {
        assert_eq!("Grass".parse::<Surface>().unwrap(), Surface::Grass);
        assert!("carpet".parse::<Surface>().is_err());
    }

    #[test]
    fn test_head_to_head_summary() {
        let strong = DetailedPlayer::new("A", serve_profile_for(Surface::Hard, FormFactors::new(0.05, 0.0)));
        let weak = DetailedPlayer::new("B", serve_profile_for(Surface::Hard, FormFactors::new(0.0, 0.05)));
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let summary =
            head_to_head(&strong, &weak, MatchFormat::best_of_three(), 200, &mut rng).unwrap();

        assert_eq!(summary.wins[0] + summary.wins[1], 200);
        assert!((summary.win_percentage[0] + summary.win_percentage[1] - 100.0).abs() < 0.2);
        assert!((summary.average_points_won[0] + summary.average_points_won[1] - 100.0).abs() < 0.2);
        assert_eq!(summary.leader(), Side::One);
        assert!(summary.average_sets_won[0] > summary.average_sets_won[1]);
    }

    #[test]
    fn test_head_to_head_rejects_zero_simulations() {
        let a = DetailedPlayer::new("A", ServeProfile::default());
        let b = DetailedPlayer::new("B", ServeProfile::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(head_to_head(&a, &b, MatchFormat::best_of_three(), 0, &mut rng).is_err());
    }

    #[test]
    fn test_roster_head_to_head_missing_player() {
        let mut roster = Roster::new();
        roster.insert("A", PlayerEntry::new(1));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = roster_head_to_head(
            &roster,
            ["A", "Z"],
            Surface::Clay,
            MatchFormat::best_of_three(),
            10,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, TournamentError::RosterMismatch { pairing: 1, .. }));
    }

    #[test]
    fn test_head_to_head_rejects_certain_servers() {
        let certain = ServeProfile::new(1.0, 1.0, 1.0, 1.0);
        let a = DetailedPlayer::new("A", certain);
        let b = DetailedPlayer::new("B", certain);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = head_to_head(&a, &b, MatchFormat::best_of_three(), 10, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            TournamentError::Engine(tennis_core::EngineError::UndecidableTiebreak(_))
        ));
    }

    #[test]
    fn test_default_surface_is_grass() {
        assert_eq!(Surface::default(), Surface::Grass);
    }
}
