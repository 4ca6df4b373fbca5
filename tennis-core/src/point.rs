//! Point resolution - who wins a single rally
//!
//! Level 3 - Step-level implementation
//!
//! The probability handed to the resolver is always "probability that the
//! current server wins the point". Values are not revalidated while
//! resolving; callers check a model once with [`PointModel::validate`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{check_probability, EngineError, Result};

// ============================================================================
// SIDES
// ============================================================================

/// One of the two players in a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    One = 0,
    Two = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    pub fn opponent(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Array index for per-side storage
    pub fn index(self) -> usize {
        self as usize
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// What happened on serve during a point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServeEvent {
    /// Single-probability model, serve not broken down
    Untracked,
    FirstServeIn,
    SecondServeIn,
    DoubleFault,
}

/// Result of one resolved point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointOutcome {
    pub winner: Side,
    pub serve: ServeEvent,
}

impl PointOutcome {
    pub fn untracked(winner: Side) -> Self {
        Self {
            winner,
            serve: ServeEvent::Untracked,
        }
    }
}

// ============================================================================
// SERVE MODELS
// ============================================================================

/// First/second serve tendencies of one player
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServeProfile {
    /// Probability the first serve lands in
    pub first_serve_in: f64,
    /// Probability the second serve lands in
    pub second_serve_in: f64,
    /// Probability of winning the point once the first serve is in
    pub first_serve_won: f64,
    /// Probability of winning the point once the second serve is in
    pub second_serve_won: f64,
}

impl Default for ServeProfile {
    fn default() -> Self {
        Self {
            first_serve_in: 0.5,
            second_serve_in: 0.9,
            first_serve_won: 0.5,
            second_serve_won: 0.5,
        }
    }
}

impl ServeProfile {
    pub fn new(
        first_serve_in: f64,
        second_serve_in: f64,
        first_serve_won: f64,
        second_serve_won: f64,
    ) -> Self {
        Self {
            first_serve_in,
            second_serve_in,
            first_serve_won,
            second_serve_won,
        }
    }

    /// Ensure every probability lies in [0, 1]
    pub fn validate(&self) -> Result<()> {
        check_probability("first_serve_in", self.first_serve_in)?;
        check_probability("second_serve_in", self.second_serve_in)?;
        check_probability("first_serve_won", self.first_serve_won)?;
        check_probability("second_serve_won", self.second_serve_won)
    }

    /// Overall chance of winning a point on this serve
    pub fn points_won_on_serve(&self) -> f64 {
        let first = self.first_serve_in * self.first_serve_won;
        let second = (1.0 - self.first_serve_in) * self.second_serve_in * self.second_serve_won;
        first + second
    }
}

/// Tolerance for treating a serve probability as certain
const CERTAINTY_EPSILON: f64 = 1e-12;

/// Point resolution strategy for a match
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointModel {
    /// One draw against the server's point-won-on-serve probability
    Simple { serve_win: [f64; 2] },
    /// First serve, second serve and double fault modelled separately
    Detailed { profiles: [ServeProfile; 2] },
}

impl PointModel {
    pub fn simple(player_one: f64, player_two: f64) -> Self {
        PointModel::Simple {
            serve_win: [player_one, player_two],
        }
    }

    pub fn detailed(player_one: ServeProfile, player_two: ServeProfile) -> Self {
        PointModel::Detailed {
            profiles: [player_one, player_two],
        }
    }

    /// Serve-win probability of each side
    pub fn serve_win_probabilities(&self) -> [f64; 2] {
        match self {
            PointModel::Simple { serve_win } => *serve_win,
            PointModel::Detailed { profiles } => [
                profiles[0].points_won_on_serve(),
                profiles[1].points_won_on_serve(),
            ],
        }
    }

    /// Probabilities in [0, 1], and not both servers certain to win (or
    /// certain to lose) every point, which would never close a tiebreak
    pub fn validate(&self) -> Result<()> {
        match self {
            PointModel::Simple { serve_win } => {
                check_probability("serve_win", serve_win[0])?;
                check_probability("serve_win", serve_win[1])?;
            }
            PointModel::Detailed { profiles } => {
                profiles[0].validate()?;
                profiles[1].validate()?;
            }
        }

        let [one, two] = self.serve_win_probabilities();
        if one >= 1.0 - CERTAINTY_EPSILON && two >= 1.0 - CERTAINTY_EPSILON {
            return Err(EngineError::UndecidableTiebreak("win"));
        }
        if one <= CERTAINTY_EPSILON && two <= CERTAINTY_EPSILON {
            return Err(EngineError::UndecidableTiebreak("lose"));
        }
        Ok(())
    }

    /// Resolve one point with `server` serving
    pub fn resolve<R: Rng + ?Sized>(&self, server: Side, rng: &mut R) -> PointOutcome {
        match self {
            PointModel::Simple { serve_win } => {
                let roll: f64 = rng.gen();
                if roll <= serve_win[server.index()] {
                    PointOutcome::untracked(server)
                } else {
                    PointOutcome::untracked(server.opponent())
                }
            }
            PointModel::Detailed { profiles } => {
                resolve_detailed(&profiles[server.index()], server, rng)
            }
        }
    }
}

/// Two-stage serve: first serve, then second serve, else double fault
fn resolve_detailed<R: Rng + ?Sized>(
    profile: &ServeProfile,
    server: Side,
    rng: &mut R,
) -> PointOutcome {
    let winner_if = |won: bool| if won { server } else { server.opponent() };

    if rng.gen::<f64>() <= profile.first_serve_in {
        let won = rng.gen::<f64>() <= profile.first_serve_won;
        return PointOutcome {
            winner: winner_if(won),
            serve: ServeEvent::FirstServeIn,
        };
    }

    if rng.gen::<f64>() <= profile.second_serve_in {
        let won = rng.gen::<f64>() <= profile.second_serve_won;
        return PointOutcome {
            winner: winner_if(won),
            serve: ServeEvent::SecondServeIn,
        };
    }

    PointOutcome {
        winner: server.opponent(),
        serve: ServeEvent::DoubleFault,
    }
}

// ============================================================================
// POINT SOURCES
// ============================================================================

/// Anything that can decide points for the engine
///
/// The engine only asks "who won this point, given who serves"; tests drive
/// it with scripted closures, simulations with [`RandomPoints`].
pub trait PointSource {
    fn play_point(&mut self, server: Side) -> PointOutcome;
}

impl<F> PointSource for F
where
    F: FnMut(Side) -> PointOutcome,
{
    fn play_point(&mut self, server: Side) -> PointOutcome {
        self(server)
    }
}

/// Point source drawing from a model and a random generator
pub struct RandomPoints<'a, R: Rng + ?Sized> {
    model: PointModel,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomPoints<'a, R> {
    pub fn new(model: PointModel, rng: &'a mut R) -> Self {
        Self { model, rng }
    }
}

impl<R: Rng + ?Sized> PointSource for RandomPoints<'_, R> {
    fn play_point(&mut self, server: Side) -> PointOutcome {
        self.model.resolve(server, &mut *self.rng)
    }
}
