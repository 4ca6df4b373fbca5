//! TennisMatch - point, game, tiebreak, set and match state machine
//!
//! Level 1 - Orchestration and Level 2/3 - Phases and steps
//!
//! One `TennisMatch` owns the whole state of one simulated match. Points are
//! supplied by a [`PointSource`], which keeps the state machine independent
//! of where randomness comes from.

use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::format::{MatchFormat, GAMES_TO_WIN_SET, POINTS_TO_WIN_GAME, WIN_MARGIN};
use crate::player::{detailed_model, simple_model, DetailedPlayer, SimplePlayer};
use crate::point::{PointModel, PointSource, RandomPoints, Side};
use crate::score::{format_scoreline, game_score, tiebreak_score};
use crate::stats::{round2, PlayerStats, SetScore};

/// Final point score of a game or tiebreak
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Side,
    pub points: [u32; 2],
}

/// Serializable snapshot of a finished (or abandoned) match
#[derive(Clone, Debug, Serialize)]
pub struct MatchSummary {
    pub players: [String; 2],
    pub winner: Option<String>,
    pub scoreline: String,
    pub sets: Vec<SetScore>,
    pub points_won_percentage: [f64; 2],
    pub tiebreaks_played: u32,
    pub stats: [PlayerStats; 2],
}

/// State of a single simulated match
#[derive(Clone, Debug)]
pub struct TennisMatch {
    names: [String; 2],
    model: PointModel,
    format: MatchFormat,
    /// Who serves the next point
    server: Side,
    /// One entry per started set; games and tiebreak points live together
    sets: Vec<SetScore>,
    stats: [PlayerStats; 2],
    tiebreaks_played: u32,
}

impl TennisMatch {
    /// Build a match without checking the model; see [`TennisMatch::checked`]
    pub fn new(names: [String; 2], model: PointModel, format: MatchFormat, first_server: Side) -> Self {
        Self {
            names,
            model,
            format,
            server: first_server,
            sets: Vec::new(),
            stats: [PlayerStats::default(), PlayerStats::default()],
            tiebreaks_played: 0,
        }
    }

    /// Build a match after [`PointModel::validate`], so it always finishes
    pub fn checked(
        names: [String; 2],
        model: PointModel,
        format: MatchFormat,
        first_server: Side,
    ) -> Result<Self> {
        model.validate()?;
        Ok(Self::new(names, model, format, first_server))
    }

    /// Match between two single-probability players
    pub fn simple(
        one: &SimplePlayer,
        two: &SimplePlayer,
        format: MatchFormat,
        first_server: Side,
    ) -> Self {
        Self::new(
            [one.name.clone(), two.name.clone()],
            simple_model(one, two),
            format,
            first_server,
        )
    }

    /// Match between two first/second serve players
    pub fn detailed(
        one: &DetailedPlayer,
        two: &DetailedPlayer,
        format: MatchFormat,
        first_server: Side,
    ) -> Self {
        Self::new(
            [one.name.clone(), two.name.clone()],
            detailed_model(one, two),
            format,
            first_server,
        )
    }

    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Simulate the match to completion with the configured point model
    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Side {
        let mut points = RandomPoints::new(self.model, rng);
        self.play(&mut points)
    }

    /// Play sets until one side reaches `sets_to_win`
    pub fn play<P: PointSource + ?Sized>(&mut self, points: &mut P) -> Side {
        loop {
            if let Some(winner) = self.winner() {
                tracing::debug!(
                    "Match: {} d. {} {}",
                    self.name(winner),
                    self.name(winner.opponent()),
                    self.scoreline()
                );
                return winner;
            }

            let set_winner = self.play_set(points);
            self.stats[set_winner.index()].sets_won += 1;
            tracing::trace!("Set {} to {}: {}", self.sets.len(), self.name(set_winner), self.scoreline());
        }
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Play one set, alternating the server every game
    ///
    /// At 6-6 the set is decided by a tiebreak; afterwards the player who
    /// received first in the tiebreak serves first in the next set.
    pub fn play_set<P: PointSource + ?Sized>(&mut self, points: &mut P) -> Side {
        self.sets.push(SetScore::default());

        loop {
            let set = *self.current_set_mut();
            if let Some(winner) = set.decided_winner() {
                return winner;
            }

            if set.games == [GAMES_TO_WIN_SET, GAMES_TO_WIN_SET] {
                return self.play_tiebreak(points).winner;
            }

            self.play_game(points);
            self.server = self.server.opponent();
        }
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Play one regular game with the current server
    ///
    /// Does not switch the server; the set loop does that.
    pub fn play_game<P: PointSource + ?Sized>(&mut self, points: &mut P) -> GameOutcome {
        let server = self.server;
        let receiver = server.opponent();
        let mut score = [0u32; 2];

        loop {
            let won_by = self.play_point(points);
            score[won_by.index()] += 1;

            if is_closed(score, POINTS_TO_WIN_GAME) {
                break;
            }

            let (returner, serving) = (score[receiver.index()], score[server.index()]);
            if returner >= POINTS_TO_WIN_GAME - 1 && returner > serving {
                self.stats[receiver.index()].break_point_chances += 1;
                tracing::trace!("Break point: {}", game_score(score[0], score[1]));
            }
        }

        let winner = leader(score);
        self.current_set_mut().games[winner.index()] += 1;

        if winner == server {
            self.stats[server.index()].service_games_won += 1;
        } else {
            self.stats[winner.index()].break_points_converted += 1;
        }
        self.stats[server.index()].service_games_played += 1;

        GameOutcome {
            winner,
            points: score,
        }
    }

    /// Play a tiebreak at 6-6
    ///
    /// Serve changes after the first point and then every two points. The
    /// target is 7, or 10 when this is the last possible set.
    pub fn play_tiebreak<P: PointSource + ?Sized>(&mut self, points: &mut P) -> GameOutcome {
        let next_set_server = self.server.opponent();
        let target = self.format.tiebreak_target(self.sets.len().max(1));
        let mut score = [0u32; 2];

        loop {
            let won_by = self.play_point(points);
            score[won_by.index()] += 1;
            self.current_set_mut().tiebreak_points[won_by.index()] += 1;

            if is_closed(score, target) {
                break;
            }

            if (score[0] + score[1]) % 2 == 1 {
                self.server = self.server.opponent();
            }
        }

        self.server = next_set_server;

        let winner = leader(score);
        tracing::trace!(
            "Tiebreak to {}: {}",
            self.name(winner),
            tiebreak_score(score[0], score[1])
        );
        self.current_set_mut().games[winner.index()] += 1;
        self.stats[winner.index()].tiebreaks_won += 1;
        self.tiebreaks_played += 1;

        GameOutcome {
            winner,
            points: score,
        }
    }

    /// Resolve one point and update point counters
    fn play_point<P: PointSource + ?Sized>(&mut self, points: &mut P) -> Side {
        let server = self.server;
        let outcome = points.play_point(server);
        let winner = outcome.winner;

        self.stats[server.index()].record_serve(outcome.serve, winner == server);

        let stats = &mut self.stats[winner.index()];
        stats.total_points_won += 1;
        if winner == server {
            stats.service_points_won += 1;
        } else {
            stats.return_points_won += 1;
        }

        winner
    }

    /// Set currently being played, opening one if none exists yet
    fn current_set_mut(&mut self) -> &mut SetScore {
        if self.sets.is_empty() {
            self.sets.push(SetScore::default());
        }
        let last = self.sets.len() - 1;
        &mut self.sets[last]
    }

    // ========================================================================
    // Level 4 - Queries
    // ========================================================================

    /// Side that reached `sets_to_win`, if any
    pub fn winner(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.stats[side.index()].sets_won >= self.format.sets_to_win)
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|side| self.name(side))
    }

    pub fn is_complete(&self) -> bool {
        self.winner().is_some()
    }

    pub fn name(&self, side: Side) -> &str {
        &self.names[side.index()]
    }

    pub fn names(&self) -> &[String; 2] {
        &self.names
    }

    pub fn format(&self) -> &MatchFormat {
        &self.format
    }

    pub fn server(&self) -> Side {
        self.server
    }

    pub fn sets(&self) -> &[SetScore] {
        &self.sets
    }

    pub fn stats(&self, side: Side) -> &PlayerStats {
        &self.stats[side.index()]
    }

    pub fn tiebreaks_played(&self) -> u32 {
        self.tiebreaks_played
    }

    /// Games won by a side across all sets
    pub fn total_games(&self, side: Side) -> u32 {
        self.sets.iter().map(|set| set.games[side.index()]).sum()
    }

    /// Share of all points won by `side`, in percent with two decimals
    ///
    /// Returns 50.0 for both sides when no point has been played. Side two
    /// is derived from side one so the pair always sums to 100.
    pub fn points_won_percentage(&self, side: Side) -> f64 {
        let one = self.stats[0].total_points_won;
        let total = one + self.stats[1].total_points_won;
        if total == 0 {
            return 50.0;
        }

        let one_share = round2(one as f64 / total as f64 * 100.0);
        match side {
            Side::One => one_share,
            Side::Two => round2(100.0 - one_share),
        }
    }

    pub fn scoreline(&self) -> String {
        format_scoreline(&self.sets)
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            players: self.names.clone(),
            winner: self.winner_name().map(str::to_string),
            scoreline: self.scoreline(),
            sets: self.sets.clone(),
            points_won_percentage: [
                self.points_won_percentage(Side::One),
                self.points_won_percentage(Side::Two),
            ],
            tiebreaks_played: self.tiebreaks_played,
            stats: self.stats.clone(),
        }
    }

    /// Human readable statistics block
    pub fn statistics_report(&self) -> String {
        let mut lines = Vec::new();

        match self.winner() {
            Some(winner) => {
                lines.push(format!("Match winner: {}!", self.name(winner)));
                lines.push(format!("Score: {}", self.scoreline()));
                lines.push(format!(
                    "Point winning percentage: {}%",
                    self.points_won_percentage(winner)
                ));
            }
            None => lines.push(format!("Match in progress: {}", self.scoreline())),
        }
        lines.push(String::new());

        for side in Side::BOTH {
            let name = self.name(side);
            let stats = self.stats(side);
            lines.push(format!("{} total points won: {}", name, stats.total_points_won));
            lines.push(format!("{} total games won: {}", name, self.total_games(side)));
            lines.push(format!(
                "{} service games won: {} / {}",
                name, stats.service_games_won, stats.service_games_played
            ));
            lines.push(format!(
                "{} break points converted: {} / {}",
                name, stats.break_points_converted, stats.break_point_chances
            ));
            if self.tiebreaks_played > 0 {
                lines.push(format!("{} tiebreaks won: {}", name, stats.tiebreaks_won));
            }
            if stats.has_serve_breakdown() {
                lines.push(format!(
                    "{} first serve percentage: {}%",
                    name,
                    stats.first_serve_percentage()
                ));
                lines.push(format!(
                    "{} first serve points won: {}%",
                    name,
                    stats.first_serve_points_won_percentage()
                ));
                lines.push(format!(
                    "{} second serve points won: {}%",
                    name,
                    stats.second_serve_points_won_percentage()
                ));
                lines.push(format!("{} double faults: {}", name, stats.double_faults));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// Reached `target` points with the required margin
fn is_closed(score: [u32; 2], target: u32) -> bool {
    score[0].max(score[1]) >= target && score[0].abs_diff(score[1]) >= WIN_MARGIN
}

fn leader(score: [u32; 2]) -> Side {
    if score[0] > score[1] {
        Side::One
    } else {
        Side::Two
    }
}
