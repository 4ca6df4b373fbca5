//! Match statistics and per-set scores

use serde::{Deserialize, Serialize};

use crate::format::{GAMES_TO_WIN_SET, WIN_MARGIN};
use crate::point::{ServeEvent, Side};

/// Round to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `part` over `whole`, 0.0 when nothing was recorded
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Games (and tiebreak points) of one set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub games: [u32; 2],
    /// Stays 0-0 unless the set reached a tiebreak
    pub tiebreak_points: [u32; 2],
}

impl SetScore {
    pub fn went_to_tiebreak(&self) -> bool {
        self.games[0] >= GAMES_TO_WIN_SET && self.games[1] >= GAMES_TO_WIN_SET
    }

    /// Winner once the set is closed by a two game margin
    pub fn decided_winner(&self) -> Option<Side> {
        let [one, two] = self.games;
        if one.max(two) >= GAMES_TO_WIN_SET && one.abs_diff(two) >= WIN_MARGIN {
            Some(if one > two { Side::One } else { Side::Two })
        } else {
            None
        }
    }
}

/// Running totals for one player over a match
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub sets_won: u32,
    pub total_points_won: u32,
    pub service_points_won: u32,
    pub return_points_won: u32,
    pub service_games_won: u32,
    pub service_games_played: u32,
    pub tiebreaks_won: u32,
    pub break_point_chances: u32,
    pub break_points_converted: u32,
    pub first_serves_played: u32,
    pub first_serves_in: u32,
    pub first_serves_won: u32,
    pub second_serves_played: u32,
    pub second_serves_in: u32,
    pub second_serves_won: u32,
    pub double_faults: u32,
}

impl PlayerStats {
    /// Record the serve breakdown of a point this player served
    pub fn record_serve(&mut self, event: ServeEvent, server_won: bool) {
        match event {
            ServeEvent::Untracked => {}
            ServeEvent::FirstServeIn => {
                self.first_serves_played += 1;
                self.first_serves_in += 1;
                if server_won {
                    self.first_serves_won += 1;
                }
            }
            ServeEvent::SecondServeIn => {
                self.first_serves_played += 1;
                self.second_serves_played += 1;
                self.second_serves_in += 1;
                if server_won {
                    self.second_serves_won += 1;
                }
            }
            ServeEvent::DoubleFault => {
                self.first_serves_played += 1;
                self.second_serves_played += 1;
                self.double_faults += 1;
            }
        }
    }

    pub fn first_serve_percentage(&self) -> f64 {
        percentage(self.first_serves_in, self.first_serves_played)
    }

    pub fn first_serve_points_won_percentage(&self) -> f64 {
        percentage(self.first_serves_won, self.first_serves_in)
    }

    pub fn second_serve_points_won_percentage(&self) -> f64 {
        percentage(self.second_serves_won, self.second_serves_in)
    }

    pub fn break_point_conversion(&self) -> f64 {
        percentage(self.break_points_converted, self.break_point_chances)
    }

    /// True when the serve breakdown was tracked (detailed model)
    pub fn has_serve_breakdown(&self) -> bool {
        self.first_serves_played > 0
    }
}
