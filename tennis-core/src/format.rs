//! Match format - sets to win and tiebreak targets
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Points needed to win a regular game (with a two point margin)
pub const POINTS_TO_WIN_GAME: u32 = 4;

/// Games needed to win a set (with a two game margin)
pub const GAMES_TO_WIN_SET: u32 = 6;

/// Margin required to close a game, tiebreak or set
pub const WIN_MARGIN: u32 = 2;

/// Regular tiebreak target
pub const TIEBREAK_POINTS: u32 = 7;

/// Tiebreak target in the deciding set
pub const DECIDING_TIEBREAK_POINTS: u32 = 10;

/// Scoring rules for one match
///
/// A tiebreak is always played at 6-6, including in the deciding set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFormat {
    /// Sets needed to win the match (2 = best of three, 3 = best of five)
    pub sets_to_win: u32,
    /// Tiebreak target outside the deciding set
    pub tiebreak_points: u32,
    /// Tiebreak target in the deciding set
    pub deciding_tiebreak_points: u32,
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::best_of_five()
    }
}

impl MatchFormat {
    /// Create a format with standard tiebreak targets
    pub fn new(sets_to_win: u32) -> Result<Self> {
        if sets_to_win == 0 {
            return Err(EngineError::InvalidSetsToWin(sets_to_win));
        }
        Ok(Self {
            sets_to_win,
            tiebreak_points: TIEBREAK_POINTS,
            deciding_tiebreak_points: DECIDING_TIEBREAK_POINTS,
        })
    }

    pub fn best_of_three() -> Self {
        Self {
            sets_to_win: 2,
            tiebreak_points: TIEBREAK_POINTS,
            deciding_tiebreak_points: DECIDING_TIEBREAK_POINTS,
        }
    }

    pub fn best_of_five() -> Self {
        Self {
            sets_to_win: 3,
            tiebreak_points: TIEBREAK_POINTS,
            deciding_tiebreak_points: DECIDING_TIEBREAK_POINTS,
        }
    }

    /// Override tiebreak targets
    pub fn with_tiebreak_points(mut self, regular: u32, deciding: u32) -> Result<Self> {
        for target in [regular, deciding] {
            if target == 0 {
                return Err(EngineError::InvalidTiebreakTarget(target));
            }
        }
        self.tiebreak_points = regular;
        self.deciding_tiebreak_points = deciding;
        Ok(self)
    }

    /// Longest possible match in sets
    pub fn max_sets(&self) -> u32 {
        self.sets_to_win * 2 - 1
    }

    /// Tiebreak target for the given set (1-based)
    pub fn tiebreak_target(&self, set_number: usize) -> u32 {
        if set_number < self.max_sets() as usize {
            self.tiebreak_points
        } else {
            self.deciding_tiebreak_points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults() {
        let format = MatchFormat::default();
        assert_eq!(format.sets_to_win, 3);
        assert_eq!(format.max_sets(), 5);
    }

    #[test]
    fn test_format_rejects_zero_sets() {
        assert_eq!(MatchFormat::new(0), Err(EngineError::InvalidSetsToWin(0)));
        assert_eq!(MatchFormat::new(2).unwrap(), MatchFormat::best_of_three());
    }

    #[test]
    fn test_tiebreak_target_best_of_five() {
        let format = MatchFormat::best_of_five();
        for set in 1..=4 {
            assert_eq!(format.tiebreak_target(set), 7);
        }
        assert_eq!(format.tiebreak_target(5), 10);
    }

    #[test]
    fn test_tiebreak_target_best_of_three() {
        let format = MatchFormat::best_of_three();
        assert_eq!(format.tiebreak_target(1), 7);
        assert_eq!(format.tiebreak_target(2), 7);
        assert_eq!(format.tiebreak_target(3), 10);
    }

    #[test]
    fn test_custom_tiebreak_points() {
        let format = MatchFormat::best_of_three().with_tiebreak_points(7, 7).unwrap();
        assert_eq!(format.tiebreak_target(3), 7);
        assert!(MatchFormat::best_of_three().with_tiebreak_points(0, 10).is_err());
    }
}
