//! Player descriptions consumed by the engine
//!
//! Both kinds are built fresh for each match and thrown away afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{check_probability, Result};
use crate::point::{PointModel, ServeProfile};

/// Player described by a single serve probability
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimplePlayer {
    pub name: String,
    /// Probability of winning a point on own serve
    pub points_won_on_serve: f64,
}

impl SimplePlayer {
    pub fn new(name: impl Into<String>, points_won_on_serve: f64) -> Self {
        Self {
            name: name.into(),
            points_won_on_serve,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("points_won_on_serve", self.points_won_on_serve)
    }
}

/// Player described by first and second serve tendencies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailedPlayer {
    pub name: String,
    pub serve: ServeProfile,
}

impl DetailedPlayer {
    pub fn new(name: impl Into<String>, serve: ServeProfile) -> Self {
        Self {
            name: name.into(),
            serve,
        }
    }
}

/// Build the point model for two simple players
pub fn simple_model(one: &SimplePlayer, two: &SimplePlayer) -> PointModel {
    PointModel::simple(one.points_won_on_serve, two.points_won_on_serve)
}

/// Build the point model for two detailed players
pub fn detailed_model(one: &DetailedPlayer, two: &DetailedPlayer) -> PointModel {
    PointModel::detailed(one.serve, two.serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_model() {
        let a = SimplePlayer::new("A", 0.7);
        let b = SimplePlayer::new("B", 0.6);
        assert_eq!(simple_model(&a, &b), PointModel::simple(0.7, 0.6));
        assert!(a.validate().is_ok());
        assert!(SimplePlayer::new("C", -0.1).validate().is_err());
    }

    #[test]
    fn test_detailed_model() {
        let a = DetailedPlayer::new("A", ServeProfile::default());
        let b = DetailedPlayer::new("B", ServeProfile::new(0.6, 0.9, 0.7, 0.5));
        match detailed_model(&a, &b) {
            PointModel::Detailed { profiles } => assert_eq!(profiles[1].first_serve_in, 0.6),
            other => panic!("unexpected model {:?}", other),
        }
    }
}
