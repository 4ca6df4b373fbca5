//! Seed-difference serve probability model
//!
//! Level 3 - Steps: turns two seeds into serve-win probabilities for one
//! simulated match. The stronger seed gets a linear edge over the baseline,
//! growing from nothing at equal seeds to `max_margin` at `max_seed_gap`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tennis_core::Side;

use crate::error::{Result, TournamentError};

/// How the seed edge is split between the two sides
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginSplit {
    /// Weaker seed keeps the baseline, stronger gets baseline + edge
    #[default]
    Favorite,
    /// Baseline -/+ edge / 2
    Symmetric,
}

/// Parameters of the probability model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityConfig {
    /// Serve-win probability of the weaker seed
    pub baseline: f64,
    /// Edge at (or beyond) the maximum seed gap
    pub max_margin: f64,
    /// Seed difference at which the edge saturates
    pub max_seed_gap: u32,
    /// Half-width of the uniform jitter added to each side per match
    pub jitter: f64,
    pub min_probability: f64,
    pub max_probability: f64,
    pub split: MarginSplit,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self::basic()
    }
}

impl ProbabilityConfig {
    /// Flat 0.5 baseline, no jitter
    pub fn basic() -> Self {
        Self {
            baseline: 0.5,
            max_margin: 0.08,
            max_seed_gap: 100,
            jitter: 0.0,
            min_probability: 0.0,
            max_probability: 1.0,
            split: MarginSplit::Favorite,
        }
    }

    /// Tour-average baseline with per-match jitter
    pub fn enhanced() -> Self {
        Self {
            baseline: 0.64,
            jitter: 0.03,
            ..Self::basic()
        }
    }

    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_max_margin(mut self, max_margin: f64) -> Self {
        self.max_margin = max_margin;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_split(mut self, split: MarginSplit) -> Self {
        self.split = split;
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_probability = min;
        self.max_probability = max;
        self
    }

    /// Reject parameters that can produce a never-ending tiebreak
    /// (both servers certain to win, or certain to lose, every point)
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Err(TournamentError::InvalidConfig(message.to_string()));
        if !(self.baseline > 0.0 && self.baseline < 1.0) {
            return invalid("baseline must be strictly between 0 and 1");
        }
        if !(self.jitter >= 0.0 && self.jitter < self.baseline && self.baseline + self.jitter < 1.0)
        {
            return invalid("jitter must keep the baseline strictly between 0 and 1");
        }
        if !(self.max_margin >= 0.0) {
            return invalid("max_margin must not be negative");
        }
        if self.max_seed_gap == 0 {
            return invalid("max_seed_gap must be positive");
        }
        if !(0.0 <= self.min_probability
            && self.min_probability < self.max_probability
            && self.max_probability <= 1.0)
        {
            return invalid("probability bounds must satisfy 0 <= min < max <= 1");
        }
        Ok(())
    }
}

/// Probability adjustment for one player against non-rivals
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostRule {
    pub player: String,
    pub boost: f64,
    /// Opponents against whom the boost does not apply
    #[serde(default)]
    pub rivals: Vec<String>,
}

impl BoostRule {
    pub fn new(player: impl Into<String>, boost: f64) -> Self {
        Self {
            player: player.into(),
            boost,
            rivals: Vec::new(),
        }
    }

    pub fn with_rival(mut self, rival: impl Into<String>) -> Self {
        self.rivals.push(rival.into());
        self
    }

    /// One rule per name, each listing the rest of the group as rivals
    pub fn top_group(names: &[String], boost: f64) -> Vec<BoostRule> {
        names
            .iter()
            .map(|name| BoostRule {
                player: name.clone(),
                boost,
                rivals: names.iter().filter(|other| *other != name).cloned().collect(),
            })
            .collect()
    }

    pub fn is_rival(&self, opponent: &str) -> bool {
        self.rivals.iter().any(|rival| rival == opponent)
    }
}

/// Round to four decimals
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Probability model bound to a configuration and boost rules
#[derive(Clone, Copy, Debug)]
pub struct ProbabilityModel<'a> {
    config: &'a ProbabilityConfig,
    rules: &'a [BoostRule],
}

impl<'a> ProbabilityModel<'a> {
    pub fn new(config: &'a ProbabilityConfig, rules: &'a [BoostRule]) -> Self {
        Self { config, rules }
    }

    /// Edge of the stronger seed before jitter and boosts
    pub fn seed_edge(&self, seed_one: u32, seed_two: u32) -> f64 {
        let gap = self.config.max_seed_gap.max(1);
        let diff = seed_one.abs_diff(seed_two).min(gap);
        diff as f64 / gap as f64 * self.config.max_margin
    }

    /// Side with the lower seed; equal seeds favor side two
    pub fn stronger_side(seed_one: u32, seed_two: u32) -> Side {
        if seed_one < seed_two {
            Side::One
        } else {
            Side::Two
        }
    }

    /// Serve-win probability for each side for one simulated match
    ///
    /// Draw order: jitter for the weaker seed, then for the stronger seed.
    /// Nothing is drawn when jitter is disabled.
    pub fn serve_probabilities<R: Rng + ?Sized>(
        &self,
        names: [&str; 2],
        seeds: [u32; 2],
        rng: &mut R,
    ) -> [f64; 2] {
        let edge = self.seed_edge(seeds[0], seeds[1]);
        let baseline = self.config.baseline;
        let (weaker, stronger) = match self.config.split {
            MarginSplit::Favorite => (baseline, baseline + edge),
            MarginSplit::Symmetric => (baseline - edge / 2.0, baseline + edge / 2.0),
        };
        let weaker = weaker + self.jitter(rng);
        let stronger = stronger + self.jitter(rng);

        let better = Self::stronger_side(seeds[0], seeds[1]);
        let mut probs = [0.0; 2];
        probs[better.index()] = stronger;
        probs[better.opponent().index()] = weaker;

        self.apply_boosts(names, &mut probs);

        probs.map(|p| {
            round4(p.clamp(self.config.min_probability, self.config.max_probability))
        })
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let width = self.config.jitter;
        if width > 0.0 {
            rng.gen_range(-width..=width)
        } else {
            0.0
        }
    }

    /// A boosted player facing a non-rival gains the boost and the opponent
    /// loses it; two rivals meeting both fall back to the baseline.
    fn apply_boosts(&self, names: [&str; 2], probs: &mut [f64; 2]) {
        for side in Side::BOTH {
            let player = names[side.index()];
            let opponent = names[side.opponent().index()];
            if let Some(rule) = self
                .rules
                .iter()
                .find(|rule| rule.player == player && !rule.is_rival(opponent))
            {
                probs[side.index()] += rule.boost;
                probs[side.opponent().index()] -= rule.boost;
                return;
            }
        }

        let rivals_meet = self.rules.iter().any(|rule| {
            (rule.player == names[0] && rule.is_rival(names[1]))
                || (rule.player == names[1] && rule.is_rival(names[0]))
        });
        if rivals_meet {
            *probs = [self.config.baseline; 2];
        }
    }
}
