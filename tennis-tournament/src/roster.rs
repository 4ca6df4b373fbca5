//! Roster and bracket model
//!
//! Level 4 - Data: both are plain JSON documents. A roster maps names to
//! entries, a bracket is a list of two-slot pairings where `null` is a bye.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TournamentError};
use crate::json::{load_json, save_json};

/// Static data for one player
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Tournament seed, lower is better
    pub seed: u32,
    #[serde(default)]
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    /// Positive form factor for head-to-head profiles
    #[serde(default)]
    pub p_factor: f64,
    /// Negative form factor for head-to-head profiles
    #[serde(default)]
    pub n_factor: f64,
}

impl PlayerEntry {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }
}

/// Name to entry mapping
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: BTreeMap<String, PlayerEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: PlayerEntry) {
        self.players.insert(name.into(), entry);
    }

    pub fn with_player(mut self, name: impl Into<String>, seed: u32) -> Self {
        self.insert(name, PlayerEntry::new(seed));
        self
    }

    pub fn get(&self, name: &str) -> Option<&PlayerEntry> {
        self.players.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlayerEntry)> {
        self.players.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Two bracket slots; `None` is a bye
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pairing {
    pub slots: [Option<String>; 2],
}

impl Pairing {
    pub fn new(one: impl Into<String>, two: impl Into<String>) -> Self {
        Self {
            slots: [Some(one.into()), Some(two.into())],
        }
    }

    pub fn from_slots(one: Option<String>, two: Option<String>) -> Self {
        Self { slots: [one, two] }
    }

    pub fn names(&self) -> [Option<&str>; 2] {
        [self.slots[0].as_deref(), self.slots[1].as_deref()]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().flatten().any(|slot| slot == name)
    }

    /// "A vs B", with "bye" for empty slots
    pub fn label(&self) -> String {
        let [one, two] = self.names();
        format!("{} vs {}", one.unwrap_or("bye"), two.unwrap_or("bye"))
    }
}

/// One round of a single-elimination draw
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bracket {
    pub pairings: Vec<Pairing>,
}

impl Bracket {
    pub fn new(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(path, self)
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// True when only the final remains
    pub fn is_final(&self) -> bool {
        self.pairings.len() == 1
    }

    /// Rounds left including this one
    pub fn rounds_remaining(&self) -> usize {
        if self.pairings.is_empty() {
            0
        } else {
            self.pairings.len().trailing_zeros() as usize + 1
        }
    }

    /// Non-empty with a power-of-two number of pairings
    pub fn validate(&self) -> Result<()> {
        if self.pairings.is_empty() {
            return Err(TournamentError::InvalidBracket(
                "bracket has no pairings".to_string(),
            ));
        }
        if !self.pairings.len().is_power_of_two() {
            return Err(TournamentError::InvalidBracket(format!(
                "{} pairings is not a power of two",
                self.pairings.len()
            )));
        }
        Ok(())
    }

    /// Pair consecutive winners into the next round
    pub fn next_round(winners: Vec<Option<String>>) -> Self {
        let mut pairings = Vec::with_capacity(winners.len() / 2);
        let mut iter = winners.into_iter();
        while let Some(one) = iter.next() {
            let two = iter.next().flatten();
            pairings.push(Pairing::from_slots(one, two));
        }
        Self { pairings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_from_json() {
        let roster = Roster::from_json(
            r#"{"A": {"seed": 1, "cost": 20, "power": 3}, "B": {"seed": 200}}"#,
        )
        .unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("A").unwrap().power, Some(3));
        assert_eq!(roster.get("B").unwrap().cost, 0);
        assert!(!roster.contains("C"));
    }

    #[test]
    fn test_bracket_from_json_with_bye() {
        let bracket = Bracket::from_json(r#"[["A", "B"], [null, "C"]]"#).unwrap();
        assert_eq!(bracket.len(), 2);
        assert_eq!(bracket.pairings[1].names(), [None, Some("C")]);
        assert_eq!(bracket.pairings[1].label(), "bye vs C");
    }

    #[test]
    fn test_bracket_validate() {
        assert!(Bracket::default().validate().is_err());
        let three = Bracket::new(vec![Pairing::new("A", "B"); 3]);
        assert!(matches!(
            three.validate(),
            Err(TournamentError::InvalidBracket(_))
        ));
        let four = Bracket::new(vec![Pairing::new("A", "B"); 4]);
        assert!(four.validate().is_ok());
        assert_eq!(four.rounds_remaining(), 3);
    }

    #[test]
    fn test_next_round_pairs_consecutive_winners() {
        let next = Bracket::next_round(vec![
            Some("A".to_string()),
            Some("C".to_string()),
            None,
            Some("F".to_string()),
        ]);
        assert_eq!(next.len(), 2);
        assert_eq!(next.pairings[0], Pairing::new("A", "C"));
        assert_eq!(next.pairings[1].names(), [None, Some("F")]);
    }

    #[test]
    fn test_bracket_serializes_as_nested_arrays() {
        let bracket = Bracket::new(vec![Pairing::new("A", "B")]);
        assert_eq!(serde_json::to_string(&bracket).unwrap(), r#"[["A","B"]]"#);
    }
}
