//! Fantasy points table
//!
//! Level 4 - Accumulator: one running total per roster player. Names that
//! are not in the roster never receive points.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tennis_core::round2;

use crate::error::Result;
use crate::json::{save_json, to_json_indented};
use crate::roster::Roster;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable {
    points: BTreeMap<String, f64>,
}

impl PointsTable {
    /// Zero for every roster player
    pub fn for_roster(roster: &Roster) -> Self {
        Self {
            points: roster.names().map(|name| (name.to_string(), 0.0)).collect(),
        }
    }

    /// Add points to a known player; returns false when the name is unknown
    pub fn award(&mut self, name: Option<&str>, points: f64) -> bool {
        match name.and_then(|name| self.points.get_mut(name)) {
            Some(total) => {
                *total += points;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.points.get(name).copied()
    }

    pub fn total(&self) -> f64 {
        self.points.values().sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.points.iter().map(|(name, points)| (name.as_str(), *points))
    }

    /// Highest total first, ties by name
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Per-player mean across runs, rounded to two decimals
    pub fn average(tables: &[PointsTable]) -> PointsTable {
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for table in tables {
            for (name, points) in table.iter() {
                *sums.entry(name.to_string()).or_insert(0.0) += points;
            }
        }
        let runs = tables.len().max(1) as f64;
        PointsTable {
            points: sums
                .into_iter()
                .map(|(name, sum)| (name, round2(sum / runs)))
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_indented(self)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new().with_player("A", 1).with_player("B", 2)
    }

    #[test]
    fn test_for_roster_starts_at_zero() {
        let table = PointsTable::for_roster(&roster());
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(0.0));
        assert_eq!(table.total(), 0.0);
    }

    #[test]
    fn test_award_ignores_unknown_names() {
        let mut table = PointsTable::for_roster(&roster());
        assert!(table.award(Some("A"), 55.0));
        assert!(table.award(Some("A"), 55.0));
        assert!(!table.award(Some("Z"), 45.0));
        assert!(!table.award(None, 45.0));
        assert_eq!(table.get("A"), Some(110.0));
        assert_eq!(table.get("Z"), None);
        assert_eq!(table.total(), 110.0);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let mut one = PointsTable::for_roster(&roster());
        let mut two = PointsTable::for_roster(&roster());
        let three = PointsTable::for_roster(&roster());
        one.award(Some("A"), 55.0);
        two.award(Some("A"), 45.0);
        two.award(Some("B"), 100.0);
        let avg = PointsTable::average(&[one, two, three]);
        assert_eq!(avg.get("A"), Some(33.33));
        assert_eq!(avg.get("B"), Some(33.33));
    }

    #[test]
    fn test_ranked() {
        let mut table = PointsTable::for_roster(&roster());
        table.award(Some("B"), 55.0);
        table.award(Some("A"), 45.0);
        assert_eq!(table.ranked(), vec![("B", 55.0), ("A", 45.0)]);
    }

    #[test]
    fn test_json_output() {
        let mut table = PointsTable::for_roster(&roster());
        table.award(Some("A"), 55.0);
        assert_eq!(
            table.to_json_pretty().unwrap(),
            "{\n    \"A\": 55.0,\n    \"B\": 0.0\n}"
        );
    }
}
