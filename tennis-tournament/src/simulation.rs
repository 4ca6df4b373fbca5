//! Multi-run simulation
//!
//! Level 1 - Orchestration: repeats full tournaments and averages the
//! points tables. Run `i` is seeded with `seed + i`, so every run is
//! reproducible on its own whether runs execute in parallel or not.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::points::PointsTable;
use crate::roster::{Bracket, Roster};
use crate::tournament::{drive_bracket, validate_inputs, TournamentResult};

/// Create an RNG from an optional seed
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Aggregate over all runs
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    pub runs: usize,
    /// Per-player mean points, rounded to two decimals
    pub points: PointsTable,
    /// Titles won per player
    pub titles: BTreeMap<String, usize>,
    /// Full result of the only run, kept for single-run simulations
    pub single_run: Option<TournamentResult>,
}

impl SimulationResult {
    /// Most frequent champion, ties by name
    pub fn favorite(&self) -> Option<(&str, usize)> {
        self.titles
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .fold(None, |best, candidate| match best {
                Some((_, count)) if count >= candidate.1 => best,
                _ => Some(candidate),
            })
    }
}

/// Run `config.num_runs` tournaments and average the points
pub fn run_simulation(
    roster: &Roster,
    bracket: &Bracket,
    config: &SimulationConfig,
) -> Result<SimulationResult> {
    run_simulation_with_progress(roster, bracket, config, || {})
}

/// Same as [`run_simulation`], calling `on_run_complete` after each run
pub fn run_simulation_with_progress<F>(
    roster: &Roster,
    bracket: &Bracket,
    config: &SimulationConfig,
    on_run_complete: F,
) -> Result<SimulationResult>
where
    F: Fn() + Sync,
{
    validate_inputs(roster, bracket, config)?;

    let runs = config.num_runs;
    let mut run_config = config.clone();
    if runs > 1 {
        run_config.verbose = false;
    }

    info!(
        "Simulating {} run(s) over {} first-round pairings",
        runs,
        bracket.len()
    );

    let run_one = |run: usize| -> Result<TournamentResult> {
        let mut rng = create_rng(config.seed.map(|seed| seed.wrapping_add(run as u64)));
        let result = drive_bracket(roster, bracket, &run_config, &mut rng);
        on_run_complete();
        result
    };

    let results: Vec<Result<TournamentResult>> = if config.parallel && runs > 1 {
        (0..runs).into_par_iter().map(run_one).collect()
    } else {
        (0..runs).map(run_one).collect()
    };
    let results = results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut titles = BTreeMap::new();
    for champion in results.iter().filter_map(|result| result.champion.clone()) {
        *titles.entry(champion).or_insert(0) += 1;
    }
    let tables: Vec<PointsTable> = results.iter().map(|result| result.points.clone()).collect();
    let points = PointsTable::average(&tables);

    let single_run = if runs == 1 {
        results.into_iter().next()
    } else {
        None
    };

    Ok(SimulationResult {
        runs,
        points,
        titles,
        single_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Pairing;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn field() -> (Roster, Bracket) {
        let roster = Roster::new()
            .with_player("A", 1)
            .with_player("B", 40)
            .with_player("C", 8)
            .with_player("D", 90);
        let bracket = Bracket::new(vec![Pairing::new("A", "B"), Pairing::new("C", "D")]);
        (roster, bracket)
    }

    #[test]
    fn test_single_run_keeps_result() {
        let (roster, bracket) = field();
        let config = SimulationConfig::default().with_seed(3);
        let result = run_simulation(&roster, &bracket, &config).unwrap();
        assert_eq!(result.runs, 1);
        let single = result.single_run.as_ref().unwrap();
        assert_eq!(single.points, result.points);
        assert_eq!(result.titles.values().sum::<usize>(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (roster, bracket) = field();
        let config = SimulationConfig::default().with_seed(17).with_runs(12);
        let parallel = run_simulation(&roster, &bracket, &config).unwrap();
        let sequential =
            run_simulation(&roster, &bracket, &config.clone().with_parallel(false)).unwrap();
        assert_eq!(parallel.points, sequential.points);
        assert_eq!(parallel.titles, sequential.titles);
        assert!(parallel.single_run.is_none());
    }

    #[test]
    fn test_average_points_total() {
        let (roster, bracket) = field();
        let config = SimulationConfig::default().with_seed(1).with_runs(7);
        let result = run_simulation(&roster, &bracket, &config).unwrap();
        // Three matches per run at 100 points each
        assert!((result.points.total() - 300.0).abs() < 0.05);
        assert_eq!(result.titles.values().sum::<usize>(), 7);
        assert!(result.favorite().is_some());
    }

    #[test]
    fn test_progress_called_per_run() {
        let (roster, bracket) = field();
        let config = SimulationConfig::default().with_seed(2).with_runs(5);
        let counter = AtomicUsize::new(0);
        run_simulation_with_progress(&roster, &bracket, &config, || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(counter.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (roster, bracket) = field();
        let config = SimulationConfig::default().with_runs(0);
        assert!(run_simulation(&roster, &bracket, &config).is_err());
    }
}
