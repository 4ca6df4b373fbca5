//! Integration tests for the tennis simulator
//!
//! Tests the full stack: JSON inputs, match engine, bracket driver and
//! points output files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tennis_core::{MatchFormat, Side, SimplePlayer, TennisMatch};
use tennis_tournament::{
    roster_head_to_head, run_simulation, Bracket, PointsTable, Roster, SimulationConfig, Surface,
    Tour,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

const ROSTER: &str = r#"{
    "J. Sinner": {"seed": 1, "cost": 20, "power": 5},
    "C. Alcaraz": {"seed": 3, "cost": 19, "p_factor": 0.02},
    "A. Zverev": {"seed": 4, "cost": 15},
    "D. Medvedev": {"seed": 5, "cost": 14},
    "T. Fritz": {"seed": 12, "cost": 10},
    "G. Dimitrov": {"seed": 10, "cost": 9, "n_factor": 0.01},
    "Qualifier": {"seed": 200, "cost": 2},
    "Lucky Loser": {"seed": 200, "cost": 1}
}"#;

const BRACKET: &str = r#"[
    ["J. Sinner", "Qualifier"],
    ["D. Medvedev", "G. Dimitrov"],
    ["A. Zverev", "T. Fritz"],
    ["Lucky Loser", "C. Alcaraz"]
]"#;

/// Scratch directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tennis_sim_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let players = dir.join("players.json");
    let bracket = dir.join("bracket.json");
    std::fs::write(&players, ROSTER).unwrap();
    std::fs::write(&bracket, BRACKET).unwrap();
    (players, bracket)
}

// ============================================================================
// FULL STACK
// ============================================================================

#[test]
fn test_simulation_from_files_to_points_file() {
    let dir = scratch_dir("points");
    let (players, bracket) = write_inputs(&dir);

    let roster = Roster::load(&players).unwrap();
    let bracket = Bracket::load(&bracket).unwrap();
    let config = SimulationConfig::for_tour(Tour::Men).with_seed(20240701);
    let result = run_simulation(&roster, &bracket, &config).unwrap();

    let output = dir.join("points.json");
    result.points.save(&output).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("{\n    \""));
    let parsed: BTreeMap<String, f64> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.len(), 8);
    assert_eq!(parsed.values().sum::<f64>(), 700.0);

    let history = result.single_run.unwrap().history();
    assert_eq!(history.rounds.len(), 3);
    assert!(history.champion.is_some());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_multi_run_average_is_reproducible() {
    let roster = Roster::from_json(ROSTER).unwrap();
    let bracket = Bracket::from_json(BRACKET).unwrap();
    let config = SimulationConfig::enhanced(Tour::Women)
        .with_seed(11)
        .with_runs(25)
        .with_top_players(&["J. Sinner".to_string(), "C. Alcaraz".to_string()]);

    let first = run_simulation(&roster, &bracket, &config).unwrap();
    let second = run_simulation(&roster, &bracket, &config).unwrap();
    assert_eq!(first.points, second.points);
    assert_eq!(first.titles, second.titles);

    let reloaded: PointsTable =
        serde_json::from_str(&first.points.to_json_pretty().unwrap()).unwrap();
    assert_eq!(reloaded, first.points);
}

#[test]
fn test_bracket_history_written_as_json() {
    let dir = scratch_dir("history");
    let roster = Roster::from_json(ROSTER).unwrap();
    let bracket = Bracket::from_json(BRACKET).unwrap();
    let config = SimulationConfig::default().with_seed(3);
    let result = run_simulation(&roster, &bracket, &config).unwrap();

    let path = dir.join("brackets.json");
    let history = result.single_run.as_ref().unwrap().history();
    tennis_tournament::save_json(&path, &history).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["rounds"][0].as_array().unwrap().len(), 4);
    assert_eq!(value["rounds"][2].as_array().unwrap().len(), 1);
    assert_eq!(
        value["champion"].as_str(),
        result.single_run.unwrap().champion.as_deref()
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_head_to_head_from_roster() {
    let roster = Roster::from_json(ROSTER).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let summary = roster_head_to_head(
        &roster,
        ["C. Alcaraz", "G. Dimitrov"],
        Surface::Grass,
        MatchFormat::best_of_five(),
        300,
        &mut rng,
    )
    .unwrap();
    assert_eq!(summary.wins[0] + summary.wins[1], 300);
    assert!(summary.wins[0] > summary.wins[1]);
}

#[test]
fn test_single_match_statistics() {
    let one = SimplePlayer::new("Server", 0.7);
    let two = SimplePlayer::new("Returner", 0.55);
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut tennis_match = TennisMatch::simple(&one, &two, MatchFormat::best_of_three(), Side::One);
    let winner = tennis_match.simulate(&mut rng);

    assert!(tennis_match.is_complete());
    assert_eq!(tennis_match.stats(winner).sets_won, 2);
    let report = tennis_match.statistics_report();
    assert!(report.contains("Match winner"));
    let total = tennis_match.points_won_percentage(Side::One)
        + tennis_match.points_won_percentage(Side::Two);
    assert!((total - 100.0).abs() < 0.011);
}
