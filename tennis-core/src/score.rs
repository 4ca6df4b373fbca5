//! Score text for logs and reports

use crate::stats::SetScore;

const CALLS: [&str; 4] = ["0", "15", "30", "40"];

/// In-game score from point counts, e.g. "15-30", "40-40", "AD-40"
pub fn game_score(player_one: u32, player_two: u32) -> String {
    if player_one >= 3 && player_two >= 3 {
        let text = match player_one.cmp(&player_two) {
            std::cmp::Ordering::Equal => "40-40",
            std::cmp::Ordering::Greater => "AD-40",
            std::cmp::Ordering::Less => "40-AD",
        };
        return text.to_string();
    }
    format!(
        "{}-{}",
        CALLS[player_one.min(3) as usize],
        CALLS[player_two.min(3) as usize]
    )
}

/// Tiebreak score as plain point counts, e.g. "5-3"
pub fn tiebreak_score(player_one: u32, player_two: u32) -> String {
    format!("{}-{}", player_one, player_two)
}

/// Full scoreline, e.g. "6-4, 6-7 (5-7), 7-6 (10-8)"
pub fn format_scoreline(sets: &[SetScore]) -> String {
    sets.iter()
        .map(|set| {
            if set.went_to_tiebreak() {
                format!(
                    "{}-{} ({})",
                    set.games[0],
                    set.games[1],
                    tiebreak_score(set.tiebreak_points[0], set.tiebreak_points[1])
                )
            } else {
                format!("{}-{}", set.games[0], set.games[1])
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
