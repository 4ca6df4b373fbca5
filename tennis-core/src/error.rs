//! Error types for the match engine

/// Errors raised while configuring a match
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Sets to win must be at least 1, got {0}")]
    InvalidSetsToWin(u32),

    #[error("Tiebreak target must be at least 1, got {0}")]
    InvalidTiebreakTarget(u32),

    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("Both servers {0} every point; a tiebreak could never be decided")]
    UndecidableTiebreak(&'static str),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Check that a probability lies in the unit interval
pub(crate) fn check_probability(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::ProbabilityOutOfRange { field, value })
    }
}
