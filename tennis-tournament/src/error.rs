//! Error types for tournament simulation

use std::path::PathBuf;

use tennis_core::EngineError;

/// Errors raised while validating inputs or driving a bracket
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("Invalid bracket: {0}")]
    InvalidBracket(String),

    #[error("Player '{player}' in pairing {pairing} is not in the roster")]
    RosterMismatch { player: String, pairing: usize },

    #[error("Cannot resolve pairing {0}: neither player is in the roster")]
    UnresolvedMatch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TournamentError>;
