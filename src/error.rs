//! Error types for the game engine
//!
//! Every command returns a structured error instead of silently ignoring
//! misuse, so hosts and tests can tell a rejected call from a no-op.

use thiserror::Error;

use crate::sim::GamePhase;

/// All failures the engine can report. None of them are fatal to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Command not permitted in the current phase
    #[error("`{command}` is not allowed while the game is {phase:?}")]
    InvalidState {
        command: &'static str,
        phase: GamePhase,
    },

    /// Guess submitted after the round resolved but before the next one started
    #[error("round already resolved, waiting for the next round")]
    RoundResolved,

    /// Engine configuration rejected at construction
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Per-round difficulty rejected before any state change
    #[error("invalid difficulty: size {size}, range [{min}, {max}]")]
    InvalidDifficulty { size: usize, min: i32, max: i32 },

    /// Explicit challenge values are unusable
    #[error("invalid challenge: {0}")]
    InvalidChallenge(String),

    /// Configuration document could not be parsed
    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Parse(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GameError>;
