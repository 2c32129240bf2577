//! Binary Search Challenge - a timed guided-search mini-game
//!
//! Core modules:
//! - `sim`: Deterministic game engine (challenges, guesses, scoring, clock)
//! - `settings`: Game configuration and difficulty presets
//! - `ui`: Presentation model (cell marks, feedback text, key bindings)
//! - `error`: Engine error type

pub mod error;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{GameError, Result};
pub use settings::{Difficulty, DifficultyPreset, GameConfig};
pub use sim::{Direction, GameEvent, GamePhase, GuessingGameEngine, RoundClock};

/// Game configuration constants
pub mod consts {
    /// Number of values in a generated challenge
    pub const ARRAY_SIZE: usize = 10;
    /// Largest challenge a config may ask for
    pub const MAX_ARRAY_SIZE: usize = 1000;
    /// Inclusive range values are drawn from
    pub const VALUE_MIN: i32 = 1;
    pub const VALUE_MAX: i32 = 100;

    /// Guesses allowed per round
    pub const MAX_ATTEMPTS: u32 = 10;
    /// Session countdown length
    pub const SESSION_SECONDS: u32 = 60;
    /// Delay before the next round starts after a round resolves
    pub const AUTO_RESTART_DELAY_MS: u32 = 2000;

    /// Clock granularity (one tick per second)
    pub const CLOCK_PERIOD_MS: u32 = 1000;

    /// Score for a find, before the per-attempt penalty
    pub const FOUND_BASE_SCORE: u32 = 100;
    pub const ATTEMPT_PENALTY: u32 = 10;
}

/// Score awarded for finding the target on the given attempt.
///
/// `max(0, 100 - attempts * 10)`, never negative.
#[inline]
pub fn score_for_attempt(attempts: u32) -> u32 {
    use consts::{ATTEMPT_PENALTY, FOUND_BASE_SCORE};
    FOUND_BASE_SCORE.saturating_sub(attempts.saturating_mul(ATTEMPT_PENALTY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_for_attempt() {
        assert_eq!(score_for_attempt(0), 100);
        assert_eq!(score_for_attempt(1), 90);
        assert_eq!(score_for_attempt(3), 70);
        assert_eq!(score_for_attempt(10), 0);
        assert_eq!(score_for_attempt(11), 0);
        assert_eq!(score_for_attempt(u32::MAX), 0);
    }
}
