//! Deterministic game module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - No timers; time arrives through `tick`/`advance_time`
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod clock;
pub mod engine;
pub mod state;

pub use autoplay::{Autoplayer, best_direction};
pub use clock::RoundClock;
pub use engine::GuessingGameEngine;
pub use state::{
    Challenge, Direction, GameEvent, GamePhase, PendingRestart, RngState, Round, RoundResolution,
    SearchWindow, SessionSnapshot,
};
