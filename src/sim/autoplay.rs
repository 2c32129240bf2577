//! Autoplay - plays the game the way a correct binary search would
//!
//! Drives the headless demo. An optional mistake chance makes the player
//! occasionally pick a random direction instead.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::engine::GuessingGameEngine;
use super::state::{Direction, Round};

/// Correct direction for the round's current window, `None` if it is exhausted
pub fn best_direction(round: &Round) -> Option<Direction> {
    let mid_value = round.mid_value()?;
    let target = round.challenge.target();
    Some(match mid_value.cmp(&target) {
        std::cmp::Ordering::Equal => Direction::Middle,
        std::cmp::Ordering::Greater => Direction::Left,
        std::cmp::Ordering::Less => Direction::Right,
    })
}

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    /// Probability (0-1) of a random guess
    mistake_chance: f64,
}

impl Autoplayer {
    pub fn new(seed: u64, mistake_chance: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            mistake_chance: mistake_chance.clamp(0.0, 1.0),
        }
    }

    /// Never makes mistakes
    pub fn perfect() -> Self {
        Self::new(0, 0.0)
    }

    /// Pick the next guess, or `None` when the engine is not accepting guesses
    pub fn choose(&mut self, engine: &GuessingGameEngine) -> Option<Direction> {
        if !engine.controls_enabled() {
            return None;
        }
        let best = best_direction(engine.round()?)?;
        if self.mistake_chance > 0.0 && self.rng.random_bool(self.mistake_chance) {
            let all = [Direction::Left, Direction::Middle, Direction::Right];
            return Some(all[self.rng.random_range(0..all.len())]);
        }
        Some(best)
    }
}
