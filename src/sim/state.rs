//! Game state and core simulation types
//!
//! Session-level state outlives rounds; a `Round` (challenge + search window)
//! is created at round start and dropped when the next one begins.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::settings::Difficulty;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// No session running, waiting for the first round
    #[default]
    Idle,
    /// Session clock running, rounds in play
    Active,
    /// Time ran out; only a reset leaves this phase
    Ended,
}

/// Player's claim about where the target lies relative to `mid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Target is left of mid
    Left,
    /// Mid is the target
    Middle,
    /// Target is right of mid
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Middle => "middle",
            Direction::Right => "right",
        }
    }
}

/// Immutable per-round challenge: sorted values and a target drawn from them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChallenge")]
pub struct Challenge {
    values: Vec<i32>,
    target: i32,
}

impl Challenge {
    /// Build a challenge from explicit values.
    ///
    /// Values must be non-empty and ascending; the target must be one of them.
    pub fn new(values: Vec<i32>, target: i32) -> Result<Self> {
        if values.is_empty() {
            return Err(GameError::InvalidChallenge("no values".into()));
        }
        if values.windows(2).any(|w| w[0] > w[1]) {
            return Err(GameError::InvalidChallenge(format!(
                "values are not sorted: {:?}",
                values
            )));
        }
        if !values.contains(&target) {
            return Err(GameError::InvalidChallenge(format!(
                "target {} is not among the values",
                target
            )));
        }
        Ok(Self { values, target })
    }

    /// Draw `size` values uniformly from `[min, max]`, sort them, and pick
    /// one of them as the target.
    ///
    /// Draws are independent, so duplicates are possible and kept.
    pub fn generate(difficulty: &Difficulty, rng: &mut Pcg32) -> Result<Self> {
        difficulty.validate()?;

        let mut values: Vec<i32> = (0..difficulty.size)
            .map(|_| rng.random_range(difficulty.min..=difficulty.max))
            .collect();
        values.sort_unstable();

        let target = values[rng.random_range(0..values.len())];
        Ok(Self { values, target })
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if any value appears more than once
    pub fn has_duplicates(&self) -> bool {
        self.values.windows(2).any(|w| w[0] == w[1])
    }
}

/// Wire shape of a challenge, checked by `Challenge::new` before use
#[derive(Deserialize)]
struct RawChallenge {
    values: Vec<i32>,
    target: i32,
}

impl TryFrom<RawChallenge> for Challenge {
    type Error = GameError;

    fn try_from(raw: RawChallenge) -> Result<Self> {
        Challenge::new(raw.values, raw.target)
    }
}

/// The `[low, high]` index range still possibly holding the target.
///
/// Stored as a half-open `[low, end)` so exhaustion (`low > high`) never needs
/// a negative index. `mid` is derived on every read, so it can never be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchWindow {
    low: usize,
    end: usize,
}

impl SearchWindow {
    /// Full window over `len` values
    pub fn new(len: usize) -> Self {
        Self { low: 0, end: len }
    }

    pub fn low(&self) -> usize {
        self.low
    }

    /// Inclusive upper bound, `None` once the window has shrunk below index 0
    pub fn high(&self) -> Option<usize> {
        self.end.checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.low >= self.end
    }

    /// `floor((low + high) / 2)`, defined only for a non-empty window
    pub fn mid(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some((self.low + self.end - 1) / 2)
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.low && index < self.end
    }

    /// Apply a directional guess. `Middle` never narrows.
    pub fn narrow(&mut self, direction: Direction) {
        let Some(mid) = self.mid() else {
            return;
        };
        match direction {
            Direction::Left => self.end = mid,
            Direction::Right => self.low = mid + 1,
            Direction::Middle => {}
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResolution {
    Found { index: usize },
    NotFound,
    AttemptsExhausted,
}

/// A single round in play
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    pub challenge: Challenge,
    pub window: SearchWindow,
    pub attempts: u32,
    pub resolution: Option<RoundResolution>,
}

impl Round {
    pub fn new(challenge: Challenge) -> Self {
        let window = SearchWindow::new(challenge.len());
        Self {
            challenge,
            window,
            attempts: 0,
            resolution: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Value under `mid`, if the window is non-empty
    pub fn mid_value(&self) -> Option<i32> {
        self.window.mid().map(|mid| self.challenge.values()[mid])
    }
}

/// Deferred start of the next round, run by the host when it sees fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRestart {
    pub difficulty: Difficulty,
    pub delay_ms: u32,
}

/// Events emitted for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { values: Vec<i32>, target: i32 },
    Found { index: usize, score_delta: u32 },
    NotFound,
    AttemptsExhausted,
    WindowNarrowed { low: usize, high: usize, mid: usize },
    /// A new round should start after `delay_ms`
    RestartScheduled { delay_ms: u32 },
    /// One second elapsed
    Tick { time_remaining: u32 },
    SessionEnded { final_score: u32 },
}

impl GameEvent {
    /// Events that resolve the current round
    pub fn ends_round(&self) -> bool {
        matches!(
            self,
            GameEvent::Found { .. } | GameEvent::NotFound | GameEvent::AttemptsExhausted
        )
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Serializable view of the whole session, for HUDs and state comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub time_remaining: u32,
    pub attempts: u32,
    pub values: Vec<i32>,
    pub target: Option<i32>,
    pub low: Option<usize>,
    pub high: Option<usize>,
    pub mid: Option<usize>,
    pub pending_restart: Option<PendingRestart>,
}
