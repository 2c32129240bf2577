//! Game configuration and difficulty presets
//!
//! Validated once when the engine is built; a bad config never reaches a round.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Shape of a generated challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    /// Number of values
    pub size: usize,
    /// Inclusive lower bound for drawn values
    pub min: i32,
    /// Inclusive upper bound for drawn values
    pub max: i32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            size: ARRAY_SIZE,
            min: VALUE_MIN,
            max: VALUE_MAX,
        }
    }
}

impl Difficulty {
    pub fn new(size: usize, min: i32, max: i32) -> Self {
        Self { size, min, max }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_ARRAY_SIZE || self.min > self.max {
            return Err(GameError::InvalidDifficulty {
                size: self.size,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "norm" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Challenge shape for this preset
    pub fn difficulty(&self) -> Difficulty {
        match self {
            DifficultyPreset::Easy => Difficulty::new(8, 1, 50),
            DifficultyPreset::Normal => Difficulty::default(),
            DifficultyPreset::Hard => Difficulty::new(16, 1, 500),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Challenge shape used for rounds started by the engine itself
    pub difficulty: Difficulty,
    /// Guesses allowed per round
    pub max_attempts: u32,
    /// Session countdown length in seconds
    pub session_seconds: u32,
    /// Delay the host should wait before running a scheduled restart
    pub auto_restart_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            max_attempts: MAX_ATTEMPTS,
            session_seconds: SESSION_SECONDS,
            auto_restart_delay_ms: AUTO_RESTART_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset (other fields default)
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            difficulty: preset.difficulty(),
            ..Self::default()
        }
    }

    /// Headless variant: restarts run immediately
    #[must_use]
    pub fn without_restart_delay(mut self) -> Self {
        self.auto_restart_delay_ms = 0;
        self
    }

    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty.size == 0 || self.difficulty.size > MAX_ARRAY_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "array size must be between 1 and {}",
                MAX_ARRAY_SIZE
            )));
        }
        if self.difficulty.min > self.difficulty.max {
            return Err(GameError::InvalidConfig(format!(
                "value range [{}, {}] is empty",
                self.difficulty.min, self.difficulty.max
            )));
        }
        if self.max_attempts == 0 {
            return Err(GameError::InvalidConfig("max attempts must be at least 1".into()));
        }
        if self.session_seconds == 0 {
            return Err(GameError::InvalidConfig(
                "session length must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}
