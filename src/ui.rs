//! Presentation model for the game widget
//!
//! Pure mappings from engine state and events to what the page shows:
//! cell highlighting, feedback text, button labels, key bindings.

use crate::sim::{Direction, GameEvent, GamePhase, GuessingGameEngine, RoundResolution};

/// How a single array cell is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    Plain,
    /// Current `mid`
    Active,
    /// Outside the search window
    Checked,
    /// Where the target was found
    Found,
}

impl CellMark {
    /// CSS classes for the cell element
    pub fn class_name(&self) -> &'static str {
        match self {
            CellMark::Plain => "array-item",
            CellMark::Active => "array-item active",
            CellMark::Checked => "array-item checked",
            CellMark::Found => "array-item active found",
        }
    }
}

/// Marks for every value of the current round (empty when no round exists)
pub fn cell_marks(engine: &GuessingGameEngine) -> Vec<CellMark> {
    let Some(round) = engine.round() else {
        return Vec::new();
    };
    let found = match round.resolution {
        Some(RoundResolution::Found { index }) => Some(index),
        _ => None,
    };
    let mid = round.window.mid();

    (0..round.challenge.len())
        .map(|i| {
            if found == Some(i) {
                CellMark::Found
            } else if mid == Some(i) {
                CellMark::Active
            } else if !round.window.contains(i) {
                CellMark::Checked
            } else {
                CellMark::Plain
            }
        })
        .collect()
}

/// Visual tone of the feedback line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

impl Tone {
    pub fn class_name(&self) -> &'static str {
        match self {
            Tone::Neutral => "game-feedback",
            Tone::Success => "game-feedback success",
            Tone::Error => "game-feedback error",
        }
    }
}

/// Text shown under the array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub tone: Tone,
}

impl Feedback {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Blank feedback, shown after a reset
    pub fn cleared() -> Self {
        Self::new("", Tone::Neutral)
    }
}

/// Feedback line for an event, `None` for events that don't change it
pub fn feedback_for(event: &GameEvent) -> Option<Feedback> {
    match event {
        GameEvent::RoundStarted { .. } => Some(Feedback::new(
            "Find the target number using binary search!",
            Tone::Neutral,
        )),
        GameEvent::Found { score_delta, .. } => Some(Feedback::new(
            format!("🎉 Found it! Score: +{}", score_delta),
            Tone::Success,
        )),
        GameEvent::NotFound => Some(Feedback::new("❌ Target not found! Try again.", Tone::Error)),
        GameEvent::AttemptsExhausted => Some(Feedback::new(
            "⏰ Max attempts reached! Starting new game.",
            Tone::Error,
        )),
        GameEvent::SessionEnded { final_score } => Some(Feedback::new(
            format!("⏰ Time's up! Final Score: {}", final_score),
            Tone::Error,
        )),
        GameEvent::WindowNarrowed { .. }
        | GameEvent::RestartScheduled { .. }
        | GameEvent::Tick { .. } => None,
    }
}

/// Label and enabled state of the start button
pub fn start_button(phase: GamePhase) -> (&'static str, bool) {
    match phase {
        GamePhase::Idle => ("Start Game", true),
        GamePhase::Active => ("Game Active", false),
        GamePhase::Ended => ("Start New Game", true),
    }
}

/// Keyboard shortcut for a direction guess
pub fn key_to_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        " " => Some(Direction::Middle),
        _ => None,
    }
}
