//! One-second countdown clock
//!
//! Accumulates host frame time and reports when a whole second has passed.
//! A long stall yields one tick, not a burst of catch-up ticks.

use serde::{Deserialize, Serialize};

use crate::consts::CLOCK_PERIOD_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    period_ms: u32,
    accumulator_ms: u32,
    running: bool,
    finished: bool,
}

impl Default for RoundClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundClock {
    pub fn new() -> Self {
        Self::with_period(CLOCK_PERIOD_MS)
    }

    pub fn with_period(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulator_ms: 0,
            running: false,
            finished: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.finished = false;
        self.accumulator_ms = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator_ms = 0;
    }

    /// Stop and mark the countdown as completed
    pub fn finish(&mut self) {
        self.stop();
        self.finished = true;
    }

    /// Back to a fresh, stopped clock
    pub fn reset(&mut self) {
        self.stop();
        self.finished = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Feed elapsed time; returns true if a tick is due.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if !self.running {
            return false;
        }
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        if self.accumulator_ms < self.period_ms {
            return false;
        }
        // Missed periods are dropped
        self.accumulator_ms %= self.period_ms;
        true
    }
}
