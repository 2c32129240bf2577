//! Guessing game engine
//!
//! Owns the session (score, countdown, phase) and the current round, and
//! turns host commands into state transitions plus `GameEvent`s. The engine
//! never waits on anything: restarts after a resolved round are recorded as a
//! `PendingRestart` that the host runs when its own timer fires.

use rand_pcg::Pcg32;

use super::clock::RoundClock;
use super::state::{
    Challenge, Direction, GameEvent, GamePhase, PendingRestart, RngState, Round,
    RoundResolution, SearchWindow, SessionSnapshot,
};
use crate::error::{GameError, Result};
use crate::score_for_attempt;
use crate::settings::{Difficulty, GameConfig};

#[derive(Debug, Clone)]
pub struct GuessingGameEngine {
    config: GameConfig,
    rng_state: RngState,
    rng: Pcg32,
    phase: GamePhase,
    /// Cumulative across rounds of one session
    score: u32,
    time_remaining: u32,
    /// Shape used by the next scheduled restart
    difficulty: Difficulty,
    round: Option<Round>,
    pending_restart: Option<PendingRestart>,
    clock: RoundClock,
    events: Vec<GameEvent>,
}

impl GuessingGameEngine {
    /// Build an engine; an invalid config is rejected here, never mid-round.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let rng_state = RngState::new(seed);
        Ok(Self {
            rng: rng_state.to_rng(),
            rng_state,
            phase: GamePhase::Idle,
            score: 0,
            time_remaining: config.session_seconds,
            difficulty: config.difficulty,
            round: None,
            pending_restart: None,
            clock: RoundClock::new(),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn attempts(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.attempts)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.round.as_ref().map(|r| &r.challenge)
    }

    pub fn window(&self) -> Option<SearchWindow> {
        self.round.as_ref().map(|r| r.window)
    }

    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    pub fn pending_restart(&self) -> Option<PendingRestart> {
        self.pending_restart
    }

    /// Direction controls accept input only while an unresolved round is in play
    pub fn controls_enabled(&self) -> bool {
        self.phase == GamePhase::Active
            && self
                .round
                .as_ref()
                .is_some_and(|r| !r.is_resolved() && !r.window.is_empty())
    }

    /// Take all events emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Generate a fresh challenge and start a round.
    ///
    /// Starting from `Idle` also starts the session clock.
    pub fn start_round(&mut self, difficulty: Difficulty) -> Result<()> {
        self.ensure_not_ended("start_round")?;
        difficulty.validate()?;

        let challenge = Challenge::generate(&difficulty, &mut self.rng)?;
        if challenge.has_duplicates() {
            log::debug!("Challenge contains duplicate values: {:?}", challenge.values());
        }
        self.difficulty = difficulty;
        self.begin_round(challenge);
        Ok(())
    }

    /// Start a round from a predetermined challenge
    pub fn start_round_with(&mut self, challenge: Challenge) -> Result<()> {
        self.ensure_not_ended("start_round")?;
        self.begin_round(challenge);
        Ok(())
    }

    /// Run the scheduled restart, if one is still pending.
    ///
    /// Returns `false` when nothing was pending (never scheduled, or cancelled
    /// by the end of the session).
    pub fn run_pending_restart(&mut self) -> Result<bool> {
        let Some(pending) = self.pending_restart.take() else {
            return Ok(false);
        };
        self.start_round(pending.difficulty)?;
        Ok(true)
    }

    /// Submit a direction guess for the current round
    pub fn guess(&mut self, direction: Direction) -> Result<GameEvent> {
        if self.phase != GamePhase::Active {
            return Err(GameError::InvalidState {
                command: "guess",
                phase: self.phase,
            });
        }
        let max_attempts = self.config.max_attempts;
        let Some(round) = self.round.as_mut() else {
            return Err(GameError::InvalidState {
                command: "guess",
                phase: self.phase,
            });
        };
        if round.is_resolved() {
            return Err(GameError::RoundResolved);
        }
        // An unresolved round always has a non-empty window
        let Some(mid) = round.window.mid() else {
            return Err(GameError::RoundResolved);
        };

        round.attempts += 1;
        let attempts = round.attempts;

        let event = if round.challenge.values()[mid] == round.challenge.target() {
            let score_delta = score_for_attempt(attempts);
            round.resolution = Some(RoundResolution::Found { index: mid });
            self.score = self.score.saturating_add(score_delta);
            GameEvent::Found {
                index: mid,
                score_delta,
            }
        } else {
            round.window.narrow(direction);
            let window = round.window;
            match (window.mid(), window.high()) {
                (Some(_), Some(_)) if attempts >= max_attempts => {
                    round.resolution = Some(RoundResolution::AttemptsExhausted);
                    GameEvent::AttemptsExhausted
                }
                (Some(mid), Some(high)) => GameEvent::WindowNarrowed {
                    low: window.low(),
                    high,
                    mid,
                },
                _ => {
                    round.resolution = Some(RoundResolution::NotFound);
                    GameEvent::NotFound
                }
            }
        };

        self.emit(event.clone());
        if event.ends_round() {
            log::debug!(
                "Round resolved after {} attempt(s): {:?} (score {})",
                attempts,
                event,
                self.score
            );
            self.schedule_restart();
        }
        Ok(event)
    }

    /// One second of session time elapsed
    pub fn tick(&mut self) -> Result<GameEvent> {
        if self.phase != GamePhase::Active {
            return Err(GameError::InvalidState {
                command: "tick",
                phase: self.phase,
            });
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return Ok(self.end_session());
        }
        let event = GameEvent::Tick {
            time_remaining: self.time_remaining,
        };
        self.emit(event.clone());
        Ok(event)
    }

    /// Feed host frame time into the session clock, ticking when a second is due
    pub fn advance_time(&mut self, elapsed_ms: u32) -> Result<Option<GameEvent>> {
        if !self.clock.advance(elapsed_ms) {
            return Ok(None);
        }
        self.tick().map(Some)
    }

    /// Back to `Idle` with a zero score and a full countdown
    pub fn reset_session(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.time_remaining = self.config.session_seconds;
        self.difficulty = self.config.difficulty;
        self.round = None;
        self.pending_restart = None;
        self.clock.reset();
        self.events.clear();
        log::info!("Session reset");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let round = self.round.as_ref();
        let window = round.map(|r| r.window);
        SessionSnapshot {
            phase: self.phase,
            score: self.score,
            time_remaining: self.time_remaining,
            attempts: self.attempts(),
            values: round.map(|r| r.challenge.values().to_vec()).unwrap_or_default(),
            target: round.map(|r| r.challenge.target()),
            low: window.map(|w| w.low()),
            high: window.and_then(|w| w.high()),
            mid: window.and_then(|w| w.mid()),
            pending_restart: self.pending_restart,
        }
    }

    fn ensure_not_ended(&self, command: &'static str) -> Result<()> {
        if self.phase == GamePhase::Ended {
            return Err(GameError::InvalidState {
                command,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn begin_round(&mut self, challenge: Challenge) {
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Active;
            self.clock.start();
            log::info!(
                "Session started: {}s, {} attempts per round (seed {})",
                self.time_remaining,
                self.config.max_attempts,
                self.rng_state.seed
            );
        }
        self.pending_restart = None;

        let round = Round::new(challenge);
        log::debug!(
            "Round started: {} values, target {}",
            round.challenge.len(),
            round.challenge.target()
        );
        self.emit(GameEvent::RoundStarted {
            values: round.challenge.values().to_vec(),
            target: round.challenge.target(),
        });
        self.round = Some(round);
    }

    fn schedule_restart(&mut self) {
        let delay_ms = self.config.auto_restart_delay_ms;
        self.pending_restart = Some(PendingRestart {
            difficulty: self.difficulty,
            delay_ms,
        });
        self.emit(GameEvent::RestartScheduled { delay_ms });
    }

    fn end_session(&mut self) -> GameEvent {
        self.phase = GamePhase::Ended;
        // Session end wins over a round waiting to restart
        self.pending_restart = None;
        self.clock.finish();
        log::info!("Time's up! Final score: {}", self.score);

        let event = GameEvent::SessionEnded {
            final_score: self.score,
        };
        self.emit(event.clone());
        event
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GuessingGameEngine {
        GuessingGameEngine::new(GameConfig::default(), 12345).unwrap()
    }

    fn scenario_challenge() -> Challenge {
        Challenge::new(vec![3, 7, 9, 12, 18, 21, 25, 30, 42, 50], 21).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            max_attempts: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            GuessingGameEngine::new(config, 1),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.attempts(), 0);
        assert!(engine.round().is_none());
        assert!(!engine.controls_enabled());
        assert_eq!(engine.seed(), 12345);
    }

    #[test]
    fn test_start_round_activates_session() {
        let mut engine = engine();
        engine.start_round(Difficulty::default()).unwrap();

        assert_eq!(engine.phase(), GamePhase::Active);
        assert!(engine.clock().is_running());
        assert!(engine.controls_enabled());

        let challenge = engine.challenge().unwrap();
        assert_eq!(challenge.len(), 10);
        assert_eq!(engine.window().unwrap().mid(), Some(4));

        let events = engine.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::RoundStarted {
                values: challenge_values(&engine),
                target: engine.challenge().unwrap().target(),
            }]
        );
    }

    fn challenge_values(engine: &GuessingGameEngine) -> Vec<i32> {
        engine.challenge().unwrap().values().to_vec()
    }

    #[test]
    fn test_start_round_rejects_bad_difficulty_without_state_change() {
        let mut engine = engine();
        let err = engine.start_round(Difficulty::new(0, 1, 10)).unwrap_err();
        assert!(matches!(err, GameError::InvalidDifficulty { .. }));
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_scenario_right_left_middle() {
        let mut engine = engine();
        engine.start_round_with(scenario_challenge()).unwrap();
        assert_eq!(engine.window().unwrap().mid(), Some(4));

        let event = engine.guess(Direction::Right).unwrap();
        assert_eq!(event, GameEvent::WindowNarrowed { low: 5, high: 9, mid: 7 });

        let event = engine.guess(Direction::Left).unwrap();
        assert_eq!(event, GameEvent::WindowNarrowed { low: 5, high: 6, mid: 5 });

        let event = engine.guess(Direction::Middle).unwrap();
        assert_eq!(event, GameEvent::Found { index: 5, score_delta: 70 });
        assert_eq!(engine.attempts(), 3);
        assert_eq!(engine.score(), 70);
        assert!(!engine.controls_enabled());
        assert_eq!(
            engine.pending_restart(),
            Some(PendingRestart {
                difficulty: Difficulty::default(),
                delay_ms: 2000,
            })
        );
    }

    #[test]
    fn test_found_checks_mid_regardless_of_direction() {
        let mut engine = engine();
        engine
            .start_round_with(Challenge::new(vec![1, 2, 3], 2).unwrap())
            .unwrap();
        let event = engine.guess(Direction::Left).unwrap();
        assert_eq!(event, GameEvent::Found { index: 1, score_delta: 90 });
    }

    #[test]
    fn test_wrong_direction_exhausts_window() {
        let mut engine = engine();
        engine
            .start_round_with(Challenge::new(vec![1, 2], 2).unwrap())
            .unwrap();
        assert_eq!(engine.guess(Direction::Left).unwrap(), GameEvent::NotFound);
        assert_eq!(engine.score(), 0);
        assert!(engine.pending_restart().is_some());
        assert_eq!(engine.guess(Direction::Right), Err(GameError::RoundResolved));
        assert_eq!(engine.attempts(), 1);
    }

    #[test]
    fn test_middle_miss_counts_attempt_without_narrowing() {
        let mut engine = engine();
        engine
            .start_round_with(Challenge::new((1..=10).collect(), 1).unwrap())
            .unwrap();
        let before = engine.window().unwrap();

        let event = engine.guess(Direction::Middle).unwrap();
        assert_eq!(event, GameEvent::WindowNarrowed { low: 0, high: 9, mid: 4 });
        assert_eq!(engine.window().unwrap(), before);
        assert_eq!(engine.attempts(), 1);
    }

    #[test]
    fn test_attempts_exhausted_on_max() {
        let mut engine = engine();
        engine
            .start_round_with(Challenge::new((1..=10).collect(), 1).unwrap())
            .unwrap();
        for attempt in 1..10 {
            let event = engine.guess(Direction::Middle).unwrap();
            assert!(matches!(event, GameEvent::WindowNarrowed { .. }), "attempt {attempt}");
        }
        assert_eq!(engine.guess(Direction::Middle).unwrap(), GameEvent::AttemptsExhausted);
        assert_eq!(engine.attempts(), 10);
        assert_eq!(engine.guess(Direction::Middle), Err(GameError::RoundResolved));
    }

    #[test]
    fn test_resolution_emits_restart_intent() {
        let mut engine = engine();
        engine.start_round_with(scenario_challenge()).unwrap();
        engine.drain_events();

        engine.guess(Direction::Right).unwrap();
        engine.guess(Direction::Left).unwrap();
        engine.guess(Direction::Middle).unwrap();

        let events = engine.drain_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], GameEvent::Found { index: 5, score_delta: 70 });
        assert_eq!(events[3], GameEvent::RestartScheduled { delay_ms: 2000 });
    }

    #[test]
    fn test_run_pending_restart_keeps_score() {
        let mut engine = engine();
        engine.start_round_with(scenario_challenge()).unwrap();
        engine.guess(Direction::Right).unwrap();
        engine.guess(Direction::Left).unwrap();
        engine.guess(Direction::Middle).unwrap();

        assert!(engine.run_pending_restart().unwrap());
        assert_eq!(engine.phase(), GamePhase::Active);
        assert_eq!(engine.attempts(), 0);
        assert_eq!(engine.score(), 70);
        assert!(engine.controls_enabled());
        assert!(engine.pending_restart().is_none());

        // Nothing left to run
        assert!(!engine.run_pending_restart().unwrap());
    }

    #[test]
    fn test_round_from_json_challenge() {
        let mut engine = engine();
        assert!(serde_json::from_str::<Challenge>(r#"{"values":[],"target":5}"#).is_err());

        let challenge: Challenge =
            serde_json::from_str(r#"{"values":[1,4,9],"target":4}"#).unwrap();
        engine.start_round_with(challenge).unwrap();
        assert!(engine.controls_enabled());
        assert_eq!(
            engine.guess(Direction::Middle).unwrap(),
            GameEvent::Found { index: 1, score_delta: 90 }
        );
    }

    #[test]
    fn test_guess_while_idle_is_rejected() {
        let mut engine = engine();
        assert_eq!(
            engine.guess(Direction::Left),
            Err(GameError::InvalidState {
                command: "guess",
                phase: GamePhase::Idle,
            })
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_tick_counts_down_and_ends_session() {
        let config = GameConfig {
            session_seconds: 3,
            ..GameConfig::default()
        };
        let mut engine = GuessingGameEngine::new(config, 9).unwrap();
        assert!(engine.tick().is_err());

        engine.start_round_with(scenario_challenge()).unwrap();
        assert_eq!(engine.tick().unwrap(), GameEvent::Tick { time_remaining: 2 });
        assert_eq!(engine.tick().unwrap(), GameEvent::Tick { time_remaining: 1 });
        assert_eq!(engine.tick().unwrap(), GameEvent::SessionEnded { final_score: 0 });

        assert_eq!(engine.phase(), GamePhase::Ended);
        assert!(engine.clock().is_finished());
        assert!(matches!(engine.tick(), Err(GameError::InvalidState { .. })));
        assert!(matches!(
            engine.start_round(Difficulty::default()),
            Err(GameError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_session_end_cancels_pending_restart() {
        let config = GameConfig {
            session_seconds: 1,
            ..GameConfig::default()
        };
        let mut engine = GuessingGameEngine::new(config, 9).unwrap();
        engine
            .start_round_with(Challenge::new(vec![5], 5).unwrap())
            .unwrap();
        engine.guess(Direction::Middle).unwrap();
        assert!(engine.pending_restart().is_some());

        engine.tick().unwrap();
        assert!(engine.pending_restart().is_none());
        assert!(!engine.run_pending_restart().unwrap());
        assert_eq!(engine.phase(), GamePhase::Ended);
        assert_eq!(engine.score(), 90);
    }

    #[test]
    fn test_advance_time_drives_ticks() {
        let mut engine = engine();
        assert_eq!(engine.advance_time(5000).unwrap(), None);

        engine.start_round(Difficulty::default()).unwrap();
        assert_eq!(engine.advance_time(600).unwrap(), None);
        assert_eq!(
            engine.advance_time(600).unwrap(),
            Some(GameEvent::Tick { time_remaining: 59 })
        );
        // A long stall costs one second, not thirty
        assert_eq!(
            engine.advance_time(30_000).unwrap(),
            Some(GameEvent::Tick { time_remaining: 58 })
        );
    }

    #[test]
    fn test_reset_session_is_idempotent() {
        let mut engine = engine();
        engine.start_round_with(scenario_challenge()).unwrap();
        engine.guess(Direction::Right).unwrap();
        engine.tick().unwrap();

        engine.reset_session();
        let once = engine.snapshot();
        engine.reset_session();
        assert_eq!(engine.snapshot(), once);

        assert_eq!(once.phase, GamePhase::Idle);
        assert_eq!(once.score, 0);
        assert_eq!(once.attempts, 0);
        assert_eq!(once.time_remaining, 60);
        assert!(!engine.clock().is_running());
    }

    #[test]
    fn test_reset_after_end_allows_new_session() {
        let config = GameConfig {
            session_seconds: 1,
            ..GameConfig::default()
        };
        let mut engine = GuessingGameEngine::new(config, 3).unwrap();
        engine.start_round(Difficulty::default()).unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.phase(), GamePhase::Ended);

        engine.reset_session();
        assert_eq!(engine.phase(), GamePhase::Idle);
        engine.start_round(Difficulty::default()).unwrap();
        assert_eq!(engine.phase(), GamePhase::Active);
        assert_eq!(engine.time_remaining(), 1);
    }

    #[test]
    fn test_snapshot_reflects_round() {
        let mut engine = engine();
        engine.start_round_with(scenario_challenge()).unwrap();
        engine.guess(Direction::Right).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.values, vec![3, 7, 9, 12, 18, 21, 25, 30, 42, 50]);
        assert_eq!(snapshot.target, Some(21));
        assert_eq!((snapshot.low, snapshot.high, snapshot.mid), (Some(5), Some(9), Some(7)));
        assert_eq!(snapshot.attempts, 1);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"phase\":\"Active\""));
    }

    #[test]
    fn test_same_seed_same_challenges() {
        let mut a = engine();
        let mut b = engine();
        for _ in 0..5 {
            a.start_round(Difficulty::default()).unwrap();
            b.start_round(Difficulty::default()).unwrap();
            assert_eq!(a.challenge(), b.challenge());
        }
    }
}
