//! Binary Search Challenge entry point
//!
//! Browser: binds the game widget's buttons, keyboard and timers to the engine.
//! Native: plays one session headlessly with the autoplayer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, KeyboardEvent, MouseEvent};

    use search_challenge::consts::CLOCK_PERIOD_MS;
    use search_challenge::sim::{Direction, GameEvent, GamePhase, GuessingGameEngine};
    use search_challenge::ui::{self, Feedback};
    use search_challenge::{GameConfig, GameError};

    /// Game instance holding the engine and the host timers driving it
    struct Game {
        engine: GuessingGameEngine,
        /// setInterval handle for the session clock
        clock_handle: Option<i32>,
        /// setTimeout handle for a scheduled round restart
        restart_handle: Option<i32>,
        /// Timer callbacks, created once and reused for every timer
        clock_callback: Option<js_sys::Function>,
        restart_callback: Option<js_sys::Function>,
    }

    impl Game {
        fn new(engine: GuessingGameEngine) -> Self {
            Self {
                engine,
                clock_handle: None,
                restart_handle: None,
                clock_callback: None,
                restart_callback: None,
            }
        }

        fn cancel_restart(&mut self) {
            if let Some(handle) = self.restart_handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(handle);
                }
            }
        }

        fn stop_clock(&mut self) {
            if let Some(handle) = self.clock_handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Read an optional JSON config from `#game-container[data-config]`
    fn load_config() -> GameConfig {
        let json = document()
            .and_then(|d| d.get_element_by_id("game-container"))
            .and_then(|el| el.get_attribute("data-config"));

        match json {
            Some(json) => match GameConfig::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from page");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring page config: {}", e);
                    GameConfig::default()
                }
            },
            None => GameConfig::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        let seed = js_sys::Date::now() as u64;
        let engine = match GuessingGameEngine::new(load_config(), seed) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Failed to create game engine: {}", e);
                return;
            }
        };
        log::info!("Binary Search Challenge initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(engine)));

        install_timer_callbacks(&game);
        setup_buttons(game.clone());
        setup_keyboard(game.clone());
        render(&game.borrow());
    }

    /// Apply a command's outcome: route events to the page and the host timers
    fn after_command(game: &Rc<RefCell<Game>>, result: Result<(), GameError>) {
        if let Err(e) = result {
            log::warn!("Command rejected: {}", e);
        }

        let events = game.borrow_mut().engine.drain_events();
        for event in &events {
            if let Some(feedback) = ui::feedback_for(event) {
                show_feedback(&feedback);
            }
            match event {
                GameEvent::RestartScheduled { delay_ms } => schedule_restart(game, *delay_ms),
                GameEvent::SessionEnded { .. } => {
                    let mut g = game.borrow_mut();
                    g.stop_clock();
                    g.cancel_restart();
                }
                _ => {}
            }
        }
        render(&game.borrow());
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        let result = {
            let mut g = game.borrow_mut();
            if g.engine.phase() == GamePhase::Ended {
                g.engine.reset_session();
            }
            let difficulty = g.engine.config().difficulty;
            g.engine.start_round(difficulty)
        };
        if result.is_ok() && game.borrow().clock_handle.is_none() {
            start_clock(game);
        }
        after_command(game, result);
    }

    fn reset_game(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.stop_clock();
            g.cancel_restart();
            g.engine.reset_session();
        }
        show_feedback(&Feedback::cleared());
        after_command(game, Ok(()));
    }

    fn make_guess(game: &Rc<RefCell<Game>>, direction: Direction) {
        log::debug!("Guess: {}", direction.as_str());
        let result = game.borrow_mut().engine.guess(direction).map(|_| ());
        after_command(game, result);
    }

    /// Build the clock and restart callbacks. They live as long as the page.
    fn install_timer_callbacks(game: &Rc<RefCell<Game>>) {
        let game_clone = game.clone();
        let clock = Closure::<dyn FnMut()>::new(move || {
            let result = game_clone.borrow_mut().engine.tick().map(|_| ());
            after_command(&game_clone, result);
        });

        let game_clone = game.clone();
        let restart = Closure::<dyn FnMut()>::new(move || {
            game_clone.borrow_mut().restart_handle = None;
            let result = game_clone.borrow_mut().engine.run_pending_restart().map(|_| ());
            after_command(&game_clone, result);
        });

        let mut g = game.borrow_mut();
        g.clock_callback = Some(clock.into_js_value().unchecked_into());
        g.restart_callback = Some(restart.into_js_value().unchecked_into());
    }

    fn start_clock(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut g = game.borrow_mut();
        let Some(callback) = g.clock_callback.clone() else {
            return;
        };
        match window
            .set_interval_with_callback_and_timeout_and_arguments_0(&callback, CLOCK_PERIOD_MS as i32)
        {
            Ok(handle) => g.clock_handle = Some(handle),
            Err(e) => log::error!("Failed to start session clock: {:?}", e),
        }
    }

    fn schedule_restart(game: &Rc<RefCell<Game>>, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut g = game.borrow_mut();
        g.cancel_restart();
        let Some(callback) = g.restart_callback.clone() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(&callback, delay_ms as i32) {
            Ok(handle) => g.restart_handle = Some(handle),
            Err(e) => log::error!("Failed to schedule next round: {:?}", e),
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        let bindings: [(&str, Box<dyn Fn(&Rc<RefCell<Game>>)>); 5] = [
            ("start-btn", Box::new(start_game)),
            ("reset-btn", Box::new(reset_game)),
            ("left-btn", Box::new(|g: &Rc<RefCell<Game>>| make_guess(g, Direction::Left))),
            ("middle-btn", Box::new(|g: &Rc<RefCell<Game>>| make_guess(g, Direction::Middle))),
            ("right-btn", Box::new(|g: &Rc<RefCell<Game>>| make_guess(g, Direction::Right))),
        ];

        for (id, action) in bindings {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing game control #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                action(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if !game.borrow().engine.controls_enabled() {
                return;
            }
            if let Some(direction) = ui::key_to_direction(&event.key()) {
                event.prevent_default();
                make_guess(&game, direction);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn show_feedback(feedback: &Feedback) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id("game-feedback")) {
            el.set_text_content(Some(&feedback.text));
            el.set_class_name(feedback.tone.class_name());
        }
    }

    fn set_button(document: &Document, id: &str, label: Option<&str>, enabled: bool) {
        let Some(btn) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        if let Some(label) = label {
            btn.set_text_content(Some(label));
        }
        btn.set_disabled(!enabled);
    }

    /// Update the widget from engine state
    fn render(game: &Game) {
        let Some(document) = document() else {
            return;
        };
        let engine = &game.engine;

        if let Some(display) = document.get_element_by_id("array-display") {
            display.set_inner_html("");
            if let Some(challenge) = engine.challenge() {
                for (value, mark) in challenge.values().iter().zip(ui::cell_marks(engine)) {
                    if let Ok(item) = document.create_element("div") {
                        item.set_class_name(mark.class_name());
                        item.set_text_content(Some(&value.to_string()));
                        let _ = display.append_child(&item);
                    }
                }
            }
        }

        if let Some(el) = document.get_element_by_id("target-value") {
            let text = engine
                .challenge()
                .map(|c| c.target().to_string())
                .unwrap_or_default();
            el.set_text_content(Some(&text));
        }
        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&engine.score().to_string()));
        }
        if let Some(el) = document.get_element_by_id("timer") {
            el.set_text_content(Some(&engine.time_remaining().to_string()));
        }

        let (label, enabled) = ui::start_button(engine.phase());
        set_button(&document, "start-btn", Some(label), enabled);
        let controls = engine.controls_enabled();
        for id in ["left-btn", "middle-btn", "right-btn"] {
            set_button(&document, id, None, controls);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Binary Search Challenge (native) starting...");
    log::info!("Native mode plays a headless demo session - use `trunk serve` for the web widget");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    match demo::run(seed) {
        Ok(summary) => println!(
            "\nSession over (seed {}): score {} - {} found, {} missed",
            seed, summary.score, summary.found, summary.missed
        ),
        Err(e) => {
            log::error!("Demo session failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use search_challenge::sim::{Autoplayer, GameEvent, GamePhase, GuessingGameEngine};
    use search_challenge::{GameConfig, Result};

    /// Simulated time the autoplayer spends on each guess
    const THINK_MS: u32 = 700;

    pub struct Summary {
        pub score: u32,
        pub found: u32,
        pub missed: u32,
    }

    pub fn run(seed: u64) -> Result<Summary> {
        let config = GameConfig::default().without_restart_delay();
        let difficulty = config.difficulty;
        let mut engine = GuessingGameEngine::new(config, seed)?;
        let mut player = Autoplayer::new(seed.wrapping_add(1), 0.15);
        let mut summary = Summary {
            score: 0,
            found: 0,
            missed: 0,
        };

        engine.start_round(difficulty)?;
        while engine.phase() == GamePhase::Active {
            if let Some(direction) = player.choose(&engine) {
                engine.guess(direction)?;
            }
            engine.advance_time(THINK_MS)?;

            for event in engine.drain_events() {
                match event {
                    GameEvent::Found { .. } => summary.found += 1,
                    GameEvent::NotFound | GameEvent::AttemptsExhausted => summary.missed += 1,
                    _ => {}
                }
                log::debug!("{:?}", event);
            }
            // Headless: restarts run as soon as they are scheduled
            engine.run_pending_restart()?;
        }

        if let Ok(json) = serde_json::to_string(&engine.snapshot()) {
            log::debug!("Final state: {}", json);
        }
        summary.score = engine.score();
        Ok(summary)
    }
}
