//! Road Rush entry point
//!
//! Wires the DOM (canvas, HUD counters, buttons, keyboard) to the
//! simulation loop and the telemetry/best-score collaborators.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, KeyboardEvent};

    use road_rush::consts::*;
    use road_rush::identity;
    use road_rush::render::Renderer;
    use road_rush::scores::BestScore;
    use road_rush::sim::{FrameClock, GameEvent, GamePhase, GameState, TickInput, tick};
    use road_rush::telemetry::{HttpSink, Telemetry};

    /// Backend receiver for gameplay telemetry
    const SERVER_URL: &str = "http://localhost:3000";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        input: TickInput,
        telemetry: Telemetry<HttpSink>,
        best: BestScore,
        renderer: Renderer,
    }

    impl Game {
        fn new(seed: u64, renderer: Renderer) -> Self {
            Self {
                state: GameState::new(seed),
                clock: FrameClock::new(),
                input: TickInput::default(),
                telemetry: Telemetry::new(identity::player_id(), HttpSink::new(SERVER_URL)),
                best: BestScore::load(),
                renderer,
            }
        }

        /// Start or restart a session with a fresh identifier
        fn start(&mut self, restart: bool) {
            let session = uuid::Uuid::new_v4().to_string();
            log::info!("Session {session} starting (restart: {restart})");
            self.state.start_session(session, restart);
            self.clock.reset();
            self.input = TickInput::default();
            self.flush_events();
        }

        /// Run one animation frame
        fn frame(&mut self, now_ms: f64) {
            let dt = self.clock.tick(now_ms);
            self.input.now_ms = now_ms;
            let input = self.input;
            tick(&mut self.state, &input, dt);

            // Clear one-shot inputs after processing
            self.input.pause = false;

            self.flush_events();
            self.renderer.draw(&self.state);
            self.update_hud();
        }

        /// Dispatch pending sim events; a session end also settles the
        /// best-score slot
        fn flush_events(&mut self) {
            for event in self.state.take_events() {
                self.telemetry.emit(&self.state, &event);

                if let GameEvent::GameEnd { final_score, .. } = event {
                    log::info!("Session over, final score {final_score}");
                    if let Some(best) = self.best.record(final_score) {
                        self.telemetry.emit_high_score(&self.state, best);
                    }
                }
            }
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.displayed_score().to_string()));
            }
            if let Some(el) = document.get_element_by_id("coins") {
                el.set_text_content(Some(&self.state.coin_count.to_string()));
            }
            if let Some(el) = document.get_element_by_id("best") {
                el.set_text_content(Some(&self.best.best().to_string()));
            }

            if let Some(el) = document.get_element_by_id("status") {
                let status = match self.state.phase {
                    GamePhase::Idle => "",
                    GamePhase::Running => "Running...",
                    GamePhase::Paused => "Paused",
                    GamePhase::Ended => "Crashed!",
                };
                el.set_text_content(Some(status));
            }

            if let Some(btn) = button(&document, "btnRestart") {
                btn.set_disabled(!self.state.can_restart());
            }
            if let Some(btn) = button(&document, "btnPause") {
                let label = if self.state.phase == GamePhase::Paused {
                    "Resume"
                } else {
                    "Pause"
                };
                btn.set_text_content(Some(label));
            }
        }
    }

    fn button(document: &Document, id: &str) -> Option<HtmlButtonElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Road Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("c")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_W as u32);
        canvas.set_height(CANVAS_H as u32);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Renderer::new(ctx))));
        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());

        // Draw the idle scene and current best before the first session
        {
            let g = game.borrow();
            g.renderer.draw(&g.state);
            g.update_hud();
        }

        request_animation_frame(game);

        log::info!("Road Rush running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Held steering keys; two physical bindings per direction
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" => g.input.left = true,
                    "ArrowRight" | "d" => g.input.right = true,
                    key if key.eq_ignore_ascii_case("p") => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" => g.input.left = false,
                    "ArrowRight" | "d" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Start: only from Idle or after a crash; never interrupts a live session
        if let Some(btn) = document.get_element_by_id("btnStart") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if matches!(g.state.phase, GamePhase::Running | GamePhase::Paused) {
                    return;
                }
                g.start(false);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart: same reset sequence, allowed to interrupt anything
        if let Some(btn) = document.get_element_by_id("btnRestart") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start(true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause toggle; the sim ignores it without a live session
        if let Some(btn) = document.get_element_by_id("btnPause") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Rush (native) starting...");
    log::info!("The game loop needs a browser - run with `trunk serve` for the web version");

    // Smoke-check the simulation outside the browser
    smoke_test();
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_test() {
    use road_rush::consts::NOMINAL_FRAME_MS;
    use road_rush::sim::{GameState, TickInput, tick};

    let mut state = GameState::new(42);
    state.start_session("smoke".into(), false);
    let _ = state.take_events();

    for frame in 0..600 {
        let input = TickInput {
            now_ms: frame as f64 * NOMINAL_FRAME_MS,
            ..Default::default()
        };
        tick(&mut state, &input, 1.0);
        let _ = state.take_events();
    }

    println!(
        "✓ 600 frames simulated: score {}, {} enemies on the road",
        state.displayed_score(),
        state.enemies.len()
    );
}
