//! Falling Catch entry point
//!
//! In the browser: wires the name form, pointer, buttons and the
//! `requestAnimationFrame` driver around `GameLoop`. Natively: runs a
//! headless autopilot session and optionally submits its score.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, PageTransitionEvent};

    use falling_catch::platform::{self, LocalStore};
    use falling_catch::renderer::CanvasRenderer;
    use falling_catch::sim::GamePhase;
    use falling_catch::submission::{FeedbackKind, ScoreClient};
    use falling_catch::{FrameOutcome, FrameTicket, GameConfig, GameLoop, SessionSummary};

    struct Game {
        game_loop: GameLoop<LocalStore>,
        renderer: CanvasRenderer,
        client: Option<ScoreClient>,
        /// Pending requestAnimationFrame handle
        frame_request: Option<i32>,
    }

    impl Game {
        /// Drop the scheduled browser frame, if any
        fn cancel_frame(&mut self) {
            if let Some(id) = self.frame_request.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.game_loop.state();

            let name_set = state.player_name.is_some();
            set_hidden(&document, "name-entry", name_set);
            set_hidden(&document, "game-screen", !name_set);

            if let Some(el) = document.get_element_by_id("scoreboard") {
                let name = state
                    .player_name
                    .as_ref()
                    .map(|n| n.as_str())
                    .unwrap_or_default();
                el.set_text_content(Some(&format!(
                    "Player: {} | Score: {} | High score: {}",
                    name,
                    state.score,
                    self.game_loop.high_score()
                )));
            }

            let over = state.phase == GamePhase::GameOver;
            set_hidden(&document, "game-over", !over);
            set_hidden(&document, "game-over-actions", !over);

            if let Some(el) = document.get_element_by_id("feedback") {
                match self.game_loop.feedback() {
                    Some(feedback) => {
                        let class = match feedback.kind {
                            FeedbackKind::Success => "feedback success",
                            FeedbackKind::Failure => "feedback failure",
                        };
                        let _ = el.set_attribute("class", class);
                        el.set_text_content(Some(&feedback.text));
                    }
                    None => {
                        let _ = el.set_attribute("class", "feedback hidden");
                        el.set_text_content(None);
                    }
                }
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Falling Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let storage = LocalStore::open();
        let config = GameConfig::load(&storage);
        let renderer = CanvasRenderer::new(canvas.clone(), &config).expect("Failed to set up canvas");

        // Scores go to the API on the same origin
        let client = match window.location().origin() {
            Ok(origin) => match ScoreClient::new(&origin) {
                Ok(client) => Some(client),
                Err(e) => {
                    log::warn!("Score submission disabled: {}", e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Score submission disabled, no origin: {:?}", e);
                None
            }
        };

        let seed = js_sys::Date::now() as u64;
        let game_loop = GameLoop::new(config, seed, storage).expect("Invalid game config");
        let game = Rc::new(RefCell::new(Game {
            game_loop,
            renderer,
            client,
            frame_request: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_name_form(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_session_buttons(game.clone());
        setup_teardown(game.clone());

        {
            let g = game.borrow();
            g.renderer.render(g.game_loop.state());
            g.update_hud();
        }

        log::info!("Falling Catch running!");
    }

    /// Begin driving frames for a fresh schedule
    fn start_frames(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        game.borrow_mut().cancel_frame();
        request_animation_frame(game, ticket);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let window = web_sys::window().unwrap();
        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, ticket, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.borrow_mut().frame_request = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: FrameTicket, time: f64) {
        let outcome = {
            let g = &mut *game.borrow_mut();
            g.frame_request = None;
            let outcome = g.game_loop.on_frame(ticket, time);
            g.renderer.render(g.game_loop.state());
            g.update_hud();
            outcome
        };

        match outcome {
            FrameOutcome::Continue { ticket, .. } => request_animation_frame(game, ticket),
            FrameOutcome::Finished { summary, .. } => submit_final_score(game, summary),
            FrameOutcome::Cancelled => {}
        }
    }

    /// Send the final score without blocking the page; the session is
    /// already over by the time this resolves
    fn submit_final_score(game: Rc<RefCell<Game>>, summary: SessionSummary) {
        let Some(submission) = summary.submission else {
            return;
        };
        let Some(client) = game.borrow().client.clone() else {
            log::warn!("No score client, final score not submitted");
            return;
        };
        let session = summary.session;

        wasm_bindgen_futures::spawn_local(async move {
            let result = client.send(&submission).await;
            let mut g = game.borrow_mut();
            g.game_loop.submission_settled(session, &result);
            g.update_hud();
        });
    }

    fn setup_name_form(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(form) = document.get_element_by_id("name-form") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();

                let name = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("player-name"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();

                let result = game.borrow_mut().game_loop.start(&name, platform::now_ms());
                match result {
                    Ok(ticket) => start_frames(game.clone(), ticket),
                    Err(e) => log::warn!("Cannot start game: {}", e),
                }
                game.borrow().update_hud();
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let g = &mut *game.borrow_mut();
            let x = g.renderer.pointer_to_field_x(event.client_x() as f64);
            g.game_loop.pointer_moved(x);
        });
        let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_session_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Same player, new session
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let result = game.borrow_mut().game_loop.restart(platform::now_ms());
                match result {
                    Ok(ticket) => start_frames(game.clone(), ticket),
                    Err(e) => log::warn!("Cannot restart: {}", e),
                }
                game.borrow().update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back to the name form
        if let Some(btn) = document.get_element_by_id("new-player-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let g = &mut *game.borrow_mut();
                g.cancel_frame();
                g.game_loop.new_player();
                if let Some(input) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("player-name"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_value("");
                }
                g.renderer.render(g.game_loop.state());
                g.update_hud();
                log::info!("Ready for a new player");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop the loop when the page goes away, pick it up again if the page
    /// comes back from the back/forward cache
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        let hide_game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = hide_game.borrow_mut();
            g.cancel_frame();
            g.game_loop.stop();
            log::info!("Game loop stopped (page hidden)");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();

        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            let ticket = game.borrow_mut().game_loop.resume();
            if let Some(ticket) = ticket {
                start_frames(game.clone(), ticket);
            }
            game.borrow().update_hud();
        });
        let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use falling_catch::platform::MemoryStore;
    use falling_catch::sim::GameState;
    use falling_catch::submission::ScoreClient;
    use falling_catch::{FrameOutcome, GameConfig, GameLoop, SessionSummary};

    /// Frame length at 60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Autopilot paddle speed (world units per frame)
    const AUTOPILOT_SPEED: f32 = 7.0;
    /// Give up on sessions longer than this
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Chase the lowest falling object at a limited speed
    fn autopilot_target(state: &GameState) -> Option<f32> {
        let lowest = state.objects.iter().max_by(|a, b| a.y.total_cmp(&b.y))?;
        let paddle_center = state.paddle.x + state.config.paddle_width / 2.0;
        let object_center = lowest.x + state.config.object_size / 2.0;
        let step = (object_center - paddle_center).clamp(-AUTOPILOT_SPEED, AUTOPILOT_SPEED);
        Some(paddle_center + step)
    }

    fn play(game: &mut GameLoop<MemoryStore>, player: &str) -> anyhow::Result<Option<SessionSummary>> {
        let mut now = 0.0;
        let mut ticket = game.start(player, now)?;

        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            if let Some(x) = autopilot_target(game.state()) {
                game.pointer_moved(x);
            }
            match game.on_frame(ticket, now) {
                FrameOutcome::Continue { ticket: next, .. } => ticket = next,
                FrameOutcome::Finished { summary, .. } => return Ok(Some(summary)),
                FrameOutcome::Cancelled => break,
            }
        }

        game.stop();
        log::info!("Autopilot still alive after {} frames, stopping", MAX_FRAMES);
        Ok(None)
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Falling Catch (native) starting...");
        log::info!("The playable version runs in the browser - build for wasm32 with `trunk serve`");

        let player = std::env::args().nth(1).unwrap_or_else(|| "Autopilot".to_string());
        let seed = std::env::var("FALLING_CATCH_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0x5eed);

        let mut game = GameLoop::new(GameConfig::default(), seed, MemoryStore::new())?;
        let Some(summary) = play(&mut game, &player)? else {
            return Ok(());
        };
        log::info!(
            "Final score {} ({} ticks)",
            summary.score,
            game.state().time_ticks
        );

        let (Some(submission), Ok(api)) = (summary.submission, std::env::var("FALLING_CATCH_API"))
        else {
            return Ok(());
        };

        let client = ScoreClient::new(&api)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let result = runtime.block_on(client.send(&submission));
        if let Some(feedback) = game.submission_settled(summary.session, &result) {
            log::info!("{}", feedback.text);
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use falling_catch::sim::{FallingObject, GamePhase};

        use super::*;

        #[test]
        fn test_autopilot_session_ends() {
            // Objects reach the paddle in under ten frames; the autopilot
            // cannot cover the field that fast
            let config = GameConfig {
                fall_speed: 40.0,
                ..Default::default()
            };
            let mut game = GameLoop::new(config, 7, MemoryStore::new()).unwrap();
            let summary = play(&mut game, "Bot")
                .unwrap()
                .expect("autopilot session should end");

            assert_eq!(game.state().phase, GamePhase::GameOver);
            assert!(game.state().time_ticks < MAX_FRAMES as u64);
            assert_eq!(game.high_score(), summary.score);
            let submission = summary.submission.unwrap();
            assert_eq!(submission.player_name.as_str(), "Bot");
            assert_eq!(submission.score as u32, summary.score);
        }

        #[test]
        fn test_autopilot_chases_lowest_object() {
            let mut state = GameState::new(GameConfig::default(), 7);
            assert_eq!(autopilot_target(&state), None);

            // Paddle centre starts at 300
            state.objects.push(FallingObject { id: 1, x: 0.0, y: 200.0 });
            state.objects.push(FallingObject { id: 2, x: 400.0, y: 10.0 });
            assert_eq!(autopilot_target(&state), Some(300.0 - AUTOPILOT_SPEED));

            state.objects[0].x = 288.0;
            assert_eq!(autopilot_target(&state), Some(303.0));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
