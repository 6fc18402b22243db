//! Neon Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

    use neon_snake::audio::AudioManager;
    use neon_snake::highscores::LocalStorageStore;
    use neon_snake::platform::{command_for_key, dpad_commands, swipe_command};
    use neon_snake::renderer::{RenderState, board_size, build_scene};
    use neon_snake::sim::{Command, Direction, FrameScheduler, Game, GameEvent, GamePhase};
    use neon_snake::Settings;

    /// Everything the browser loop owns
    struct App {
        game: Game,
        scheduler: FrameScheduler,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        start_time: Option<f64>,
        touch_start: Option<(f32, f32)>,
    }

    impl App {
        fn new(settings: Settings, board_w: f32, board_h: f32) -> Self {
            let grid = settings.grid_for_area(board_w, board_h);
            let seed = js_sys::Date::now() as u64;
            let game = Game::new(grid, settings.tuning(), seed, Box::new(LocalStorageStore))
                .with_bursts(settings.bursts());
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            log::info!("Game initialized with seed: {}", seed);
            Self {
                game,
                scheduler: settings.scheduler(),
                render_state: None,
                audio,
                settings,
                start_time: None,
                touch_start: None,
            }
        }

        /// Input arrived: unlock audio (needs a user gesture) and apply
        fn command(&mut self, command: Command) {
            self.audio.unlock();
            self.game.handle(command);
        }

        /// Ticks, then particles, then render, then side effects
        fn frame(&mut self, time: f64) {
            let start = *self.start_time.get_or_insert(time);
            self.scheduler.frame(time, &mut self.game);
            self.render(((time - start) / 1000.0) as f32);
            self.dispatch_events();
        }

        fn render(&mut self, time_secs: f32) {
            let vertices = build_scene(&self.game, self.settings.cell_size, time_secs);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Route queued game events to audio and the DOM
        fn dispatch_events(&mut self) {
            let events = self.game.drain_events();
            if events.is_empty() {
                return;
            }
            let Some(document) = document() else { return };

            for event in events {
                match event {
                    GameEvent::Sound(effect) => self.audio.play(effect),
                    GameEvent::ScoreChanged { score, high_score } => {
                        set_text(&document, "score-val", &score.to_string());
                        set_text(&document, "best-val", &high_score.to_string());
                    }
                    GameEvent::PhaseChanged(phase) => match phase {
                        GamePhase::Playing => show_overlay(&document, None),
                        GamePhase::Paused => show_overlay(&document, Some("overlay-pause")),
                        GamePhase::Start | GamePhase::GameOver => {}
                    },
                    GameEvent::GameOver(summary) => {
                        let mut text = format!("SCORE: {}", summary.score);
                        if summary.new_best {
                            text.push_str("  🏆 NEW BEST!");
                        }
                        set_text(&document, "over-score-text", &text);
                        show_overlay(&document, Some("overlay-over"));
                    }
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show_overlay(document: &Document, id: Option<&str>) {
        for name in ["overlay-start", "overlay-over", "overlay-pause"] {
            if let Some(el) = document.get_element_by_id(name) {
                let _ = el.class_list().remove_1("show");
            }
        }
        if let Some(el) = id.and_then(|id| document.get_element_by_id(id)) {
            let _ = el.class_list().add_1("show");
        }
    }

    fn offset_height(document: &Document, id: &str) -> f32 {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map_or(0.0, |el| el.offset_height() as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Neon Snake starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game canvas found");
            return;
        };

        // Board fits between the HUD and the d-pad
        let settings = Settings::load();
        let inner_w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(500.0) as f32;
        let inner_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(500.0) as f32;
        let avail_h = inner_h - offset_height(&document, "hud") - offset_height(&document, "dpad") - 8.0;
        let app = Rc::new(RefCell::new(App::new(settings, inner_w, avail_h)));

        let (board_w, board_h) = {
            let a = app.borrow();
            board_size(&a.game, a.settings.cell_size)
        };
        let dpr = window.device_pixel_ratio();
        let width = (board_w as f64 * dpr) as u32;
        let height = (board_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        if let Some(el) = canvas.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property("width", &format!("{board_w}px"));
            let _ = el.style().set_property("height", &format!("{board_h}px"));
        }

        {
            let a = app.borrow();
            set_text(&document, "best-val", &a.game.high_score().to_string());
        }
        show_overlay(&document, Some("overlay-start"));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height, (board_w, board_h)).await {
                            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_dpad(app.clone());
        setup_swipe(&canvas, app.clone());
        setup_auto_pause(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Neon Snake running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if let Some(command) = command_for_key(&key) {
                if matches!(command, Command::SetDirection(_) | Command::StartOrRetry) {
                    event.prevent_default();
                }
                app.borrow_mut().command(command);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };
        let buttons = [
            ("btn-start", Command::StartOrRetry),
            ("btn-retry", Command::StartOrRetry),
            ("btn-resume", Command::Resume),
            ("btn-pause", Command::TogglePause),
        ];
        for (id, command) in buttons {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().command(command);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_dpad(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };
        let pads = [
            ("d-up", Direction::Up),
            ("d-down", Direction::Down),
            ("d-left", Direction::Left),
            ("d-right", Direction::Right),
        ];
        for (id, dir) in pads {
            let Some(btn) = document.get_element_by_id(id) else { continue };
            for event_name in ["touchstart", "mousedown"] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    let mut a = app.borrow_mut();
                    for command in dpad_commands(dir) {
                        a.command(command);
                    }
                });
                let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_swipe(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Touch start - remember where the finger landed
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    a.audio.unlock();
                    a.touch_start = Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - classify as tap or swipe
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let Some((x0, y0)) = a.touch_start.take() else { return };
                if let Some(touch) = event.changed_touches().get(0) {
                    let dx = touch.client_x() as f32 - x0;
                    let dy = touch.client_y() as f32 - y0;
                    a.command(swipe_command(dx, dy));
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().game.handle(Command::FocusLost);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.handle(Command::FocusLost);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Snake (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let summary = headless::run_demo();
    println!(
        "Demo session finished: score {} (best {}){}",
        summary.score,
        summary.high_score,
        if summary.new_best { " - new best!" } else { "" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted autopilot session driven through the real frame scheduler
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_snake::highscores::{FileStore, HighScoreStore, MemoryStore};
    use neon_snake::sim::{Command, Direction, Game, GamePhase, Session, SessionSummary};
    use neon_snake::Settings;

    /// 60 Hz frames
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    pub fn run_demo() -> SessionSummary {
        let settings = Settings::load();
        let store: Box<dyn HighScoreStore> = match std::env::var("NEON_SNAKE_HIGH_SCORE_FILE") {
            Ok(path) => Box::new(FileStore::new(path)),
            Err(_) => Box::new(MemoryStore::new()),
        };
        let seed = std::env::var("NEON_SNAKE_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2024);

        let grid = settings.grid_for_area(settings.max_board_size, settings.max_board_size);
        let mut game = Game::new(grid, settings.tuning(), seed, store).with_bursts(settings.bursts());
        let mut scheduler = settings.scheduler();
        game.handle(Command::StartOrRetry);

        let mut frame = 0;
        while game.phase() == GamePhase::Playing && frame < MAX_FRAMES {
            if let Some(dir) = game.session().and_then(|s| steer(s, game.grid())) {
                game.handle(Command::SetDirection(dir));
            }
            scheduler.frame(frame as f64 * FRAME_MS, &mut game);
            for event in game.drain_events() {
                log::debug!("{:?}", event);
            }
            frame += 1;
        }

        game.summary().unwrap_or(SessionSummary {
            score: game.score(),
            high_score: game.high_score(),
            new_best: false,
        })
    }

    /// Greedy: head toward the food along a safe axis, else any safe move
    fn steer(session: &Session, grid: &neon_snake::sim::Grid) -> Option<Direction> {
        let head = session.snake.head();
        let safe = |dir: Direction| {
            let next = head.step(dir);
            !session.dir.is_reversal(dir) && grid.contains(next) && !session.snake.contains(next)
        };

        let mut preferred = Vec::with_capacity(4);
        if session.food.x > head.x {
            preferred.push(Direction::Right);
        } else if session.food.x < head.x {
            preferred.push(Direction::Left);
        }
        if session.food.y > head.y {
            preferred.push(Direction::Down);
        } else if session.food.y < head.y {
            preferred.push(Direction::Up);
        }
        preferred.extend([session.dir, Direction::Up, Direction::Down, Direction::Left, Direction::Right]);
        preferred.into_iter().find(|&dir| safe(dir))
    }
}
