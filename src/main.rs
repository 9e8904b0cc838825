//! Grid Snake entry point
//!
//! The browser build runs the game on a canvas; the native build plays one
//! headless session with the autopilot on a virtual clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use grid_snake::consts::LEVEL_COLORS;
    use grid_snake::input::{Command, command_for_key, command_for_key_code, command_for_pointer};
    use grid_snake::persistence::{MemoryStorage, Storage};
    use grid_snake::platform::{LocalStorage, now_ms};
    use grid_snake::renderer::RenderState;
    use grid_snake::sim::GamePhase;
    use grid_snake::ui::{Scene, Scoreboard, game_over_message};
    use grid_snake::{GameEvent, Settings, level_color};

    type Engine = grid_snake::Game<Box<dyn Storage>>;

    /// Browser-side wrapper around the engine
    struct App {
        engine: Engine,
        settings: Settings,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Feed the frame timestamp to the engine and react to what happened
        fn update(&mut self, now: f64) {
            self.engine.poll(now);
            self.drain_events();
        }

        fn handle(&mut self, command: Command) {
            self.engine.handle(command, now_ms());
            self.drain_events();
        }

        fn drain_events(&mut self) {
            for event in self.engine.take_events() {
                match event {
                    GameEvent::LevelUp { level, speed_ms } => {
                        log::info!("Level {} ({:.1} ms/tick)", level, speed_ms);
                        self.set_background(level_color(level));
                    }
                    GameEvent::GameOver { score, .. } => {
                        self.set_background(LEVEL_COLORS[0]);
                        // Paint the reset board, then block on the notice
                        self.render();
                        self.update_hud();
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&game_over_message(score));
                        }
                    }
                    _ => {}
                }
            }
        }

        fn set_background(&self, color: &str) {
            let _ = self.canvas.style().set_property("background-color", color);
        }

        /// Render the current frame
        fn render(&mut self) {
            let scene = Scene::from_state(self.engine.state(), self.engine.grid());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let board = Scoreboard::from_state(self.engine.state());

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&board.score));
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&board.level));
            }
            if let Some(el) = document.get_element_by_id("hud-time") {
                el.set_text_content(Some(&board.time));
            }

            if let Some(el) = document.get_element_by_id("overlay") {
                let scene = Scene::from_state(self.engine.state(), self.engine.grid());
                match scene.overlay {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Pointer position relative to the canvas, plus the canvas size
        fn pointer(&self, client_x: i32, client_y: i32) -> (Vec2, Vec2) {
            let rect = self.canvas.get_bounding_client_rect();
            let point = Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            );
            let surface = Vec2::new(rect.width() as f32, rect.height() as f32);
            (point, surface)
        }
    }

    /// LocalStorage when the browser allows it, an in-memory store otherwise
    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; progress will not survive a reload", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Grid Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let storage = open_storage();
        let settings = Settings::load(&storage);
        let grid = settings.grid();

        // Board size in CSS pixels, backing store scaled by DPR
        let dpr = window.device_pixel_ratio();
        let width = (grid.width as f64 * dpr) as u32;
        let height = (grid.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", grid.width));
        let _ = style.set_property("height", &format!("{}px", grid.height));

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let engine = Engine::new(&settings, storage, seed, now_ms());
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            engine,
            settings,
            render_state: None,
            canvas: canvas.clone(),
        }));
        {
            let a = app.borrow();
            a.set_background(level_color(a.engine.state().level));
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                let board = (grid.width as f32, grid.height as f32);
                match RenderState::new(surface, &adapter, width, height, board).await {
                    Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Failed to create device: {}", e),
                }
            }
            Err(e) => log::error!("No GPU adapter: {}", e),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_auto_pause(app.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(app);

        log::info!("Grid Snake running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let (touch_controls, mouse_controls) = {
            let a = app.borrow();
            (a.settings.touch_controls, a.settings.mouse_controls)
        };

        // Keyboard
        if let Some(window) = web_sys::window() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let command = match command_for_key(&event.key()) {
                    Command::None => command_for_key_code(event.key_code()),
                    command => command,
                };
                if let Command::SetDirection(_) = command {
                    // Keep arrows from scrolling the page
                    event.prevent_default();
                }
                if command != Command::None {
                    app.borrow_mut().handle(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch zones
        if touch_controls {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let (point, surface) = a.pointer(touch.client_x(), touch.client_y());
                    a.handle(command_for_pointer(point, surface));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse zones
        if mouse_controls {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let (point, surface) = a.pointer(event.client_x(), event.client_y());
                a.handle(command_for_pointer(point, surface));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.update(now_ms());
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        if !app.borrow().settings.auto_pause {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.engine.phase() == GamePhase::Running {
                        a.engine.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
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
                let mut a = app.borrow_mut();
                if a.engine.phase() == GamePhase::Running {
                    a.engine.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use grid_snake::autopilot::choose_direction;
    use grid_snake::platform::FileStorage;
    use grid_snake::sim::GamePhase;
    use grid_snake::{Game, GameEvent, Settings};

    const DEFAULT_SAVE_DIR: &str = ".snake-save";
    const DEFAULT_MAX_TICKS: u64 = 10_000;

    /// Play until the first game over or the tick cap
    pub fn run() -> Result<(), grid_snake::persistence::StorageError> {
        let dir = std::env::var("SNAKE_SAVE_DIR").unwrap_or_else(|_| DEFAULT_SAVE_DIR.into());
        let max_ticks = std::env::var("SNAKE_MAX_TICKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TICKS);

        let storage = FileStorage::open(&dir)?;
        log::info!("Saving to {}", storage.dir().display());
        let settings = Settings::load(&storage);
        let seed = settings.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        log::info!("Seed: {}", seed);

        // Virtual clock: jump straight to each deadline
        let mut now = 0.0;
        let mut game = Game::new(&settings, storage, seed, now);
        match game.phase() {
            GamePhase::Paused => game.resume(now),
            GamePhase::NotStarted | GamePhase::GameOver => {
                let direction = choose_direction(game.state(), game.grid());
                game.set_direction(direction, now);
            }
            GamePhase::Running => {}
        }

        let mut ticks = 0u64;
        let mut final_score = None;
        while ticks < max_ticks && final_score.is_none() {
            let Some(deadline) = game.next_tick_at() else {
                log::warn!("No tick scheduled; stopping");
                break;
            };
            now = deadline;

            let direction = choose_direction(game.state(), game.grid());
            game.set_direction(direction, now);
            game.poll(now);

            for event in game.take_events() {
                match event {
                    GameEvent::Ticked => ticks += 1,
                    GameEvent::LevelUp { level, speed_ms } => {
                        log::info!("Level {} ({:.1} ms/tick)", level, speed_ms);
                    }
                    GameEvent::GameOver { score, cause } => {
                        log::info!("Game Over! Your score: {} ({})", score, cause.as_str());
                        final_score = Some(score);
                    }
                    _ => {}
                }
            }
        }
        game.stop();

        match final_score {
            Some(score) => log::info!("Finished after {} ticks, score {}", ticks, score),
            None => {
                let state = game.state();
                log::info!(
                    "Stopped after {} ticks: score {}, level {}, {}s; session saved",
                    ticks,
                    state.score,
                    state.level,
                    state.elapsed_time
                );
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grid Snake (native, headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
