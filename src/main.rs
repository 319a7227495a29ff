//! Disk Rhythm entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, Result, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use disk_rhythm::GameConfig;
    use disk_rhythm::Settings;
    use disk_rhythm::assets;
    use disk_rhythm::audio::{AudioManager, SoundEffect};
    use disk_rhythm::consts::*;
    use disk_rhythm::renderer::RenderState;
    use disk_rhythm::scene::build_scene;
    use disk_rhythm::sim::{GameEvent, GamePhase, GameState, Lane, TickInput, run_frame};

    /// Canvas the renderer draws into; created if the page has none
    const CANVAS_ID: &str = "canvas";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: RenderState,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            run_frame(&mut self.state, &mut self.input, &mut self.accumulator, dt);

            for event in self.state.drain_events() {
                self.handle_event(&event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn handle_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Hit { .. } => self.audio.play(SoundEffect::Hit),
                GameEvent::Miss { broken_combo, .. } if *broken_combo > 0 => {
                    self.audio.play(SoundEffect::Miss)
                }
                GameEvent::ComboMilestone { .. } => self.audio.play(SoundEffect::Milestone),
                GameEvent::Paused => {
                    log::info!("Paused");
                    self.audio.suspend();
                }
                GameEvent::Resumed => {
                    log::info!("Resumed");
                    self.audio.resume();
                }
                GameEvent::DiskSpawned { id, lane } => {
                    log::trace!("Disk {} spawned in lane {}", id, lane.key())
                }
                GameEvent::DiskExpired { id, .. } => log::trace!("Disk {} expired", id),
                GameEvent::Miss { .. } => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let scene = build_scene(&self.state);
            match self.render_state.render(&scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "score", &format!("Score: {}", self.state.score.score));
            set_text(&document, "combo", &format!("Combo: {}", self.state.score.combo));
            set_text(&document, "comboIndicator", self.state.feedback.message_text());

            if self.settings.show_fps {
                set_text(&document, "fps", &format!("{} FPS", self.fps));
            }
        }

        /// Match the drawing buffer to the canvas' CSS size
        fn resize_to_canvas(&mut self) {
            let (width, height) = canvas_pixel_size(&self.canvas);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.render_state.resize(width, height);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn canvas_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn js_err(e: JsValue) -> anyhow::Error {
        anyhow!("{:?}", e)
    }

    /// Find the page's canvas, or append a full-window one to the body
    fn find_or_create_canvas(document: &Document) -> Result<HtmlCanvasElement> {
        if let Some(el) = document.get_element_by_id(CANVAS_ID) {
            return el.dyn_into().map_err(|_| anyhow!("#{} is not a canvas", CANVAS_ID));
        }

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| anyhow!("created element is not a canvas"))?;
        canvas.set_id(CANVAS_ID);
        canvas
            .set_attribute("style", "display:block;width:100vw;height:100vh")
            .map_err(js_err)?;
        document
            .body()
            .context("no document body")?
            .append_child(&canvas)
            .map_err(js_err)?;
        Ok(canvas)
    }

    pub async fn run() -> Result<()> {
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let config = GameConfig::load();

        let canvas = find_or_create_canvas(&document)?;
        let (width, height) = canvas_pixel_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Every asset must arrive before anything runs
        let loaded = assets::load_all(&config.assets).await?;

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("creating surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("requesting adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, &loaded).await?;

        let mut audio = AudioManager::new(&config.settings)?;
        audio.load_music(&loaded.music).await?;

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, config.tuning);
        state.apply_settings(&config.settings);
        log::info!("Game initialized with seed: {}", seed);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            settings: config.settings,
            render_state,
            audio,
            canvas,
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Disk Rhythm running!");
        Ok(())
    }

    /// Show a startup failure where the player will see it
    pub fn report_startup_error(error: &anyhow::Error) {
        log::error!("Startup failed: {:#}", error);
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_text(&document, "comboIndicator", &format!("Failed to start: {}", error));
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            let key = event.key();
            if let Some(lane) = Lane::from_key(&key) {
                g.input.lanes.press(lane);
                // Browsers only start audio after a user gesture
                if g.state.phase == GamePhase::Playing {
                    g.audio.resume();
                }
                return;
            }
            match key.as_str() {
                "Escape" => g.input.pause = true,
                "i" | "I" => {
                    g.input.autoplay = !g.input.autoplay;
                    log::info!("Autoplay: {}", g.input.autoplay);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            game.borrow_mut().resize_to_canvas();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        // No frames run while hidden, so silence the music now
                        g.audio.suspend();
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                if g.state.phase == GamePhase::Playing && !g.input.pause {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus only unmutes; unpausing is left to the player
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Disk Rhythm starting...");

    if let Err(e) = wasm_game::run().await {
        wasm_game::report_startup_error(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Disk Rhythm (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    run_autoplay_demo(60.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a headless session with the demo bot and log how it went
#[cfg(not(target_arch = "wasm32"))]
fn run_autoplay_demo(seconds: f32) {
    use disk_rhythm::GameConfig;
    use disk_rhythm::consts::SIM_DT;
    use disk_rhythm::sim::{GameEvent, GameState, TickInput, tick};

    let config = GameConfig::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);
    let mut state = GameState::new(seed, config.tuning);
    state.apply_settings(&config.settings);

    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    let ticks = (seconds / SIM_DT).round() as u64;
    let mut spawned = 0u32;
    let mut expired = 0u32;
    for _ in 0..ticks {
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::DiskSpawned { .. } => spawned += 1,
                GameEvent::DiskExpired { .. } => expired += 1,
                GameEvent::Miss { lane, broken_combo } => {
                    log::warn!("Bot missed in lane {} (combo {})", lane.key(), broken_combo)
                }
                _ => {}
            }
        }
    }

    log::info!(
        "Autoplay (seed {}): {:.0}s, {} disks spawned, {} expired, score {}, combo {}",
        seed,
        seconds,
        spawned,
        expired,
        state.score.score,
        state.score.combo
    );
}
