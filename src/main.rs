//! Lane Dodger entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use lane_dodger::audio::{AudioManager, SoundEffect};
    use lane_dodger::platform::storage::LocalStorage;
    use lane_dodger::platform::{InputAction, KeyValueStore, action_for_key, steering_for_touch};
    use lane_dodger::renderer::{RenderState, SceneOptions, build_scene};
    use lane_dodger::sim::{GamePhase, Steering};
    use lane_dodger::{Game, GameObserver, Settings, Tuning};

    /// Everything outside the core: audio, settings, DOM overlays
    struct Shell {
        document: Document,
        audio: AudioManager,
        settings: Settings,
        settings_store: LocalStorage,
    }

    impl Shell {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            log::info!("Muted: {}", self.settings.muted);
            if let Err(e) = self.settings.save(&mut self.settings_store) {
                log::warn!("Could not save settings: {e}");
            }
        }
    }

    impl GameObserver for Shell {
        fn on_score_changed(&mut self, score: u64) {
            self.set_text("hud-score", &score.to_string());
        }

        fn on_game_over(&mut self, final_score: u64) {
            self.set_text("final-score", &final_score.to_string());
            self.set_visible("hud", false);
            self.set_visible("game-over", true);
        }

        fn on_new_high_score(&mut self, score: u64) {
            self.set_text("hud-best", &score.to_string());
            self.set_visible("new-record", true);
        }

        fn play_sound(&mut self, effect: SoundEffect) {
            self.audio.play(effect, self.settings.effective_volume());
        }
    }

    /// Game instance holding all state
    struct App {
        game: Game,
        shell: Shell,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// An animation frame callback is pending
        frame_scheduled: bool,
    }

    impl App {
        /// Canvas size in (physical, CSS) pixels
        fn canvas_sizes(&self) -> ((u32, u32), (f32, f32)) {
            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let client_w = self.canvas.client_width().max(0);
            let client_h = self.canvas.client_height().max(0);
            (
                (
                    (client_w as f64 * dpr) as u32,
                    (client_h as f64 * dpr) as u32,
                ),
                (client_w as f32, client_h as f32),
            )
        }

        fn resize(&mut self) {
            let (physical, logical) = self.canvas_sizes();
            self.canvas.set_width(physical.0);
            self.canvas.set_height(physical.1);
            self.game.resize(logical.0, logical.1);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(physical, logical);
            }
        }

        fn start(&mut self) {
            self.shell.audio.init();
            if self.game.start(&mut self.shell) {
                self.shell.set_visible("start-screen", false);
                self.shell.set_visible("game-over", false);
                self.shell.set_visible("new-record", false);
                self.shell.set_visible("hud", true);
            }
        }

        fn steer(&mut self, steering: Steering) {
            self.shell.audio.init();
            self.game.steer(steering, &mut self.shell);
        }

        fn frame(&mut self, time: f64) {
            self.game.frame(time, &mut self.shell);
            self.render();
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let options = SceneOptions::from(&self.shell.settings);
            let vertices = build_scene(&self.game.state, &options);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lane Dodger starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings_store = LocalStorage::new();
        let settings = Settings::load(&settings_store);
        let tuning = settings_store
            .get("lane_dodger_tuning")
            .and_then(|json| match Tuning::from_json(&json) {
                Ok(tuning) => Some(tuning),
                Err(e) => {
                    log::warn!("Ignoring tuning overrides, using defaults: {e}");
                    None
                }
            })
            .unwrap_or_default();

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, tuning, Box::new(LocalStorage::new()));
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            shell: Shell {
                document: document.clone(),
                audio: AudioManager::new(),
                settings,
                settings_store,
            },
            render_state: None,
            canvas: canvas.clone(),
            frame_scheduled: false,
        }));

        {
            let mut a = app.borrow_mut();
            a.resize();
            let best = a.game.high_score.best.to_string();
            a.shell.set_text("hud-best", &best);
            a.shell.set_text("hud-score", "0");
            a.shell.set_visible("start-screen", true);
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let (physical, logical) = app.borrow().canvas_sizes();
                        match RenderState::new(surface, &adapter, physical, logical).await {
                            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_lifecycle(app.clone());

        request_animation_frame(app);

        log::info!("Lane Dodger running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = action_for_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                let mut a = app.borrow_mut();
                match action {
                    InputAction::Steer(steering) => a.steer(steering),
                    InputAction::Start => {
                        if a.game.phase() != GamePhase::Playing {
                            a.start();
                        }
                    }
                    InputAction::ToggleMute => a.shell.toggle_mute(),
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: left half steers left, right half steers right
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut a = app.borrow_mut();
                if a.game.phase() != GamePhase::Playing {
                    a.start();
                    return;
                }
                let rect = canvas_clone.get_bounding_client_rect();
                let x = touch.client_x() as f32 - rect.left() as f32;
                let width = canvas_clone.client_width() as f32;
                a.steer(steering_for_touch(x, width));
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
                app.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().start();
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Stop the frame loop when the page goes away and restart it when the
    /// page comes back from the back/forward cache
    fn setup_lifecycle(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure =
                Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
                    app.borrow_mut().game.clock.stop();
                    log::info!("Frame loop stopped (cached: {})", event.persisted());
                });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            let reschedule = {
                let mut a = app.borrow_mut();
                a.game.clock.resume();
                !a.frame_scheduled
            };
            log::info!("Frame loop resumed");
            if reschedule {
                request_animation_frame(app.clone());
            }
        });
        let _ =
            window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        app.borrow_mut().frame_scheduled = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame_scheduled = false;
            if !a.game.clock.is_running() {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Dodger (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` to play");

    headless::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_dodger::audio::SoundEffect;
    use lane_dodger::platform::default_store;
    use lane_dodger::renderer::{SceneOptions, build_scene};
    use lane_dodger::sim::{GamePhase, GameState, Steering};
    use lane_dodger::{Game, GameObserver, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 120;

    #[derive(Default)]
    struct LogObserver {
        dodges: u32,
        final_score: Option<u64>,
    }

    impl GameObserver for LogObserver {
        fn on_game_over(&mut self, final_score: u64) {
            self.final_score = Some(final_score);
        }

        fn on_new_high_score(&mut self, score: u64) {
            log::info!("New high score: {score}");
        }

        fn play_sound(&mut self, effect: SoundEffect) {
            if effect == SoundEffect::Score {
                self.dodges += 1;
            }
            log::debug!("sound: {effect:?}");
        }
    }

    /// Steer away from the lowest obstacle overlapping the player's column
    fn autopilot(state: &GameState) -> Option<Steering> {
        let player = state.player.rect();
        let threat = state
            .obstacles
            .iter()
            .filter(|o| {
                let r = o.rect();
                r.min.x < player.max().x + 20.0 && r.max().x > player.min.x - 20.0
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
        if threat.pos.y < player.min.y - 250.0 {
            return None;
        }
        if threat.rect().center().x > player.center().x {
            Some(Steering::Left)
        } else {
            Some(Steering::Right)
        }
    }

    pub fn run() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(42);
        let mut game = Game::new(seed, Tuning::default(), default_store());
        let mut observer = LogObserver::default();
        game.resize(800.0, 600.0);
        game.start(&mut observer);

        let mut now = 0.0;
        let mut frames = 0;
        let mut steer_cooldown = 0;
        while game.phase() == GamePhase::Playing && frames < MAX_FRAMES {
            if steer_cooldown == 0 {
                if let Some(steering) = autopilot(&game.state) {
                    game.steer(steering, &mut observer);
                    steer_cooldown = 12;
                }
            } else {
                steer_cooldown -= 1;
            }
            game.frame(now, &mut observer);
            let vertices = build_scene(&game.state, &SceneOptions::default());
            log::trace!("frame {frames}: {} vertices", vertices.len());
            now += FRAME_MS;
            frames += 1;
        }

        match observer.final_score {
            Some(score) => log::info!(
                "Crashed after {:.1}s with score {score} ({} dodged)",
                frames as f64 * FRAME_MS / 1000.0,
                observer.dodges
            ),
            None => log::info!(
                "Survived {:.1}s, score {} ({} dodged)",
                frames as f64 * FRAME_MS / 1000.0,
                game.score(),
                observer.dodges
            ),
        }
        println!("High score this session: {}", game.high_score.best);
    }
}
