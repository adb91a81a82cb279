//! Frame-level game facade
//!
//! `Game` is what the host shell talks to: it owns the simulation state and
//! the high score, turns timestamps into frame deltas, and forwards what the
//! simulation reports to a `GameObserver` (HUD, audio).

use crate::audio::SoundEffect;
use crate::highscores::HighScore;
use crate::platform::KeyValueStore;
use crate::sim::{GameEvent, GamePhase, GameState, Steering, steer, tick};
use crate::tuning::Tuning;

/// Receives everything the core reports outward
pub trait GameObserver {
    fn on_score_changed(&mut self, _score: u64) {}

    fn on_game_over(&mut self, _final_score: u64) {}

    fn on_new_high_score(&mut self, _score: u64) {}

    fn play_sound(&mut self, _effect: SoundEffect) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// Turns monotonic frame timestamps into elapsed milliseconds
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    running: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            running: true,
        }
    }

    /// Milliseconds since the previous call. The first frame reports zero and
    /// a timestamp that goes backwards is treated as no time passing.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now_ms);
        dt as f32
    }

    /// Stop rescheduling frames
    pub fn stop(&mut self) {
        self.running = false;
        self.last = None;
    }

    /// Start rescheduling again; the next frame reports zero elapsed time
    pub fn resume(&mut self) {
        self.running = true;
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// A game session
pub struct Game {
    pub state: GameState,
    pub high_score: HighScore,
    pub clock: FrameClock,
    store: Box<dyn KeyValueStore>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a session, loading the high score from `store`
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let high_score = HighScore::load(store.as_ref());
        Self {
            state: GameState::new(seed, tuning),
            high_score,
            clock: FrameClock::new(),
            store,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.display_score()
    }

    /// Adopt a new drawing surface size (CSS pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
        log::info!("Canvas resized to {width}x{height}");
    }

    /// Begin a run from the title or game-over screen. Ignored mid-run.
    pub fn start(&mut self, observer: &mut dyn GameObserver) -> bool {
        if self.state.phase == GamePhase::Playing {
            return false;
        }
        self.state.start_run();
        log::info!("Run started (seed {})", self.state.seed);
        observer.on_score_changed(0);
        true
    }

    /// Apply a steering intent from keyboard or touch
    pub fn steer(&mut self, steering: Steering, observer: &mut dyn GameObserver) {
        if let Some(event) = steer(&mut self.state, steering) {
            self.dispatch(event, observer);
        }
    }

    /// Advance by the time elapsed since the previous frame timestamp
    pub fn frame(&mut self, now_ms: f64, observer: &mut dyn GameObserver) {
        let dt = self.clock.delta(now_ms);
        self.advance(dt, observer);
    }

    /// Advance the simulation by `dt_ms` and report what happened
    pub fn advance(&mut self, dt_ms: f32, observer: &mut dyn GameObserver) {
        let mut events = std::mem::take(&mut self.events);
        tick(&mut self.state, dt_ms, &mut events);
        for event in events.drain(..) {
            self.dispatch(event, observer);
        }
        self.events = events;
    }

    fn dispatch(&mut self, event: GameEvent, observer: &mut dyn GameObserver) {
        match event {
            GameEvent::LaneChange => observer.play_sound(SoundEffect::LaneChange),
            GameEvent::Dodged { .. } => observer.play_sound(SoundEffect::Score),
            GameEvent::ScoreChanged(score) => observer.on_score_changed(score),
            GameEvent::Crashed { final_score } => {
                observer.play_sound(SoundEffect::Crash);
                log::info!("Game over with score {final_score}");
                if self.high_score.record(final_score) {
                    log::info!("New high score: {final_score}");
                    if let Err(e) = self.high_score.save(self.store.as_mut()) {
                        log::warn!("Could not save high score: {e}");
                    }
                    observer.on_new_high_score(final_score);
                }
                observer.on_game_over(final_score);
            }
        }
    }
}
