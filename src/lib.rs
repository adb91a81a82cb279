//! Lane Dodger - A three-lane falling-obstacle arcade game
//!
//! Core modules:
//! - `sim`: Simulation (player smoothing, obstacles, particles, scoring)
//! - `game`: Frame-level facade driving the simulation and dispatching events
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedurally synthesized sound effects
//! - `platform`: Browser/native platform abstraction (storage, input)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameClock, Game, GameObserver, NullObserver};
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Frame duration the per-frame speeds are expressed against (60 fps)
    pub const FRAME_BASELINE_MS: f32 = 16.66;

    /// Number of lane steps that fit across the canvas
    pub const LANE_DIVISOR: f32 = 4.0;
    /// Gap kept between the player and either canvas edge
    pub const EDGE_MARGIN: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Distance from the player's top edge to the bottom of the canvas
    pub const PLAYER_BOTTOM_OFFSET: f32 = 120.0;
    /// Fraction of the remaining distance still left after one second
    pub const PLAYER_SMOOTHING: f32 = 0.001;

    /// Shortest time between two obstacle spawns (ms)
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 350.0;
    /// Spawn interval at difficulty 1.0 (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 1000.0;

    /// Particles emitted by a single crash
    pub const BURST_PARTICLES: usize = 25;
}

/// Frame-rate-independent exponential approach of `current` toward `target`.
///
/// `retain` is the fraction of the gap left after one second.
#[inline]
pub fn ease_toward(current: f32, target: f32, retain: f32, dt_ms: f32) -> f32 {
    current + (target - current) * (1.0 - retain.powf(dt_ms / 1000.0))
}

/// Convert a frame time in milliseconds into 60 fps frame-equivalents
#[inline]
pub fn frames(dt_ms: f32, baseline_ms: f32) -> f32 {
    dt_ms / baseline_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_toward_zero_dt_is_identity() {
        assert_eq!(ease_toward(10.0, 200.0, 0.001, 0.0), 10.0);
    }

    #[test]
    fn test_ease_toward_one_second_leaves_retained_fraction() {
        let x = ease_toward(0.0, 1000.0, 0.001, 1000.0);
        assert!((x - 999.0).abs() < 1e-2);
    }

    #[test]
    fn test_ease_toward_is_frame_rate_independent() {
        // Two 8ms steps land where one 16ms step does
        let a = ease_toward(ease_toward(0.0, 100.0, 0.001, 8.0), 100.0, 0.001, 8.0);
        let b = ease_toward(0.0, 100.0, 0.001, 16.0);
        assert!((a - b).abs() < 1e-3);
    }
}
