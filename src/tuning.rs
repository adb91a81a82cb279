//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a run can be retuned
//! from JSON without touching the code. Missing fields keep their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a set of tuning overrides was refused
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for `Tuning`
    Parse(serde_json::Error),
    /// Parsed, but a value would break the simulation
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {e}"),
            TuningError::Invalid(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    pub player_bottom_offset: f32,
    pub edge_margin: f32,
    /// Canvas width is divided by this to get one lane step
    pub lane_divisor: f32,
    pub smoothing: f32,

    // === Obstacles ===
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    pub obstacle_height: f32,
    pub spawn_y: f32,
    /// First spawn delay after a run starts (ms)
    pub first_spawn_ms: f32,
    /// Fall speed at t=0, in pixels per 60 fps frame
    pub base_speed: f32,
    /// Fall speed gained per second of run time
    pub speed_growth_per_sec: f32,
    /// Upper bound of the per-obstacle random speed bonus
    pub speed_jitter: f32,
    /// Difficulty gained per second of run time (difficulty starts at 1.0)
    pub difficulty_growth_per_sec: f32,
    pub base_spawn_interval_ms: f32,
    pub min_spawn_interval_ms: f32,

    // === Scoring ===
    pub dodge_bonus: f64,
    /// Points accrued per elapsed millisecond
    pub accrual_per_ms: f64,

    // === Effects ===
    pub burst_particles: usize,
    pub particle_min_speed: f32,
    pub particle_max_speed: f32,
    pub particle_min_size: f32,
    pub particle_max_size: f32,
    /// Life lost per advance call
    pub particle_decay: f32,
    pub star_count: usize,
    pub tilt_factor: f32,
    pub max_tilt: f32,

    pub frame_baseline_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            edge_margin: EDGE_MARGIN,
            lane_divisor: LANE_DIVISOR,
            smoothing: PLAYER_SMOOTHING,

            obstacle_min_width: 50.0,
            obstacle_max_width: 130.0,
            obstacle_height: 28.0,
            spawn_y: -100.0,
            first_spawn_ms: BASE_SPAWN_INTERVAL_MS,
            base_speed: 4.0,
            speed_growth_per_sec: 0.1,
            speed_jitter: 2.5,
            difficulty_growth_per_sec: 0.05,
            base_spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,

            dodge_bonus: 10.0,
            accrual_per_ms: 0.015,

            burst_particles: BURST_PARTICLES,
            particle_min_speed: 2.0,
            particle_max_speed: 8.0,
            particle_min_size: 2.0,
            particle_max_size: 6.0,
            particle_decay: 0.02,
            star_count: 120,
            tilt_factor: 0.004,
            max_tilt: 0.25,

            frame_baseline_ms: FRAME_BASELINE_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; fields not present keep their defaults.
    /// The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with: inverted random
    /// ranges, non-positive divisors and particles that never fade.
    pub fn validate(&self) -> Result<(), TuningError> {
        // NaN fails both helpers
        fn positive(x: f32) -> bool {
            x > 0.0
        }
        fn ordered(min: f32, max: f32) -> bool {
            min <= max
        }

        let checks = [
            (
                positive(self.obstacle_min_width)
                    && ordered(self.obstacle_min_width, self.obstacle_max_width),
                "obstacle widths must satisfy 0 < min <= max",
            ),
            (
                ordered(self.particle_min_speed, self.particle_max_speed),
                "particle_min_speed exceeds particle_max_speed",
            ),
            (
                ordered(self.particle_min_size, self.particle_max_size),
                "particle_min_size exceeds particle_max_size",
            ),
            (
                ordered(0.0, self.speed_jitter),
                "speed_jitter must not be negative",
            ),
            (positive(self.lane_divisor), "lane_divisor must be positive"),
            (
                positive(self.frame_baseline_ms),
                "frame_baseline_ms must be positive",
            ),
            (
                positive(self.min_spawn_interval_ms) && positive(self.base_spawn_interval_ms),
                "spawn intervals must be positive",
            ),
            (positive(self.particle_decay), "particle_decay must be positive"),
        ];
        match checks.into_iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(TuningError::Invalid(reason)),
            None => Ok(()),
        }
    }

    /// Fall speed every obstacle spawned at `run_ms` starts from
    pub fn base_speed_at(&self, run_ms: f32) -> f32 {
        self.base_speed + self.speed_growth_per_sec * run_ms / 1000.0
    }

    /// Difficulty multiplier at `run_ms`
    pub fn difficulty_at(&self, run_ms: f32) -> f32 {
        1.0 + self.difficulty_growth_per_sec * run_ms / 1000.0
    }

    /// Delay until the next spawn, never below the floor
    pub fn spawn_interval(&self, difficulty: f32) -> f32 {
        (self.base_spawn_interval_ms / difficulty).max(self.min_spawn_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "speed_jitter": 1.0 }"#).unwrap();
        assert_eq!(tuning.speed_jitter, 1.0);
        assert_eq!(tuning.min_spawn_interval_ms, 350.0);
        assert_eq!(tuning.burst_particles, 25);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        for json in [
            r#"{ "obstacle_min_width": 200.0 }"#,
            r#"{ "particle_min_speed": 9.0 }"#,
            r#"{ "particle_max_size": 1.0 }"#,
        ] {
            assert!(matches!(
                Tuning::from_json(json),
                Err(TuningError::Invalid(_))
            ));
        }
    }

    #[test]
    fn test_non_positive_divisors_are_rejected() {
        assert!(Tuning::from_json(r#"{ "frame_baseline_ms": 0.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "lane_divisor": -4.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "min_spawn_interval_ms": 0.0 }"#).is_err());
    }

    #[test]
    fn test_rejected_override_falls_back_to_defaults() {
        let tuning = Tuning::from_json(r#"{ "obstacle_min_width": 200.0 }"#).unwrap_or_default();
        let mut state = crate::sim::GameState::new(4, tuning);
        state.resize(800.0, 600.0);
        state.start_run();
        let mut events = Vec::new();
        for _ in 0..120 {
            crate::sim::tick(&mut state, 16.66, &mut events);
        }
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_interval_hits_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(1.0), 1000.0);
        assert_eq!(tuning.spawn_interval(2.0), 500.0);
        assert_eq!(tuning.spawn_interval(50.0), 350.0);
    }

    #[test]
    fn test_speed_and_difficulty_grow_linearly() {
        let tuning = Tuning::default();
        assert_eq!(tuning.base_speed_at(0.0), tuning.base_speed);
        let a = tuning.base_speed_at(10_000.0) - tuning.base_speed_at(0.0);
        let b = tuning.base_speed_at(20_000.0) - tuning.base_speed_at(10_000.0);
        assert!((a - b).abs() < 1e-5);
        assert!(tuning.difficulty_at(60_000.0) > tuning.difficulty_at(0.0));
    }
}
