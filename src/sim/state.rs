//! Game state and core simulation types
//!
//! One `GameState` owns every entity; `tick` mutates it and the renderer
//! only ever reads it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::tuning::Tuning;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Palette obstacles pick their color from
pub const OBSTACLE_PALETTE: [Color; 4] = [
    [1.0, 0.18, 0.47, 1.0], // hot pink
    [1.0, 0.55, 0.1, 1.0],  // orange
    [0.69, 0.26, 1.0, 1.0], // violet
    [1.0, 0.85, 0.2, 1.0],  // amber
];

pub const PLAYER_COLOR: Color = [0.0, 0.94, 1.0, 1.0];

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen, waiting for the first run
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a restart
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Where steering wants the ship to be; `pos.x` eases toward it
    pub target_x: f32,
    pub color: Color,
}

impl Player {
    pub fn new(canvas: Vec2, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.player_size);
        let x = (canvas.x - size.x) / 2.0;
        Self {
            pos: Vec2::new(x, canvas.y - tuning.player_bottom_offset),
            size,
            target_x: x,
            color: PLAYER_COLOR,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A falling block
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    /// Pixels per 60 fps frame
    pub speed: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per advance call
    pub vel: Vec2,
    pub color: Color,
    pub life: f32, // 0-1, decreases every advance
    pub size: f32,
}

/// Background star
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Drawing surface size in CSS pixels (zero until the first resize)
    pub canvas: Vec2,
    pub phase: GamePhase,
    pub player: Player,
    /// Live obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    /// Fractional score; reported floored
    pub score: f64,
    /// Milliseconds since the current run started
    pub run_ms: f32,
    /// Milliseconds until the next spawn
    pub spawn_timer_ms: f32,
    pub difficulty: f32,
    /// Fall speed new obstacles start from
    pub base_speed: f32,
    /// Milliseconds simulated since the session began, in every phase
    pub elapsed_ms: f64,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed. The canvas starts unsized.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(Vec2::ZERO, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spawn_timer_ms: tuning.first_spawn_ms,
            base_speed: tuning.base_speed,
            tuning,
            canvas: Vec2::ZERO,
            phase: GamePhase::Start,
            player,
            obstacles: Vec::new(),
            particles: Vec::new(),
            stars: Vec::new(),
            score: 0.0,
            run_ms: 0.0,
            difficulty: 1.0,
            elapsed_ms: 0.0,
            next_id: 1,
        }
    }

    /// Whether the drawing surface has a usable size yet
    pub fn is_sized(&self) -> bool {
        self.canvas.x > 0.0 && self.canvas.y > 0.0
    }

    /// Horizontal step of one steering intent
    pub fn lane_width(&self) -> f32 {
        self.canvas.x / self.tuning.lane_divisor
    }

    /// Smallest x the player may target
    pub fn min_player_x(&self) -> f32 {
        self.tuning.edge_margin
    }

    /// Largest x the player may target
    pub fn max_player_x(&self) -> f32 {
        (self.canvas.x - self.player.size.x - self.tuning.edge_margin).max(self.min_player_x())
    }

    /// Clamp an x coordinate into the player's allowed band
    pub fn clamp_player_x(&self, x: f32) -> f32 {
        x.clamp(self.min_player_x(), self.max_player_x())
    }

    /// Floored score as reported to the outside
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adopt a new canvas size: rebuild the star field and re-seat the player
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width.max(0.0), height.max(0.0));
        self.regenerate_stars();
        if self.phase == GamePhase::Playing {
            self.player.pos.y = self.canvas.y - self.tuning.player_bottom_offset;
            self.player.target_x = self.clamp_player_x(self.player.target_x);
            self.player.pos.x = self.clamp_player_x(self.player.pos.x);
        } else {
            self.player = Player::new(self.canvas, &self.tuning);
        }
    }

    fn regenerate_stars(&mut self) {
        self.stars.clear();
        if !self.is_sized() {
            return;
        }
        for _ in 0..self.tuning.star_count {
            let pos = Vec2::new(
                self.rng.random_range(0.0..self.canvas.x),
                self.rng.random_range(0.0..self.canvas.y),
            );
            let size = self.rng.random_range(0.5..2.0);
            self.stars.push(Star { pos, size });
        }
    }

    /// Reset everything a run owns and enter `Playing`.
    ///
    /// Stars and particles carry over so the background never jumps.
    pub fn start_run(&mut self) {
        self.player = Player::new(self.canvas, &self.tuning);
        self.obstacles.clear();
        self.score = 0.0;
        self.run_ms = 0.0;
        self.difficulty = 1.0;
        self.base_speed = self.tuning.base_speed;
        self.spawn_timer_ms = self.tuning.first_spawn_ms;
        self.phase = GamePhase::Playing;
    }

    /// Create an obstacle above the visible area at a random column
    pub fn spawn_obstacle(&mut self) -> &Obstacle {
        let t = &self.tuning;
        let width = self
            .rng
            .random_range(t.obstacle_min_width..=t.obstacle_max_width);
        let max_x = (self.canvas.x - width).max(0.0);
        let x = if max_x > 0.0 {
            self.rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        let jitter = if t.speed_jitter > 0.0 {
            self.rng.random_range(0.0..t.speed_jitter)
        } else {
            0.0
        };
        let color = OBSTACLE_PALETTE[self.rng.random_range(0..OBSTACLE_PALETTE.len())];
        let pos = Vec2::new(x, t.spawn_y);
        let size = Vec2::new(width, t.obstacle_height);
        let obstacle = Obstacle {
            id: self.next_entity_id(),
            pos,
            size,
            color,
            speed: self.base_speed + jitter,
        };
        self.obstacles.push(obstacle);
        &self.obstacles[self.obstacles.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_state() -> GameState {
        let mut state = GameState::new(7, Tuning::default());
        state.resize(800.0, 600.0);
        state
    }

    #[test]
    fn test_player_starts_centered() {
        let state = sized_state();
        assert_eq!(state.player.pos.x, 376.0);
        assert_eq!(state.player.target_x, 376.0);
        assert_eq!(state.player.pos.y, 480.0);
    }

    #[test]
    fn test_new_state_is_unsized() {
        let state = GameState::new(1, Tuning::default());
        assert!(!state.is_sized());
        assert!(state.stars.is_empty());
        assert_eq!(state.phase, GamePhase::Start);
    }

    #[test]
    fn test_resize_builds_star_field() {
        let state = sized_state();
        assert_eq!(state.stars.len(), state.tuning.star_count);
        assert!(
            state
                .stars
                .iter()
                .all(|s| s.pos.x < 800.0 && s.pos.y < 600.0)
        );
    }

    #[test]
    fn test_resize_mid_run_reseats_player() {
        use crate::sim::tick::{Steering, steer};

        let mut state = sized_state();
        state.start_run();
        steer(&mut state, Steering::Right);
        steer(&mut state, Steering::Right);
        assert_eq!(state.player.target_x, 742.0);

        state.resize(400.0, 300.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos.y, 180.0);
        assert_eq!(state.player.target_x, 342.0);
        assert!(state.player.pos.x <= 342.0);
        assert_eq!(state.stars.len(), state.tuning.star_count);
        assert!(
            state
                .stars
                .iter()
                .all(|s| s.pos.x < 400.0 && s.pos.y < 300.0)
        );
    }

    #[test]
    fn test_resize_outside_run_recenters_player() {
        let mut state = sized_state();
        state.resize(400.0, 300.0);
        assert_eq!(state.player.pos.x, 176.0);
        assert_eq!(state.player.target_x, 176.0);
        assert_eq!(state.player.pos.y, 180.0);
    }

    #[test]
    fn test_lane_width_is_quarter_canvas() {
        assert_eq!(sized_state().lane_width(), 200.0);
    }

    #[test]
    fn test_spawned_obstacle_is_above_screen_and_in_bounds() {
        let mut state = sized_state();
        for _ in 0..200 {
            let o = state.spawn_obstacle().clone();
            assert_eq!(o.pos.y, -100.0);
            assert!(o.size.x >= 50.0 && o.size.x <= 130.0);
            assert!(o.pos.x >= 0.0 && o.pos.x + o.size.x <= 800.0 + 1e-3);
            assert!(o.speed >= state.base_speed);
            assert!(o.speed < state.base_speed + 2.5);
        }
    }

    #[test]
    fn test_start_run_resets_run_state() {
        let mut state = sized_state();
        state.start_run();
        state.spawn_obstacle();
        state.score = 123.4;
        state.run_ms = 9000.0;
        state.difficulty = 3.0;
        state.start_run();
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.run_ms, 0.0);
        assert_eq!(state.difficulty, 1.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stars.len(), state.tuning.star_count);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let mut a = sized_state();
        let mut b = sized_state();
        for _ in 0..10 {
            let oa = a.spawn_obstacle().clone();
            let ob = b.spawn_obstacle().clone();
            assert_eq!(oa.pos, ob.pos);
            assert_eq!(oa.speed, ob.speed);
        }
    }
}
