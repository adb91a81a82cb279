//! Scene composition
//!
//! Builds the whole frame as one triangle list from a read-only view of the
//! game state. Layers, back to front: sky gradient, stars, grid, light
//! streaks, obstacles, particles, player.

use glam::Vec2;

use super::shapes::{circle, gradient_quad, line, quad, rotate, rounded_rect};
use super::vertex::{Vertex, colors, with_alpha};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Distance between horizontal grid lines
const GRID_SPACING: f32 = 48.0;
/// Number of diagonal light streaks
const STREAK_COUNT: usize = 3;
const OBSTACLE_RADIUS: f32 = 6.0;
const OBSTACLE_GLOW: f32 = 6.0;
const PLAYER_RADIUS: f32 = 10.0;
const PLAYER_GLOW: f32 = 8.0;
const CORNER_SEGMENTS: u32 = 4;
/// Scroll pixels per point of score
const SCORE_SCROLL: f64 = 2.0;
/// Scroll pixels per millisecond of session time
const IDLE_SCROLL_PER_MS: f64 = 0.03;

/// Visual toggles the renderer honors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub starfield: bool,
    pub particles: bool,
    pub reduced_motion: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            starfield: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl From<&Settings> for SceneOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            starfield: settings.starfield,
            particles: settings.particles,
            reduced_motion: settings.reduced_motion,
        }
    }
}

/// Background scroll distance. The world drifts slowly with session time
/// (so title and game-over screens stay alive) and faster as score accrues.
pub fn scroll_offset(state: &GameState) -> f32 {
    (state.score * SCORE_SCROLL + state.elapsed_ms * IDLE_SCROLL_PER_MS) as f32
}

/// Ship bank angle: proportional to how far it still has to travel, clamped
pub fn player_tilt(state: &GameState, reduced_motion: bool) -> f32 {
    if reduced_motion {
        return 0.0;
    }
    let t = &state.tuning;
    let delta = state.player.target_x - state.player.pos.x;
    (delta * t.tilt_factor).clamp(-t.max_tilt, t.max_tilt)
}

/// Build all vertices for one frame. An unsized canvas produces nothing.
pub fn build_scene(state: &GameState, options: &SceneOptions) -> Vec<Vertex> {
    if !state.is_sized() {
        return Vec::new();
    }

    let canvas = state.canvas;
    let offset = scroll_offset(state);
    let mut vertices = Vec::with_capacity(
        6 + state.stars.len() * 6 + state.obstacles.len() * 132 + state.particles.len() * 24 + 512,
    );

    vertices.extend(gradient_quad(
        Vec2::ZERO,
        canvas,
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));

    if options.starfield {
        for star in &state.stars {
            // Nearer (bigger) stars scroll faster
            let y = (star.pos.y + offset * 0.25 * star.size).rem_euclid(canvas.y);
            let min = Vec2::new(star.pos.x, y);
            vertices.extend(quad(min, min + Vec2::splat(star.size), colors::STAR));
        }
    }

    push_grid(&mut vertices, canvas, offset);

    if !options.reduced_motion {
        push_streaks(&mut vertices, canvas, offset);
    }

    for obstacle in &state.obstacles {
        let glow = Vec2::splat(OBSTACLE_GLOW);
        vertices.extend(rounded_rect(
            obstacle.pos - glow,
            obstacle.size + glow * 2.0,
            OBSTACLE_RADIUS + OBSTACLE_GLOW,
            with_alpha(obstacle.color, 0.25),
            CORNER_SEGMENTS,
        ));
        vertices.extend(rounded_rect(
            obstacle.pos,
            obstacle.size,
            OBSTACLE_RADIUS,
            obstacle.color,
            CORNER_SEGMENTS,
        ));
    }

    if options.particles {
        for p in &state.particles {
            let life = p.life.clamp(0.0, 1.0);
            vertices.extend(circle(p.pos, p.size * life, with_alpha(p.color, life), 8));
        }
    }

    if state.phase != GamePhase::GameOver {
        push_player(&mut vertices, state, options.reduced_motion);
    }

    vertices
}

fn push_grid(vertices: &mut Vec<Vertex>, canvas: Vec2, offset: f32) {
    // Lane dividers
    for i in 1..4 {
        let x = canvas.x * i as f32 / 4.0;
        vertices.extend(line(Vec2::new(x, 0.0), Vec2::new(x, canvas.y), 1.0, colors::GRID));
    }

    let mut y = offset.rem_euclid(GRID_SPACING);
    while y < canvas.y {
        vertices.extend(line(Vec2::new(0.0, y), Vec2::new(canvas.x, y), 1.0, colors::GRID));
        y += GRID_SPACING;
    }
}

fn push_streaks(vertices: &mut Vec<Vertex>, canvas: Vec2, offset: f32) {
    let span = canvas.x + canvas.y;
    for i in 0..STREAK_COUNT {
        let phase = span * i as f32 / STREAK_COUNT as f32;
        let x = (phase + offset * 0.5).rem_euclid(span);
        vertices.extend(line(
            Vec2::new(x, 0.0),
            Vec2::new(x - canvas.y, canvas.y),
            24.0,
            colors::STREAK,
        ));
    }
}

fn push_player(vertices: &mut Vec<Vertex>, state: &GameState, reduced_motion: bool) {
    let player = &state.player;
    let center = player.center();
    let glow = Vec2::splat(PLAYER_GLOW);

    let mut ship = rounded_rect(
        player.pos - glow,
        player.size + glow * 2.0,
        PLAYER_RADIUS + PLAYER_GLOW,
        with_alpha(player.color, 0.3),
        CORNER_SEGMENTS,
    );
    ship.extend(rounded_rect(
        player.pos,
        player.size,
        PLAYER_RADIUS,
        player.color,
        CORNER_SEGMENTS,
    ));
    rotate(&mut ship, center, player_tilt(state, reduced_motion));

    vertices.extend(ship);
    vertices.extend(circle(center, 4.0, colors::PLAYER_CORE, 12));
}
