//! Per-frame simulation step
//!
//! Advances the player, obstacles, difficulty and particles by one variable
//! timestep. Speeds are expressed per 60 fps frame and scaled by elapsed time.

use super::particles;
use super::state::{GamePhase, GameState};
use crate::{ease_toward, frames};

/// A single lane-shift request from keyboard or touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    Left,
    Right,
}

/// Things that happened during a step, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Steering accepted a lane change
    LaneChange,
    /// An obstacle left the screen without hitting the player
    Dodged { obstacle_id: u32 },
    /// The floored score changed
    ScoreChanged(u64),
    /// The player hit an obstacle; the run is over
    Crashed { final_score: u64 },
}

/// Shift the player's target one lane to the left or right.
///
/// Ignored outside `Playing`. The target is clamped to the visible band, so
/// repeated presses against a wall are harmless.
pub fn steer(state: &mut GameState, steering: Steering) -> Option<GameEvent> {
    if state.phase != GamePhase::Playing || !state.is_sized() {
        return None;
    }
    let lane = state.lane_width();
    let target = match steering {
        Steering::Left => state.player.target_x - lane,
        Steering::Right => state.player.target_x + lane,
    };
    state.player.target_x = state.clamp_player_x(target);
    Some(GameEvent::LaneChange)
}

/// Advance the game state by `dt_ms` milliseconds
///
/// Gameplay only runs while `Playing`; particles advance in every phase.
/// Does nothing while the canvas has no size.
pub fn tick(state: &mut GameState, dt_ms: f32, events: &mut Vec<GameEvent>) {
    if !state.is_sized() {
        return;
    }
    state.elapsed_ms += dt_ms as f64;

    if state.phase == GamePhase::Playing {
        tick_playing(state, dt_ms, events);
    }

    particles::advance(&mut state.particles, state.tuning.particle_decay);
}

fn tick_playing(state: &mut GameState, dt_ms: f32, events: &mut Vec<GameEvent>) {
    let reported = state.display_score();

    // Difficulty ramp
    state.run_ms += dt_ms;
    state.difficulty = state.tuning.difficulty_at(state.run_ms);
    state.base_speed = state.tuning.base_speed_at(state.run_ms);

    // Player eases toward its target
    let player = &mut state.player;
    player.pos.x = ease_toward(player.pos.x, player.target_x, state.tuning.smoothing, dt_ms);

    // Spawning
    state.spawn_timer_ms -= dt_ms;
    if state.spawn_timer_ms <= 0.0 {
        state.spawn_obstacle();
        state.spawn_timer_ms = state.tuning.spawn_interval(state.difficulty);
    }

    // Falling
    let step = frames(dt_ms, state.tuning.frame_baseline_ms);
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.speed * step;
    }

    // Collision is checked before the bottom edge for each obstacle, in spawn
    // order; a crash ends the pass.
    let player_rect = state.player.rect();
    let mut i = 0;
    while i < state.obstacles.len() {
        if state.obstacles[i].rect().overlaps(&player_rect) {
            let obstacle = state.obstacles.remove(i);
            crash(state, obstacle.color, reported, events);
            return;
        }
        if state.obstacles[i].pos.y > state.canvas.y {
            let obstacle = state.obstacles.remove(i);
            state.score += state.tuning.dodge_bonus;
            events.push(GameEvent::Dodged {
                obstacle_id: obstacle.id,
            });
            continue;
        }
        i += 1;
    }

    // Continuous accrual
    state.score += state.tuning.accrual_per_ms * dt_ms as f64;

    let score = state.display_score();
    if score != reported {
        events.push(GameEvent::ScoreChanged(score));
    }
}

fn crash(
    state: &mut GameState,
    obstacle_color: super::state::Color,
    reported: u64,
    events: &mut Vec<GameEvent>,
) {
    let final_score = state.display_score();
    if final_score != reported {
        events.push(GameEvent::ScoreChanged(final_score));
    }

    particles::spawn_burst(
        &mut state.particles,
        &mut state.rng,
        state.player.center(),
        [state.player.color, obstacle_color],
        &state.tuning,
    );
    state.phase = GamePhase::GameOver;
    events.push(GameEvent::Crashed { final_score });
}
