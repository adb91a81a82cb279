//! Crash explosion particles
//!
//! Particles move a fixed step per advance call and fade by a fixed amount,
//! independent of game phase.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Color, Particle};
use crate::tuning::Tuning;

/// Emit a radial burst of `tuning.burst_particles` particles around `center`.
///
/// Colors alternate between the two given so the burst mixes both bodies.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    center: Vec2,
    colors: [Color; 2],
    tuning: &Tuning,
) {
    let count = tuning.burst_particles;
    particles.reserve(count);
    for i in 0..count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(tuning.particle_min_speed..=tuning.particle_max_speed);
        let size = rng.random_range(tuning.particle_min_size..=tuning.particle_max_size);
        particles.push(Particle {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color: colors[i % 2],
            life: 1.0,
            size,
        });
    }
}

/// Move and fade every particle, dropping the ones whose life ran out
pub fn advance(particles: &mut Vec<Particle>, decay: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= decay;
    }
    particles.retain(|p| p.life > 0.0);
}
