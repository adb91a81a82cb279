//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (reproducible runs per seed)
//! - Spawn-order iteration over obstacles
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{Color, GamePhase, GameState, Obstacle, Particle, Player, Star};
pub use tick::{GameEvent, Steering, steer, tick};
