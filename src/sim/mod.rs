//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time arrives as a host timestamp argument
//! - Randomness arrives through `RandomSource`
//! - No rendering or storage dependencies

pub mod collision;
pub mod difficulty;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_collision};
pub use difficulty::{CategoryDifficulty, Difficulty, extra_factor, lerp, time_factor};
pub use spawn::{RandomSource, run_spawners, seeded_rng};
pub use state::{GamePhase, GameState, Obstacle, ObstacleKind, Player, SpawnTimer};
pub use tick::{TickInput, tick};
