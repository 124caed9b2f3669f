//! 404 Hell - fall into a shaft and dodge the rising obstacles
//!
//! Core modules:
//! - `sim`: Simulation (state machine, difficulty ramp, spawner, collisions)
//! - `render`: Drawing-surface abstraction and frame composition
//! - `input`: Edge-triggered movement input
//! - `session`: Loop driver wiring state, input, RNG and the score board
//! - `highscores`: Local leaderboard of survival times
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod error;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, StorageError, SubmitError};
pub use highscores::{ScoreBoard, ScoreEntry, format_time};
pub use input::{InputEvent, InputState};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Assumed display refresh rate; tick-counted timers are expressed against it
    pub const TICK_RATE: u32 = 60;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Shaft walls (drawn just outside the playable area)
    pub const WALL_THICKNESS: f32 = 10.0;
    pub const LEFT_BOUNDARY: f32 = 50.0;
    pub const RIGHT_BOUNDARY: f32 = CANVAS_WIDTH - 50.0;

    /// Lanes obstacles snap to
    pub const LANE_COUNT: u32 = 5;
    pub const LANE_WIDTH: f32 = (RIGHT_BOUNDARY - LEFT_BOUNDARY) / LANE_COUNT as f32;

    /// Player defaults - fixed vertical slot in the middle of the shaft
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0; // pixels per tick
    pub const PLAYER_START_X: f32 = CANVAS_WIDTH / 2.0 - PLAYER_SIZE / 2.0;
    pub const PLAYER_START_Y: f32 = CANVAS_HEIGHT / 2.0 - PLAYER_SIZE / 2.0;

    /// Obstacle height (width depends on category)
    pub const OBSTACLE_HEIGHT: f32 = 10.0;

    /// Intro fall animation (3 seconds)
    pub const INTRO_FRAMES: u32 = 3 * TICK_RATE;
    /// Pixels the player sprite drops per intro frame
    pub const INTRO_FALL_PER_FRAME: f32 = 2.0;
    /// Spawn suppression once the run starts (5 seconds)
    pub const PRE_ROLL_TICKS: u32 = 5 * TICK_RATE;

    /// Host delay before the first tick
    pub const STARTUP_DELAY_MS: i32 = 2000;
}
