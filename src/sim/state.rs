//! Game state and core simulation types
//!
//! Everything a restart must wipe lives in `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::Difficulty;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Loop has not ticked yet
    NotStarted,
    /// Fall animation playing, no input or spawning
    Intro,
    /// Active gameplay
    Running,
    /// Run ended; the last frame stays frozen on screen
    GameOver,
}

/// Obstacle width class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Narrow,
    Medium,
    Wide,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Narrow => "narrow",
            ObstacleKind::Medium => "medium",
            ObstacleKind::Wide => "wide",
        }
    }
}

/// The falling player, fixed vertically, steered horizontally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Horizontal direction: -1, 0 or +1
    pub dir: i8,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            dir: 0,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Apply the current direction for one tick, staying between the walls
    pub fn step(&mut self) {
        self.pos.x += self.dir as f32 * self.speed;
        self.clamp_to_shaft();
    }

    pub fn clamp_to_shaft(&mut self) {
        self.pos.x = self.pos.x.clamp(LEFT_BOUNDARY, RIGHT_BOUNDARY - self.size.x);
    }
}

/// A rising obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick, sampled once at spawn
    pub speed: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Move toward the top of the shaft
    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// True once the bottom edge has left the top of the canvas
    pub fn is_gone(&self) -> bool {
        self.pos.y + self.size.y < 0.0
    }
}

/// Per-category spawn bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub kind: ObstacleKind,
    /// Ticks until the next spawn trial
    pub cooldown: u32,
    /// Elapsed run seconds of the last spawn
    pub last_spawn_secs: Option<f32>,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Frames of intro animation shown so far
    pub intro_frame: u32,
    /// Host timestamp (seconds) at which the run started
    pub run_started_at: Option<f64>,
    /// Wall-clock seconds since the run started
    pub elapsed_secs: f32,
    /// Running ticks processed
    pub time_ticks: u64,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// One timer per tuning category, same order
    pub spawners: Vec<SpawnTimer>,
    /// Difficulty derived from `elapsed_secs` on the latest tick
    pub difficulty: Difficulty,
    pub tuning: Tuning,
    next_id: u32,
}

impl GameState {
    /// Fresh state for `tuning`. Invalid tuning is replaced by the defaults.
    pub fn new(tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning, using defaults: {}", e);
                Tuning::default()
            }
        };
        let spawners = tuning
            .categories
            .iter()
            .map(|c| SpawnTimer {
                kind: c.kind,
                cooldown: 0,
                last_spawn_secs: None,
            })
            .collect();
        let difficulty = Difficulty::at(&tuning, 0.0);
        Self {
            phase: GamePhase::NotStarted,
            intro_frame: 0,
            run_started_at: None,
            elapsed_secs: 0.0,
            time_ticks: 0,
            player: Player::default(),
            obstacles: Vec::new(),
            spawners,
            difficulty,
            tuning,
            next_id: 1,
        }
    }

    /// Wipe everything back to initial values and replay the intro
    pub fn restart(&mut self) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(tuning);
        self.phase = GamePhase::Intro;
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of live obstacles of one category
    pub fn live_count(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| o.kind == kind).count()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Intro finished and the controls hint may be shown
    pub fn intro_done(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_is_blank() {
        let state = GameState::new(Tuning::default());
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawners.len(), 3);
        assert_eq!(state.player.pos, Vec2::new(190.0, 290.0));
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_default() {
        let mut tuning = Tuning::default();
        tuning.categories[0].lanes = 7;
        let state = GameState::new(tuning);
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.spawners.len(), 3);
    }

    #[test]
    fn test_obstacle_leaves_only_when_fully_above() {
        let mut obs = Obstacle {
            id: 1,
            kind: ObstacleKind::Narrow,
            pos: Vec2::new(50.0, 2.0),
            size: Vec2::new(LANE_WIDTH, OBSTACLE_HEIGHT),
            speed: 6.0,
        };
        obs.advance();
        assert!(!obs.is_gone());
        obs.advance();
        obs.advance();
        assert!(obs.is_gone());
    }

    proptest! {
        #[test]
        fn prop_player_stays_between_walls(dirs in proptest::collection::vec(-1i8..=1, 0..400)) {
            let mut player = Player::default();
            for dir in dirs {
                player.dir = dir;
                player.step();
                prop_assert!(player.pos.x >= LEFT_BOUNDARY);
                prop_assert!(player.pos.x <= RIGHT_BOUNDARY - player.size.x);
            }
        }
    }
}
