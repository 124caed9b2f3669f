//! Session loop driver
//!
//! Owns everything one browser tab (or headless run) needs: simulation state,
//! steering input, the RNG, the score board and its backing store. Hosts call
//! `frame` once per display refresh and forward UI events.

use crate::error::{StorageError, SubmitError};
use crate::highscores::{ScoreBoard, ScoreEntry, normalize_name};
use crate::input::{InputEvent, InputState};
use crate::persistence::KeyValueStore;
use crate::render::{DrawingSurface, draw_frame};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, RandomSource, tick};
use crate::tuning::Tuning;

pub struct Session<S: KeyValueStore, R: RandomSource> {
    state: GameState,
    input: InputState,
    rng: R,
    store: S,
    board: ScoreBoard,
    settings: Settings,
    /// Set once this run's time has gone onto the board
    submitted: bool,
}

impl<S: KeyValueStore, R: RandomSource> Session<S, R> {
    /// Create a session and load the leaderboard and settings from `store`
    pub fn new(tuning: Tuning, store: S, rng: R) -> Self {
        let board = ScoreBoard::load(&store);
        let settings = Settings::load(&store);
        Self {
            state: GameState::new(tuning),
            input: InputState::default(),
            rng,
            store,
            board,
            settings,
            submitted: false,
        }
    }

    /// Advance one tick and draw the result. `now` is host time in seconds.
    pub fn frame(&mut self, now: f64, surface: &mut impl DrawingSurface) {
        let before = self.state.phase;
        tick(&mut self.state, &self.input.tick_input(), now, &mut self.rng);
        if before != GamePhase::GameOver && self.state.phase == GamePhase::GameOver {
            self.input.reset();
            if let Some(rank) = self.board.potential_rank(self.state.elapsed_secs as f64) {
                log::info!("Run qualifies for leaderboard rank {}", rank);
            }
        }
        draw_frame(&self.state, &self.settings, surface);
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Start a new run after game over. Ignored in any other phase.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.state.restart();
        self.input.reset();
        self.submitted = false;
        log::info!("Session restarted");
        true
    }

    /// Put this run's survival time on the board, once per run
    pub fn submit_score(&mut self, name: &str) -> Result<&[ScoreEntry], SubmitError> {
        if self.state.phase != GamePhase::GameOver {
            return Err(SubmitError::NotOver);
        }
        if self.submitted {
            return Err(SubmitError::AlreadySubmitted);
        }
        self.submitted = true;

        let name = normalize_name(name);
        if self.settings.initials != name {
            self.settings.initials = name.clone();
            if let Err(e) = self.settings.save(&mut self.store) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        let time = self.state.elapsed_secs as f64;
        log::info!("Submitting {} for {:.2}s", name, time);
        Ok(self.board.submit(&mut self.store, &name, time))
    }

    /// Replace and persist the player preferences
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), StorageError> {
        self.settings = settings;
        self.settings.save(&mut self.store)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn leaderboard(&self) -> &[ScoreEntry] {
        self.board.entries()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{INTRO_FRAMES, LANE_WIDTH, PRE_ROLL_TICKS};
    use crate::persistence::MemoryStore;
    use crate::persistence::tests::FailingStore;
    use crate::render::DrawList;
    use crate::sim::spawn::tests::Scripted;

    fn session() -> Session<MemoryStore, Scripted> {
        Session::new(Tuning::default(), MemoryStore::new(), Scripted::new(&[], 0.99))
    }

    fn force_game_over<S: KeyValueStore>(s: &mut Session<S, Scripted>, elapsed: f32) {
        let state = s.state_mut();
        state.phase = GamePhase::GameOver;
        state.elapsed_secs = elapsed;
    }

    #[test]
    fn test_submit_requires_game_over() {
        let mut s = session();
        assert_eq!(s.submit_score("abc").unwrap_err(), SubmitError::NotOver);
    }

    #[test]
    fn test_submit_once_per_run() {
        let mut s = session();
        force_game_over(&mut s, 42.7);
        let entries = s.submit_score("abc").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ABC");
        assert_eq!(s.submit_score("abc").unwrap_err(), SubmitError::AlreadySubmitted);
        assert_eq!(s.leaderboard().len(), 1);
        assert_eq!(s.settings().initials, "ABC");
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut s = session();
        let mut list = DrawList::new();
        s.frame(0.0, &mut list);
        assert!(!s.restart());
        assert_eq!(s.state().phase, GamePhase::Intro);
    }

    #[test]
    fn test_restart_clears_submitted_and_input() {
        let mut s = session();
        force_game_over(&mut s, 10.0);
        s.submit_score("abc").unwrap();
        s.handle_input(InputEvent::RightBegin);

        assert!(s.restart());
        assert!(!s.submitted());
        assert_eq!(s.input().dir(), 0);
        assert_eq!(s.state().phase, GamePhase::Intro);
        assert_eq!(s.state().elapsed_secs, 0.0);
        // Board survives restarts
        assert_eq!(s.leaderboard().len(), 1);
    }

    #[test]
    fn test_board_loaded_from_store() {
        let mut store = MemoryStore::new();
        store
            .set(ScoreBoard::STORAGE_KEY, r#"[{"name":"OLD","time":3.0}]"#)
            .unwrap();
        let s = Session::new(Tuning::default(), store, Scripted::new(&[], 0.5));
        assert_eq!(s.leaderboard()[0].name, "OLD");
    }

    #[test]
    fn test_update_settings_persists() {
        let mut s = session();
        let settings = Settings {
            show_timer: false,
            ..Settings::default()
        };
        s.update_settings(settings.clone()).unwrap();
        assert_eq!(Settings::load(s.store()), settings);
    }

    #[test]
    fn test_unavailable_store_still_plays_and_submits() {
        let mut s = Session::new(Tuning::default(), FailingStore, Scripted::new(&[], 0.99));
        assert!(s.leaderboard().is_empty());
        assert_eq!(s.settings(), &Settings::default());

        force_game_over(&mut s, 31.0);
        let entries = s.submit_score("xyz").unwrap();
        assert_eq!(entries[0].name, "XYZ");
        assert_eq!(s.settings().initials, "XYZ");
        assert!(s.update_settings(Settings::default()).is_err());
    }

    #[test]
    fn test_oversized_lane_span_runs_on_defaults() {
        let mut tuning = Tuning::default();
        tuning.categories[0].lanes = 7;
        // Every trial succeeds, so spawning starts right after the pre-roll
        let mut s = Session::new(tuning, MemoryStore::new(), Scripted::new(&[], 0.0));
        assert_eq!(s.state().tuning, Tuning::default());

        let mut list = DrawList::new();
        let mut now = 0.0;
        for _ in 0..(INTRO_FRAMES + PRE_ROLL_TICKS + 120) {
            s.frame(now, &mut list);
            now += 1.0 / 60.0;
        }
        assert!(!s.state().obstacles.is_empty());
        assert!(s.state().obstacles.iter().all(|o| o.size.x <= 3.0 * LANE_WIDTH));
    }
}
