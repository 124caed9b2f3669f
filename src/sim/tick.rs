//! Per-frame simulation tick
//!
//! Core game loop: one call per display refresh. Tick-counted timers (intro,
//! spawn cooldowns) assume 60 Hz; the run clock and spawn intervals use the
//! host timestamp so difficulty does not depend on frame rate.

use super::collision::first_collision;
use super::difficulty::Difficulty;
use super::spawn::{RandomSource, run_spawners};
use super::state::{GamePhase, GameState, Player};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Horizontal direction: -1, 0 or +1
    pub dir: i8,
}

/// Advance the session by one frame. `now` is the host clock in seconds.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64, rng: &mut impl RandomSource) {
    if state.phase == GamePhase::NotStarted {
        state.phase = GamePhase::Intro;
        log::info!("Intro started");
    }

    match state.phase {
        GamePhase::Intro => {
            state.intro_frame += 1;
            if state.intro_frame >= INTRO_FRAMES {
                start_run(state, now);
            }
        }
        GamePhase::Running => step_running(state, input, now, rng),
        // Frozen: the renderer keeps drawing the last positions
        GamePhase::NotStarted | GamePhase::GameOver => {}
    }
}

fn start_run(state: &mut GameState, now: f64) {
    state.player = Player::default();
    for timer in &mut state.spawners {
        timer.cooldown = PRE_ROLL_TICKS;
        timer.last_spawn_secs = None;
    }
    state.run_started_at = Some(now);
    state.elapsed_secs = 0.0;
    state.difficulty = Difficulty::at(&state.tuning, 0.0);
    state.phase = GamePhase::Running;
    log::info!("Run started");
}

fn step_running(state: &mut GameState, input: &TickInput, now: f64, rng: &mut impl RandomSource) {
    state.time_ticks += 1;

    // Wall-clock elapsed time, not frame-counted
    let started = *state.run_started_at.get_or_insert(now);
    state.elapsed_secs = (now - started).max(0.0) as f32;
    state.difficulty = Difficulty::at(&state.tuning, state.elapsed_secs);

    state.player.dir = input.dir.signum();
    state.player.step();

    run_spawners(state, rng);

    for obstacle in &mut state.obstacles {
        obstacle.advance();
    }
    state.obstacles.retain(|o| !o.is_gone());

    if let Some(idx) = first_collision(&state.player.rect(), &state.obstacles) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: hit {} obstacle #{} after {:.2}s",
            state.obstacles[idx].kind.as_str(),
            state.obstacles[idx].id,
            state.elapsed_secs
        );
    }
}
