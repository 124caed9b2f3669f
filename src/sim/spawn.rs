//! Obstacle spawner
//!
//! One data-driven loop over the tuning categories. Each category may spawn
//! at most one obstacle per tick, and only when all of these hold:
//! - its cooldown has run out
//! - it is unlocked (non-zero chance)
//! - gated categories are below their live cap and past their minimum interval
//! - a Bernoulli trial with the current chance succeeds

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, Obstacle};
use crate::consts::*;

/// Source of uniform random numbers in `[0, 1)`
///
/// Every independent decision (spawn trial, lane choice, speed jitter) takes
/// exactly one draw.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl<T: Rng> RandomSource for T {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded RNG for a run
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Uniformly pick one of `count` slots
pub fn pick_slot(rng: &mut impl RandomSource, count: u32) -> u32 {
    let r = rng.next_unit();
    ((r * count as f32) as u32).min(count.saturating_sub(1))
}

/// Base speed with symmetric relative jitter
pub fn jittered_speed(base: f32, jitter: f32, rng: &mut impl RandomSource) -> f32 {
    let r = rng.next_unit();
    base * (1.0 + jitter * (2.0 * r - 1.0))
}

/// Run one tick of every category spawner. Returns how many obstacles spawned.
pub fn run_spawners(state: &mut GameState, rng: &mut impl RandomSource) -> usize {
    let elapsed = state.elapsed_secs;
    let mut spawned = 0;

    for i in 0..state.spawners.len() {
        if state.spawners[i].cooldown > 0 {
            state.spawners[i].cooldown -= 1;
            continue;
        }

        let cat = &state.tuning.categories[i];
        let diff = state.difficulty.categories[i];
        if diff.chance <= 0.0 {
            continue;
        }

        if let Some(gate) = cat.gate {
            let live = state.obstacles.iter().filter(|o| o.kind == cat.kind).count();
            if live >= diff.max_concurrent.unwrap_or(usize::MAX) {
                continue;
            }
            if let Some(last) = state.spawners[i].last_spawn_secs {
                if elapsed - last < gate.min_interval_secs {
                    continue;
                }
            }
        }

        if rng.next_unit() >= diff.chance {
            continue;
        }

        let slot = pick_slot(rng, cat.slot_count());
        let speed = jittered_speed(diff.speed, state.tuning.speed_jitter, rng);
        let x = cat.slot_x(slot);
        let width = cat.width();
        let kind = cat.kind;
        let cooldown = cat.cooldown_ticks;

        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(x, CANVAS_HEIGHT),
            size: Vec2::new(width, OBSTACLE_HEIGHT),
            speed,
        });
        state.spawners[i].cooldown = cooldown;
        state.spawners[i].last_spawn_secs = Some(elapsed);
        spawned += 1;

        log::debug!(
            "Spawned {} obstacle #{} in slot {} at {:.2} px/tick (t={:.1}s)",
            kind.as_str(),
            id,
            slot,
            speed,
            elapsed
        );
    }

    spawned
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::state::{GamePhase, ObstacleKind};
    use crate::tuning::Tuning;
    use std::collections::VecDeque;

    /// Replays fixed values and counts how many were consumed
    pub(crate) struct Scripted {
        values: VecDeque<f32>,
        pub fallback: f32,
        pub draws: usize,
    }

    impl Scripted {
        pub(crate) fn new(values: &[f32], fallback: f32) -> Self {
            Self {
                values: values.iter().copied().collect(),
                fallback,
                draws: 0,
            }
        }
    }

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f32 {
            self.draws += 1;
            self.values.pop_front().unwrap_or(self.fallback)
        }
    }

    fn running_state(elapsed: f32) -> GameState {
        let mut state = GameState::new(Tuning::default());
        state.phase = GamePhase::Running;
        state.elapsed_secs = elapsed;
        state.difficulty = Difficulty::at(&state.tuning, elapsed);
        state
    }

    #[test]
    fn test_pick_slot_covers_range() {
        let mut rng = Scripted::new(&[0.0, 0.5, 0.999_999], 0.0);
        assert_eq!(pick_slot(&mut rng, 5), 0);
        assert_eq!(pick_slot(&mut rng, 5), 2);
        assert_eq!(pick_slot(&mut rng, 5), 4);
    }

    #[test]
    fn test_jitter_bounds() {
        let mut rng = Scripted::new(&[0.0, 0.5, 1.0], 0.0);
        assert!((jittered_speed(2.0, 0.1, &mut rng) - 1.8).abs() < 1e-5);
        assert!((jittered_speed(2.0, 0.1, &mut rng) - 2.0).abs() < 1e-5);
        assert!((jittered_speed(2.0, 0.1, &mut rng) - 2.2).abs() < 1e-5);
    }

    #[test]
    fn test_cooldown_blocks_and_decrements() {
        let mut state = running_state(0.0);
        for timer in &mut state.spawners {
            timer.cooldown = 2;
        }
        let mut rng = Scripted::new(&[], 0.0);
        assert_eq!(run_spawners(&mut state, &mut rng), 0);
        assert_eq!(rng.draws, 0);
        assert!(state.spawners.iter().all(|t| t.cooldown == 1));
    }

    #[test]
    fn test_successful_trial_spawns_one_narrow() {
        let mut state = running_state(0.0);
        // trial, slot, jitter
        let mut rng = Scripted::new(&[0.0, 0.5, 0.5], 0.99);
        assert_eq!(run_spawners(&mut state, &mut rng), 1);
        // Medium and wide are still locked at t=0 and draw nothing
        assert_eq!(rng.draws, 3);

        let obs = &state.obstacles[0];
        assert_eq!(obs.kind, ObstacleKind::Narrow);
        assert_eq!(obs.pos.x, LEFT_BOUNDARY + 2.0 * LANE_WIDTH);
        assert_eq!(obs.pos.y, CANVAS_HEIGHT);
        assert_eq!(obs.size.x, LANE_WIDTH);
        assert!((obs.speed - 2.0).abs() < 1e-5);
        assert_eq!(state.spawners[0].cooldown, 30);
        assert_eq!(state.spawners[0].last_spawn_secs, Some(0.0));
    }

    #[test]
    fn test_failed_trial_takes_one_draw() {
        let mut state = running_state(0.0);
        let mut rng = Scripted::new(&[0.9], 0.9);
        assert_eq!(run_spawners(&mut state, &mut rng), 0);
        assert_eq!(rng.draws, 1);
        assert_eq!(state.spawners[0].cooldown, 0);
    }

    #[test]
    fn test_wide_spawns_in_three_slots() {
        let mut state = running_state(200.0);
        // narrow fails, medium fails, wide succeeds in last slot
        let mut rng = Scripted::new(&[0.99, 0.99, 0.0, 0.999, 0.5], 0.99);
        assert_eq!(run_spawners(&mut state, &mut rng), 1);
        let obs = &state.obstacles[0];
        assert_eq!(obs.kind, ObstacleKind::Wide);
        assert_eq!(obs.pos.x, LEFT_BOUNDARY + 2.0 * LANE_WIDTH);
        assert_eq!(obs.size.x, 3.0 * LANE_WIDTH);
    }

    #[test]
    fn test_gate_caps_live_count() {
        let mut state = running_state(30.0);
        // Max concurrent medium at t=30 is floor(lerp(1,3,0.25)) = 1
        let mut rng = Scripted::new(&[0.99, 0.0, 0.0, 0.5], 0.99);
        assert_eq!(run_spawners(&mut state, &mut rng), 1);
        assert_eq!(state.live_count(ObstacleKind::Medium), 1);

        // Even with cooldown cleared and a passing trial the cap holds
        state.spawners[1].cooldown = 0;
        state.elapsed_secs = 40.0;
        let mut rng = Scripted::new(&[0.99], 0.0);
        run_spawners(&mut state, &mut rng);
        assert_eq!(state.live_count(ObstacleKind::Medium), 1);
        // Only the narrow trial drew
        assert_eq!(rng.draws, 1);
    }

    #[test]
    fn test_gate_enforces_min_interval() {
        let mut state = running_state(120.0);
        state.spawners[2].last_spawn_secs = Some(118.0);
        let mut rng = Scripted::new(&[0.99, 0.99], 0.0);
        run_spawners(&mut state, &mut rng);
        // Wide is 2s after its last spawn, below the 3s minimum
        assert_eq!(state.live_count(ObstacleKind::Wide), 0);
        assert_eq!(rng.draws, 2);

        state.elapsed_secs = 121.5;
        let mut rng = Scripted::new(&[0.99, 0.99, 0.0, 0.0, 0.5], 0.99);
        run_spawners(&mut state, &mut rng);
        assert_eq!(state.live_count(ObstacleKind::Wide), 1);
    }

    #[test]
    fn test_narrow_is_never_gated() {
        let mut state = running_state(0.0);
        for _ in 0..8 {
            state.spawners[0].cooldown = 0;
            let mut rng = Scripted::new(&[0.0, 0.1, 0.5], 0.99);
            run_spawners(&mut state, &mut rng);
        }
        assert_eq!(state.live_count(ObstacleKind::Narrow), 8);
    }

    #[test]
    fn test_any_rng_is_a_random_source() {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            let r = rng.next_unit();
            assert!((0.0..1.0).contains(&r));
        }

        let mut state = running_state(200.0);
        let spawned: usize = (0..600).map(|_| run_spawners(&mut state, &mut rng)).sum();
        assert!(spawned > 0);
        assert!(state.obstacles.iter().all(|o| o.pos.x >= LEFT_BOUNDARY));
    }
}
