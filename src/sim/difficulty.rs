//! Difficulty ramp
//!
//! Speeds and spawn chances are a pure function of elapsed run time. Nothing
//! here reads history, so the whole schedule can be re-derived from a single
//! timestamp.

use serde::{Deserialize, Serialize};

use super::state::ObstacleKind;
use crate::tuning::{CategoryTuning, Tuning};

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Progress through the ramp window, 0 at the start and 1 once it has elapsed
pub fn time_factor(elapsed: f32, ramp_window: f32) -> f32 {
    if ramp_window <= 0.0 {
        return 1.0;
    }
    (elapsed / ramp_window).clamp(0.0, 1.0)
}

/// Slower follow-on ramp that only starts once the main ramp is complete
pub fn extra_factor(elapsed: f32, ramp_window: f32, extra_window: f32) -> f32 {
    if extra_window <= 0.0 {
        return 0.0;
    }
    ((elapsed - ramp_window) / extra_window).clamp(0.0, 1.0)
}

/// Derived parameters for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryDifficulty {
    pub kind: ObstacleKind,
    /// Base rise speed before per-obstacle jitter
    pub speed: f32,
    /// Per-tick spawn probability; 0 while the category is locked
    pub chance: f32,
    /// Live-count cap, only for gated categories
    pub max_concurrent: Option<usize>,
}

impl CategoryDifficulty {
    fn derive(cat: &CategoryTuning, tuning: &Tuning, elapsed: f32, tf: f32, ef: f32) -> Self {
        let speed = lerp(cat.speed_min, cat.speed_max, tf) * (1.0 + tuning.extra_speed_gain * ef);
        let chance = if elapsed < cat.unlock_secs {
            0.0
        } else {
            (lerp(cat.chance_min, cat.chance_max, tf) * (1.0 + tuning.extra_chance_gain * ef))
                .min(1.0)
        };
        let max_concurrent = cat
            .gate
            .map(|g| lerp(g.max_start, g.max_end, tf).floor().max(0.0) as usize);
        Self {
            kind: cat.kind,
            speed,
            chance,
            max_concurrent,
        }
    }
}

/// Snapshot of every difficulty knob at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub time_factor: f32,
    pub extra_factor: f32,
    /// Same order as `Tuning::categories`
    pub categories: Vec<CategoryDifficulty>,
}

impl Difficulty {
    /// Derive the difficulty for `elapsed` seconds into a run
    pub fn at(tuning: &Tuning, elapsed: f32) -> Self {
        let elapsed = elapsed.max(0.0);
        let tf = time_factor(elapsed, tuning.ramp_window_secs);
        let ef = extra_factor(elapsed, tuning.ramp_window_secs, tuning.extra_window_secs);
        let categories = tuning
            .categories
            .iter()
            .map(|c| CategoryDifficulty::derive(c, tuning, elapsed, tf, ef))
            .collect();
        Self {
            time_factor: tf,
            extra_factor: ef,
            categories,
        }
    }

    pub fn category(&self, kind: ObstacleKind) -> Option<&CategoryDifficulty> {
        self.categories.iter().find(|c| c.kind == kind)
    }
}
