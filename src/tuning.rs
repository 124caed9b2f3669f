//! Data-driven game balance
//!
//! Every obstacle category is described by one `CategoryTuning` entry; the
//! spawner and difficulty ramp iterate over these rather than hard-coding
//! per-width behaviour. Defaults reproduce the five-lane game; a JSON file can
//! override them for balancing.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::render::Color;
use crate::sim::ObstacleKind;

/// Environment variable pointing at a tuning JSON file (native only)
pub const TUNING_ENV_VAR: &str = "HELL404_TUNING";

/// Extra spawn gates applied on top of the probability trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnGate {
    /// Max live obstacles of this category at t=0
    pub max_start: f32,
    /// Max live obstacles of this category once the ramp completes
    pub max_end: f32,
    /// Minimum wall-clock seconds between two spawns of this category
    pub min_interval_secs: f32,
}

/// Balance for one obstacle width class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTuning {
    pub kind: ObstacleKind,
    /// Width in lanes
    pub lanes: u32,
    pub color: Color,
    /// Rise speed (pixels per tick) at the start and end of the ramp
    pub speed_min: f32,
    pub speed_max: f32,
    /// Per-tick spawn probability at the start and end of the ramp
    pub chance_min: f32,
    pub chance_max: f32,
    /// Elapsed seconds before this category may spawn at all
    #[serde(default)]
    pub unlock_secs: f32,
    /// Ticks to wait after a spawn before the next trial
    pub cooldown_ticks: u32,
    #[serde(default)]
    pub gate: Option<SpawnGate>,
}

impl CategoryTuning {
    /// Obstacle width in pixels
    pub fn width(&self) -> f32 {
        self.lanes as f32 * LANE_WIDTH
    }

    /// Number of lane-aligned positions an obstacle of this width can occupy
    pub fn slot_count(&self) -> u32 {
        (LANE_COUNT + 1).saturating_sub(self.lanes)
    }

    /// Left edge of the given slot
    pub fn slot_x(&self, slot: u32) -> f32 {
        LEFT_BOUNDARY + slot as f32 * LANE_WIDTH
    }
}

/// Tunable balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Seconds over which difficulty ramps linearly from min to max
    pub ramp_window_secs: f32,
    /// Seconds past the ramp over which the slower extra ramp completes
    pub extra_window_secs: f32,
    /// Speed multiplier added at full extra factor
    pub extra_speed_gain: f32,
    /// Spawn-chance multiplier added at full extra factor
    pub extra_chance_gain: f32,
    /// Relative speed jitter sampled per obstacle (0.1 = ±10%)
    pub speed_jitter: f32,
    pub categories: Vec<CategoryTuning>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ramp_window_secs: 120.0,
            extra_window_secs: 240.0,
            extra_speed_gain: 0.25,
            extra_chance_gain: 0.5,
            speed_jitter: 0.1,
            categories: vec![
                CategoryTuning {
                    kind: ObstacleKind::Narrow,
                    lanes: 1,
                    color: Color::rgb(0xff, 0x00, 0x00),
                    speed_min: 2.0,
                    speed_max: 5.0,
                    chance_min: 0.02,
                    chance_max: 0.06,
                    unlock_secs: 0.0,
                    cooldown_ticks: 30,
                    gate: None,
                },
                CategoryTuning {
                    kind: ObstacleKind::Medium,
                    lanes: 2,
                    color: Color::rgb(0xff, 0x88, 0x00),
                    speed_min: 1.8,
                    speed_max: 4.2,
                    chance_min: 0.01,
                    chance_max: 0.03,
                    unlock_secs: 20.0,
                    cooldown_ticks: 60,
                    gate: Some(SpawnGate {
                        max_start: 1.0,
                        max_end: 3.0,
                        min_interval_secs: 1.5,
                    }),
                },
                CategoryTuning {
                    kind: ObstacleKind::Wide,
                    lanes: 3,
                    color: Color::rgb(0xff, 0xdd, 0x00),
                    speed_min: 1.5,
                    speed_max: 3.5,
                    chance_min: 0.005,
                    chance_max: 0.02,
                    unlock_secs: 45.0,
                    cooldown_ticks: 90,
                    gate: Some(SpawnGate {
                        max_start: 1.0,
                        max_end: 2.0,
                        min_interval_secs: 3.0,
                    }),
                },
            ],
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the spawner relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Negated so NaN is rejected too
        if !(self.ramp_window_secs > 0.0 && self.ramp_window_secs.is_finite()) {
            return Err(ConfigError::RampWindow(self.ramp_window_secs));
        }
        let scope = "tuning";
        within(scope, "extra window", self.extra_window_secs, 0.0, f32::MAX)?;
        within(scope, "extra speed gain", self.extra_speed_gain, 0.0, f32::MAX)?;
        within(scope, "extra chance gain", self.extra_chance_gain, 0.0, f32::MAX)?;
        // Below 1 so a jittered speed never reaches zero
        if !(0.0..1.0).contains(&self.speed_jitter) {
            return Err(ConfigError::OutOfBounds {
                scope: scope.to_string(),
                field: "speed jitter",
                value: self.speed_jitter,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        let mut seen = Vec::with_capacity(self.categories.len());
        for cat in &self.categories {
            let kind = format!("{:?}", cat.kind);
            if seen.contains(&cat.kind) {
                return Err(ConfigError::DuplicateKind(kind));
            }
            seen.push(cat.kind);
            if cat.lanes == 0 || cat.lanes > LANE_COUNT {
                return Err(ConfigError::LaneSpan {
                    kind,
                    lanes: cat.lanes,
                    max: LANE_COUNT,
                });
            }

            within(&kind, "speed_min", cat.speed_min, f32::MIN_POSITIVE, f32::MAX)?;
            within(&kind, "speed_max", cat.speed_max, f32::MIN_POSITIVE, f32::MAX)?;
            within(&kind, "chance_min", cat.chance_min, 0.0, 1.0)?;
            within(&kind, "chance_max", cat.chance_max, 0.0, 1.0)?;
            within(&kind, "unlock_secs", cat.unlock_secs, 0.0, f32::MAX)?;
            let mut ranges = vec![
                ("speed", cat.speed_min, cat.speed_max),
                ("chance", cat.chance_min, cat.chance_max),
            ];
            if let Some(gate) = cat.gate {
                within(&kind, "max_start", gate.max_start, 0.0, f32::MAX)?;
                within(&kind, "max_end", gate.max_end, 0.0, f32::MAX)?;
                within(&kind, "min_interval_secs", gate.min_interval_secs, 0.0, f32::MAX)?;
                ranges.push(("max concurrent", gate.max_start, gate.max_end));
            }
            for (field, min, max) in ranges {
                if min > max {
                    return Err(ConfigError::Range {
                        kind,
                        field,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up the balance entry for a category
    pub fn category(&self, kind: ObstacleKind) -> Option<&CategoryTuning> {
        self.categories.iter().find(|c| c.kind == kind)
    }

    /// Load tuning from the file named by `HELL404_TUNING`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(TUNING_ENV_VAR) else {
            return Self::default();
        };
        match Self::load_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// WASM builds always use the compiled-in balance
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Finite and inside `min..=max`
fn within(
    scope: &str,
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfBounds {
            scope: scope.to_string(),
            field,
            value,
            min,
            max,
        })
    }
}
