//! Gravity, sub-stepping and the per-tick movement driver

use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::flags::TileFlags;
use crate::map::TileMap;
use crate::resolve::{overlapping_flags, sweep_x, sweep_y};

/// Most sub-steps a single tick is split into
pub const MAX_SUBSTEPS: u32 = 64;

/// How a tick is split before resolving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstepPolicy {
    /// Resolve the whole tick at once; relies on the fall speed cap
    None,
    /// Split so no sub-step moves further than this fraction of the smaller
    /// tile dimension
    MaxTileFraction(f32),
}

impl Default for SubstepPolicy {
    fn default() -> Self {
        SubstepPolicy::MaxTileFraction(1.0)
    }
}

impl SubstepPolicy {
    /// Number of sub-steps for a tick moving at `(vel_x, vel_y)` for `dt`.
    pub fn substeps(&self, vel_x: f32, vel_y: f32, dt: f32, tile_size: (f32, f32)) -> u32 {
        let fraction = match *self {
            SubstepPolicy::None => return 1,
            SubstepPolicy::MaxTileFraction(f) => f,
        };
        let max_step = fraction * tile_size.0.min(tile_size.1);
        if max_step.is_nan() || max_step <= 0.0 {
            return 1;
        }
        let travel = vel_x.abs().max(vel_y.abs()) * dt.abs();
        let steps = (travel / max_step).ceil();
        if steps.is_nan() || steps < 1.0 {
            1
        } else if steps >= MAX_SUBSTEPS as f32 {
            MAX_SUBSTEPS
        } else {
            steps as u32
        }
    }
}

/// Gravity tuning in world pixels and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Terminal fall speed (px/s)
    pub max_fall_speed: f32,
    /// Tick splitting policy
    pub substep: SubstepPolicy,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            max_fall_speed: 600.0,
            substep: SubstepPolicy::default(),
        }
    }
}

/// Accumulate gravity into `vel_y`, then cap it at the terminal fall speed.
///
/// Upward velocity is never capped.
pub fn apply_gravity(vel_y: f32, dt: f32, config: &PhysicsConfig) -> f32 {
    (vel_y + config.gravity * dt).min(config.max_fall_speed)
}

/// A moving entity's collision state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub bounds: Aabb,
    pub vel_x: f32,
    pub vel_y: f32,
    /// Landed during the last step
    pub grounded: bool,
    /// Set by the caller while climbing; suppresses gravity
    pub on_ladder: bool,
}

impl Body {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }
}

/// What happened during one [`Mover::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    pub grounded: bool,
    pub blocked_x: bool,
    pub blocked_y: bool,
    /// Union of the flags under the body after moving
    pub touching: TileFlags,
}

/// Moves bodies through a tile map one tick at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mover {
    config: PhysicsConfig,
}

impl Mover {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance `body` by `dt` seconds.
    ///
    /// Gravity is applied once for the whole tick unless the body is on a
    /// ladder. The tick is then split per the sub-step policy and each slice
    /// resolves X, then Y. A blocked axis has its velocity zeroed so later
    /// slices do not push into the same wall.
    pub fn step<M: TileMap + ?Sized>(&self, body: &mut Body, dt: f32, map: &M) -> StepOutcome {
        if !body.on_ladder {
            body.vel_y = apply_gravity(body.vel_y, dt, &self.config);
        }

        let steps = self
            .config
            .substep
            .substeps(body.vel_x, body.vel_y, dt, map.tile_size());
        let slice = dt / steps as f32;

        let mut outcome = StepOutcome::default();
        for _ in 0..steps {
            let dx = body.vel_x * slice;
            match sweep_x(&body.bounds, dx, map) {
                Some(x) => {
                    body.bounds.x = x;
                    body.vel_x = 0.0;
                    outcome.blocked_x = true;
                }
                None => body.bounds.x += dx,
            }

            let dy = body.vel_y * slice;
            match sweep_y(&body.bounds, dy, map) {
                Some(hit) => {
                    body.bounds.y = hit.y;
                    body.vel_y = 0.0;
                    outcome.blocked_y = true;
                    outcome.grounded |= hit.grounded;
                }
                None => body.bounds.y += dy,
            }
        }

        body.grounded = outcome.grounded;
        outcome.touching = overlapping_flags(&body.bounds, map);
        outcome
    }
}
