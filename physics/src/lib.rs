//! Claw-Physics: tile-grid collision for OpenClaw
//!
//! Entities are axis-aligned boxes moving through a grid of classified tiles.
//! Movement is resolved one axis at a time (X, then Y) by sweeping the
//! leading edge across every tile it enters:
//!
//! - `SOLID` tiles block on both axes.
//! - `PLATFORM` tiles block only a descent that starts at or above their top.
//! - `LADDER` and `DEADLY` tiles never block; callers read them through
//!   [`overlapping_flags`].
//! - Anything outside the grid is solid.
//!
//! The resolver functions are pure. [`Mover`] layers gravity, a fall speed
//! cap and sub-stepping on top for callers that want a per-tick driver.
//!
//! # Usage
//!
//! ```ignore
//! use claw_physics::{Aabb, Body, Mover, PhysicsConfig};
//!
//! let mover = Mover::new(PhysicsConfig::default());
//! let mut body = Body::new(Aabb::new(64.0, 0.0, 24.0, 48.0));
//! let outcome = mover.step(&mut body, 1.0 / 60.0, &stage);
//! if outcome.touching.contains(TileFlags::DEADLY) { /* ... */ }
//! ```

mod aabb;
mod flags;
mod map;
mod mover;
mod resolve;

pub use aabb::{Aabb, EDGE_EPSILON};
pub use flags::{TileClassifier, TileFlags, TileTable};
pub use map::{FnTileMap, TileGrid, TileMap};
pub use mover::{
    Body, MAX_SUBSTEPS, Mover, PhysicsConfig, StepOutcome, SubstepPolicy, apply_gravity,
};
pub use resolve::{VerticalResolution, overlapping_flags, resolve_x, resolve_y};
