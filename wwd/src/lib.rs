//! Claw-WWD: WWD level decoder for OpenClaw
//!
//! Captain Claw stores each stage as a WWD file. A level is a small header,
//! a stack of tile planes (background to foreground), and a list of placed
//! objects. This crate turns those bytes into a [`Level`] and back.
//!
//! The decoder only interprets layout. What a tile index *means* (solid,
//! ladder, spikes) belongs to the tileset and is applied later by the
//! physics layer.
//!
//! # Format Overview
//!
//! ```text
//! magic          "WWD\0"
//! version        u32
//! name           u32 length + bytes (max 64)
//! tile size      u32 width, u32 height
//! plane count    u32
//! planes         name, u32 width, u32 height, width*height u32 tiles
//! object count   u32
//! objects        type tag, i32 x, i32 y, i32 width, i32 height
//! ```
//!
//! All integers are little-endian. Strings are `u32` length-prefixed.
//!
//! # Usage
//!
//! ```ignore
//! use claw_wwd::decode_level;
//!
//! let level = decode_level(&bytes)?;
//! let action = level.action_plane().expect("level has planes");
//! println!("{}x{} tiles", action.width, action.height);
//! ```

mod error;
mod level;
mod parser;

pub use error::WwdError;
pub use level::{Level, LevelHeader, LevelObject, Plane};
pub use parser::{decode_level, encode_level, load_level};

pub use claw_shared::EMPTY_TILE;

// =============================================================================
// Constants
// =============================================================================

/// Longest level display name in bytes
pub const MAX_LEVEL_NAME_BYTES: u32 = 64;

/// Most planes a level may declare
pub const MAX_PLANES: u32 = 64;

/// Name of the plane collision runs against
pub const ACTION_PLANE: &str = "Action";

/// Smallest encoded object: empty type tag length + four i32 fields
pub(crate) const MIN_OBJECT_BYTES: u64 = 4 + 4 * 4;
