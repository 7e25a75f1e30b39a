//! Tileset descriptions
//!
//! Levels only store tile indices. A tileset description says which indices
//! are solid, platforms, ladders or deadly:
//!
//! ```toml
//! name = "LaRoca"
//!
//! [[tiles]]
//! range = [0, 11]
//! flags = ["solid"]
//!
//! [[tiles]]
//! range = [40, 40]
//! flags = ["ladder", "platform"]
//! ```
//!
//! Rules apply in order and their flags accumulate.

use std::path::Path;

use claw_physics::{TileFlags, TileTable};
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Highest tile index a description may classify
pub const MAX_TILE_INDEX: u32 = u16::MAX as u32;

/// A parsed tileset description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TilesetDesc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TileRule>,
}

/// Flags for an inclusive range of tile indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRule {
    pub range: [u32; 2],
    pub flags: Vec<String>,
}

impl TilesetDesc {
    /// Parse a description from TOML text.
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a description file.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Build the lookup table the collision layer consults.
    pub fn to_table(&self) -> Result<TileTable, AssetError> {
        let mut table = TileTable::new();
        for (i, rule) in self.tiles.iter().enumerate() {
            let [first, last] = rule.range;
            if first > last {
                return Err(AssetError::Tileset(format!(
                    "rule {}: range [{}, {}] is reversed",
                    i, first, last
                )));
            }
            if last > MAX_TILE_INDEX {
                return Err(AssetError::Tileset(format!(
                    "rule {}: tile index {} exceeds maximum {}",
                    i, last, MAX_TILE_INDEX
                )));
            }

            let mut flags = TileFlags::empty();
            for name in &rule.flags {
                flags |= TileFlags::from_tileset_name(name).ok_or_else(|| {
                    AssetError::Tileset(format!("rule {}: unknown flag '{}'", i, name))
                })?;
            }
            table.insert_range(first, last, flags);
        }
        tracing::debug!(
            "Tileset '{}': {} rules, {} indices",
            self.name,
            self.tiles.len(),
            table.len()
        );
        Ok(table)
    }
}
