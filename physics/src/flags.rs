//! Tile classification
//!
//! A tile index means nothing on its own; a [`TileClassifier`] turns it into
//! [`TileFlags`]. Classifiers are built once per tileset and passed to the
//! resolver, so levels never carry collision semantics themselves.

use claw_shared::EMPTY_TILE;

bitflags::bitflags! {
    /// Collision-relevant properties of a tile
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u8 {
        /// Blocks movement on both axes
        const SOLID = 0b0000_0001;
        /// One-way: blocks only descent onto its top edge
        const PLATFORM = 0b0000_0010;
        /// Climbable; never blocks
        const LADDER = 0b0000_0100;
        /// Hurts or kills on contact; never blocks
        const DEADLY = 0b0000_1000;
    }
}

impl TileFlags {
    /// Whether the tile stops horizontal movement.
    pub fn blocks_horizontal(self) -> bool {
        self.contains(TileFlags::SOLID)
    }

    /// Parse a single flag name (`solid`, `platform`, `ladder`, `deadly`).
    pub fn from_tileset_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "solid" => Some(TileFlags::SOLID),
            "platform" => Some(TileFlags::PLATFORM),
            "ladder" => Some(TileFlags::LADDER),
            "deadly" => Some(TileFlags::DEADLY),
            _ => None,
        }
    }
}

/// Maps a tile index to its flags.
pub trait TileClassifier {
    /// Flags for `tile_index`. Unknown indices classify as empty.
    fn classify(&self, tile_index: u32) -> TileFlags;
}

impl<F> TileClassifier for F
where
    F: Fn(u32) -> TileFlags,
{
    fn classify(&self, tile_index: u32) -> TileFlags {
        self(tile_index)
    }
}

/// Lookup-table classifier indexed by tile number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileTable {
    flags: Vec<TileFlags>,
}

impl TileTable {
    /// Create an empty table; every index classifies as empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flags of one tile, growing the table as needed.
    pub fn set(&mut self, tile_index: u32, flags: TileFlags) -> &mut Self {
        if tile_index == EMPTY_TILE {
            return self;
        }
        let i = tile_index as usize;
        if i >= self.flags.len() {
            self.flags.resize(i + 1, TileFlags::empty());
        }
        self.flags[i] = flags;
        self
    }

    /// Add flags to every tile in `first..=last`.
    pub fn insert_range(&mut self, first: u32, last: u32, flags: TileFlags) -> &mut Self {
        for index in first..=last.min(EMPTY_TILE - 1) {
            let current = self.classify(index);
            self.set(index, current | flags);
        }
        self
    }

    /// Number of explicitly stored entries.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no tile has flags.
    pub fn is_empty(&self) -> bool {
        self.flags.iter().all(|f| f.is_empty())
    }
}

impl TileClassifier for TileTable {
    fn classify(&self, tile_index: u32) -> TileFlags {
        self.flags
            .get(tile_index as usize)
            .copied()
            .unwrap_or_default()
    }
}
