//! Tile maps the resolver queries

use crate::flags::{TileClassifier, TileFlags};

/// A grid of classified tiles.
///
/// Implementations decide what lies outside their bounds. Every map in this
/// crate reports out-of-grid cells as [`TileFlags::SOLID`] so the world edge
/// behaves like a wall.
pub trait TileMap {
    /// Tile cell size in world pixels `(width, height)`.
    fn tile_size(&self) -> (f32, f32);

    /// Flags of the cell at `(tx, ty)`.
    fn flags_at(&self, tx: i32, ty: i32) -> TileFlags;
}

impl<M: TileMap + ?Sized> TileMap for &M {
    fn tile_size(&self) -> (f32, f32) {
        (**self).tile_size()
    }

    fn flags_at(&self, tx: i32, ty: i32) -> TileFlags {
        (**self).flags_at(tx, ty)
    }
}

/// Owned grid of pre-classified cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_width: f32,
    tile_height: f32,
    cells: Vec<TileFlags>,
}

impl TileGrid {
    /// Create an all-empty grid.
    pub fn new(width: u32, height: u32, tile_width: f32, tile_height: f32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            cells: vec![TileFlags::empty(); width as usize * height as usize],
        }
    }

    /// Classify a row-major slice of tile indices.
    ///
    /// Returns `None` if `tiles.len() != width * height`.
    pub fn from_indices(
        width: u32,
        height: u32,
        tile_width: f32,
        tile_height: f32,
        tiles: &[u32],
        classifier: &impl TileClassifier,
    ) -> Option<Self> {
        if tiles.len() as u64 != width as u64 * height as u64 {
            return None;
        }
        Some(Self {
            width,
            height,
            tile_width,
            tile_height,
            cells: tiles.iter().map(|&t| classifier.classify(t)).collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx as u32 >= self.width || ty as u32 >= self.height {
            return None;
        }
        Some(ty as usize * self.width as usize + tx as usize)
    }

    /// Set one cell. Returns `false` outside the grid.
    pub fn set(&mut self, tx: i32, ty: i32, flags: TileFlags) -> bool {
        match self.index(tx, ty) {
            Some(i) => {
                self.cells[i] = flags;
                true
            }
            None => false,
        }
    }

    /// Set every cell of row `ty`.
    pub fn fill_row(&mut self, ty: i32, flags: TileFlags) {
        for tx in 0..self.width as i32 {
            self.set(tx, ty, flags);
        }
    }
}

impl TileMap for TileGrid {
    fn tile_size(&self) -> (f32, f32) {
        (self.tile_width, self.tile_height)
    }

    fn flags_at(&self, tx: i32, ty: i32) -> TileFlags {
        match self.index(tx, ty) {
            Some(i) => self.cells[i],
            None => TileFlags::SOLID,
        }
    }
}

/// Adapts a closure `(tx, ty) -> TileFlags` into a [`TileMap`].
///
/// The closure sees every coordinate, including ones outside any level, and
/// owns the out-of-bounds policy.
pub struct FnTileMap<F> {
    tile_width: f32,
    tile_height: f32,
    lookup: F,
}

impl<F> FnTileMap<F>
where
    F: Fn(i32, i32) -> TileFlags,
{
    pub fn new(tile_width: f32, tile_height: f32, lookup: F) -> Self {
        Self {
            tile_width,
            tile_height,
            lookup,
        }
    }
}

impl<F> TileMap for FnTileMap<F>
where
    F: Fn(i32, i32) -> TileFlags,
{
    fn tile_size(&self) -> (f32, f32) {
        (self.tile_width, self.tile_height)
    }

    fn flags_at(&self, tx: i32, ty: i32) -> TileFlags {
        (self.lookup)(tx, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::TileTable;
    use claw_shared::EMPTY_TILE;

    #[test]
    fn test_out_of_grid_is_solid() {
        let grid = TileGrid::new(4, 3, 32.0, 32.0);
        assert_eq!(grid.flags_at(0, 0), TileFlags::empty());
        assert_eq!(grid.flags_at(-1, 0), TileFlags::SOLID);
        assert_eq!(grid.flags_at(4, 0), TileFlags::SOLID);
        assert_eq!(grid.flags_at(0, 3), TileFlags::SOLID);
        assert_eq!(grid.flags_at(0, -1), TileFlags::SOLID);
    }

    #[test]
    fn test_from_indices() {
        let mut table = TileTable::new();
        table.set(1, TileFlags::SOLID).set(2, TileFlags::LADDER);

        let tiles = [EMPTY_TILE, 1, 2, 0];
        let grid = TileGrid::from_indices(2, 2, 16.0, 16.0, &tiles, &table).unwrap();
        assert_eq!(grid.flags_at(0, 0), TileFlags::empty());
        assert_eq!(grid.flags_at(1, 0), TileFlags::SOLID);
        assert_eq!(grid.flags_at(0, 1), TileFlags::LADDER);
        assert_eq!(grid.tile_size(), (16.0, 16.0));

        assert!(TileGrid::from_indices(3, 2, 16.0, 16.0, &tiles, &table).is_none());
    }

    #[test]
    fn test_fill_row() {
        let mut grid = TileGrid::new(3, 3, 32.0, 32.0);
        grid.fill_row(2, TileFlags::PLATFORM);
        assert!((0..3).all(|tx| grid.flags_at(tx, 2) == TileFlags::PLATFORM));
        assert!(!grid.set(3, 0, TileFlags::SOLID));
    }

    #[test]
    fn test_fn_tile_map() {
        let map = FnTileMap::new(32.0, 32.0, |_, ty| {
            if ty >= 5 {
                TileFlags::SOLID
            } else {
                TileFlags::empty()
            }
        });
        assert_eq!(map.flags_at(100, 5), TileFlags::SOLID);
        assert_eq!(map.flags_at(-100, 4), TileFlags::empty());
    }
}
