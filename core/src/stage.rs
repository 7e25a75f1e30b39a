//! A playable stage: one level plane classified by a tileset

use std::sync::Arc;

use claw_physics::{TileClassifier, TileFlags, TileGrid, TileMap, TileTable};
use claw_shared::EMPTY_TILE;
use claw_wwd::{Level, LevelObject, Plane};

use crate::error::AssetError;

/// Object type tag marking where the player starts
pub const START_POINT: &str = "StartPoint";

/// A level bound to the plane collision runs against and the tileset that
/// classifies it.
///
/// Cells outside the plane are solid and [`EMPTY_TILE`] cells are empty.
#[derive(Debug, Clone)]
pub struct Stage {
    level: Arc<Level>,
    plane: usize,
    tiles: TileTable,
}

impl Stage {
    /// Bind the level's action plane.
    pub fn new(level: Arc<Level>, tiles: TileTable) -> Result<Self, AssetError> {
        let plane = match level.plane_index(claw_wwd::ACTION_PLANE) {
            Some(i) => i,
            None if !level.planes.is_empty() => 0,
            None => {
                return Err(AssetError::MissingPlane {
                    level: level.name().to_string(),
                    plane: claw_wwd::ACTION_PLANE.to_string(),
                });
            }
        };
        Ok(Self {
            level,
            plane,
            tiles,
        })
    }

    /// Bind a specific plane by name (case-insensitive).
    pub fn with_plane(level: Arc<Level>, plane: &str, tiles: TileTable) -> Result<Self, AssetError> {
        let index = level
            .plane_index(plane)
            .ok_or_else(|| AssetError::MissingPlane {
                level: level.name().to_string(),
                plane: plane.to_string(),
            })?;
        Ok(Self {
            level,
            plane: index,
            tiles,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// The plane collision runs against.
    pub fn plane(&self) -> &Plane {
        &self.level.planes[self.plane]
    }

    /// Convert world pixels to a tile cell.
    pub fn world_to_tile(&self, x: f32, y: f32) -> (i32, i32) {
        self.level.world_to_tile(x, y)
    }

    /// Flags of the cell containing world point `(x, y)`.
    pub fn flags_at_world(&self, x: f32, y: f32) -> TileFlags {
        let (tx, ty) = self.world_to_tile(x, y);
        self.flags_at(tx, ty)
    }

    /// Objects to spawn, in file order.
    pub fn spawn_objects(&self) -> impl Iterator<Item = &LevelObject> {
        self.level.objects.iter()
    }

    /// World position of the first start point object.
    pub fn start_point(&self) -> Option<(f32, f32)> {
        self.level
            .objects_of_type(START_POINT)
            .next()
            .map(|o| (o.x as f32, o.y as f32))
    }

    /// Size of the collision plane in world pixels.
    pub fn pixel_size(&self) -> (u64, u64) {
        self.level.pixel_size(self.plane())
    }

    /// Classify every cell up front for repeated queries.
    pub fn to_grid(&self) -> TileGrid {
        let plane = self.plane();
        let (tw, th) = self.tile_size();
        let mut grid = TileGrid::new(plane.width, plane.height, tw, th);
        for ty in 0..plane.height as i32 {
            for tx in 0..plane.width as i32 {
                grid.set(tx, ty, self.flags_at(tx, ty));
            }
        }
        grid
    }
}

impl TileMap for Stage {
    fn tile_size(&self) -> (f32, f32) {
        (
            self.level.header.tile_width as f32,
            self.level.header.tile_height as f32,
        )
    }

    fn flags_at(&self, tx: i32, ty: i32) -> TileFlags {
        match self.plane().tile_at(tx, ty) {
            None => TileFlags::SOLID,
            Some(EMPTY_TILE) => TileFlags::empty(),
            Some(tile) => self.tiles.classify(tile),
        }
    }
}
