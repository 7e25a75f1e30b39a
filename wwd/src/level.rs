//! Decoded level data structures

use claw_shared::EMPTY_TILE;
use serde::Serialize;

/// Fixed header of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelHeader {
    /// Format version the level was written with
    pub version: u32,
    /// Display name (at most 64 bytes)
    pub name: String,
    /// Tile cell width in pixels
    pub tile_width: u32,
    /// Tile cell height in pixels
    pub tile_height: u32,
    /// Number of planes that follow the header
    pub plane_count: u32,
}

/// One tile layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plane {
    /// Plane name (e.g. "Background", "Action", "Front")
    pub name: String,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Row-major tile indices, row 0 at the top. Length is `width * height`.
    pub tiles: Vec<u32>,
}

impl Plane {
    /// Create a plane with every cell set to [`EMPTY_TILE`].
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![EMPTY_TILE; width as usize * height as usize],
        }
    }

    /// Create a plane from existing tile data.
    ///
    /// Returns `None` if `tiles.len() != width * height`.
    pub fn from_tiles(name: impl Into<String>, width: u32, height: u32, tiles: Vec<u32>) -> Option<Self> {
        if tiles.len() as u64 != width as u64 * height as u64 {
            return None;
        }
        Some(Self {
            name: name.into(),
            width,
            height,
            tiles,
        })
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx as u32 >= self.width || ty as u32 >= self.height {
            return None;
        }
        Some(ty as usize * self.width as usize + tx as usize)
    }

    /// Tile index at grid cell `(tx, ty)`, or `None` outside the plane.
    pub fn tile_at(&self, tx: i32, ty: i32) -> Option<u32> {
        self.index(tx, ty).map(|i| self.tiles[i])
    }

    /// Overwrite one cell. Returns `false` if the cell is outside the plane.
    pub fn set_tile(&mut self, tx: i32, ty: i32, tile: u32) -> bool {
        match self.index(tx, ty) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }

    /// Number of cells that hold a tile.
    pub fn filled_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != EMPTY_TILE).count()
    }
}

/// An object placed in the level (spawn point, enemy, pickup, trigger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelObject {
    /// Type tag, e.g. "Officer" or "TreasurePowerup"
    #[serde(rename = "type")]
    pub kind: String,
    /// World X in pixels
    pub x: i32,
    /// World Y in pixels
    pub y: i32,
    /// Bounding width in pixels
    pub width: i32,
    /// Bounding height in pixels
    pub height: i32,
}

/// A fully decoded level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    /// Header fields
    pub header: LevelHeader,
    /// Planes in draw order, background first
    pub planes: Vec<Plane>,
    /// Objects in file order
    pub objects: Vec<LevelObject>,
}

impl Level {
    /// Create an empty level of the current format version.
    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            header: LevelHeader {
                version: claw_shared::WWD_FORMAT.version,
                name: name.into(),
                tile_width,
                tile_height,
                plane_count: 0,
            },
            planes: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Append a plane, keeping the header's plane count in sync.
    pub fn push_plane(&mut self, plane: Plane) -> &mut Self {
        self.planes.push(plane);
        self.header.plane_count = self.planes.len() as u32;
        self
    }

    /// Append an object.
    pub fn push_object(&mut self, object: LevelObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Level display name.
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Find a plane by name, ignoring ASCII case.
    pub fn plane(&self, name: &str) -> Option<&Plane> {
        self.planes.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Position of a plane by name, ignoring ASCII case.
    pub fn plane_index(&self, name: &str) -> Option<usize> {
        self.planes.iter().position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The plane collision runs against: the one named "Action", or the
    /// first plane if none is.
    pub fn action_plane(&self) -> Option<&Plane> {
        self.plane(crate::ACTION_PLANE).or_else(|| self.planes.first())
    }

    /// Objects with the given type tag, in file order.
    pub fn objects_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a LevelObject> {
        self.objects.iter().filter(move |o| o.kind == kind)
    }

    /// Size of a plane in pixels.
    pub fn pixel_size(&self, plane: &Plane) -> (u64, u64) {
        (
            plane.width as u64 * self.header.tile_width as u64,
            plane.height as u64 * self.header.tile_height as u64,
        )
    }

    /// Convert world pixel coordinates to a tile cell.
    ///
    /// Negative coordinates map to negative cells, which every plane treats
    /// as outside.
    pub fn world_to_tile(&self, x: f32, y: f32) -> (i32, i32) {
        let tw = self.header.tile_width.max(1) as f32;
        let th = self.header.tile_height.max(1) as f32;
        ((x / tw).floor() as i32, (y / th).floor() as i32)
    }
}
