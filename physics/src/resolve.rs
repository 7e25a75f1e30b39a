//! Axis-separated sweep against a tile map
//!
//! Callers resolve X first, then Y with the box already moved on X. Each
//! sweep walks the tiles the leading edge enters, nearest first, across every
//! row (or column) the box spans, and stops at the first blocking tile.
//!
//! Tiles the box already overlaps before moving are never in the sweep, so a
//! box embedded in a wall can always move out of it.
//!
//! A sweep costs one lookup per tile it passes and has no length limit. On a
//! [`TileGrid`](crate::TileGrid) the solid border ends every sweep at the
//! grid edge; a [`FnTileMap`](crate::FnTileMap) that is empty everywhere
//! makes the cost grow with the distance moved.

use crate::aabb::{Aabb, covered_span, first_covered, last_covered, on_boundary, EDGE_EPSILON};
use crate::flags::TileFlags;
use crate::map::TileMap;

/// Result of a vertical resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalResolution {
    /// New top edge
    pub y: f32,
    /// The box landed on a solid tile or a one-way platform
    pub grounded: bool,
}

/// Horizontal position after moving by `vel_x * dt`.
///
/// Only [`TileFlags::SOLID`] blocks horizontal movement. A blocked box ends
/// flush against the tile edge.
pub fn resolve_x<M: TileMap + ?Sized>(bounds: &Aabb, vel_x: f32, dt: f32, map: &M) -> f32 {
    let dx = vel_x * dt;
    sweep_x(bounds, dx, map).unwrap_or(bounds.x + dx)
}

/// Vertical position after moving by `vel_y * dt`, and whether the box landed.
///
/// Descending stops on [`TileFlags::SOLID`] tiles and on
/// [`TileFlags::PLATFORM`] tiles whose top edge was at or below the box's
/// bottom edge before the move. Ascending stops only on solid tiles. Zero
/// velocity leaves the box where it is and reports `grounded = false`.
pub fn resolve_y<M: TileMap + ?Sized>(
    bounds: &Aabb,
    vel_y: f32,
    dt: f32,
    map: &M,
) -> VerticalResolution {
    let dy = vel_y * dt;
    match sweep_y(bounds, dy, map) {
        Some(hit) => hit,
        None => VerticalResolution {
            y: bounds.y + dy,
            grounded: false,
        },
    }
}

/// Union of the flags of every tile under the box.
///
/// This is how callers learn about ladders and deadly tiles; the resolver
/// itself never reacts to them.
pub fn overlapping_flags<M: TileMap + ?Sized>(bounds: &Aabb, map: &M) -> TileFlags {
    let (tw, th) = map.tile_size();
    let (cols, rows) = bounds.tile_span(tw, th);
    let mut flags = TileFlags::empty();
    for ty in rows {
        for tx in cols.clone() {
            flags |= map.flags_at(tx, ty);
        }
    }
    flags
}

/// Clamped x if a solid tile stops the move, `None` if the path is clear.
pub(crate) fn sweep_x<M: TileMap + ?Sized>(bounds: &Aabb, dx: f32, map: &M) -> Option<f32> {
    if dx == 0.0 {
        return None;
    }
    let (tw, th) = map.tile_size();
    let rows = covered_span(bounds.y, bounds.bottom(), th);
    let blocked_column = |tx: i32| {
        rows.clone()
            .any(|ty| map.flags_at(tx, ty).contains(TileFlags::SOLID))
    };

    if dx > 0.0 {
        let edge = bounds.right();
        let first = last_covered(edge, tw) + 1;
        let mut last = last_covered(edge + dx, tw);
        if on_boundary(edge, tw) {
            last = last.max(first);
        }
        (first..=last)
            .find(|&tx| blocked_column(tx))
            .map(|tx| tx as f32 * tw - bounds.width)
    } else {
        let edge = bounds.x;
        let first = first_covered(edge, tw) - 1;
        let mut last = first_covered(edge + dx, tw);
        if on_boundary(edge, tw) {
            last = last.min(first);
        }
        (last..=first)
            .rev()
            .find(|&tx| blocked_column(tx))
            .map(|tx| (tx + 1) as f32 * tw)
    }
}

/// Clamped resolution if a tile stops the move, `None` if the path is clear.
pub(crate) fn sweep_y<M: TileMap + ?Sized>(
    bounds: &Aabb,
    dy: f32,
    map: &M,
) -> Option<VerticalResolution> {
    if dy == 0.0 {
        return None;
    }
    let (tw, th) = map.tile_size();
    let cols = covered_span(bounds.x, bounds.right(), tw);

    if dy > 0.0 {
        let edge = bounds.bottom();
        let first = last_covered(edge, th) + 1;
        let mut last = last_covered(edge + dy, th);
        if on_boundary(edge, th) {
            last = last.max(first);
        }
        let lands_on = |ty: i32| {
            let top = ty as f32 * th;
            cols.clone().any(|tx| {
                let flags = map.flags_at(tx, ty);
                flags.contains(TileFlags::SOLID)
                    || (flags.contains(TileFlags::PLATFORM) && edge <= top + EDGE_EPSILON * th)
            })
        };
        (first..=last)
            .find(|&ty| lands_on(ty))
            .map(|ty| VerticalResolution {
                y: ty as f32 * th - bounds.height,
                grounded: true,
            })
    } else {
        let edge = bounds.y;
        let first = first_covered(edge, th) - 1;
        let mut last = first_covered(edge + dy, th);
        if on_boundary(edge, th) {
            last = last.min(first);
        }
        let bumps = |ty: i32| {
            cols.clone()
                .any(|tx| map.flags_at(tx, ty).contains(TileFlags::SOLID))
        };
        (last..=first)
            .rev()
            .find(|&ty| bumps(ty))
            .map(|ty| VerticalResolution {
                y: (ty + 1) as f32 * th,
                grounded: false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileGrid;

    const TILE: f32 = 32.0;

    /// 10x10 grid of 32px tiles with row 5 solid.
    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.fill_row(5, TileFlags::SOLID);
        grid
    }

    #[test]
    fn test_zero_velocity_is_identity() {
        let grid = floor_grid();
        let b = Aabb::new(40.0, 128.0, 16.0, 32.0);
        assert_eq!(resolve_x(&b, 0.0, 0.1, &grid), 40.0);
        assert_eq!(
            resolve_y(&b, 0.0, 0.1, &grid),
            VerticalResolution {
                y: 128.0,
                grounded: false
            }
        );
    }

    #[test]
    fn test_free_movement() {
        let grid = floor_grid();
        let b = Aabb::new(40.0, 40.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, 100.0, 0.1, &grid), 50.0);
        assert_eq!(resolve_x(&b, -100.0, 0.1, &grid), 30.0);
        let r = resolve_y(&b, -100.0, 0.1, &grid);
        assert_eq!(r.y, 30.0);
        assert!(!r.grounded);
    }

    #[test]
    fn test_fall_lands_flush_on_solid_row() {
        let grid = floor_grid();
        // Bottom edge starts at the top of row 4.
        let b = Aabb::new(40.0, 4.0 * TILE - 32.0, 16.0, 32.0);
        let r = resolve_y(&b, 500.0, 0.1, &grid);
        assert_eq!(r.y, 5.0 * TILE - 32.0);
        assert!(r.grounded);
    }

    #[test]
    fn test_resting_box_stays_grounded() {
        let grid = floor_grid();
        let b = Aabb::new(40.0, 5.0 * TILE - 32.0, 16.0, 32.0);
        let r = resolve_y(&b, 800.0 * 0.016, 0.016, &grid);
        assert_eq!(r.y, b.y);
        assert!(r.grounded);
    }

    #[test]
    fn test_ceiling_blocks_ascent() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.fill_row(1, TileFlags::SOLID);
        let b = Aabb::new(40.0, 80.0, 16.0, 16.0);
        let r = resolve_y(&b, -500.0, 0.1, &grid);
        assert_eq!(r.y, 64.0);
        assert!(!r.grounded);
    }

    #[test]
    fn test_wall_clamps_both_directions() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        for ty in 0..10 {
            grid.set(3, ty, TileFlags::SOLID);
            grid.set(0, ty, TileFlags::SOLID);
        }
        let b = Aabb::new(40.0, 40.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, 1000.0, 0.1, &grid), 3.0 * TILE - 16.0);
        assert_eq!(resolve_x(&b, -1000.0, 0.1, &grid), TILE);
    }

    #[test]
    fn test_flush_box_cannot_creep_into_wall() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.set(3, 1, TileFlags::SOLID);
        let b = Aabb::new(3.0 * TILE - 16.0, 40.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, 0.001, 1.0, &grid), b.x);
    }

    #[test]
    fn test_every_spanned_row_is_sampled() {
        // A 96px tall box with a single solid tile level with its middle.
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.set(4, 2, TileFlags::SOLID);
        let b = Aabb::new(64.0, 32.0, 32.0, 96.0);
        assert_eq!(resolve_x(&b, 100.0, 1.0, &grid), 96.0);
    }

    #[test]
    fn test_fast_move_stops_at_nearest_tile() {
        let mut grid = TileGrid::new(20, 3, TILE, TILE);
        grid.set(6, 1, TileFlags::SOLID);
        grid.set(9, 1, TileFlags::SOLID);
        let b = Aabb::new(40.0, 40.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, 10_000.0, 1.0, &grid), 6.0 * TILE - 16.0);
    }

    #[test]
    fn test_platform_is_one_way() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.fill_row(5, TileFlags::PLATFORM);

        // From below, moving up: passes straight through.
        let below = Aabb::new(40.0, 6.0 * TILE + 4.0, 16.0, 16.0);
        let up = resolve_y(&below, -600.0, 0.1, &grid);
        assert_eq!(up.y, below.y - 60.0);
        assert!(!up.grounded);

        // From above, falling: lands on top.
        let above = Aabb::new(40.0, 4.0 * TILE, 16.0, 16.0);
        let down = resolve_y(&above, 600.0, 0.1, &grid);
        assert_eq!(down.y, 5.0 * TILE - 16.0);
        assert!(down.grounded);
    }

    #[test]
    fn test_platform_does_not_catch_box_already_inside() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.fill_row(5, TileFlags::PLATFORM);
        // Bottom edge halfway into row 5 after jumping up through it.
        let b = Aabb::new(40.0, 5.0 * TILE + 16.0 - 32.0, 16.0, 32.0);
        let r = resolve_y(&b, 100.0, 0.1, &grid);
        assert_eq!(r.y, b.y + 10.0);
        assert!(!r.grounded);
    }

    #[test]
    fn test_platform_never_blocks_horizontal() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        for ty in 0..10 {
            grid.set(3, ty, TileFlags::PLATFORM | TileFlags::LADDER | TileFlags::DEADLY);
        }
        let b = Aabb::new(40.0, 40.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, 100.0, 1.0, &grid), 140.0);
    }

    #[test]
    fn test_ladder_and_deadly_never_block_vertical() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.fill_row(5, TileFlags::LADDER);
        grid.fill_row(6, TileFlags::DEADLY);
        let b = Aabb::new(40.0, 4.0 * TILE, 16.0, 16.0);
        let r = resolve_y(&b, 64.0, 1.0, &grid);
        assert_eq!(r.y, b.y + 64.0);
        assert!(!r.grounded);
    }

    #[test]
    fn test_embedded_box_can_leave() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.set(2, 2, TileFlags::SOLID);
        let b = Aabb::new(70.0, 70.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, 40.0, 1.0, &grid), 110.0);
        assert_eq!(resolve_y(&b, -40.0, 1.0, &grid).y, 30.0);
    }

    #[test]
    fn test_world_edges_are_solid() {
        let grid = TileGrid::new(4, 4, TILE, TILE);
        let b = Aabb::new(0.0, 0.0, 16.0, 16.0);
        assert_eq!(resolve_x(&b, -50.0, 1.0, &grid), 0.0);
        assert_eq!(resolve_y(&b, -50.0, 1.0, &grid).y, 0.0);

        let corner = Aabb::new(4.0 * TILE - 16.0, 4.0 * TILE - 16.0, 16.0, 16.0);
        assert_eq!(resolve_x(&corner, 50.0, 1.0, &grid), corner.x);
        let r = resolve_y(&corner, 50.0, 1.0, &grid);
        assert_eq!(r.y, corner.y);
        assert!(r.grounded);
    }

    #[test]
    fn test_huge_move_stops_at_first_blocking_column() {
        use crate::map::FnTileMap;
        use std::cell::Cell;

        let lookups = Cell::new(0u32);
        let map = FnTileMap::new(TILE, TILE, |tx, _| {
            lookups.set(lookups.get() + 1);
            if tx >= 4 { TileFlags::SOLID } else { TileFlags::empty() }
        });
        let b = Aabb::new(0.0, 0.0, 16.0, 16.0);

        assert_eq!(resolve_x(&b, 1.0e9, 1.0, &map), 4.0 * TILE - 16.0);
        assert!(lookups.get() <= 4, "{} lookups", lookups.get());
    }

    #[test]
    fn test_overlapping_flags() {
        let mut grid = TileGrid::new(10, 10, TILE, TILE);
        grid.set(1, 1, TileFlags::LADDER);
        grid.set(2, 1, TileFlags::DEADLY);
        let b = Aabb::new(40.0, 40.0, 40.0, 16.0);
        assert_eq!(
            overlapping_flags(&b, &grid),
            TileFlags::LADDER | TileFlags::DEADLY
        );
        assert_eq!(
            overlapping_flags(&Aabb::new(200.0, 200.0, 16.0, 16.0), &grid),
            TileFlags::empty()
        );
    }
}
