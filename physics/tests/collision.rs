//! Collision scenarios against closure-backed and grid-backed maps.

use claw_physics::{
    Aabb, Body, FnTileMap, Mover, PhysicsConfig, TileFlags, TileGrid, TileMap, apply_gravity,
    overlapping_flags, resolve_x, resolve_y,
};

const TILE: f32 = 32.0;

/// Unbounded world: rows 5 and below are solid.
fn ground() -> impl TileMap {
    FnTileMap::new(TILE, TILE, |_, ty| {
        if ty >= 5 {
            TileFlags::SOLID
        } else {
            TileFlags::empty()
        }
    })
}

#[test]
fn falling_box_lands_on_row_five() {
    let map = ground();
    let height = 24.0;
    let b = Aabb::new(48.0, 4.0 * TILE - height, 16.0, height);

    let r = resolve_y(&b, 500.0, 0.1, &map);
    assert_eq!(r.y, 5.0 * TILE - height);
    assert!(r.grounded);
}

#[test]
fn resting_box_reports_grounded_under_gravity() {
    let map = ground();
    let config = PhysicsConfig::default();
    let b = Aabb::new(48.0, 5.0 * TILE - 24.0, 16.0, 24.0);
    let dt = 1.0 / 60.0;

    let vel_y = apply_gravity(0.0, dt, &config);
    assert!(vel_y > 0.0);
    let r = resolve_y(&b, vel_y, dt, &map);
    assert_eq!(r.y, b.y);
    assert!(r.grounded);
}

#[test]
fn one_way_platform_from_both_sides() {
    let map = FnTileMap::new(TILE, TILE, |_, ty| match ty {
        3 => TileFlags::PLATFORM,
        _ => TileFlags::empty(),
    });

    let below = Aabb::new(0.0, 4.0 * TILE + 8.0, 16.0, 16.0);
    let up = resolve_y(&below, -400.0, 0.25, &map);
    assert_eq!(up.y, below.y - 100.0);
    assert!(!up.grounded);

    let above = Aabb::new(0.0, 2.0 * TILE - 20.0, 16.0, 16.0);
    let down = resolve_y(&above, 400.0, 0.25, &map);
    assert_eq!(down.y, 3.0 * TILE - 16.0);
    assert!(down.grounded);
}

#[test]
fn grid_boundary_acts_as_wall() {
    let grid = TileGrid::new(8, 6, TILE, TILE);
    let b = Aabb::new(2.0, 100.0, 16.0, 16.0);

    assert_eq!(resolve_x(&b, -100.0, 1.0, &grid), 0.0);
    let far = Aabb::new(8.0 * TILE - 20.0, 100.0, 16.0, 16.0);
    assert_eq!(resolve_x(&far, 100.0, 1.0, &grid), 8.0 * TILE - 16.0);

    let top = Aabb::new(40.0, 3.0, 16.0, 16.0);
    let r = resolve_y(&top, -100.0, 1.0, &grid);
    assert_eq!(r.y, 0.0);
    assert!(!r.grounded);
}

#[test]
fn walk_off_ledge_and_fall_into_spikes() {
    // Ledge at row 3 for columns 0..4; spikes along row 9.
    let map = FnTileMap::new(TILE, TILE, |tx, ty| match (tx, ty) {
        (0..=3, 3) => TileFlags::SOLID,
        (_, 9) => TileFlags::DEADLY,
        (_, 10..) => TileFlags::SOLID,
        _ => TileFlags::empty(),
    });
    let mover = Mover::default();
    let mut body = Body::new(Aabb::new(64.0, 3.0 * TILE - 32.0, 16.0, 32.0));
    body.vel_x = 200.0;

    let mut touched = TileFlags::empty();
    for _ in 0..240 {
        let outcome = mover.step(&mut body, 1.0 / 60.0, &map);
        touched |= outcome.touching;
        if body.bounds.x > 200.0 {
            body.vel_x = 0.0;
        }
        if outcome.grounded && body.bounds.y > 4.0 * TILE {
            break;
        }
    }

    assert!(body.grounded);
    assert_eq!(body.bounds.bottom(), 10.0 * TILE);
    assert!(touched.contains(TileFlags::DEADLY));
    assert!(overlapping_flags(&body.bounds, &map).contains(TileFlags::DEADLY));
}
