//! Probe command - run a box through a level's collision

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use claw_core::{Stage, TilesetDesc};
use claw_physics::{Aabb, Body, Mover, PhysicsConfig, StepOutcome};

/// Arguments for the probe command
#[derive(Args)]
pub struct ProbeArgs {
    /// A .wwd file, or an archive containing levels
    pub input: PathBuf,

    /// Level name inside the archive
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tileset description (TOML)
    #[arg(short, long)]
    pub tileset: PathBuf,

    /// Plane to collide against (defaults to the action plane)
    #[arg(long)]
    pub plane: Option<String>,

    /// Box left edge in world pixels (defaults to the level start point)
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<f32>,

    /// Box top edge in world pixels (defaults to the level start point)
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f32>,

    /// Box width
    #[arg(long, default_value_t = 32.0)]
    pub w: f32,

    /// Box height
    #[arg(long, default_value_t = 64.0)]
    pub h: f32,

    /// Horizontal velocity (px/s)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub vx: f32,

    /// Vertical velocity (px/s)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub vy: f32,

    /// Tick length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Number of ticks to run
    #[arg(long, default_value_t = 1)]
    pub steps: u32,
}

/// Execute the probe command
pub fn execute(args: ProbeArgs) -> Result<()> {
    let level = crate::level::load(&args.input, args.name.as_deref())?;
    let tiles = TilesetDesc::load(&args.tileset)
        .and_then(|desc| desc.to_table())
        .with_context(|| format!("Failed to load tileset: {}", args.tileset.display()))?;
    let stage = match &args.plane {
        Some(plane) => Stage::with_plane(level, plane, tiles)?,
        None => Stage::new(level, tiles)?,
    };

    let start = stage.start_point().unwrap_or_default();
    let bounds = Aabb::new(
        args.x.unwrap_or(start.0),
        args.y.unwrap_or(start.1),
        args.w,
        args.h,
    );
    let mut body = Body {
        vel_x: args.vx,
        vel_y: args.vy,
        ..Body::new(bounds)
    };

    let physics: PhysicsConfig = claw_core::config::load().physics;
    let mover = Mover::new(physics);
    tracing::debug!("Probing with {:?}", physics);

    for tick in 0..args.steps {
        let outcome = mover.step(&mut body, args.dt, &stage);
        println!("{}", format_step(tick, &body, &outcome));
    }
    Ok(())
}

fn format_step(tick: u32, body: &Body, outcome: &StepOutcome) -> String {
    format!(
        "tick {:>3}: pos ({:.2}, {:.2}) vel ({:.2}, {:.2}) grounded={} blocked_x={} blocked_y={} touching={:?}",
        tick,
        body.bounds.x,
        body.bounds.y,
        body.vel_x,
        body.vel_y,
        outcome.grounded,
        outcome.blocked_x,
        outcome.blocked_y,
        outcome.touching
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use claw_physics::TileFlags;

    #[test]
    fn test_format_step() {
        let body = Body::new(Aabb::new(1.0, 2.5, 16.0, 16.0));
        let outcome = StepOutcome {
            grounded: true,
            touching: TileFlags::LADDER,
            ..StepOutcome::default()
        };
        let line = format_step(7, &body, &outcome);
        assert!(line.starts_with("tick   7: pos (1.00, 2.50)"));
        assert!(line.contains("grounded=true"));
        assert!(line.contains("LADDER"));
    }
}
