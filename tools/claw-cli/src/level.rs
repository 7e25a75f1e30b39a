//! Level command - summarize or dump a level

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use claw_core::AssetManager;
use claw_rez::Archive;
use claw_shared::REZ_FORMAT;
use claw_wwd::Level;
use hashbrown::HashMap;

/// Arguments for the level command
#[derive(Args)]
pub struct LevelArgs {
    /// A .wwd file, or an archive containing levels
    pub input: PathBuf,

    /// Level name inside the archive (e.g. RETAIL01)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Dump the whole level as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the level command
pub fn execute(args: LevelArgs) -> Result<()> {
    let level = load(&args.input, args.name.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&*level)?);
    } else {
        print!("{}", summarize(&level));
    }
    Ok(())
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(REZ_FORMAT.extension))
}

/// Load a level from a bare file, or by name from an archive.
pub fn load(input: &Path, name: Option<&str>) -> Result<Arc<Level>> {
    if !is_archive(input) {
        let level = claw_wwd::load_level(input)
            .with_context(|| format!("Failed to load level: {}", input.display()))?;
        return Ok(Arc::new(level));
    }

    let archive = Archive::open(input)
        .with_context(|| format!("Failed to open archive: {}", input.display()))?;
    let Some(name) = name else {
        let mut levels = archive.list_dir(claw_shared::LEVEL_DIR);
        levels.sort_unstable();
        bail!(
            "{} is an archive; pick a level with --name. Available: {}",
            input.display(),
            levels.join(", ")
        );
    };

    let base = input.parent().unwrap_or_else(|| Path::new("."));
    let assets = AssetManager::new(base).with_archive(archive);
    assets
        .load_level(name)
        .with_context(|| format!("Failed to load level {} from {}", name, input.display()))
}

/// Human-readable overview of a level.
pub fn summarize(level: &Level) -> String {
    let header = &level.header;
    let mut out = format!(
        "Level: {}\nVersion: {}\nTile size: {}x{}\nPlanes: {}\n",
        header.name, header.version, header.tile_width, header.tile_height, header.plane_count
    );
    for plane in &level.planes {
        let (w, h) = level.pixel_size(plane);
        out.push_str(&format!(
            "  {:<12} {}x{} tiles ({}x{} px), {} filled\n",
            plane.name,
            plane.width,
            plane.height,
            w,
            h,
            plane.filled_count()
        ));
    }

    out.push_str(&format!("Objects: {}\n", level.objects.len()));
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for object in &level.objects {
        *counts.entry(object.kind.as_str()).or_default() += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    for (kind, count) in counts {
        out.push_str(&format!("  {:<20} {}\n", kind, count));
    }
    out
}
