//! Archive commands: list, extract, extract-all, pack

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use claw_rez::{Archive, ArchiveBuilder};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Only list entries below this folder
    #[arg(long)]
    pub prefix: Option<String>,

    /// Show offsets and sizes
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the extract command
#[derive(Args)]
pub struct ExtractArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Entry path (matched case-insensitively)
    pub path: String,

    /// Output file (defaults to the entry's file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the extract-all command
#[derive(Args)]
pub struct ExtractAllArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Directory to extract into
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the pack command
#[derive(Args)]
pub struct PackArgs {
    /// Directory whose files become archive entries
    pub input: PathBuf,

    /// Output archive
    #[arg(short, long)]
    pub output: PathBuf,
}

fn open(path: &Path) -> Result<Archive> {
    Archive::open(path).with_context(|| format!("Failed to open archive: {}", path.display()))
}

/// Execute the list command
pub fn list(args: ListArgs) -> Result<()> {
    let archive = open(&args.archive)?;
    let mut paths = match &args.prefix {
        Some(prefix) => archive.list_dir(prefix),
        None => archive.list(),
    };
    paths.sort_unstable();

    for path in &paths {
        match archive.entry(path) {
            Some(entry) if args.long => {
                println!("{:>10} {:>10}  {}", entry.offset, entry.size, path);
            }
            _ => println!("{}", path),
        }
    }
    tracing::info!("{} of {} entries", paths.len(), archive.len());
    Ok(())
}

/// Execute the extract command
pub fn extract(args: ExtractArgs) -> Result<()> {
    let archive = open(&args.archive)?;
    let stored = archive
        .find_ignore_case(&args.path)
        .with_context(|| format!("No entry named {} in {}", args.path, args.archive.display()))?;
    let data = archive.extract(stored)?;

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(stored.rsplit('/').next().unwrap_or(stored))
    });
    std::fs::write(&output, &data)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{} -> {} ({} bytes)", stored, output.display(), data.len());
    Ok(())
}

/// Execute the extract-all command
pub fn extract_all(args: ExtractAllArgs) -> Result<()> {
    let archive = open(&args.archive)?;
    let count = extract_tree(&archive, &args.output)?;
    println!("Extracted {} entries to {}", count, args.output.display());
    Ok(())
}

/// Write every entry below `out_dir`, extracting in parallel.
fn extract_tree(archive: &Archive, out_dir: &Path) -> Result<usize> {
    let paths = archive.list();
    paths.par_iter().try_for_each(|path| -> Result<()> {
        if !Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            bail!("Refusing to extract {} outside {}", path, out_dir.display());
        }
        let target = out_dir.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = archive
            .extract(path)
            .with_context(|| format!("Failed to extract {}", path))?;
        std::fs::write(&target, data)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::debug!("Extracted {}", path);
        Ok(())
    })?;
    Ok(paths.len())
}

/// Execute the pack command
pub fn pack(args: PackArgs) -> Result<()> {
    let builder = collect_tree(&args.input)?;
    if builder.is_empty() {
        bail!("No files found in {}", args.input.display());
    }
    builder
        .write_to(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Packed {} files into {}",
        builder.len(),
        args.output.display()
    );
    Ok(())
}

/// Add every regular file under `root`, keyed by its `/`-separated relative path.
fn collect_tree(root: &Path) -> Result<ArchiveBuilder> {
    let mut builder = ArchiveBuilder::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root)?;
        let key = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let data = std::fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        builder.add_file(&key, data)?;
    }
    Ok(builder)
}
