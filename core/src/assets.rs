//! Asset loading and caching
//!
//! The [`AssetManager`] is rooted at the directory holding the original game
//! files. Levels come from the attached archive when one is open, with loose
//! files on disk as a fallback, and decoded levels are cached so repeated
//! loads share one [`Level`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use claw_rez::Archive;
use claw_shared::{MAX_ARCHIVE_BYTES, WWD_FORMAT, read_file_with_limit};
use claw_wwd::{Level, WwdError, decode_level, load_level};
use hashbrown::HashMap;

use crate::config::AssetsConfig;
use crate::error::AssetError;

/// Loads raw files, archive entries and levels.
///
/// Shareable between threads: the archive is only read through positioned
/// reads and the level cache sits behind a lock.
#[derive(Debug)]
pub struct AssetManager {
    base_path: PathBuf,
    level_dir: String,
    archive: Option<Archive>,
    levels: RwLock<HashMap<String, Arc<Level>>>,
}

impl AssetManager {
    /// Create a manager rooted at `base_path`, with no archive attached.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            level_dir: claw_shared::LEVEL_DIR.to_string(),
            archive: None,
            levels: RwLock::new(HashMap::new()),
        }
    }

    /// Create a manager from config, opening the configured archive if it exists.
    ///
    /// A missing archive is not an error; levels are then read from loose files.
    pub fn from_config(config: &AssetsConfig) -> Result<Self, AssetError> {
        let mut manager = Self::new(&config.base_path);
        manager.level_dir = config.level_dir.clone();

        let archive_path = config.archive_path();
        match Archive::open(&archive_path) {
            Ok(archive) => manager.archive = Some(archive),
            Err(e) if e.is_not_found() => tracing::info!(
                "No archive at {}, using loose files only",
                archive_path.display()
            ),
            Err(e) => return Err(e.into()),
        }
        Ok(manager)
    }

    /// Attach an already opened archive, replacing any current one.
    pub fn with_archive(mut self, archive: Archive) -> Self {
        self.attach(archive);
        self
    }

    /// Open `name` under the base path and attach it.
    pub fn open_archive(&mut self, name: &str) -> Result<(), AssetError> {
        let archive = Archive::open(self.base_path.join(name))?;
        self.attach(archive);
        Ok(())
    }

    fn attach(&mut self, archive: Archive) {
        self.archive = Some(archive);
        self.clear_cache();
    }

    /// The attached archive, if any.
    pub fn archive(&self) -> Option<&Archive> {
        self.archive.as_ref()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Read a loose file relative to the base path.
    pub fn load_file(&self, rel_path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
        let full_path = self.base_path.join(rel_path.as_ref());
        read_file_with_limit(&full_path, MAX_ARCHIVE_BYTES).map_err(|e| {
            tracing::debug!("Failed to load {}: {}", full_path.display(), e);
            AssetError::Io(e)
        })
    }

    /// Extract an archive entry, matching the path case-insensitively.
    pub fn extract(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let archive = self.archive.as_ref().ok_or(AssetError::NoArchive)?;
        let stored = archive.find_ignore_case(path).unwrap_or(path);
        Ok(archive.extract(stored)?)
    }

    /// Load a level by name (e.g. `RETAIL01`), decoding it at most once.
    ///
    /// Looks for `<level_dir>/<name>.wwd` in the archive first, then on disk
    /// under the base path. Fails with [`AssetError::LevelNotFound`] if
    /// neither exists; a level that exists but fails to decode is an error,
    /// never a fallback.
    pub fn load_level(&self, name: &str) -> Result<Arc<Level>, AssetError> {
        let key = name.to_ascii_lowercase();
        if let Some(level) = self.read_cache().get(&key) {
            tracing::debug!("Level cache hit: {}", name);
            return Ok(Arc::clone(level));
        }
        tracing::debug!("Level cache miss: {}", name);

        let level = Arc::new(self.read_level(name)?);
        let mut cache = self.write_cache();
        let level = cache.entry(key).or_insert(level);
        Ok(Arc::clone(level))
    }

    fn read_level(&self, name: &str) -> Result<Level, AssetError> {
        let rel_path = format!("{}/{}.{}", self.level_dir, name, WWD_FORMAT.extension);

        if let Some(archive) = &self.archive {
            if let Some(stored) = archive.find_ignore_case(&rel_path) {
                let bytes = archive.extract(stored)?;
                let level = decode_level(&bytes).map_err(|e| e.within(stored))?;
                tracing::info!("Loaded level '{}' from archive", level.name());
                return Ok(level);
            }
        }

        let loose = self.base_path.join(&rel_path);
        match load_level(&loose) {
            Ok(level) => {
                tracing::info!("Loaded level '{}' from {}", level.name(), loose.display());
                Ok(level)
            }
            Err(WwdError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::LevelNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop one cached level. Returns whether it was cached.
    pub fn evict(&self, name: &str) -> bool {
        self.write_cache()
            .remove(&name.to_ascii_lowercase())
            .is_some()
    }

    /// Drop every cached level.
    pub fn clear_cache(&self) {
        self.write_cache().clear();
    }

    /// Number of cached levels.
    pub fn cached_levels(&self) -> usize {
        self.read_cache().len()
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Level>>> {
        self.levels.read().unwrap_or_else(|e| {
            tracing::warn!("Level cache lock poisoned; continuing");
            e.into_inner()
        })
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Level>>> {
        self.levels.write().unwrap_or_else(|e| {
            tracing::warn!("Level cache lock poisoned; continuing");
            e.into_inner()
        })
    }
}
