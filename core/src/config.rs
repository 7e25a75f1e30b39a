//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for engine settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::{Path, PathBuf};

use claw_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Engine configuration.
///
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the original game files live
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Gravity and collision tuning
    #[serde(default)]
    pub physics: PhysicsConfig,
}

/// Asset location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory containing the original game files (default: current directory)
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// Archive file name under `base_path` (default: CLAW.REZ)
    #[serde(default = "default_archive")]
    pub archive: String,
    /// Folder holding level files, both inside the archive and on disk (default: levels)
    #[serde(default = "default_level_dir")]
    pub level_dir: String,
}

fn default_base_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_archive() -> String {
    "CLAW.REZ".to_string()
}
fn default_level_dir() -> String {
    claw_shared::LEVEL_DIR.to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            archive: default_archive(),
            level_dir: default_level_dir(),
        }
    }
}

impl AssetsConfig {
    /// Full path of the configured archive.
    pub fn archive_path(&self) -> PathBuf {
        self.base_path.join(&self.archive)
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\OpenClaw\config`
/// On macOS: `~/Library/Application Support/rs.openclaw.OpenClaw`
/// On Linux: `~/.config/OpenClaw`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("rs.openclaw", "", "OpenClaw")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `config.toml` in the platform configuration directory.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}: {}", path.display(), e);
            Config::default()
        }),
        _ => Config::default(),
    }
}

/// Loads the configuration from a specific file, reporting parse errors.
pub fn load_from(path: &Path) -> Result<Config, AssetError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Saves the configuration to the platform's configuration directory.
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &Config) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Saves the configuration to a specific file.
pub fn save_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claw_physics::SubstepPolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.assets.archive, "CLAW.REZ");
        assert_eq!(config.assets.level_dir, "levels");
        assert_eq!(config.physics.gravity, 800.0);
        assert_eq!(config.physics.max_fall_speed, 600.0);
        assert_eq!(config.physics.substep, SubstepPolicy::MaxTileFraction(1.0));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.assets.base_path = PathBuf::from("/games/claw");
        config.physics.substep = SubstepPolicy::None;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config() {
        let parsed: Config = toml::from_str(
            r#"
            [assets]
            base_path = "/mnt/claw"

            [physics]
            max_fall_speed = 450.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.assets.base_path, PathBuf::from("/mnt/claw"));
        assert_eq!(parsed.assets.archive, "CLAW.REZ");
        assert_eq!(parsed.assets.archive_path(), PathBuf::from("/mnt/claw/CLAW.REZ"));
        assert_eq!(parsed.physics.max_fall_speed, 450.0);
        assert_eq!(parsed.physics.gravity, 800.0);
    }

    #[test]
    fn test_empty_config() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.physics.gravity = 1000.0;
        save_to(&config, &path).unwrap();

        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[physics]\ngravity = \"heavy\"\n").unwrap();

        assert!(matches!(load_from(&path), Err(AssetError::Config(_))));
        assert!(matches!(
            load_from(&dir.path().join("missing.toml")),
            Err(AssetError::Io(_))
        ));
    }
}
