//! Asset loading errors

use claw_rez::RezError;
use claw_wwd::WwdError;
use thiserror::Error;

/// Errors from the asset layer.
///
/// Archive and level errors pass through unchanged so callers can still
/// tell a missing asset from a corrupt one.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Archive(#[from] RezError),

    #[error(transparent)]
    Level(#[from] WwdError),

    #[error("level '{0}' not found in archive or on disk")]
    LevelNotFound(String),

    #[error("level '{level}' has no plane named '{plane}'")]
    MissingPlane { level: String, plane: String },

    #[error("no archive attached")]
    NoArchive,

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid tileset: {0}")]
    Tileset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// Whether the asset simply does not exist, as opposed to being unreadable.
    ///
    /// Callers use this to fall back to a default asset.
    pub fn is_not_found(&self) -> bool {
        match self {
            AssetError::Archive(e) => e.is_not_found(),
            AssetError::LevelNotFound(_) => true,
            AssetError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            AssetError::Level(WwdError::Io(e)) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
