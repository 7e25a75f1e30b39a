//! Asset format specifications.
//!
//! `AssetFormat` is the single source of truth for the constants that
//! identify a container on disk (magic bytes, version, file extension).
//!
//! # Example
//!
//! ```
//! use claw_shared::{REZ_FORMAT, WWD_FORMAT};
//!
//! assert_eq!(REZ_FORMAT.magic, b"REZ\0");
//! assert_eq!(WWD_FORMAT.extension, "wwd");
//! ```

/// Format specification for one binary asset container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetFormat {
    /// Human-readable format name
    pub name: &'static str,

    /// File extension without dot (e.g., "rez")
    pub extension: &'static str,

    /// Magic bytes at start of file (4 bytes)
    pub magic: &'static [u8; 4],

    /// Newest format version this workspace reads and writes
    pub version: u32,
}

impl AssetFormat {
    /// Create a new format specification.
    pub const fn new(
        name: &'static str,
        extension: &'static str,
        magic: &'static [u8; 4],
        version: u32,
    ) -> Self {
        Self {
            name,
            extension,
            magic,
            version,
        }
    }

    /// Whether `bytes` starts with this format's magic.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 4 && &bytes[0..4] == self.magic
    }
}

/// REZ archive format (the `CLAW.REZ` asset bundle).
pub const REZ_FORMAT: AssetFormat = AssetFormat::new("REZ archive", "rez", b"REZ\0", 1);

/// WWD level format.
pub const WWD_FORMAT: AssetFormat = AssetFormat::new("WWD level", "wwd", b"WWD\0", 1);

/// Tile index meaning "no tile in this cell".
pub const EMPTY_TILE: u32 = u32::MAX;

/// Folder inside the archive that holds level files.
pub const LEVEL_DIR: &str = "levels";

/// Upper bound on a single length-prefixed string in either format.
///
/// Both formats prefix strings with a `u32` byte length; anything longer
/// than this is treated as corruption rather than allocated.
pub const MAX_STRING_BYTES: u32 = 4096;
