//! Claw-REZ: REZ archive reader for OpenClaw
//!
//! Captain Claw ships nearly all of its assets inside one REZ archive
//! (`CLAW.REZ`). This crate opens such an archive, reads its directory tree
//! once, and extracts individual files by their slash-separated path.
//!
//! # Format Overview
//!
//! ```text
//! 0   magic           "REZ\0"
//! 4   version         u32 LE
//! 8   root directory  u32 LE offset of the root listing
//! ..  file payloads and directory listings
//! ```
//!
//! See the `directory` module for the listing layout.
//!
//! # Usage
//!
//! ```ignore
//! use claw_rez::Archive;
//!
//! let archive = Archive::open("CLAW.REZ")?;
//! for path in archive.list_dir("LEVELS") {
//!     println!("{path}");
//! }
//! let level = archive.extract("LEVELS/LEVEL1.WWD")?;
//! ```

mod archive;
mod builder;
mod directory;
mod error;
mod read_at;

pub use archive::Archive;
pub use builder::ArchiveBuilder;
pub use error::RezError;
pub use read_at::ReadAt;

// =============================================================================
// Constants
// =============================================================================

/// Size of the fixed header (magic + version + directory offset)
pub const HEADER_SIZE: usize = 12;

/// Deepest folder nesting accepted before the directory is treated as corrupt
pub const MAX_DIRECTORY_DEPTH: usize = 64;

/// Location of one file inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Byte offset of the payload from the start of the archive
    pub offset: u32,
    /// Payload size in bytes
    pub size: u32,
}

impl Entry {
    /// One past the last payload byte, computed without overflow.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_end_does_not_wrap() {
        let entry = Entry {
            offset: u32::MAX,
            size: u32::MAX,
        };
        assert_eq!(entry.end(), 2 * u32::MAX as u64);
    }
}
