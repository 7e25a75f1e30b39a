//! Shared types for the OpenClaw asset pipeline.
//!
//! Everything that more than one crate needs to agree on lives here: the
//! magic bytes and versions of the REZ and WWD formats, the string encoding
//! both formats use, and bounded file reads.

pub mod formats;
pub mod fs;

pub use formats::{AssetFormat, EMPTY_TILE, LEVEL_DIR, MAX_STRING_BYTES, REZ_FORMAT, WWD_FORMAT};
pub use fs::{MAX_ARCHIVE_BYTES, MAX_LEVEL_BYTES, read_file_with_limit};
