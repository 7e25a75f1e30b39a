//! Filesystem helpers shared across the asset crates and tools.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Maximum allowed size for a standalone level file.
pub const MAX_LEVEL_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB
/// Maximum allowed size for an archive. REZ offsets are 32-bit.
pub const MAX_ARCHIVE_BYTES: u64 = u32::MAX as u64;

/// Read a file into memory with a size cap.
///
/// Fails with [`io::ErrorKind::FileTooLarge`] instead of allocating when the
/// file is bigger than `max_bytes`.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::FileTooLarge,
            format!(
                "file too large: {} ({} bytes, max {} bytes)",
                path.display(),
                len,
                max_bytes
            ),
        ));
    }

    let mut bytes = Vec::with_capacity(len as usize);
    file.take(max_bytes).read_to_end(&mut bytes)?;
    Ok(bytes)
}
