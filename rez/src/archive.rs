//! Opened REZ archives

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use claw_shared::REZ_FORMAT;
use hashbrown::HashMap;

use crate::directory::{flatten, read_tree};
use crate::error::RezError;
use crate::read_at::ReadAt;
use crate::{Entry, HEADER_SIZE};

/// An opened REZ archive.
///
/// The directory is read once in [`Archive::open`] and never changes
/// afterwards. Extraction uses positioned reads, so `&Archive` can be shared
/// between threads; [`Archive::close`] takes `&mut self` and therefore can
/// never race an extraction.
#[derive(Debug)]
pub struct Archive {
    file: Option<File>,
    path: Option<PathBuf>,
    version: u32,
    byte_len: u64,
    entries: HashMap<String, Entry>,
    /// Lower-cased path to stored path
    folded: HashMap<String, String>,
}

impl Archive {
    /// Open an archive on disk and read its directory.
    ///
    /// A missing file is [`RezError::NotFound`]; anything malformed is
    /// [`RezError::Corrupt`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RezError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RezError::NotFound(path.display().to_string()),
            _ => RezError::Io(e),
        })?;
        let mut archive = Self::from_file(file)?;
        archive.path = Some(path.to_path_buf());
        tracing::info!(
            "Opened archive {} (version {}, {} entries)",
            path.display(),
            archive.version,
            archive.entries.len()
        );
        Ok(archive)
    }

    /// Read the directory of an already opened file.
    pub fn from_file(file: File) -> Result<Self, RezError> {
        let byte_len = file.byte_len()?;

        let mut header = [0u8; HEADER_SIZE];
        match file.read_exact_at(&mut header, 0) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(RezError::corrupt(format!(
                    "file too small for header ({} bytes)",
                    byte_len
                )));
            }
            Err(e) => return Err(RezError::Io(e)),
        }

        if !REZ_FORMAT.matches(&header) {
            return Err(RezError::corrupt("invalid magic bytes"));
        }

        let version = LittleEndian::read_u32(&header[4..8]);
        let dir_offset = LittleEndian::read_u32(&header[8..12]) as u64;
        if dir_offset < HEADER_SIZE as u64 || dir_offset >= byte_len {
            return Err(RezError::corrupt(format!(
                "directory offset {} outside archive ({} bytes)",
                dir_offset, byte_len
            )));
        }
        if version > REZ_FORMAT.version {
            tracing::warn!(
                "Archive version {} is newer than supported version {}",
                version,
                REZ_FORMAT.version
            );
        }

        let entries = read_tree(&file, dir_offset)
            .and_then(flatten)
            .inspect_err(|e| tracing::warn!("Rejected archive directory: {}", e))?;
        tracing::debug!(
            "Read archive directory at {} ({} entries)",
            dir_offset,
            entries.len()
        );

        let folded = fold_keys(&entries);
        Ok(Self {
            file: Some(file),
            path: None,
            version,
            byte_len,
            entries,
            folded,
        })
    }

    /// Extract the bytes of the entry at `path`.
    ///
    /// Fails with [`RezError::NotFound`] without touching the file if the
    /// path is unknown. Never returns partial data.
    pub fn extract(&self, path: &str) -> Result<Vec<u8>, RezError> {
        let mut buf = Vec::new();
        self.extract_into(path, &mut buf)?;
        Ok(buf)
    }

    /// Extract into a caller-provided buffer, replacing its contents.
    ///
    /// On error `buf` is left empty.
    pub fn extract_into(&self, path: &str, buf: &mut Vec<u8>) -> Result<(), RezError> {
        buf.clear();
        let file = self.file.as_ref().ok_or(RezError::Closed)?;
        let entry = self
            .entries
            .get(path)
            .copied()
            .ok_or_else(|| RezError::NotFound(path.to_string()))?;

        buf.resize(entry.size as usize, 0);
        if let Err(e) = file.read_exact_at(buf, entry.offset as u64) {
            buf.clear();
            return Err(RezError::Io(e));
        }
        Ok(())
    }

    /// All entry paths, in no particular order.
    pub fn list(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Entry paths below `folder` (recursively), in no particular order.
    ///
    /// An empty `folder` lists everything.
    pub fn list_dir(&self, folder: &str) -> Vec<&str> {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            return self.list();
        }
        self.entries
            .keys()
            .filter(|path| {
                path.len() > folder.len()
                    && path.starts_with(folder)
                    && path.as_bytes()[folder.len()] == b'/'
            })
            .map(String::as_str)
            .collect()
    }

    /// Location of an entry, if present.
    pub fn entry(&self, path: &str) -> Option<Entry> {
        self.entries.get(path).copied()
    }

    /// Whether an entry exists at exactly `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Find the stored spelling of `path`, ignoring ASCII case.
    ///
    /// Original game data refers to assets in mixed case; an exact match is
    /// preferred when one exists. Among stored paths that differ only in
    /// case, the lexicographically smallest wins.
    pub fn find_ignore_case(&self, path: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(path) {
            return Some(key.as_str());
        }
        self.folded
            .get(&path.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Format version from the header.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Size of the archive file in bytes.
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// Path the archive was opened from, if it was opened by path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the file handle. Later extractions fail with [`RezError::Closed`].
    ///
    /// The directory stays readable so paths can still be listed.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            tracing::debug!("Closed archive {:?}", self.path);
        }
    }

    /// Whether [`Archive::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

fn fold_keys(entries: &HashMap<String, Entry>) -> HashMap<String, String> {
    let mut folded: HashMap<String, String> = HashMap::with_capacity(entries.len());
    for key in entries.keys() {
        let stored = folded
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| key.clone());
        if *key < *stored {
            stored.clone_from(key);
        }
    }
    folded
}
