//! REZ archive writer
//!
//! Output layout: header, file payloads, then directory listings with every
//! child listing written before its parent so the root lands last.

use std::collections::BTreeMap;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use claw_shared::{MAX_STRING_BYTES, REZ_FORMAT};

use crate::directory::{KIND_FILE, KIND_FOLDER, invalid_name};
use crate::error::RezError;
use crate::{Entry, HEADER_SIZE};

/// Builds a REZ archive in memory.
///
/// Paths use `/` separators; folders are created implicitly.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    version: u32,
    files: BTreeMap<String, PendingFile>,
}

#[derive(Debug, Clone)]
struct PendingFile {
    data: Vec<u8>,
    offset: Option<u32>,
}

#[derive(Debug, Default)]
struct FolderBuild {
    folders: BTreeMap<String, FolderBuild>,
    files: BTreeMap<String, Entry>,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    /// Create an empty builder for the current format version.
    pub fn new() -> Self {
        Self {
            version: REZ_FORMAT.version,
            files: BTreeMap::new(),
        }
    }

    /// Override the version written to the header.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Add a file, placed after the header and any pinned files.
    pub fn add_file(&mut self, path: &str, data: Vec<u8>) -> Result<&mut Self, RezError> {
        self.insert(path, data, None)
    }

    /// Add a file whose payload must start at `offset`.
    pub fn add_file_at(
        &mut self,
        path: &str,
        offset: u32,
        data: Vec<u8>,
    ) -> Result<&mut Self, RezError> {
        self.insert(path, data, Some(offset))
    }

    /// Number of files added so far.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files have been added.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn insert(
        &mut self,
        path: &str,
        data: Vec<u8>,
        offset: Option<u32>,
    ) -> Result<&mut Self, RezError> {
        validate_path(path)?;
        if self.files.contains_key(path) {
            return Err(RezError::Build(format!("duplicate path '{}'", path)));
        }
        if u32::try_from(data.len()).is_err() {
            return Err(RezError::Build(format!("'{}' is larger than 4 GiB", path)));
        }
        self.files
            .insert(path.to_string(), PendingFile { data, offset });
        Ok(self)
    }

    /// Serialize the archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RezError> {
        let mut out = Vec::new();
        out.extend_from_slice(REZ_FORMAT.magic);
        out.write_u32::<LittleEndian>(self.version)?;
        out.write_u32::<LittleEndian>(0)?; // patched below

        let mut root = FolderBuild::default();

        // Pinned payloads first, in offset order, so gaps can be zero-filled.
        let mut pinned: Vec<(&String, &PendingFile, u32)> = self
            .files
            .iter()
            .filter_map(|(path, file)| file.offset.map(|offset| (path, file, offset)))
            .collect();
        pinned.sort_by_key(|(_, _, offset)| *offset);

        for (path, file, offset) in pinned {
            let offset_usize = offset as usize;
            if offset_usize < out.len() {
                return Err(RezError::Build(format!(
                    "'{}' at offset {} overlaps earlier data ending at {}",
                    path,
                    offset,
                    out.len()
                )));
            }
            out.resize(offset_usize, 0);
            out.extend_from_slice(&file.data);
            insert_entry(&mut root, path, Entry {
                offset,
                size: file.data.len() as u32,
            });
        }

        for (path, file) in self.files.iter().filter(|(_, f)| f.offset.is_none()) {
            let offset = to_offset(out.len())?;
            out.extend_from_slice(&file.data);
            insert_entry(&mut root, path, Entry {
                offset,
                size: file.data.len() as u32,
            });
        }

        let root_offset = write_listing(&root, &mut out)?;
        out[8..HEADER_SIZE].copy_from_slice(&root_offset.to_le_bytes());
        Ok(out)
    }

    /// Serialize the archive and write it to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), RezError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

fn validate_path(path: &str) -> Result<(), RezError> {
    if path.is_empty() {
        return Err(RezError::Build("empty path".to_string()));
    }
    for segment in path.split('/') {
        if let Some(reason) = invalid_name(segment) {
            return Err(RezError::Build(format!(
                "segment '{}' of '{}' {}",
                segment, path, reason
            )));
        }
        if segment.len() > MAX_STRING_BYTES as usize {
            return Err(RezError::Build(format!("segment too long in '{}'", path)));
        }
    }
    Ok(())
}

fn insert_entry(root: &mut FolderBuild, path: &str, entry: Entry) {
    let mut folder = root;
    let mut segments = path.split('/').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            folder.files.insert(segment.to_string(), entry);
        } else {
            folder = folder.folders.entry(segment.to_string()).or_default();
        }
    }
}

fn to_offset(len: usize) -> Result<u32, RezError> {
    u32::try_from(len).map_err(|_| RezError::Build("archive exceeds 4 GiB".to_string()))
}

/// Write `folder` (children first) and return the offset of its listing.
fn write_listing(folder: &FolderBuild, out: &mut Vec<u8>) -> Result<u32, RezError> {
    let mut child_offsets = Vec::with_capacity(folder.folders.len());
    for (name, child) in &folder.folders {
        child_offsets.push((name, write_listing(child, out)?));
    }

    let offset = to_offset(out.len())?;
    out.write_u32::<LittleEndian>((folder.folders.len() + folder.files.len()) as u32)?;
    for (name, child_offset) in child_offsets {
        out.write_u8(KIND_FOLDER)?;
        write_name(out, name)?;
        out.write_u32::<LittleEndian>(child_offset)?;
    }
    for (name, entry) in &folder.files {
        out.write_u8(KIND_FILE)?;
        write_name(out, name)?;
        out.write_u32::<LittleEndian>(entry.offset)?;
        out.write_u32::<LittleEndian>(entry.size)?;
    }
    Ok(offset)
}

fn write_name(out: &mut Vec<u8>, name: &str) -> Result<(), RezError> {
    out.write_u32::<LittleEndian>(name.len() as u32)?;
    out.extend_from_slice(name.as_bytes());
    Ok(())
}
