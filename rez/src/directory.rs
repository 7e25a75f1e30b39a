//! REZ directory tree
//!
//! A directory listing is a `u32` entry count followed by records:
//!
//! ```text
//! kind: u8          0 = file, 1 = folder
//! name_len: u32
//! name: [u8; name_len]
//! file   -> offset: u32, size: u32
//! folder -> listing_offset: u32   (child listing elsewhere in the file)
//! ```
//!
//! The tree is read into [`DirNode`]s and then flattened into the lookup
//! table the archive keeps. Nothing outside this module sees the tree.

use std::io;

use byteorder::{ByteOrder, LittleEndian};
use claw_shared::MAX_STRING_BYTES;
use hashbrown::{HashMap, HashSet};

use crate::error::RezError;
use crate::read_at::ReadAt;
use crate::{Entry, MAX_DIRECTORY_DEPTH};

/// Record kind tag for a file
pub(crate) const KIND_FILE: u8 = 0;
/// Record kind tag for a folder
pub(crate) const KIND_FOLDER: u8 = 1;

/// Smallest possible record: kind + empty name length + one u32.
const MIN_RECORD_BYTES: u64 = 1 + 4 + 4;

/// One node of the on-disk directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DirNode {
    Folder { name: String, children: Vec<DirNode> },
    File { name: String, entry: Entry },
}

/// Read the whole directory tree rooted at `root_offset`.
///
/// File spans are checked against the source length here, so a returned
/// tree only contains extractable entries.
pub(crate) fn read_tree<R: ReadAt + ?Sized>(
    src: &R,
    root_offset: u64,
) -> Result<Vec<DirNode>, RezError> {
    let len = src.byte_len()?;
    let mut reader = TreeReader {
        src,
        len,
        visited: HashSet::new(),
    };
    reader.read_listing(root_offset, 0)
}

struct TreeReader<'a, R: ?Sized> {
    src: &'a R,
    len: u64,
    visited: HashSet<u64>,
}

impl<R: ReadAt + ?Sized> TreeReader<'_, R> {
    fn read_listing(&mut self, offset: u64, depth: usize) -> Result<Vec<DirNode>, RezError> {
        if depth > MAX_DIRECTORY_DEPTH {
            return Err(RezError::corrupt(format!(
                "directory nesting deeper than {}",
                MAX_DIRECTORY_DEPTH
            )));
        }
        if !self.visited.insert(offset) {
            return Err(RezError::corrupt(format!(
                "directory listing at {} is referenced twice",
                offset
            )));
        }

        let mut pos = offset;
        let count = self.read_u32(&mut pos)? as u64;
        let remaining = self.len.saturating_sub(pos);
        if count.saturating_mul(MIN_RECORD_BYTES) > remaining {
            return Err(RezError::corrupt(format!(
                "directory listing at {} claims {} entries but only {} bytes remain",
                offset, count, remaining
            )));
        }

        let mut nodes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let kind = self.read_u8(&mut pos)?;
            let name = self.read_name(&mut pos)?;
            match kind {
                KIND_FILE => {
                    let entry = Entry {
                        offset: self.read_u32(&mut pos)?,
                        size: self.read_u32(&mut pos)?,
                    };
                    if entry.end() > self.len {
                        return Err(RezError::corrupt(format!(
                            "entry '{}' spans {}..{} but archive is {} bytes",
                            name,
                            entry.offset,
                            entry.end(),
                            self.len
                        )));
                    }
                    nodes.push(DirNode::File { name, entry });
                }
                KIND_FOLDER => {
                    let child_offset = self.read_u32(&mut pos)? as u64;
                    let children = self.read_listing(child_offset, depth + 1)?;
                    nodes.push(DirNode::Folder { name, children });
                }
                other => {
                    return Err(RezError::corrupt(format!(
                        "unknown directory record kind {} at {}",
                        other,
                        pos - 1
                    )));
                }
            }
        }

        Ok(nodes)
    }

    fn read_bytes(&self, pos: &mut u64, buf: &mut [u8]) -> Result<(), RezError> {
        match self.src.read_exact_at(buf, *pos) {
            Ok(()) => {
                *pos += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(RezError::corrupt(format!(
                "directory runs past end of archive at {}",
                pos
            ))),
            Err(e) => Err(RezError::Io(e)),
        }
    }

    fn read_u8(&self, pos: &mut u64) -> Result<u8, RezError> {
        let mut buf = [0u8; 1];
        self.read_bytes(pos, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u32(&self, pos: &mut u64) -> Result<u32, RezError> {
        let mut buf = [0u8; 4];
        self.read_bytes(pos, &mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    fn read_name(&self, pos: &mut u64) -> Result<String, RezError> {
        let at = *pos;
        let len = self.read_u32(pos)?;
        if len == 0 || len > MAX_STRING_BYTES {
            return Err(RezError::corrupt(format!(
                "invalid name length {} at {}",
                len, at
            )));
        }

        let mut buf = vec![0u8; len as usize];
        self.read_bytes(pos, &mut buf)?;
        let name = String::from_utf8_lossy(&buf).into_owned();
        if let Some(reason) = invalid_name(&name) {
            return Err(RezError::corrupt(format!(
                "name '{}' at {} {}",
                name, at, reason
            )));
        }
        Ok(name)
    }
}

/// Why `name` cannot be a single path segment, if it can't.
///
/// Segments end up joined onto output directories, so relative components
/// and either separator are refused.
pub(crate) fn invalid_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("is empty")
    } else if name == "." || name == ".." {
        Some("is a relative path component")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else {
        None
    }
}

/// Flatten a tree into `folder/sub/file` keys.
pub(crate) fn flatten(nodes: Vec<DirNode>) -> Result<HashMap<String, Entry>, RezError> {
    let mut entries = HashMap::new();
    flatten_into(nodes, "", &mut entries)?;
    Ok(entries)
}

fn flatten_into(
    nodes: Vec<DirNode>,
    prefix: &str,
    entries: &mut HashMap<String, Entry>,
) -> Result<(), RezError> {
    for node in nodes {
        match node {
            DirNode::File { name, entry } => {
                let path = join(prefix, &name);
                if entries.insert(path.clone(), entry).is_some() {
                    return Err(RezError::corrupt(format!("duplicate entry '{}'", path)));
                }
            }
            DirNode::Folder { name, children } => {
                flatten_into(children, &join(prefix, &name), entries)?;
            }
        }
    }
    Ok(())
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}
