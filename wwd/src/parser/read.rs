//! WWD level decoding

use std::io::{self, Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use claw_shared::{MAX_LEVEL_BYTES, MAX_STRING_BYTES, WWD_FORMAT, read_file_with_limit};

use crate::error::WwdError;
use crate::level::{Level, LevelHeader, LevelObject, Plane};
use crate::{MAX_LEVEL_NAME_BYTES, MAX_PLANES, MIN_OBJECT_BYTES};

/// Decode a level from raw bytes.
///
/// Decoding is all-or-nothing: every field read is bounds-checked against
/// `data`, and any failure returns [`WwdError::Corrupt`] without a partial
/// level. Identical input always produces an identical [`Level`].
///
/// # Example
/// ```ignore
/// let bytes = archive.extract("LEVELS/LEVEL1.WWD")?;
/// let level = decode_level(&bytes)?;
/// println!("{}: {} planes", level.name(), level.planes.len());
/// ```
pub fn decode_level(data: &[u8]) -> Result<Level, WwdError> {
    if !WWD_FORMAT.matches(data) {
        return Err(WwdError::corrupt("invalid magic bytes"));
    }

    let mut reader = FieldReader::new(data);
    reader.skip(4)?;

    let header = read_header(&mut reader).map_err(|e| e.within("header"))?;

    let mut planes = Vec::with_capacity(header.plane_count as usize);
    for plane_idx in 0..header.plane_count {
        let plane = read_plane(&mut reader).map_err(|e| e.within(format!("plane {}", plane_idx)))?;
        planes.push(plane);
    }

    let objects = read_objects(&mut reader).map_err(|e| e.within("object list"))?;

    let trailing = reader.remaining();
    if trailing > 0 {
        tracing::debug!("Ignoring {} trailing bytes after object list", trailing);
    }

    tracing::debug!(
        "Decoded level '{}' ({} planes, {} objects)",
        header.name,
        planes.len(),
        objects.len()
    );

    Ok(Level {
        header,
        planes,
        objects,
    })
}

/// Read and decode a standalone level file.
pub fn load_level(path: impl AsRef<Path>) -> Result<Level, WwdError> {
    let path = path.as_ref();
    let bytes = read_file_with_limit(path, MAX_LEVEL_BYTES)?;
    decode_level(&bytes).map_err(|e| e.within(path.display()))
}

fn read_header(reader: &mut FieldReader<'_>) -> Result<LevelHeader, WwdError> {
    let version = reader.u32("version")?;
    if version > WWD_FORMAT.version {
        tracing::warn!(
            "Level version {} is newer than supported version {}",
            version,
            WWD_FORMAT.version
        );
    }

    let name = reader.string("level name", MAX_LEVEL_NAME_BYTES)?;
    let tile_width = reader.u32("tile width")?;
    let tile_height = reader.u32("tile height")?;
    if tile_width == 0 || tile_height == 0 {
        return Err(WwdError::corrupt(format!(
            "tile size {}x{} has a zero dimension",
            tile_width, tile_height
        )));
    }

    let plane_count = reader.u32("plane count")?;
    if plane_count > MAX_PLANES {
        return Err(WwdError::corrupt(format!(
            "plane count {} exceeds maximum {}",
            plane_count, MAX_PLANES
        )));
    }

    Ok(LevelHeader {
        version,
        name,
        tile_width,
        tile_height,
        plane_count,
    })
}

fn read_plane(reader: &mut FieldReader<'_>) -> Result<Plane, WwdError> {
    let name = reader.string("name", MAX_STRING_BYTES)?;
    let width = reader.u32("width")?;
    let height = reader.u32("height")?;

    // Check the payload fits before allocating for it. Compared in cells so
    // huge dimensions cannot overflow the byte count.
    let cells = width as u64 * height as u64;
    let remaining = reader.remaining();
    if cells > remaining / 4 {
        return Err(WwdError::corrupt(format!(
            "'{}' is {}x{} tiles but only {} bytes remain",
            name, width, height, remaining
        )));
    }

    let mut tiles = vec![0u32; cells as usize];
    reader
        .cursor
        .read_u32_into::<LittleEndian>(&mut tiles)
        .map_err(|e| reader.eof("tiles", e))?;

    Ok(Plane {
        name,
        width,
        height,
        tiles,
    })
}

fn read_objects(reader: &mut FieldReader<'_>) -> Result<Vec<LevelObject>, WwdError> {
    let count = reader.u32("object count")? as u64;
    let remaining = reader.remaining();
    if count * MIN_OBJECT_BYTES > remaining {
        return Err(WwdError::corrupt(format!(
            "{} objects need at least {} bytes but only {} remain",
            count,
            count * MIN_OBJECT_BYTES,
            remaining
        )));
    }

    let mut objects = Vec::with_capacity(count as usize);
    for idx in 0..count {
        let object = read_object(reader).map_err(|e| e.within(format!("object {}", idx)))?;
        objects.push(object);
    }
    Ok(objects)
}

fn read_object(reader: &mut FieldReader<'_>) -> Result<LevelObject, WwdError> {
    Ok(LevelObject {
        kind: reader.string("type tag", MAX_STRING_BYTES)?,
        x: reader.i32("x")?,
        y: reader.i32("y")?,
        width: reader.i32("width")?,
        height: reader.i32("height")?,
    })
}

/// Little-endian field reader that turns running out of input into
/// [`WwdError::Corrupt`] naming the field.
pub(crate) struct FieldReader<'a> {
    pub(crate) cursor: Cursor<&'a [u8]>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub(crate) fn remaining(&self) -> u64 {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position())
    }

    fn eof(&self, field: &str, err: io::Error) -> WwdError {
        WwdError::corrupt(format!(
            "{} at offset {}: {}",
            field,
            self.cursor.position(),
            if err.kind() == io::ErrorKind::UnexpectedEof {
                "runs past end of data".to_string()
            } else {
                err.to_string()
            }
        ))
    }

    pub(crate) fn skip(&mut self, n: u64) -> Result<(), WwdError> {
        if n > self.remaining() {
            return Err(WwdError::corrupt("unexpected end of data"));
        }
        self.cursor.set_position(self.cursor.position() + n);
        Ok(())
    }

    pub(crate) fn u32(&mut self, field: &str) -> Result<u32, WwdError> {
        let at = self.cursor.position();
        self.cursor.read_u32::<LittleEndian>().map_err(|e| {
            self.cursor.set_position(at);
            self.eof(field, e)
        })
    }

    pub(crate) fn i32(&mut self, field: &str) -> Result<i32, WwdError> {
        let at = self.cursor.position();
        self.cursor.read_i32::<LittleEndian>().map_err(|e| {
            self.cursor.set_position(at);
            self.eof(field, e)
        })
    }

    /// Length-prefixed string (`u32` byte count, then bytes).
    pub(crate) fn string(&mut self, field: &str, max_len: u32) -> Result<String, WwdError> {
        let len = self.u32(field)?;
        if len > max_len {
            return Err(WwdError::corrupt(format!(
                "{} length {} exceeds maximum {}",
                field, len, max_len
            )));
        }
        if len as u64 > self.remaining() {
            return Err(WwdError::corrupt(format!(
                "{} of {} bytes runs past end of data",
                field, len
            )));
        }

        let mut buf = vec![0u8; len as usize];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|e| self.eof(field, e))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
