//! WWD level encoding
//!
//! The exact inverse of [`decode_level`](super::decode_level). Used by the
//! pack tool and to build test fixtures.

use byteorder::{LittleEndian, WriteBytesExt};
use claw_shared::{MAX_STRING_BYTES, WWD_FORMAT};

use crate::error::WwdError;
use crate::level::Level;
use crate::{MAX_LEVEL_NAME_BYTES, MAX_PLANES};

/// Encode a level into WWD bytes.
///
/// Fails with [`WwdError::Encode`] when the level could not be decoded
/// again: a plane whose tile count disagrees with its dimensions, a header
/// plane count that disagrees with the planes present, or an oversized
/// string.
pub fn encode_level(level: &Level) -> Result<Vec<u8>, WwdError> {
    let header = &level.header;
    if header.plane_count as usize != level.planes.len() {
        return Err(WwdError::Encode(format!(
            "header declares {} planes but {} are present",
            header.plane_count,
            level.planes.len()
        )));
    }
    if header.plane_count > MAX_PLANES {
        return Err(WwdError::Encode(format!(
            "{} planes exceed maximum {}",
            header.plane_count, MAX_PLANES
        )));
    }
    if header.tile_width == 0 || header.tile_height == 0 {
        return Err(WwdError::Encode("tile size has a zero dimension".to_string()));
    }

    let mut out = Vec::new();
    out.extend_from_slice(WWD_FORMAT.magic);
    out.write_u32::<LittleEndian>(header.version)?;
    write_string(&mut out, &header.name, MAX_LEVEL_NAME_BYTES)?;
    out.write_u32::<LittleEndian>(header.tile_width)?;
    out.write_u32::<LittleEndian>(header.tile_height)?;
    out.write_u32::<LittleEndian>(header.plane_count)?;

    for plane in &level.planes {
        if plane.tiles.len() as u64 != plane.width as u64 * plane.height as u64 {
            return Err(WwdError::Encode(format!(
                "plane '{}' is {}x{} but holds {} tiles",
                plane.name,
                plane.width,
                plane.height,
                plane.tiles.len()
            )));
        }
        write_string(&mut out, &plane.name, MAX_STRING_BYTES)?;
        out.write_u32::<LittleEndian>(plane.width)?;
        out.write_u32::<LittleEndian>(plane.height)?;
        out.reserve(plane.tiles.len() * 4);
        for &tile in &plane.tiles {
            out.write_u32::<LittleEndian>(tile)?;
        }
    }

    out.write_u32::<LittleEndian>(level.objects.len() as u32)?;
    for object in &level.objects {
        write_string(&mut out, &object.kind, MAX_STRING_BYTES)?;
        out.write_i32::<LittleEndian>(object.x)?;
        out.write_i32::<LittleEndian>(object.y)?;
        out.write_i32::<LittleEndian>(object.width)?;
        out.write_i32::<LittleEndian>(object.height)?;
    }

    Ok(out)
}

fn write_string(out: &mut Vec<u8>, value: &str, max_len: u32) -> Result<(), WwdError> {
    if value.len() > max_len as usize {
        return Err(WwdError::Encode(format!(
            "string '{}' is {} bytes (max {})",
            value,
            value.len(),
            max_len
        )));
    }
    out.write_u32::<LittleEndian>(value.len() as u32)?;
    out.extend_from_slice(value.as_bytes());
    Ok(())
}
