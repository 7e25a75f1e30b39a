//! Tests for the WWD parser

use super::*;
use crate::error::WwdError;
use crate::level::{Level, LevelObject, Plane};
use claw_shared::EMPTY_TILE;

fn sample_level() -> Level {
    let mut level = Level::new("Test Level", 64, 64);
    level.push_plane(Plane::from_tiles("Background", 2, 1, vec![3, 4]).unwrap());

    let mut action = Plane::new("Action", 3, 2);
    action.set_tile(0, 1, 1);
    action.set_tile(1, 1, 1);
    action.set_tile(2, 1, 7);
    level.push_plane(action);

    level.push_object(LevelObject {
        kind: "StartPoint".into(),
        x: 96,
        y: 32,
        width: 32,
        height: 64,
    });
    level.push_object(LevelObject {
        kind: "Officer".into(),
        x: -16,
        y: 40,
        width: 48,
        height: 80,
    });
    level
}

/// Offset of the plane count field for a level named `name`.
fn plane_count_offset(name: &str) -> usize {
    4 + 4 + 4 + name.len() + 4 + 4
}

#[test]
fn test_decode_encoded_level() {
    let level = sample_level();
    let bytes = encode_level(&level).unwrap();
    let decoded = decode_level(&bytes).unwrap();

    assert_eq!(decoded, level);
    assert_eq!(decoded.planes[1].tile_at(2, 1), Some(7));
    assert_eq!(decoded.planes[1].tile_at(2, 0), Some(EMPTY_TILE));
    assert_eq!(decoded.objects[1].x, -16);
}

#[test]
fn test_decode_is_deterministic() {
    let bytes = encode_level(&sample_level()).unwrap();
    assert_eq!(decode_level(&bytes).unwrap(), decode_level(&bytes).unwrap());
}

#[test]
fn test_invalid_magic() {
    let mut bytes = encode_level(&sample_level()).unwrap();
    bytes[..4].copy_from_slice(b"REZ\0");
    assert!(matches!(decode_level(&bytes), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_too_small() {
    assert!(matches!(decode_level(b""), Err(WwdError::Corrupt(_))));
    assert!(matches!(decode_level(b"WWD"), Err(WwdError::Corrupt(_))));
    assert!(matches!(decode_level(b"WWD\0"), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_missing_plane_is_corrupt() {
    let level = sample_level();
    let mut bytes = encode_level(&level).unwrap();
    let at = plane_count_offset(level.name());
    assert_eq!(&bytes[at..at + 4], &2u32.to_le_bytes());
    bytes[at..at + 4].copy_from_slice(&3u32.to_le_bytes());

    let err = decode_level(&bytes).unwrap_err();
    match err {
        WwdError::Corrupt(reason) => assert!(reason.starts_with("plane 2"), "{reason}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_every_truncation_is_corrupt() {
    let bytes = encode_level(&sample_level()).unwrap();
    for len in 0..bytes.len() {
        assert!(
            matches!(decode_level(&bytes[..len]), Err(WwdError::Corrupt(_))),
            "truncated to {len} bytes"
        );
    }
}

#[test]
fn test_trailing_bytes_ignored() {
    let level = sample_level();
    let mut bytes = encode_level(&level).unwrap();
    bytes.extend_from_slice(&[0xFF; 7]);
    assert_eq!(decode_level(&bytes).unwrap(), level);
}

#[test]
fn test_huge_plane_rejected_before_allocation() {
    let mut level = Level::new("Huge", 32, 32);
    level.push_plane(Plane::new("Action", 0, 0));
    let mut bytes = encode_level(&level).unwrap();

    // Plane header starts right after the plane count: name "Action", then width/height.
    let width_at = plane_count_offset("Huge") + 4 + 4 + "Action".len();
    bytes[width_at..width_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    bytes[width_at + 4..width_at + 8].copy_from_slice(&u32::MAX.to_le_bytes());

    assert!(matches!(decode_level(&bytes), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_plane_size_that_wraps_byte_count_rejected() {
    let mut level = Level::new("Wrap", 32, 32);
    level.push_plane(Plane::new("Action", 0, 0));
    let mut bytes = encode_level(&level).unwrap();

    // 2^31 x 2^31 cells is 2^64 tile bytes.
    let width_at = plane_count_offset("Wrap") + 4 + 4 + "Action".len();
    bytes[width_at..width_at + 4].copy_from_slice(&0x8000_0000u32.to_le_bytes());
    bytes[width_at + 4..width_at + 8].copy_from_slice(&0x8000_0000u32.to_le_bytes());

    let result = std::panic::catch_unwind(|| decode_level(&bytes));
    assert!(matches!(result, Ok(Err(WwdError::Corrupt(_)))));
}

#[test]
fn test_huge_object_count_rejected() {
    let level = Level::new("Objects", 32, 32);
    let mut bytes = encode_level(&level).unwrap();
    let len = bytes.len();
    bytes[len - 4..].copy_from_slice(&u32::MAX.to_le_bytes());

    assert!(matches!(decode_level(&bytes), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_level_name_too_long() {
    let mut level = Level::new("x".repeat(64), 32, 32);
    assert!(encode_level(&level).is_ok());

    level.header.name = "x".repeat(65);
    assert!(matches!(encode_level(&level), Err(WwdError::Encode(_))));

    // Hand-build a header with a 65-byte name.
    let mut bytes = b"WWD\0".to_vec();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&65u32.to_le_bytes());
    bytes.extend_from_slice(&[b'x'; 65]);
    bytes.extend_from_slice(&[0u8; 16]);
    assert!(matches!(decode_level(&bytes), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_zero_tile_size_rejected() {
    let level = Level::new("Zero", 32, 32);
    let mut bytes = encode_level(&level).unwrap();
    let tile_width_at = plane_count_offset("Zero") - 8;
    bytes[tile_width_at..tile_width_at + 4].copy_from_slice(&0u32.to_le_bytes());

    assert!(matches!(decode_level(&bytes), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_too_many_planes_rejected() {
    let level = Level::new("Many", 32, 32);
    let mut bytes = encode_level(&level).unwrap();
    let at = plane_count_offset("Many");
    bytes[at..at + 4].copy_from_slice(&(crate::MAX_PLANES + 1).to_le_bytes());

    assert!(matches!(decode_level(&bytes), Err(WwdError::Corrupt(_))));
}

#[test]
fn test_encode_rejects_inconsistent_level() {
    let mut level = sample_level();
    level.header.plane_count = 5;
    assert!(matches!(encode_level(&level), Err(WwdError::Encode(_))));

    let mut level = sample_level();
    level.planes[0].tiles.pop();
    assert!(matches!(encode_level(&level), Err(WwdError::Encode(_))));
}

#[test]
fn test_load_level_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("LEVEL1.WWD");
    std::fs::write(&path, encode_level(&sample_level()).unwrap()).unwrap();

    assert_eq!(load_level(&path).unwrap(), sample_level());
    assert!(matches!(
        load_level(dir.path().join("missing.wwd")),
        Err(WwdError::Io(_))
    ));
}
