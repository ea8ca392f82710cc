use crate::codec::{CHECKSUM_OFFSET, FRAME_SIZE, PAYLOAD_RANGE, SYNC};

/// Two's complement of the byte sum over a frame's payload (ID through the
/// last slow-data byte).
pub fn compute_checksum(payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(0u8, |acc, &byte| acc.wrapping_add(byte));
    (!sum).wrapping_add(1)
}

/// Checksum a complete frame would carry, or `None` if `frame` is too short
/// to contain the payload.
pub fn frame_checksum(frame: &[u8]) -> Option<u8> {
    frame.get(PAYLOAD_RANGE).map(compute_checksum)
}

/// Returns true iff `frame` is exactly one frame long, starts with the sync
/// pattern, and carries the correct checksum.
///
/// Never panics: short, long or empty input simply fails verification.
pub fn verify_checksum(frame: &[u8]) -> bool {
    if frame.len() != FRAME_SIZE || frame[..2] != SYNC {
        return false;
    }
    frame_checksum(frame) == Some(frame[CHECKSUM_OFFSET])
}
