use std::ops::Range;

use crate::checksum::{compute_checksum, verify_checksum};
use crate::error::{FrameDefect, FrameError, Result};
use crate::fields::{Status, Waveform};
use crate::frame_id::FRAME_ID_COUNT;
use crate::slow_data::SlowDataVariant;

/// Total frame size on the wire.
pub const FRAME_SIZE: usize = 21;

/// Sync bytes opening every frame.
pub const SYNC: [u8; 2] = [0xAA, 0x55];

pub const FRAME_ID_OFFSET: usize = 2;
pub const STATUS_OFFSET: usize = 3;
pub const WAVEFORM_RANGE: Range<usize> = 4..14;
pub const WAVEFORM_LEN: usize = 10;
pub const SLOW_DATA_LEN: usize = 6;
pub const CHECKSUM_OFFSET: usize = 20;

/// Bytes covered by the checksum: frame ID through the last slow-data byte.
pub const PAYLOAD_RANGE: Range<usize> = 2..20;

/// Single-byte "no data" marker.
pub const NO_DATA: u8 = 0xFF;

/// Two-byte "no data" marker.
pub const NO_DATA_WORD: u16 = 0xFFFF;

/// Default receive buffer capacity.
pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// Default number of bytes requested from a byte source per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 64;

/// Wire-format interpretation of the slow-data window and its scaling.
///
/// Two analyzer firmware generations disagree on where the slow-data window
/// starts and how single-byte concentrations and pressure are scaled:
///
/// | Revision   | Slow data | Single-byte conc. | Pressure      |
/// |------------|-----------|-------------------|---------------|
/// | `Standard` | 14..20    | raw percent       | raw / 10 kPa  |
/// | `Legacy`   | 13..19    | raw / 10 percent  | raw / 100 kPa |
///
/// Waveform words are percent × 100 in both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProtocolRevision {
    #[default]
    Standard,
    Legacy,
}

impl ProtocolRevision {
    /// Offset of the 6-byte slow-data window inside a frame.
    pub fn slow_data_offset(self) -> usize {
        match self {
            ProtocolRevision::Standard => 14,
            ProtocolRevision::Legacy => 13,
        }
    }

    pub(crate) fn single_byte_divisor(self) -> f32 {
        match self {
            ProtocolRevision::Standard => 1.0,
            ProtocolRevision::Legacy => 10.0,
        }
    }

    pub(crate) fn pressure_divisor(self) -> f32 {
        match self {
            ProtocolRevision::Standard => 10.0,
            ProtocolRevision::Legacy => 100.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProtocolRevision::Standard => "standard",
            ProtocolRevision::Legacy => "legacy",
        }
    }
}

/// One fully decoded frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedFrame {
    pub frame_id: u8,
    pub status: Status,
    pub waveform: Waveform,
    pub slow: SlowDataVariant,
}

/// Decode one isolated frame.
///
/// Checks run in wire order: length, sync, checksum, then frame ID range.
/// Decoding is pure; merging the slow-data variant into an aggregate is the
/// caller's job (see [`crate::SlowData::merge`]).
pub fn decode_frame(bytes: &[u8], revision: ProtocolRevision) -> Result<DecodedFrame> {
    let frame: &[u8; FRAME_SIZE] = match bytes.len() {
        0 => return Err(FrameError::NullOrEmptyInput),
        FRAME_SIZE => bytes
            .try_into()
            .map_err(|_| FrameError::InvalidFrame(FrameDefect::Length(bytes.len())))?,
        len => return Err(FrameError::InvalidFrame(FrameDefect::Length(len))),
    };

    if frame[..2] != SYNC {
        return Err(FrameError::InvalidFrame(FrameDefect::Sync {
            first: frame[0],
            second: frame[1],
        }));
    }

    if !verify_checksum(frame) {
        return Err(FrameError::ChecksumFailed {
            expected: compute_checksum(&frame[PAYLOAD_RANGE]),
            actual: frame[CHECKSUM_OFFSET],
        });
    }

    let frame_id = frame[FRAME_ID_OFFSET];
    if frame_id >= FRAME_ID_COUNT {
        return Err(FrameError::InvalidFrame(FrameDefect::FrameId(frame_id)));
    }

    let status = Status::from_byte(frame[STATUS_OFFSET]);
    let waveform = Waveform::from_bytes(&waveform_window(frame));
    let slow = SlowDataVariant::decode(frame_id, &slow_data_window(frame, revision), revision)
        .ok_or(FrameError::InvalidFrame(FrameDefect::FrameId(frame_id)))?;

    Ok(DecodedFrame {
        frame_id,
        status,
        waveform,
        slow,
    })
}

/// Build a wire frame with sync bytes and checksum filled in.
///
/// Under [`ProtocolRevision::Legacy`] the slow-data window overlaps the last
/// waveform byte; the slow-data byte wins.
pub fn encode_frame(
    frame_id: u8,
    status: u8,
    waveform: [u16; 5],
    slow_data: [u8; SLOW_DATA_LEN],
    revision: ProtocolRevision,
) -> [u8; FRAME_SIZE] {
    let mut frame = [0u8; FRAME_SIZE];
    frame[..2].copy_from_slice(&SYNC);
    frame[FRAME_ID_OFFSET] = frame_id;
    frame[STATUS_OFFSET] = status;
    for (i, word) in waveform.iter().enumerate() {
        let at = WAVEFORM_RANGE.start + i * 2;
        frame[at..at + 2].copy_from_slice(&word.to_be_bytes());
    }
    let offset = revision.slow_data_offset();
    frame[offset..offset + SLOW_DATA_LEN].copy_from_slice(&slow_data);
    frame[CHECKSUM_OFFSET] = compute_checksum(&frame[PAYLOAD_RANGE]);
    frame
}

fn waveform_window(frame: &[u8; FRAME_SIZE]) -> [u8; WAVEFORM_LEN] {
    let mut window = [0u8; WAVEFORM_LEN];
    window.copy_from_slice(&frame[WAVEFORM_RANGE]);
    window
}

fn slow_data_window(frame: &[u8; FRAME_SIZE], revision: ProtocolRevision) -> [u8; SLOW_DATA_LEN] {
    let offset = revision.slow_data_offset();
    let mut window = [0u8; SLOW_DATA_LEN];
    window.copy_from_slice(&frame[offset..offset + SLOW_DATA_LEN]);
    window
}

/// Configuration for frame decoding and stream resynchronization.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Slow-data layout and scaling. Default: [`ProtocolRevision::Standard`].
    pub revision: ProtocolRevision,
    /// Receive buffer capacity in bytes. Values below one frame are raised
    /// to [`FRAME_SIZE`]. Default: 512.
    pub buffer_capacity: usize,
    /// Bytes requested from the byte source per read. Default: 64.
    pub read_chunk_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            revision: ProtocolRevision::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}
