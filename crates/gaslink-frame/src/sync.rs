//! Receive buffer that turns arbitrary byte arrivals into candidate frames.
//!
//! The analyzer streams frames back to back with no length prefix, so frame
//! boundaries are recovered by scanning for the sync pattern. Each call to
//! [`FrameSynchronizer::feed`] makes forward progress: it either needs more
//! bytes, drops at least one garbage byte, or hands out exactly one frame.

use bytes::{Buf, BytesMut};
use tracing::{trace, warn};

use crate::codec::{DEFAULT_BUFFER_CAPACITY, FRAME_SIZE, SYNC};

/// Result of one synchronizer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not enough bytes buffered to locate or complete a frame.
    NeedMoreData,
    /// Leading bytes were dropped while searching for sync.
    DiscardedGarbage { dropped: usize },
    /// A sync-aligned 21-byte candidate, already removed from the buffer.
    /// Checksum and frame ID have not been checked yet.
    FrameAvailable([u8; FRAME_SIZE]),
}

/// Logical state of the receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing buffered.
    Empty,
    /// Bytes buffered but no complete sync-aligned frame at the head.
    Searching,
    /// A full frame starts at the head of the buffer.
    FrameReady,
}

/// Bounded receive buffer with sync-pattern resynchronization.
#[derive(Debug)]
pub struct FrameSynchronizer {
    buf: BytesMut,
    capacity: usize,
    overflow_resets: u64,
    garbage_bytes: u64,
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl FrameSynchronizer {
    /// Create a synchronizer holding at most `capacity` bytes. Capacities
    /// smaller than one frame are raised to [`FRAME_SIZE`].
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(FRAME_SIZE);
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            overflow_resets: 0,
            garbage_bytes: 0,
        }
    }

    /// Append bytes without producing an outcome.
    ///
    /// If the append would exceed capacity, everything buffered so far is
    /// dropped first. A single chunk larger than the whole buffer keeps only
    /// its trailing `capacity` bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        if self.buf.len() + bytes.len() > self.capacity {
            warn!(
                buffered = self.buf.len(),
                incoming = bytes.len(),
                capacity = self.capacity,
                "receive buffer overflow, resetting"
            );
            self.overflow_resets += 1;
            self.buf.clear();
        }

        let keep_from = bytes.len().saturating_sub(self.capacity);
        self.buf.extend_from_slice(&bytes[keep_from..]);
    }

    /// Append `bytes` and run one resynchronization step.
    pub fn feed(&mut self, bytes: &[u8]) -> FrameOutcome {
        self.extend(bytes);
        self.next_outcome()
    }

    /// Run one resynchronization step over what is already buffered.
    pub fn poll(&mut self) -> FrameOutcome {
        self.next_outcome()
    }

    fn next_outcome(&mut self) -> FrameOutcome {
        match find_sync(&self.buf) {
            None if self.buf.len() < SYNC.len() => FrameOutcome::NeedMoreData,
            None => {
                self.discard(1);
                FrameOutcome::DiscardedGarbage { dropped: 1 }
            }
            Some(offset) => {
                if offset > 0 {
                    self.discard(offset);
                }
                if self.buf.len() < FRAME_SIZE {
                    return FrameOutcome::NeedMoreData;
                }
                let mut frame = [0u8; FRAME_SIZE];
                self.buf.copy_to_slice(&mut frame);
                FrameOutcome::FrameAvailable(frame)
            }
        }
    }

    fn discard(&mut self, count: usize) {
        trace!(count, "discarding bytes before sync");
        self.buf.advance(count);
        self.garbage_bytes += count as u64;
    }

    /// Current logical state.
    pub fn state(&self) -> SyncState {
        if self.buf.is_empty() {
            SyncState::Empty
        } else if self.buf.len() >= FRAME_SIZE && self.buf.starts_with(&SYNC) {
            SyncState::FrameReady
        } else {
            SyncState::Searching
        }
    }

    /// Bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the buffer was reset because of overflow.
    pub fn overflow_resets(&self) -> u64 {
        self.overflow_resets
    }

    /// Total bytes dropped while searching for sync.
    pub fn garbage_bytes(&self) -> u64 {
        self.garbage_bytes
    }

    /// Drop buffered bytes. Counters are kept.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

fn find_sync(buf: &[u8]) -> Option<usize> {
    buf.windows(SYNC.len()).position(|window| window == SYNC)
}
