//! One logical analyzer session: receive buffer, slow-data aggregate, an
//! optional per-frame hook, and running counters.

use std::fmt;

use tracing::{debug, warn};

use crate::codec::{decode_frame, DecodedFrame, FrameConfig, ProtocolRevision};
use crate::error::{FrameError, HookError, Result};
use crate::fields::{Status, Waveform};
use crate::slow_data::SlowData;
use crate::sync::{FrameOutcome, FrameSynchronizer, SyncState};

/// Callback run after every successfully decoded and merged frame.
///
/// Runs on the decoding thread and must not block.
pub type FrameHook =
    Box<dyn FnMut(&Waveform, &Status, &SlowData) -> std::result::Result<(), HookError> + Send>;

/// Result of one session step.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Not enough bytes buffered for another frame.
    NeedMoreData,
    /// Leading bytes were dropped while searching for sync.
    DiscardedGarbage { dropped: usize },
    /// A frame was decoded and merged into the slow-data aggregate.
    Frame(DecodedFrame),
}

/// Running counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionStats {
    pub frames_decoded: u64,
    pub checksum_failures: u64,
    pub invalid_frames: u64,
    pub hook_failures: u64,
    pub garbage_bytes: u64,
    pub overflow_resets: u64,
}

impl SessionStats {
    /// Frames consumed from the stream, decoded or not.
    pub fn frames_seen(&self) -> u64 {
        self.frames_decoded + self.checksum_failures + self.invalid_frames
    }
}

/// Owns everything needed to turn a byte stream into decoded frames.
///
/// Not internally synchronized; wrap in a mutex to share across threads.
pub struct SensorSession {
    sync: FrameSynchronizer,
    slow: SlowData,
    revision: ProtocolRevision,
    hook: Option<FrameHook>,
    stats: SessionStats,
}

impl Default for SensorSession {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}

impl fmt::Debug for SensorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorSession")
            .field("sync", &self.sync)
            .field("slow", &self.slow)
            .field("revision", &self.revision)
            .field("hook", &self.hook.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

impl SensorSession {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            sync: FrameSynchronizer::new(config.buffer_capacity),
            slow: SlowData::new(),
            revision: config.revision,
            hook: None,
            stats: SessionStats::default(),
        }
    }

    /// Register a hook, replacing any previous one.
    pub fn set_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Waveform, &Status, &SlowData) -> std::result::Result<(), HookError>
            + Send
            + 'static,
    {
        self.hook = Some(Box::new(hook));
    }

    pub fn clear_hook(&mut self) {
        self.hook = None;
    }

    /// Append bytes without stepping the synchronizer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.sync.extend(bytes);
    }

    /// Append `bytes` and run one step.
    ///
    /// Checksum failures and invalid frames are returned as errors after
    /// the offending frame has been consumed; the next call carries on with
    /// the following bytes. A hook error is returned as [`FrameError::Hook`]
    /// after the frame has already been merged.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<SessionEvent> {
        let outcome = self.sync.feed(bytes);
        self.handle(outcome)
    }

    /// Run one step over already buffered bytes.
    pub fn poll(&mut self) -> Result<SessionEvent> {
        let outcome = self.sync.poll();
        self.handle(outcome)
    }

    fn handle(&mut self, outcome: FrameOutcome) -> Result<SessionEvent> {
        self.stats.garbage_bytes = self.sync.garbage_bytes();
        self.stats.overflow_resets = self.sync.overflow_resets();

        match outcome {
            FrameOutcome::NeedMoreData => Ok(SessionEvent::NeedMoreData),
            FrameOutcome::DiscardedGarbage { dropped } => {
                Ok(SessionEvent::DiscardedGarbage { dropped })
            }
            FrameOutcome::FrameAvailable(frame) => {
                self.decode_and_merge(&frame).map(SessionEvent::Frame)
            }
        }
    }

    /// Decode one isolated frame, merge its slow data and run the hook.
    pub fn decode_and_merge(&mut self, bytes: &[u8]) -> Result<DecodedFrame> {
        let decoded = match decode_frame(bytes, self.revision) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.record_failure(&err);
                return Err(err);
            }
        };

        self.slow.merge(&decoded.slow);
        self.stats.frames_decoded += 1;
        debug!(
            frame_id = decoded.frame_id,
            status = ?decoded.status.active_flags(),
            "decoded frame"
        );

        if let Some(hook) = self.hook.as_mut() {
            if let Err(err) = hook(&decoded.waveform, &decoded.status, &self.slow) {
                self.stats.hook_failures += 1;
                warn!(frame_id = decoded.frame_id, error = %err, "frame hook failed");
                return Err(FrameError::Hook(err));
            }
        }

        Ok(decoded)
    }

    fn record_failure(&mut self, err: &FrameError) {
        match err {
            FrameError::ChecksumFailed { .. } => self.stats.checksum_failures += 1,
            FrameError::InvalidFrame(_) | FrameError::NullOrEmptyInput => {
                self.stats.invalid_frames += 1
            }
            _ => {}
        }
        warn!(error = %err, "dropping frame");
    }

    /// Latest slow-data aggregate.
    pub fn slow_data(&self) -> &SlowData {
        &self.slow
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Bytes that can be appended before the receive buffer overflows.
    pub fn free_capacity(&self) -> usize {
        self.sync.capacity() - self.sync.buffered()
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Drop buffered bytes and start a fresh aggregate. The hook stays
    /// registered; counters restart from zero.
    pub fn reset(&mut self) {
        self.sync = FrameSynchronizer::new(self.sync.capacity());
        self.slow = SlowData::new();
        self.stats = SessionStats::default();
    }
}
