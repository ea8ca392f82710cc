//! `tokio_util::codec` adapter for async byte streams.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::debug;

use crate::codec::{DecodedFrame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::session::{SensorSession, SessionEvent};

/// Decodes analyzer frames from an async stream via `FramedRead`.
///
/// A stream stops after its decoder returns an error, so frame-level
/// failures (bad checksum, invalid frame, hook error) are logged, counted
/// in [`SensorSession::stats`] and skipped. Only I/O errors end the stream.
#[derive(Debug, Default)]
pub struct SensorCodec {
    session: SensorSession,
}

impl SensorCodec {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            session: SensorSession::new(config),
        }
    }

    pub fn session(&self) -> &SensorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SensorSession {
        &mut self.session
    }

    pub fn into_session(self) -> SensorSession {
        self.session
    }
}

impl Decoder for SensorCodec {
    type Item = DecodedFrame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<DecodedFrame>> {
        loop {
            let take = src.len().min(self.session.free_capacity());
            if take > 0 {
                let chunk = src.split_to(take);
                self.session.extend(&chunk);
            }

            match self.session.poll() {
                Ok(SessionEvent::Frame(frame)) => return Ok(Some(frame)),
                Ok(SessionEvent::DiscardedGarbage { .. }) => continue,
                Ok(SessionEvent::NeedMoreData) if src.is_empty() => return Ok(None),
                Ok(SessionEvent::NeedMoreData) => continue,
                Err(err) if err.is_recoverable() => {
                    debug!(error = %err, "skipping frame");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
