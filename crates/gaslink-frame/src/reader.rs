use gaslink_transport::{ByteSource, TransportError};
use tracing::trace;

use crate::codec::{DecodedFrame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::session::{SensorSession, SessionEvent};

/// Reads decoded frames from any [`ByteSource`].
///
/// Handles partial reads and resynchronization internally: callers only see
/// complete frames or frame-level errors. A frame-level error (bad checksum,
/// invalid frame, hook failure) has already consumed its bytes, so calling
/// [`read_frame`](Self::read_frame) again continues with the next frame.
pub struct SensorReader<S> {
    source: S,
    session: SensorSession,
    chunk: Vec<u8>,
}

impl<S: ByteSource> SensorReader<S> {
    /// Create a new reader with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, FrameConfig::default())
    }

    /// Create a new reader with explicit configuration.
    pub fn with_config(source: S, config: FrameConfig) -> Self {
        let chunk = vec![0u8; config.read_chunk_size.max(1)];
        Self {
            source,
            session: SensorSession::new(config),
            chunk,
        }
    }

    /// Read the next decoded frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the source reaches
    /// end of stream.
    pub fn read_frame(&mut self) -> Result<DecodedFrame> {
        loop {
            if let Some(frame) = self.next_buffered()? {
                return Ok(frame);
            }
            if self.fill()? == 0 {
                return Err(FrameError::ConnectionClosed);
            }
        }
    }

    /// Read the next frame only if it can be produced without blocking.
    ///
    /// Returns `Ok(None)` when no full frame is buffered and the source
    /// reports no data available. Once a read hits end of stream this
    /// returns `Err(FrameError::ConnectionClosed)`, like
    /// [`read_frame`](Self::read_frame).
    pub fn try_read_frame(&mut self) -> Result<Option<DecodedFrame>> {
        loop {
            if let Some(frame) = self.next_buffered()? {
                return Ok(Some(frame));
            }
            if !self.source.data_available() {
                return Ok(None);
            }
            if self.fill()? == 0 {
                return Err(FrameError::ConnectionClosed);
            }
        }
    }

    fn next_buffered(&mut self) -> Result<Option<DecodedFrame>> {
        loop {
            match self.session.poll()? {
                SessionEvent::Frame(frame) => return Ok(Some(frame)),
                SessionEvent::DiscardedGarbage { .. } => continue,
                SessionEvent::NeedMoreData => return Ok(None),
            }
        }
    }

    fn fill(&mut self) -> Result<usize> {
        let read = match self.source.read_chunk(&mut self.chunk) {
            Ok(n) => n,
            Err(TransportError::Closed) => 0,
            Err(err) => return Err(err.into()),
        };
        trace!(read, "filled receive buffer");
        self.session.extend(&self.chunk[..read]);
        Ok(read)
    }

    /// Borrow the session (aggregate, counters, hook).
    pub fn session(&self) -> &SensorSession {
        &self.session
    }

    /// Mutably borrow the session, e.g. to register a hook.
    pub fn session_mut(&mut self) -> &mut SensorSession {
        &mut self.session
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> Iterator for SensorReader<S> {
    type Item = Result<DecodedFrame>;

    /// Yields frames and frame-level errors; ends at end of stream.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Err(FrameError::ConnectionClosed) => None,
            other => Some(other),
        }
    }
}
