use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes};
use tracing::trace;

use crate::error::{Result, TransportError};

/// Anything that delivers raw analyzer bytes in arbitrarily sized chunks.
///
/// `read_chunk` returns the number of bytes written into `buf`; `Ok(0)`
/// means the source reached end of stream.
pub trait ByteSource {
    /// Read the next chunk into `buf`.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Whether a read is expected to return without blocking.
    ///
    /// Sources that cannot tell report `true`.
    fn data_available(&self) -> bool {
        true
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_chunk(buf)
    }

    fn data_available(&self) -> bool {
        (**self).data_available()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_chunk(buf)
    }

    fn data_available(&self) -> bool {
        (**self).data_available()
    }
}

/// Adapts any `std::io::Read` into a [`ByteSource`].
///
/// Interrupted reads are retried; every other I/O error is surfaced.
pub struct ReadSource<R> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Borrow the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the source and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => {
                    trace!(len = n, "read chunk");
                    return Ok(n);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<R> std::fmt::Debug for ReadSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSource").finish_non_exhaustive()
    }
}

/// Replays a queue of pre-recorded chunks.
///
/// Chunks are delivered with their original boundaries (a chunk larger than
/// the caller's buffer is split). Empty chunks are skipped so they never
/// look like EOF.
#[derive(Debug, Default)]
pub struct ChunkSource {
    chunks: VecDeque<Bytes>,
    closed: bool,
}

impl ChunkSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source that replays `chunks` in order.
    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            closed: false,
        }
    }

    /// Queue a chunk for delivery.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        self.chunks.push_back(chunk.into());
    }

    /// Mark the source closed; reads after the queue drains fail with
    /// [`TransportError::Closed`] instead of returning EOF.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Number of queued chunks.
    pub fn pending(&self) -> usize {
        self.chunks.len()
    }
}

impl ByteSource for ChunkSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        while let Some(front) = self.chunks.front_mut() {
            if front.is_empty() {
                self.chunks.pop_front();
                continue;
            }

            let n = front.len().min(buf.len());
            buf[..n].copy_from_slice(&front[..n]);
            front.advance(n);
            if front.is_empty() {
                self.chunks.pop_front();
            }
            return Ok(n);
        }

        if self.closed {
            return Err(TransportError::Closed);
        }
        Ok(0)
    }

    /// A closed source always reports data: the next read returns at once,
    /// either with bytes or with [`TransportError::Closed`].
    fn data_available(&self) -> bool {
        self.closed || self.chunks.iter().any(|chunk| !chunk.is_empty())
    }
}
