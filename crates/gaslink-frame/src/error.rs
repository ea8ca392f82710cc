/// Boxed error returned by a frame hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Structural defect that makes a frame undecodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameDefect {
    /// The buffer is not exactly one frame long.
    #[error("frame must be 21 bytes, got {0}")]
    Length(usize),

    /// The two leading bytes are not the sync pattern.
    #[error("bad sync bytes {first:02X} {second:02X} (expected AA 55)")]
    Sync { first: u8, second: u8 },

    /// The frame ID byte is outside 0..=9.
    #[error("frame ID {0} out of range (max 9)")]
    FrameId(u8),
}

/// Errors that can occur while decoding analyzer frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Bad sync bytes, wrong length, or a frame ID of 10 or more.
    #[error("invalid frame: {0}")]
    InvalidFrame(FrameDefect),

    /// Sync bytes were valid but the checksum byte did not match.
    #[error("checksum verification failed (expected 0x{expected:02X}, got 0x{actual:02X})")]
    ChecksumFailed { expected: u8, actual: u8 },

    /// No bytes were provided where a frame was required.
    #[error("empty frame buffer")]
    NullOrEmptyInput,

    /// The registered frame hook reported an error. The frame was still
    /// decoded and merged.
    #[error("frame hook failed: {0}")]
    Hook(#[source] HookError),

    /// The byte source failed.
    #[error("transport error: {0}")]
    Transport(#[from] gaslink_transport::TransportError),

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source reached end of stream.
    #[error("connection closed (no further frames)")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether decoding can continue on the same stream after this error.
    ///
    /// Frame-level errors only cost the current frame; transport failures
    /// and end of stream do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FrameError::InvalidFrame(_)
                | FrameError::ChecksumFailed { .. }
                | FrameError::NullOrEmptyInput
                | FrameError::Hook(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = FrameError::InvalidFrame(FrameDefect::Sync {
            first: 0x12,
            second: 0x34,
        });
        assert_eq!(
            err.to_string(),
            "invalid frame: bad sync bytes 12 34 (expected AA 55)"
        );

        let err = FrameError::ChecksumFailed {
            expected: 0xBC,
            actual: 0x00,
        };
        assert_eq!(
            err.to_string(),
            "checksum verification failed (expected 0xBC, got 0x00)"
        );

        let err = FrameError::InvalidFrame(FrameDefect::FrameId(12));
        assert!(err.to_string().contains("frame ID 12"));
    }

    #[test]
    fn frame_level_errors_are_recoverable() {
        assert!(FrameError::NullOrEmptyInput.is_recoverable());
        assert!(FrameError::InvalidFrame(FrameDefect::Length(3)).is_recoverable());
        assert!(FrameError::Hook("boom".into()).is_recoverable());
        assert!(!FrameError::ConnectionClosed.is_recoverable());
        assert!(!FrameError::Transport(gaslink_transport::TransportError::Closed).is_recoverable());
    }
}
