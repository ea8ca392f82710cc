//! Decoder for Phasein-compatible anesthetic gas analyzer serial frames.
//!
//! gaslink turns the analyzer's 50ms frame stream into typed waveform,
//! status and slow-data values, resynchronizing on the sync pattern when
//! bytes are lost or corrupted.
//!
//! # Crate Structure
//!
//! - [`transport`]: byte sources that feed the decoder
//! - [`frame`]: frame decoding, slow-data aggregation and resynchronization

/// Re-export transport types.
pub mod transport {
    pub use gaslink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use gaslink_frame::*;
}
