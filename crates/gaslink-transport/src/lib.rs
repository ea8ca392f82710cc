//! Byte-source abstraction for Phasein-compatible gas analyzers.
//!
//! The analyzer streams a 21-byte frame every 50ms over a 9600 baud 8N1
//! serial line. Opening and configuring the port is left to the caller;
//! this crate only defines how already-opened links hand raw chunks to the
//! decoder:
//! - [`ByteSource`] for anything that yields arbitrarily sized chunks
//! - [`ReadSource`] over any `std::io::Read` (tty handle, file, pipe)
//! - [`ChunkSource`] replaying an in-memory chunk queue
//!
//! This is the lowest layer of gaslink. Frame decoding builds on top of it.

pub mod error;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use serial::{Parity, SerialSettings};
pub use traits::{ByteSource, ChunkSource, ReadSource};
