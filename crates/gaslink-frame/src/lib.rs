//! Frame decoding and stream resynchronization for Phasein-compatible
//! anesthetic gas analyzers.
//!
//! Every 50ms the analyzer emits a fixed 21-byte frame:
//! - 2 sync bytes (`AA 55`) used to find frame boundaries
//! - frame ID (0-9) selecting the slow-data sub-message
//! - status flags and five fast waveform concentrations
//! - a 6-byte slow-data window and a two's-complement checksum
//!
//! Ten consecutive frames refresh every slow value. [`SensorSession`]
//! merges them into a persistent [`SlowData`] aggregate; [`SensorReader`]
//! does the same over any [`gaslink_transport::ByteSource`].

pub mod checksum;
pub mod codec;
pub mod error;
pub mod fields;
pub mod frame_id;
pub mod reader;
pub mod session;
pub mod slow_data;
pub mod sync;
#[cfg(feature = "async")]
pub mod tokio_codec;

pub use checksum::{compute_checksum, frame_checksum, verify_checksum};
pub use codec::{
    decode_frame, encode_frame, DecodedFrame, FrameConfig, ProtocolRevision, FRAME_SIZE, SYNC,
};
pub use error::{FrameDefect, FrameError, HookError, Result};
pub use fields::{
    AdapterRegister, AgentId, DataValidRegister, ErrorRegister, FittedOptions, SensorMode,
    ServiceStatus, Status, Waveform,
};
pub use frame_id::frame_id_name;
pub use reader::SensorReader;
pub use session::{FrameHook, SensorSession, SessionEvent, SessionStats};
pub use slow_data::{
    ConfigData, GasValues, GeneralValues, SensorRegisters, ServiceData, SlowData, SlowDataVariant,
};
pub use sync::{FrameOutcome, FrameSynchronizer, SyncState};
#[cfg(feature = "async")]
pub use tokio_codec::SensorCodec;
