//! Frame IDs and the slow-data sub-message each one carries.
//!
//! The analyzer cycles through IDs 0-9, one per 50ms frame, so every slow
//! value is refreshed once per 500ms. IDs 7-9 are reserved.

/// Inspiration concentrations.
pub const INSPIRATION: u8 = 0;

/// Expiration concentrations.
pub const EXPIRATION: u8 = 1;

/// Momentary concentrations.
pub const MOMENTARY: u8 = 2;

/// Respiration rate, agents, atmospheric pressure.
pub const GENERAL: u8 = 3;

/// Mode and error/adapter/data-valid registers.
pub const SENSOR_REGISTERS: u8 = 4;

/// Fitted options and revisions.
pub const CONFIGURATION: u8 = 5;

/// Serial number and service status.
pub const SERVICE: u8 = 6;

/// Number of frame IDs in one slow-data cycle.
pub const FRAME_ID_COUNT: u8 = 10;

/// Returns a human-readable name for a frame ID.
pub fn frame_id_name(id: u8) -> &'static str {
    match id {
        INSPIRATION => "INSPIRATION",
        EXPIRATION => "EXPIRATION",
        MOMENTARY => "MOMENTARY",
        GENERAL => "GENERAL",
        SENSOR_REGISTERS => "SENSOR_REGISTERS",
        CONFIGURATION => "CONFIGURATION",
        SERVICE => "SERVICE",
        7..=9 => "RESERVED",
        _ => "INVALID",
    }
}

/// Returns true if the frame ID is valid but carries no payload.
pub fn is_reserved(id: u8) -> bool {
    (SERVICE + 1..FRAME_ID_COUNT).contains(&id)
}

/// Returns true if the frame ID is inside the protocol cycle.
pub fn is_valid(id: u8) -> bool {
    id < FRAME_ID_COUNT
}
