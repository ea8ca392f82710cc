//! Slow-data sub-messages and the aggregate they are merged into.
//!
//! Each frame carries one 6-byte sub-message selected by its frame ID. A
//! [`SlowData`] aggregate keeps the latest copy of every sub-message so a
//! full picture is available after one 500ms cycle.

use tracing::warn;

use crate::codec::{ProtocolRevision, SLOW_DATA_LEN};
use crate::fields::{
    concentration_u8, optional_u8, pressure_kpa, read_u16_be, AdapterRegister, AgentId,
    DataValidRegister, ErrorRegister, FittedOptions, SensorMode, ServiceStatus,
};
use crate::frame_id;

type Window = [u8; SLOW_DATA_LEN];

/// Five single-byte concentrations (inspiration, expiration or momentary).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GasValues {
    pub co2: Option<f32>,
    pub n2o: Option<f32>,
    pub aa1: Option<f32>,
    pub aa2: Option<f32>,
    pub o2: Option<f32>,
}

impl GasValues {
    fn decode(window: &Window, revision: ProtocolRevision) -> Self {
        let conc = |i: usize| concentration_u8(window[i], revision);
        Self {
            co2: conc(0),
            n2o: conc(1),
            aa1: conc(2),
            aa2: conc(3),
            o2: conc(4),
        }
    }
}

/// Frame ID 3.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeneralValues {
    /// Breaths per minute.
    pub resp_rate: Option<u8>,
    /// Seconds since the last detected breath.
    pub time_since_breath: Option<u8>,
    pub primary_agent: AgentId,
    pub secondary_agent: AgentId,
    /// Atmospheric pressure in kPa.
    pub atm_pressure: Option<f32>,
}

impl Default for GeneralValues {
    /// Breath counters start at zero, pressure at "no data".
    fn default() -> Self {
        Self {
            resp_rate: Some(0),
            time_since_breath: Some(0),
            primary_agent: AgentId::default(),
            secondary_agent: AgentId::default(),
            atm_pressure: None,
        }
    }
}

impl GeneralValues {
    fn decode(window: &Window, revision: ProtocolRevision) -> Self {
        Self {
            resp_rate: optional_u8(window[0]),
            time_since_breath: optional_u8(window[1]),
            primary_agent: AgentId::from_raw(window[2]),
            secondary_agent: AgentId::from_raw(window[3]),
            atm_pressure: pressure_kpa(read_u16_be([window[4], window[5]]), revision),
        }
    }
}

/// Frame ID 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorRegisters {
    pub mode: SensorMode,
    pub error: ErrorRegister,
    pub adapter: AdapterRegister,
    pub data_valid: DataValidRegister,
}

impl SensorRegisters {
    fn decode(window: &Window) -> Self {
        Self {
            mode: SensorMode::from_raw(window[0]),
            error: ErrorRegister::from_byte(window[1]),
            adapter: AdapterRegister::from_byte(window[2]),
            data_valid: DataValidRegister::from_byte(window[3]),
        }
    }
}

/// Frame ID 5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfigData {
    pub fitted: FittedOptions,
    pub hw_revision: u16,
    pub sw_revision: u16,
}

impl ConfigData {
    fn decode(window: &Window) -> Self {
        Self {
            fitted: FittedOptions::from_byte(window[0]),
            hw_revision: read_u16_be([window[2], window[3]]),
            sw_revision: read_u16_be([window[4], window[5]]),
        }
    }
}

/// Frame ID 6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ServiceData {
    pub serial_number: u16,
    pub status: ServiceStatus,
}

impl ServiceData {
    fn decode(window: &Window) -> Self {
        Self {
            serial_number: read_u16_be([window[0], window[1]]),
            status: ServiceStatus::from_byte(window[2]),
        }
    }
}

/// The sub-message carried by one frame, tagged by frame ID.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlowDataVariant {
    Inspiration(GasValues),
    Expiration(GasValues),
    Momentary(GasValues),
    General(GeneralValues),
    SensorRegisters(SensorRegisters),
    Config(ConfigData),
    Service(ServiceData),
    /// IDs 7-9: valid, no payload. Build with
    /// [`SlowDataVariant::reserved`] to keep the ID in range.
    Reserved(u8),
}

impl SlowDataVariant {
    /// Decode the slow-data window for `frame_id`. Returns `None` for IDs
    /// outside the 0-9 cycle.
    pub fn decode(id: u8, window: &Window, revision: ProtocolRevision) -> Option<Self> {
        let variant = match id {
            frame_id::INSPIRATION => Self::Inspiration(GasValues::decode(window, revision)),
            frame_id::EXPIRATION => Self::Expiration(GasValues::decode(window, revision)),
            frame_id::MOMENTARY => Self::Momentary(GasValues::decode(window, revision)),
            frame_id::GENERAL => Self::General(GeneralValues::decode(window, revision)),
            frame_id::SENSOR_REGISTERS => Self::SensorRegisters(SensorRegisters::decode(window)),
            frame_id::CONFIGURATION => Self::Config(ConfigData::decode(window)),
            frame_id::SERVICE => Self::Service(ServiceData::decode(window)),
            reserved if frame_id::is_reserved(reserved) => Self::Reserved(reserved),
            _ => return None,
        };
        Some(variant)
    }

    /// A reserved variant, or `None` when `id` is not one of 7-9.
    pub fn reserved(id: u8) -> Option<Self> {
        frame_id::is_reserved(id).then_some(Self::Reserved(id))
    }

    /// The frame ID this sub-message belongs to.
    pub fn frame_id(&self) -> u8 {
        match self {
            Self::Inspiration(_) => frame_id::INSPIRATION,
            Self::Expiration(_) => frame_id::EXPIRATION,
            Self::Momentary(_) => frame_id::MOMENTARY,
            Self::General(_) => frame_id::GENERAL,
            Self::SensorRegisters(_) => frame_id::SENSOR_REGISTERS,
            Self::Config(_) => frame_id::CONFIGURATION,
            Self::Service(_) => frame_id::SERVICE,
            Self::Reserved(id) => *id,
        }
    }
}

/// Latest value of every slow-data sub-message.
///
/// Starts with every concentration and pressure at "no data", counters and
/// enumerations at their protocol zero, and no frame seen.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlowData {
    /// ID of the last merged frame; `None` until the first merge.
    pub last_frame_id: Option<u8>,
    pub inspiration: GasValues,
    pub expiration: GasValues,
    pub momentary: GasValues,
    pub general: GeneralValues,
    pub sensor_registers: SensorRegisters,
    pub config: ConfigData,
    pub service: ServiceData,
}

impl SlowData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sub-message matching `variant` and record its frame ID.
    /// Every other sub-message keeps its last value.
    pub fn merge(&mut self, variant: &SlowDataVariant) {
        match *variant {
            SlowDataVariant::Inspiration(values) => self.inspiration = values,
            SlowDataVariant::Expiration(values) => self.expiration = values,
            SlowDataVariant::Momentary(values) => self.momentary = values,
            SlowDataVariant::General(values) => self.general = values,
            SlowDataVariant::SensorRegisters(regs) => self.sensor_registers = regs,
            SlowDataVariant::Config(config) => self.config = config,
            SlowDataVariant::Service(service) => self.service = service,
            SlowDataVariant::Reserved(id) if !frame_id::is_reserved(id) => {
                warn!(frame_id = id, "ignoring reserved variant with out-of-range id");
                return;
            }
            SlowDataVariant::Reserved(_) => {}
        }
        self.last_frame_id = Some(variant.frame_id());
    }

    /// Builder-style [`merge`](Self::merge).
    pub fn merged(mut self, variant: &SlowDataVariant) -> Self {
        self.merge(variant);
        self
    }
}
