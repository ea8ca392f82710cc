//! Field decoders for the fast part of a frame and for the registers,
//! enumerations and scaled values used by slow-data sub-messages.
//!
//! Every decoder here is pure. Byte windows arrive as fixed-size arrays, so
//! widths are checked by the type system before any decoder runs.

use crate::codec::{ProtocolRevision, NO_DATA, NO_DATA_WORD, WAVEFORM_LEN};

/// Read a big-endian 16-bit unsigned value.
pub fn read_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Decode a single-byte concentration. `0xFF` means "no data".
pub fn concentration_u8(raw: u8, revision: ProtocolRevision) -> Option<f32> {
    if raw == NO_DATA {
        return None;
    }
    Some(f32::from(raw) / revision.single_byte_divisor())
}

/// Decode a two-byte concentration (percent × 100). `0xFFFF` means "no data".
pub fn concentration_u16(raw: u16) -> Option<f32> {
    if raw == NO_DATA_WORD {
        return None;
    }
    Some(f32::from(raw) / 100.0)
}

/// Decode an atmospheric pressure word into kPa. `0xFFFF` means "no data".
pub fn pressure_kpa(raw: u16, revision: ProtocolRevision) -> Option<f32> {
    if raw == NO_DATA_WORD {
        return None;
    }
    Some(f32::from(raw) / revision.pressure_divisor())
}

/// A plain byte counter where `0xFF` means "no data".
pub fn optional_u8(raw: u8) -> Option<u8> {
    (raw != NO_DATA).then_some(raw)
}

fn bit(byte: u8, index: u8) -> bool {
    byte & (1 << index) != 0
}

/// Fast gas concentrations in percent, refreshed every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Waveform {
    pub co2: Option<f32>,
    pub n2o: Option<f32>,
    pub aa1: Option<f32>,
    pub aa2: Option<f32>,
    pub o2: Option<f32>,
}

impl Waveform {
    /// Decode the five big-endian waveform words.
    pub fn from_bytes(bytes: &[u8; WAVEFORM_LEN]) -> Self {
        let word = |i: usize| concentration_u16(read_u16_be([bytes[i], bytes[i + 1]]));
        Self {
            co2: word(0),
            n2o: word(2),
            aa1: word(4),
            aa2: word(6),
            o2: word(8),
        }
    }
}

/// Status summary byte, refreshed every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Status {
    pub breath_detected: bool,
    pub apnea: bool,
    pub o2_low: bool,
    pub o2_replace: bool,
    pub check_adapter: bool,
    pub accuracy_out_of_range: bool,
    pub sensor_error: bool,
    pub o2_calibration_required: bool,
}

impl Status {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            breath_detected: bit(byte, 0),
            apnea: bit(byte, 1),
            o2_low: bit(byte, 2),
            o2_replace: bit(byte, 3),
            check_adapter: bit(byte, 4),
            accuracy_out_of_range: bit(byte, 5),
            sensor_error: bit(byte, 6),
            o2_calibration_required: bit(byte, 7),
        }
    }

    /// Labels of every raised flag, in bit order.
    pub fn active_flags(&self) -> Vec<&'static str> {
        [
            (self.breath_detected, "BREATH"),
            (self.apnea, "APNEA"),
            (self.o2_low, "O2_LOW"),
            (self.o2_replace, "REPLACE_O2"),
            (self.check_adapter, "CHECK_ADAPTER"),
            (self.accuracy_out_of_range, "ACCURACY_OUT_OF_RANGE"),
            (self.sensor_error, "SENSOR_ERROR"),
            (self.o2_calibration_required, "O2_CALIB_REQUIRED"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }

    /// True when no flag is raised.
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// Sensor error register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorRegister {
    pub sw_error: bool,
    pub hw_error: bool,
    /// Motor speed out of bounds.
    pub motor_fail: bool,
    /// Factory calibration lost.
    pub uncalibrated: bool,
}

impl ErrorRegister {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            sw_error: bit(byte, 0),
            hw_error: bit(byte, 1),
            motor_fail: bit(byte, 2),
            uncalibrated: bit(byte, 3),
        }
    }
}

/// Adapter status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdapterRegister {
    /// IR signal low.
    pub replace_adapter: bool,
    /// IR signal high.
    pub no_adapter: bool,
    pub o2_clogged: bool,
}

impl AdapterRegister {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            replace_adapter: bit(byte, 0),
            no_adapter: bit(byte, 1),
            o2_clogged: bit(byte, 2),
        }
    }
}

/// Data valid register. A raised flag means the value is outside the
/// analyzer's specified range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataValidRegister {
    pub co2_out_of_range: bool,
    pub n2o_out_of_range: bool,
    pub agent_out_of_range: bool,
    pub o2_out_of_range: bool,
    pub temp_out_of_range: bool,
    pub pressure_out_of_range: bool,
    /// Negative concentrations detected.
    pub zero_calibration_required: bool,
}

impl DataValidRegister {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            co2_out_of_range: bit(byte, 0),
            n2o_out_of_range: bit(byte, 1),
            agent_out_of_range: bit(byte, 2),
            o2_out_of_range: bit(byte, 3),
            temp_out_of_range: bit(byte, 4),
            pressure_out_of_range: bit(byte, 5),
            zero_calibration_required: bit(byte, 6),
        }
    }
}

/// Options fitted to the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FittedOptions {
    pub o2: bool,
    pub co2: bool,
    pub n2o: bool,
    pub halothane: bool,
    pub enflurane: bool,
    pub isoflurane: bool,
    pub sevoflurane: bool,
    pub desflurane: bool,
}

impl FittedOptions {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            o2: bit(byte, 0),
            co2: bit(byte, 1),
            n2o: bit(byte, 2),
            halothane: bit(byte, 3),
            enflurane: bit(byte, 4),
            isoflurane: bit(byte, 5),
            sevoflurane: bit(byte, 6),
            desflurane: bit(byte, 7),
        }
    }
}

/// Service status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ServiceStatus {
    pub zero_disabled: bool,
    pub zero_in_progress: bool,
    pub span_calibration_error: bool,
    pub span_calibration_in_progress: bool,
}

impl ServiceStatus {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            zero_disabled: bit(byte, 0),
            zero_in_progress: bit(byte, 1),
            span_calibration_error: bit(byte, 2),
            span_calibration_in_progress: bit(byte, 3),
        }
    }
}

/// Operating mode reported in the sensor registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorMode {
    #[default]
    SelfTest,
    Sleep,
    Measurement,
    Demo,
    Unknown(u8),
}

impl SensorMode {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => SensorMode::SelfTest,
            1 => SensorMode::Sleep,
            2 => SensorMode::Measurement,
            3 => SensorMode::Demo,
            other => SensorMode::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SensorMode::SelfTest => "self-test",
            SensorMode::Sleep => "sleep",
            SensorMode::Measurement => "measurement",
            SensorMode::Demo => "demo",
            SensorMode::Unknown(_) => "unknown",
        }
    }
}

/// Anesthetic agent identification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentId {
    #[default]
    NoAgent,
    Halothane,
    Enflurane,
    Isoflurane,
    Sevoflurane,
    Desflurane,
    Unknown(u8),
}

impl AgentId {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => AgentId::NoAgent,
            1 => AgentId::Halothane,
            2 => AgentId::Enflurane,
            3 => AgentId::Isoflurane,
            4 => AgentId::Sevoflurane,
            5 => AgentId::Desflurane,
            other => AgentId::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AgentId::NoAgent => "none",
            AgentId::Halothane => "halothane",
            AgentId::Enflurane => "enflurane",
            AgentId::Isoflurane => "isoflurane",
            AgentId::Sevoflurane => "sevoflurane",
            AgentId::Desflurane => "desflurane",
            AgentId::Unknown(_) => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_decode_to_no_data() {
        assert_eq!(concentration_u8(0xFF, ProtocolRevision::Standard), None);
        assert_eq!(concentration_u8(0xFF, ProtocolRevision::Legacy), None);
        assert_eq!(concentration_u16(0xFFFF), None);
        assert_eq!(pressure_kpa(0xFFFF, ProtocolRevision::Standard), None);
        assert_eq!(optional_u8(0xFF), None);
    }

    #[test]
    fn zero_is_a_real_value() {
        assert_eq!(concentration_u8(0, ProtocolRevision::Standard), Some(0.0));
        assert_eq!(concentration_u8(0, ProtocolRevision::Legacy), Some(0.0));
        assert_eq!(concentration_u16(0), Some(0.0));
        assert_eq!(optional_u8(0), Some(0));
    }

    #[test]
    fn single_byte_scale_follows_revision() {
        assert_eq!(concentration_u8(50, ProtocolRevision::Standard), Some(50.0));
        assert_eq!(concentration_u8(50, ProtocolRevision::Legacy), Some(5.0));
        assert_eq!(concentration_u8(0xFE, ProtocolRevision::Standard), Some(254.0));
    }

    #[test]
    fn word_and_pressure_scales() {
        assert_eq!(concentration_u16(500), Some(5.0));
        assert_eq!(concentration_u16(0xFFFE), Some(655.34));
        assert_eq!(pressure_kpa(1013, ProtocolRevision::Legacy), Some(10.13));
        let standard = pressure_kpa(1013, ProtocolRevision::Standard).unwrap();
        assert!((standard - 101.3).abs() < 1e-4);
    }

    #[test]
    fn big_endian_read() {
        assert_eq!(read_u16_be([0x03, 0xF5]), 0x03F5);
        assert_eq!(read_u16_be([0xFF, 0x00]), 0xFF00);
    }

    #[test]
    fn waveform_words_are_big_endian_and_independent() {
        let bytes = [0x01, 0xF4, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x64, 0x06, 0x40];
        let wave = Waveform::from_bytes(&bytes);
        assert_eq!(wave.co2, Some(5.0));
        assert_eq!(wave.n2o, None);
        assert_eq!(wave.aa1, Some(0.0));
        assert_eq!(wave.aa2, Some(1.0));
        assert_eq!(wave.o2, Some(16.0));
    }

    #[test]
    fn status_bits_map_in_order() {
        assert!(Status::from_byte(0x00).is_clear());

        let status = Status::from_byte(0b1000_0011);
        assert!(status.breath_detected);
        assert!(status.apnea);
        assert!(!status.o2_low);
        assert!(status.o2_calibration_required);
        assert_eq!(
            status.active_flags(),
            vec!["BREATH", "APNEA", "O2_CALIB_REQUIRED"]
        );

        let all = Status::from_byte(0xFF);
        assert_eq!(all.active_flags().len(), 8);
    }

    #[test]
    fn registers_ignore_undefined_bits() {
        let error = ErrorRegister::from_byte(0xF4);
        assert_eq!(
            error,
            ErrorRegister {
                motor_fail: true,
                ..ErrorRegister::default()
            }
        );

        let adapter = AdapterRegister::from_byte(0x06);
        assert!(!adapter.replace_adapter);
        assert!(adapter.no_adapter);
        assert!(adapter.o2_clogged);

        let valid = DataValidRegister::from_byte(0x60);
        assert!(valid.pressure_out_of_range);
        assert!(valid.zero_calibration_required);
        assert!(!valid.co2_out_of_range);

        let service = ServiceStatus::from_byte(0x0A);
        assert!(service.zero_in_progress);
        assert!(service.span_calibration_in_progress);
        assert!(!service.zero_disabled);
    }

    #[test]
    fn fitted_options_use_all_bits() {
        let fitted = FittedOptions::from_byte(0x81);
        assert!(fitted.o2);
        assert!(fitted.desflurane);
        assert!(!fitted.co2);
        assert_eq!(FittedOptions::from_byte(0x00), FittedOptions::default());
    }

    #[test]
    fn enumerations_preserve_unknown_values() {
        assert_eq!(SensorMode::from_raw(2), SensorMode::Measurement);
        assert_eq!(SensorMode::from_raw(9), SensorMode::Unknown(9));
        assert_eq!(AgentId::from_raw(4), AgentId::Sevoflurane);
        assert_eq!(AgentId::from_raw(0xFF), AgentId::Unknown(0xFF));
        assert_eq!(AgentId::from_raw(0).name(), "none");
    }
}
