//! Serial line settings expected by the analyzer.
//!
//! Nothing here opens a port. Callers that own the port use these values to
//! configure it before wrapping the handle in a [`crate::ReadSource`].

use std::time::Duration;

/// Parity setting of the serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Line settings for a Phasein-compatible analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    /// Interval between two frames emitted by the analyzer.
    pub frame_interval: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            frame_interval: Duration::from_millis(50),
        }
    }
}

impl SerialSettings {
    /// Bits on the wire per transmitted byte (start + data + parity + stop).
    pub fn bits_per_byte(&self) -> u32 {
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Odd | Parity::Even => 1,
        };
        1 + u32::from(self.data_bits) + parity + u32::from(self.stop_bits)
    }

    /// Time needed to transmit `len` bytes at the configured baud rate.
    pub fn transfer_time(&self, len: usize) -> Duration {
        if self.baud_rate == 0 {
            return Duration::ZERO;
        }
        let bits = len as u64 * u64::from(self.bits_per_byte());
        Duration::from_micros(bits * 1_000_000 / u64::from(self.baud_rate))
    }

    /// Short human-readable form, e.g. `9600 8N1`.
    pub fn describe(&self) -> String {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        format!(
            "{} {}{}{}",
            self.baud_rate, self.data_bits, parity, self.stop_bits
        )
    }
}
