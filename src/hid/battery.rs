//! Battery/status report (ID 0x20).
//!
//! Layout:
//! ```text
//! Byte 0: Report ID (0x20)
//! Byte 1: Battery level, 0-255
//! ```
//!
//! The remote sends this unprompted on some state changes and in reply
//! to a status request (output report 0x15).

use core::fmt::Write;

use crate::config::{BATTERY_LINE_CAPACITY, REPORT_ID_BATTERY};
use crate::hid::token::Token;

/// One `Battery: <n>` line.
pub type BatteryLine = Token<BATTERY_LINE_CAPACITY>;

/// Decoded battery report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReport {
    /// Raw battery level.
    pub level: u8,
}

impl BatteryReport {
    /// Parse from raw report bytes. Needs the 0x20 identifier and a level byte.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match data {
            [REPORT_ID_BATTERY, level, ..] => Some(Self { level: *level }),
            _ => None,
        }
    }

    /// Render as `Battery: <level>\n`.
    pub fn render(&self) -> BatteryLine {
        let mut line = BatteryLine::new();
        let _ = write!(line, "Battery: {}", self.level);
        line.terminate();
        line
    }
}
