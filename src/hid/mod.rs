//! Wii Remote input reports and their text translation.

pub mod battery;
pub mod buttons;
pub mod token;


use crate::config::REPORT_ID_BATTERY;
use battery::{BatteryLine, BatteryReport};
use buttons::MappedEvent;

/// A decoded input report, ready to be buffered.
#[derive(Clone, Debug, PartialEq)]
pub enum InputReport {
    /// Battery/status report; the level is cached by the driver.
    Battery {
        report: BatteryReport,
        line: BatteryLine,
    },
    /// Any other report, already mapped to its button token.
    Buttons(MappedEvent),
}

impl InputReport {
    /// Bytes to append to the consumer stream.
    pub fn text(&self) -> &[u8] {
        match self {
            InputReport::Battery { line, .. } => line.as_bytes(),
            InputReport::Buttons(e) => e.as_bytes(),
        }
    }
}

/// Returns `true` if `data` carries the battery report identifier.
pub fn is_battery_report(data: &[u8]) -> bool {
    data.first() == Some(&REPORT_ID_BATTERY)
}

/// Classify and decode a raw report.
///
/// Identifier 0x20 is a battery report; anything else goes through the
/// button mapper. Returns `None` for reports that produce no output (too
/// short, or a battery report without its level byte).
pub fn decode(data: &[u8]) -> Option<InputReport> {
    if is_battery_report(data) {
        info!("Battery status report detected");
        let Some(report) = BatteryReport::from_bytes(data) else {
            debug!("Battery report without level byte, ignoring");
            return None;
        };
        return Some(InputReport::Battery {
            report,
            line: report.render(),
        });
    }
    buttons::map(data).map(InputReport::Buttons)
}
