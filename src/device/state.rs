//! Connection state and the status snapshot.

use core::fmt;

/// What the driver knows about the remote.
///
/// Mutated only by connect/disconnect and battery reports.
#[derive(Clone, Debug)]
pub struct DeviceState<D> {
    pub connected: bool,
    pub last_battery: Option<u8>,
    pub handle: Option<D>,
}

impl<D> DeviceState<D> {
    /// Disconnected, battery unknown.
    pub const fn new() -> Self {
        Self {
            connected: false,
            last_battery: None,
            handle: None,
        }
    }

    pub fn connect(&mut self, handle: D) {
        self.handle = Some(handle);
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        self.handle = None;
        self.connected = false;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            connected: self.connected,
            last_battery: self.last_battery,
        }
    }
}

impl<D> Default for DeviceState<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the two status scalars.
///
/// `Display` renders the status report:
/// ```text
/// Wii Remote Driver State:
///   Connected: Yes
///   Last Battery: 90
/// ```
/// An unknown battery level is shown as `-1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub connected: bool,
    pub last_battery: Option<u8>,
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wii Remote Driver State:")?;
        writeln!(
            f,
            "  Connected: {}",
            if self.connected { "Yes" } else { "No" }
        )?;
        match self.last_battery {
            Some(level) => writeln!(f, "  Last Battery: {}", level),
            None => writeln!(f, "  Last Battery: -1"),
        }
    }
}
