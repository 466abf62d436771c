//! The remote as seen from the driver.
//!
//! 1. **Handle** - the opaque capability the transport hands over on
//!    connect; the only thing the driver can send requests through.
//! 2. **Device table** - which bus/vendor/product the driver binds to.
//! 3. **Commands** - side-channel command codes accepted from consumers.
//! 4. **State** - connection flag, cached battery level, live handle.

pub mod state;

use crate::config::{
    IOCTL_REQUEST_STATUS, STATUS_REQUEST_CODE, WIIMOTE_PRODUCT_ID, WIIMOTE_VENDOR_ID,
};
use crate::error::Error;

/// Live connection to a remote, provided by the transport adapter.
///
/// Implementations are cheap to clone (a reference or shared pointer to
/// the underlying device); the driver clones the handle out of its state
/// lock before sending, so a request never holds that lock.
pub trait DeviceHandle: Clone {
    /// Send a raw output report (`SET_REPORT`, output type).
    ///
    /// `report[0]` is the report number. Returns the transport's result
    /// code: non-negative on success, a negative errno on failure.
    fn raw_request(&self, report: &[u8]) -> i32;
}

/// Output report asking the remote for a status (battery) report.
///
/// There is no direct reply; the answer arrives later as an ordinary
/// 0x20 input report.
pub const STATUS_REQUEST: [u8; 2] = [STATUS_REQUEST_CODE, 0x00];

/// Transport a device is attached through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    Usb,
    Bluetooth,
}

/// Bus/vendor/product triple used to match a device to the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId {
    pub bus: Bus,
    pub vendor: u16,
    pub product: u16,
}

impl DeviceId {
    pub const fn new(bus: Bus, vendor: u16, product: u16) -> Self {
        Self {
            bus,
            vendor,
            product,
        }
    }
}

/// Devices this driver binds to.
pub const SUPPORTED_DEVICES: &[DeviceId] = &[DeviceId::new(
    Bus::Bluetooth,
    WIIMOTE_VENDOR_ID,
    WIIMOTE_PRODUCT_ID,
)];

/// Returns `true` if the adapter should hand `id` to the driver.
pub fn supports(id: &DeviceId) -> bool {
    SUPPORTED_DEVICES.contains(id)
}

/// Side-channel commands a consumer can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Ask the remote to report its battery level.
    RequestStatus,
}

impl Command {
    /// Numeric command code.
    pub const fn code(self) -> u32 {
        match self {
            Command::RequestStatus => IOCTL_REQUEST_STATUS,
        }
    }
}

impl TryFrom<u32> for Command {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self, Error> {
        match code {
            IOCTL_REQUEST_STATUS => Ok(Command::RequestStatus),
            _ => Err(Error::InvalidCommand),
        }
    }
}
