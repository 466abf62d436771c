//! Unified error type for the bridge.
//!
//! We avoid `alloc` - all error variants carry no data.
//! Derives `defmt::Format` when the `defmt` feature is on.

use core::fmt;

/// Top-level error type returned by the consumer-facing operations.
///
/// Everything else (short reports, buffer overflow) is logged and
/// absorbed inside the driver rather than surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Copying into the consumer's destination failed part-way.
    Fault,

    /// No remote is connected, so there is nothing to send a request to.
    NoDevice,

    /// The command code is not one the driver understands.
    InvalidCommand,

    /// The driver has been torn down and refuses new operations.
    ShutDown,
}

impl Error {
    /// Negative errno equivalent, for adapters that speak that convention.
    pub const fn errno(self) -> i32 {
        match self {
            Error::Fault => -14,          // EFAULT
            Error::NoDevice => -19,       // ENODEV
            Error::InvalidCommand => -25, // ENOTTY
            Error::ShutDown => -108,      // ESHUTDOWN
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Fault => "bad address",
            Error::NoDevice => "no such device",
            Error::InvalidCommand => "invalid command",
            Error::ShutDown => "driver shut down",
        };
        f.write_str(msg)
    }
}

/// A destination refused a copy.
///
/// Returned by [`CopyOut`](crate::ring::CopyOut) implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportFault;

// Convenience conversions

impl From<TransportFault> for Error {
    fn from(_: TransportFault) -> Self {
        Error::Fault
    }
}
