//! Wii Remote HID bridge core.
//!
//! Turns raw input reports from a Wii Remote into newline-terminated text
//! tokens and exposes them as a polled byte stream, plus one side-channel
//! command that asks the remote for its battery level.
//!
//! ```text
//! transport ──on_report──▶ hid::decode ──▶ CircularBuffer ──read──▶ consumer
//!     │                        │
//!     └─on_connect/─▶ DeviceState ◀── battery level
//!       on_disconnect      │
//!                          └──handle──▶ request_status ◀──ioctl── consumer
//! ```
//!
//! The transport itself (HID stack, Bluetooth) is not part of this crate.
//! An adapter owns it, checks new devices with [`device::supports`], and
//! drives the [`driver::HidEventHandler`] callbacks.
//!
//! Everything is `no_std`, allocation-free and usable from a `static`:
//!
//! ```rust
//! use wiimote_bridge::device::DeviceHandle;
//! use wiimote_bridge::driver::{Driver, HidEventHandler};
//!
//! #[derive(Clone)]
//! struct Loopback;
//!
//! impl DeviceHandle for Loopback {
//!     fn raw_request(&self, _report: &[u8]) -> i32 {
//!         0
//!     }
//! }
//!
//! static DRIVER: Driver<Loopback> = Driver::new();
//!
//! DRIVER.on_connect(Loopback);
//! DRIVER.on_report(&[0x30, 0x00, 0x08]);
//!
//! let file = DRIVER.open().unwrap();
//! let mut buf = [0u8; 64];
//! let n = file.read(&mut buf);
//! assert_eq!(&buf[..n], b"Report: ID=48, A\n");
//! ```
//!
//! Enable the `defmt` or `log` feature to get driver logging.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod hid;
pub mod ring;

pub use device::state::StatusSnapshot;
pub use device::{Command, DeviceHandle, DeviceId};
pub use driver::{DeviceFile, Driver, HidEventHandler, WiimoteDriver};
pub use error::{Error, TransportFault};
pub use hid::buttons::{map, Button, ButtonReport, MappedEvent};
pub use ring::{CircularBuffer, CopyOut};
