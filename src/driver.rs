//! Driver instance: report ingest on one side, a byte-stream device on
//! the other.
//!
//! The transport adapter calls into [`HidEventHandler`] from its own
//! context (probe, remove, raw-event callbacks). Consumers go through
//! [`WiimoteDriver::open`] and the returned [`DeviceFile`]. The only
//! thing shared between the two sides is the circular buffer and the
//! device state, each behind its own lock.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;

use crate::config::{CIRC_BUFFER_SIZE, DRIVER_NAME};
use crate::device::state::{DeviceState, StatusSnapshot};
use crate::device::{Command, DeviceHandle, STATUS_REQUEST};
use crate::error::Error;
use crate::hid::{self, InputReport};
use crate::ring::{CircularBuffer, CopyOut};

/// Callbacks the transport adapter drives.
pub trait HidEventHandler<D> {
    /// A matching remote was bound; `handle` stays valid until `on_disconnect`.
    fn on_connect(&self, handle: D);

    /// The remote went away.
    fn on_disconnect(&self);

    /// A raw input report arrived. `data` is only borrowed for the call.
    fn on_report(&self, data: &[u8]);
}

/// Driver with the default lock and buffer size, suitable for a `static`.
pub type Driver<D> = WiimoteDriver<CriticalSectionRawMutex, D, CIRC_BUFFER_SIZE>;

/// One driver instance: buffer, device state and lifecycle flag.
pub struct WiimoteDriver<M: RawMutex, D, const N: usize = CIRC_BUFFER_SIZE> {
    buffer: CircularBuffer<M, N>,
    state: Mutex<M, RefCell<DeviceState<D>>>,
    shut_down: AtomicBool,
}

impl<M: RawMutex, D: DeviceHandle, const N: usize> WiimoteDriver<M, D, N> {
    pub const fn new() -> Self {
        Self {
            buffer: CircularBuffer::new(),
            state: Mutex::new(RefCell::new(DeviceState::new())),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Open the device for reading. Always succeeds until [`shutdown`](Self::shutdown).
    pub fn open(&self) -> Result<DeviceFile<'_, M, D, N>, Error> {
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        Ok(DeviceFile { driver: self })
    }

    /// Send the status request through the current handle.
    ///
    /// Returns the transport's result code unchanged, negative codes
    /// included. Does not wait for the battery report.
    pub fn request_status(&self) -> Result<i32, Error> {
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        let Some(handle) = self.state.lock(|s| s.borrow().handle.clone()) else {
            error!("{}: device not available for status request", DRIVER_NAME);
            return Err(Error::NoDevice);
        };

        info!("Sending battery status request (output report 0x15)");
        let ret = handle.raw_request(&STATUS_REQUEST);
        info!("Battery status request returned: {}", ret);
        if ret < 0 {
            error!("{}: failed to send status request, error {}", DRIVER_NAME, ret);
        }
        Ok(ret)
    }

    /// Dispatch a numeric command code.
    pub fn ioctl(&self, cmd: u32) -> Result<i32, Error> {
        match Command::try_from(cmd)? {
            Command::RequestStatus => self.request_status(),
        }
    }

    /// Connection flag and last battery level.
    pub fn status(&self) -> StatusSnapshot {
        self.state.lock(|s| s.borrow().snapshot())
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock(|s| s.borrow().connected)
    }

    /// The stream buffer, for adapters that need to inspect fill level.
    pub fn buffer(&self) -> &CircularBuffer<M, N> {
        &self.buffer
    }

    /// Tear the driver down. Call after the transport has stopped
    /// delivering events.
    ///
    /// Drops the handle and refuses new opens, status requests and
    /// events from then on. Bytes already buffered stay readable through
    /// files that are still open.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
        self.state.lock(|s| s.borrow_mut().disconnect());
        info!("{}: driver unloaded", DRIVER_NAME);
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    fn ingest(&self, report: InputReport) {
        if let InputReport::Battery { report: battery, .. } = &report {
            self.state
                .lock(|s| s.borrow_mut().last_battery = Some(battery.level));
        }
        self.buffer.write(report.text());
    }
}

impl<M: RawMutex, D: DeviceHandle, const N: usize> Default for WiimoteDriver<M, D, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, D: DeviceHandle, const N: usize> HidEventHandler<D> for WiimoteDriver<M, D, N> {
    fn on_connect(&self, handle: D) {
        let accepted = self.state.lock(|s| {
            if self.is_shut_down() {
                return false;
            }
            s.borrow_mut().connect(handle);
            true
        });
        if accepted {
            info!("{}: Wii remote connected", DRIVER_NAME);
        } else {
            warn!("{}: connect after shutdown ignored", DRIVER_NAME);
        }
    }

    fn on_disconnect(&self) {
        self.state.lock(|s| s.borrow_mut().disconnect());
        info!("{}: Wii remote disconnected", DRIVER_NAME);
    }

    fn on_report(&self, data: &[u8]) {
        debug!("raw event: received report: {:?}", data);
        if self.is_shut_down() {
            return;
        }
        if !self.is_connected() {
            debug!("{}: report while disconnected, dropping", DRIVER_NAME);
            return;
        }
        if let Some(report) = hid::decode(data) {
            self.ingest(report);
        }
    }
}

/// An open handle on the consumer side of the driver.
///
/// Opening and closing have no side effects; any number of files can be
/// open at once and they all drain the same stream.
pub struct DeviceFile<'a, M: RawMutex, D, const N: usize> {
    driver: &'a WiimoteDriver<M, D, N>,
}

impl<'a, M: RawMutex, D: DeviceHandle, const N: usize> DeviceFile<'a, M, D, N> {
    /// Drain up to `dst.len()` bytes. Zero means nothing buffered yet.
    pub fn read(&self, dst: &mut [u8]) -> usize {
        self.driver.buffer.read(dst)
    }

    /// Drain up to `max` bytes through a fallible destination.
    pub fn read_to<T: CopyOut + ?Sized>(&self, dst: &mut T, max: usize) -> Result<usize, Error> {
        self.driver.buffer.read_to(dst, max)
    }

    /// Wait until there is something to read.
    pub async fn wait_readable(&self) {
        self.driver.buffer.wait_readable().await
    }

    /// See [`WiimoteDriver::request_status`].
    pub fn request_status(&self) -> Result<i32, Error> {
        self.driver.request_status()
    }

    /// See [`WiimoteDriver::ioctl`].
    pub fn ioctl(&self, cmd: u32) -> Result<i32, Error> {
        self.driver.ioctl(cmd)
    }

    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IOCTL_REQUEST_STATUS;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::vec::Vec;

    #[derive(Clone)]
    struct MockHandle {
        sent: Arc<StdMutex<Vec<Vec<u8>>>>,
        ret: i32,
    }

    impl MockHandle {
        fn returning(ret: i32) -> Self {
            Self {
                sent: Arc::new(StdMutex::new(Vec::new())),
                ret,
            }
        }
    }

    impl DeviceHandle for MockHandle {
        fn raw_request(&self, report: &[u8]) -> i32 {
            self.sent.lock().unwrap().push(report.to_vec());
            self.ret
        }
    }

    type TestDriver = WiimoteDriver<NoopRawMutex, MockHandle, 64>;

    fn drain(driver: &TestDriver) -> Vec<u8> {
        let file = driver.open().unwrap();
        let mut out = [0u8; 64];
        let n = file.read(&mut out);
        out[..n].to_vec()
    }

    #[test]
    fn starts_disconnected_with_unknown_battery() {
        let driver = TestDriver::new();
        assert_eq!(
            driver.status(),
            StatusSnapshot {
                connected: false,
                last_battery: None
            }
        );
    }

    #[test]
    fn connect_and_disconnect_toggle_state() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        assert!(driver.is_connected());
        driver.on_disconnect();
        assert!(!driver.is_connected());
        assert_eq!(driver.request_status(), Err(Error::NoDevice));
    }

    #[test]
    fn battery_report_is_buffered_and_cached() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        driver.on_report(&[0x20, 0x5A]);
        assert_eq!(drain(&driver), b"Battery: 90\n");
        assert_eq!(driver.status().last_battery, Some(90));
    }

    #[test]
    fn one_byte_battery_report_is_ignored() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        driver.on_report(&[0x20]);
        assert!(driver.buffer().is_empty());
        assert_eq!(driver.status().last_battery, None);
    }

    #[test]
    fn button_report_is_mapped() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        driver.on_report(&[0x30, 0x00, 0x08]);
        assert_eq!(drain(&driver), b"Report: ID=48, A\n");
    }

    #[test]
    fn short_button_report_writes_nothing() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        driver.on_report(&[0x00, 0x00]);
        driver.on_report(&[]);
        assert!(driver.buffer().is_empty());
    }

    #[test]
    fn reports_while_disconnected_are_dropped() {
        let driver = TestDriver::new();
        driver.on_report(&[0x20, 0x10]);
        driver.on_report(&[0x30, 0x01, 0x00]);
        assert!(driver.buffer().is_empty());
        assert_eq!(driver.status().last_battery, None);
    }

    #[test]
    fn battery_level_survives_disconnect() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        driver.on_report(&[0x20, 0xFF]);
        driver.on_disconnect();
        assert_eq!(
            driver.status(),
            StatusSnapshot {
                connected: false,
                last_battery: Some(255)
            }
        );
    }

    #[test]
    fn status_request_forwards_fixed_payload() {
        let driver = TestDriver::new();
        let handle = MockHandle::returning(2);
        driver.on_connect(handle.clone());
        assert_eq!(driver.request_status(), Ok(2));
        assert_eq!(*handle.sent.lock().unwrap(), vec![vec![0x15, 0x00]]);
    }

    #[test]
    fn status_request_returns_negative_code_verbatim() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(-5));
        assert_eq!(driver.request_status(), Ok(-5));
    }

    #[test]
    fn ioctl_dispatches_known_command_only() {
        let driver = TestDriver::new();
        let file = driver.open().unwrap();
        assert_eq!(file.ioctl(IOCTL_REQUEST_STATUS), Err(Error::NoDevice));
        assert_eq!(file.ioctl(0x5702), Err(Error::InvalidCommand));
        driver.on_connect(MockHandle::returning(0));
        assert_eq!(file.ioctl(IOCTL_REQUEST_STATUS), Ok(0));
    }

    #[test]
    fn command_codes_round_trip() {
        assert_eq!(Command::RequestStatus.code(), IOCTL_REQUEST_STATUS);
        assert_eq!(IOCTL_REQUEST_STATUS, 0x5701);
        assert_eq!(
            Command::try_from(Command::RequestStatus.code()),
            Ok(Command::RequestStatus)
        );
        assert_eq!(Command::try_from(0), Err(Error::InvalidCommand));
    }

    #[test]
    fn files_are_independent_and_share_the_stream() {
        let driver = TestDriver::new();
        driver.on_connect(MockHandle::returning(0));
        let a = driver.open().unwrap();
        let b = driver.open().unwrap();
        driver.on_report(&[0x20, 0x07]);
        let mut out = [0u8; 4];
        assert_eq!(a.read(&mut out), 4);
        assert_eq!(&out, b"Batt");
        a.close();
        let mut rest = [0u8; 16];
        let n = b.read(&mut rest);
        assert_eq!(&rest[..n], b"ery: 7\n");
        assert_eq!(b.read(&mut rest), 0);
    }

    #[test]
    fn shutdown_refuses_new_operations() {
        let driver = TestDriver::new();
        let handle = MockHandle::returning(0);
        driver.on_connect(handle.clone());
        driver.on_report(&[0x20, 0x01]);
        let file = driver.open().unwrap();

        driver.shutdown();
        assert!(driver.open().is_err());
        assert_eq!(driver.request_status(), Err(Error::ShutDown));
        driver.on_connect(handle.clone());
        assert!(!driver.is_connected());
        driver.on_report(&[0x20, 0x02]);
        assert!(handle.sent.lock().unwrap().is_empty());

        // Already-buffered bytes can still be drained.
        let mut out = [0u8; 32];
        let n = file.read(&mut out);
        assert_eq!(&out[..n], b"Battery: 1\n");
    }
}
