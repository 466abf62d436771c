//! Driver-wide constants and compile-time configuration.
//!
//! Buffer sizes, wire-protocol codes and the supported device table
//! live here so they can be tuned in one place.

// Naming

/// Name used as the prefix of driver log lines.
pub const DRIVER_NAME: &str = "wii_remote_driver";

/// Name of the consumer-facing device node (and status entry).
pub const DEVICE_NAME: &str = "wii_remote";

// Buffering

/// Circular buffer storage in bytes. One byte is always kept free, so
/// at most `CIRC_BUFFER_SIZE - 1` bytes are buffered at once.
///
/// Roughly 20 worst-case button lines or 50 single-button lines.
pub const CIRC_BUFFER_SIZE: usize = 1024;

/// Readers that can wait for data at the same time without being
/// re-woken when another one starts waiting.
pub const READ_WAITER_SLOTS: usize = 8;

/// Capacity of one mapped button token. Large enough for every real
/// report (all eleven buttons plus the prefix is under 100 bytes).
pub const MAPPED_EVENT_CAPACITY: usize = 256;

/// Capacity of one `Battery: <n>` line.
pub const BATTERY_LINE_CAPACITY: usize = 64;

// Wire protocol

/// Button reports shorter than this are dropped.
pub const MIN_BUTTON_REPORT_LEN: usize = 3;

/// Report identifier of a battery/status report.
pub const REPORT_ID_BATTERY: u8 = 0x20;

/// Output report code that asks the remote for a status report.
pub const STATUS_REQUEST_CODE: u8 = 0x15;

// Device matching

/// Nintendo vendor ID.
pub const WIIMOTE_VENDOR_ID: u16 = 0x057e;

/// Wii Remote (RVL-CNT-01) product ID.
pub const WIIMOTE_PRODUCT_ID: u16 = 0x0306;

// Command codes

/// `_IO('W', 1)`: no direction, no size, type `'W'`, number 1.
pub const IOCTL_REQUEST_STATUS: u32 = ((b'W' as u32) << 8) | 1;
