//! Wii Remote core-button report and its text mapping.
//!
//! Layout (at least 3 bytes):
//! ```text
//! Byte 0: Report ID (echoed in the output)
//! Byte 1: D-pad and Plus
//!         Bit 0 = D-pad Left,  Bit 1 = D-pad Right,
//!         Bit 2 = D-pad Down,  Bit 3 = D-pad Up,
//!         Bit 4 = Plus
//! Byte 2: Action buttons
//!         Bit 0 = 2,     Bit 1 = 1,
//!         Bit 2 = B,     Bit 3 = A,
//!         Bit 4 = Minus, Bit 7 = Home
//! Byte 3..: ignored (accelerometer / extension data)
//! ```
//!
//! Home really is reported in byte 2, bit 7.

use core::fmt::Write;

use crate::config::{MAPPED_EVENT_CAPACITY, MIN_BUTTON_REPORT_LEN};
use crate::hid::token::Token;

/// One line of mapper output.
pub type MappedEvent = Token<MAPPED_EVENT_CAPACITY>;

/// Text emitted when a report has no button bits set.
pub const NO_BUTTONS: &str = "No buttons pressed";

/// A single Wii Remote button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    DpadLeft,
    DpadRight,
    DpadDown,
    DpadUp,
    Plus,
    Minus,
    Home,
    Two,
    One,
    B,
    A,
}

/// Which data byte a button bit lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Byte {
    First,
    Second,
}

/// Bit assignments in output order. Tokens appear in this order.
static BUTTON_MAP: [(Byte, u8, Button); 11] = [
    (Byte::First, 0x01, Button::DpadLeft),
    (Byte::First, 0x02, Button::DpadRight),
    (Byte::First, 0x04, Button::DpadDown),
    (Byte::First, 0x08, Button::DpadUp),
    (Byte::First, 0x10, Button::Plus),
    (Byte::Second, 0x10, Button::Minus),
    (Byte::Second, 0x80, Button::Home),
    (Byte::Second, 0x01, Button::Two),
    (Byte::Second, 0x02, Button::One),
    (Byte::Second, 0x04, Button::B),
    (Byte::Second, 0x08, Button::A),
];

impl Button {
    /// Token written to the stream for this button.
    pub const fn name(self) -> &'static str {
        match self {
            Button::DpadLeft => "Dpad_Left",
            Button::DpadRight => "Dpad_Right",
            Button::DpadDown => "Dpad_Down",
            Button::DpadUp => "Dpad_Up",
            Button::Plus => "Plus",
            Button::Minus => "Minus",
            Button::Home => "Home",
            Button::Two => "2",
            Button::One => "1",
            Button::B => "B",
            Button::A => "A",
        }
    }
}

/// Decoded core-button report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonReport {
    /// Report identifier (byte 0).
    pub report_id: u8,
    /// D-pad / Plus bitfield (byte 1).
    pub first: u8,
    /// Action button bitfield (byte 2).
    pub second: u8,
}

impl ButtonReport {
    /// Parse from raw report bytes. Returns `None` for reports shorter
    /// than three bytes; trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < MIN_BUTTON_REPORT_LEN {
            return None;
        }
        Some(Self {
            report_id: data[0],
            first: data[1],
            second: data[2],
        })
    }

    /// Returns `true` if `button` is held in this report.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed().any(|b| b == button)
    }

    /// Pressed buttons, in output order.
    pub fn pressed(&self) -> impl Iterator<Item = Button> + '_ {
        BUTTON_MAP.iter().filter_map(move |&(byte, mask, button)| {
            let bits = match byte {
                Byte::First => self.first,
                Byte::Second => self.second,
            };
            (bits & mask != 0).then_some(button)
        })
    }

    /// Returns `true` if no mapped button is held.
    pub fn is_idle(&self) -> bool {
        self.pressed().next().is_none()
    }

    /// Render into a token of capacity `N`.
    ///
    /// `Report: ID=<id>, <names...>` or `No buttons pressed`, truncated to
    /// `N` bytes and then newline-terminated if a byte is left.
    pub fn render<const N: usize>(&self) -> Token<N> {
        let mut out = Token::new();
        if self.is_idle() {
            out.push_str(NO_BUTTONS);
        } else {
            let _ = write!(out, "Report: ID={}, ", self.report_id);
            for (i, button) in self.pressed().enumerate() {
                if i > 0 {
                    out.push_str(" ");
                }
                out.push_str(button.name());
            }
        }
        out.terminate();
        out
    }
}

/// Map a raw button report to its text token.
///
/// Pure: the same bytes always give the same token. Returns `None` (and
/// logs) when the report is too short to carry both button bytes.
pub fn map(data: &[u8]) -> Option<MappedEvent> {
    let Some(report) = ButtonReport::from_bytes(data) else {
        warn!("Report too short for mapping ({} bytes)", data.len());
        return None;
    };
    let event: MappedEvent = report.render();
    info!("Mapped Output: {}", event.line());
    Some(event)
}
