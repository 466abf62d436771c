//! Fixed-capacity text token.
//!
//! A [`Token`] is one line of decoder output. It is backed by a
//! `heapless::String<N>` and implements [`core::fmt::Write`] by truncating
//! at the capacity instead of failing, so `write!` into it can never run
//! past the bound and never aborts half-way through a format string.

use core::fmt;
use heapless::String;

/// Bounded, newline-terminated ASCII line.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token<const N: usize> {
    text: String<N>,
    truncated: bool,
}

impl<const N: usize> Token<N> {
    /// Empty token.
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            truncated: false,
        }
    }

    /// Append as much of `s` as fits. Characters are never split.
    pub fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.text.push(c).is_err() {
                self.truncated = true;
                return;
            }
        }
    }

    /// Terminate the line with `\n` if there is room left for it.
    ///
    /// Returns `false` when the token was already full.
    pub fn terminate(&mut self) -> bool {
        if self.text.ends_with('\n') {
            return true;
        }
        self.text.push('\n').is_ok()
    }

    /// Full contents, including the trailing newline when present.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Raw bytes, ready for the circular buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Contents without the line terminator.
    pub fn line(&self) -> &str {
        self.text.strip_suffix('\n').unwrap_or(self.text.as_str())
    }

    /// Length in bytes, including the terminator.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `true` if some input was dropped because the token was full.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Fixed capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> fmt::Write for Token<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Token<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for Token<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Token<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
