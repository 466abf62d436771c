//! Bounded circular byte buffer between the report callback and readers.
//!
//! Storage and both cursors sit behind a single blocking mutex; every
//! operation takes the lock once and holds it for its whole (short,
//! bounded) duration. Nothing here ever waits for space or data:
//!
//! - `write` drops the *newest* bytes once the buffer is full and reports
//!   how many it accepted.
//! - `read` returns zero when empty; callers re-poll, or await
//!   [`CircularBuffer::wait_readable`].
//!
//! Waiting readers park their wakers in the same locked state, so a
//! write wakes every waiter exactly once and idle waiters never wake
//! each other.
//!
//! One slot is always left free so `head == tail` means empty and
//! `head + 1 == tail` (mod `N`) means full. Usable capacity is `N - 1`.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::MultiWakerRegistration;

use crate::config::READ_WAITER_SLOTS;
use crate::error::{Error, TransportFault};

/// Destination for bytes drained from the buffer.
///
/// Models a copy into memory the driver does not own (a consumer's read
/// buffer on the other side of an address-space boundary). Each call is
/// all-or-nothing.
pub trait CopyOut {
    /// Copy `src` to `offset` in the destination.
    fn copy_out(&mut self, offset: usize, src: &[u8]) -> Result<(), TransportFault>;
}

impl CopyOut for [u8] {
    fn copy_out(&mut self, offset: usize, src: &[u8]) -> Result<(), TransportFault> {
        let end = offset.checked_add(src.len()).ok_or(TransportFault)?;
        self.get_mut(offset..end)
            .ok_or(TransportFault)?
            .copy_from_slice(src);
        Ok(())
    }
}

struct RingState<const N: usize> {
    storage: [u8; N],
    /// Next slot to write.
    head: usize,
    /// Next slot to read.
    tail: usize,
    /// Readers parked in `wait_readable`.
    waiters: MultiWakerRegistration<READ_WAITER_SLOTS>,
}

impl<const N: usize> RingState<N> {
    const fn new() -> Self {
        Self {
            storage: [0; N],
            head: 0,
            tail: 0,
            waiters: MultiWakerRegistration::new(),
        }
    }

    fn len(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    fn push(&mut self, data: &[u8]) -> usize {
        let mut written = 0;
        for &byte in data {
            let next = (self.head + 1) % N;
            if next == self.tail {
                break;
            }
            self.storage[self.head] = byte;
            self.head = next;
            written += 1;
        }
        written
    }

    /// The longest run of buffered bytes starting at `tail` that does not wrap.
    fn readable_run(&self) -> &[u8] {
        let end = if self.head >= self.tail { self.head } else { N };
        &self.storage[self.tail..end]
    }

    fn pop_into<D: CopyOut + ?Sized>(&mut self, dst: &mut D, max: usize) -> Result<usize, Error> {
        let mut copied = 0;
        while copied < max && self.head != self.tail {
            let run = self.readable_run();
            let take = run.len().min(max - copied);
            dst.copy_out(copied, &run[..take])?;
            self.tail = (self.tail + take) % N;
            copied += take;
        }
        Ok(copied)
    }
}

/// Fixed-capacity byte FIFO, safe to share between one producer and any
/// number of consumers.
///
/// `M` selects the lock flavour (`CriticalSectionRawMutex` when the
/// producer runs in interrupt context or on another thread).
pub struct CircularBuffer<M: RawMutex, const N: usize> {
    state: Mutex<M, RefCell<RingState<N>>>,
}

impl<M: RawMutex, const N: usize> CircularBuffer<M, N> {
    /// Create an empty buffer. `N` must be at least 2; smaller sizes are
    /// rejected at compile time:
    ///
    /// ```compile_fail
    /// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    /// use wiimote_bridge::CircularBuffer;
    ///
    /// let ring = CircularBuffer::<NoopRawMutex, 1>::new();
    /// ```
    pub const fn new() -> Self {
        const { assert!(N >= 2, "circular buffer needs at least two slots") };
        Self {
            state: Mutex::new(RefCell::new(RingState::new())),
        }
    }

    /// Append as much of `data` as fits and return the number of bytes
    /// written. The remainder is dropped and cannot be recovered.
    pub fn write(&self, data: &[u8]) -> usize {
        let written = self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let written = s.push(data);
            if written > 0 {
                s.waiters.wake();
            }
            written
        });
        if written < data.len() {
            warn!(
                "circular buffer full, dropping data ({} of {} bytes written)",
                written,
                data.len()
            );
        }
        written
    }

    /// Copy up to `dst.len()` buffered bytes into `dst`.
    ///
    /// Returns the number of bytes copied, zero when the buffer is empty.
    pub fn read(&self, dst: &mut [u8]) -> usize {
        let max = dst.len();
        // A slice destination sized to `max` never faults.
        self.read_to(dst, max).unwrap_or(0)
    }

    /// Copy up to `max` buffered bytes through `dst`.
    ///
    /// If the destination faults the read stops with [`Error::Fault`].
    /// Bytes copied before the fault stay consumed; the read cursor never
    /// moves past a byte that was not copied.
    pub fn read_to<D: CopyOut + ?Sized>(&self, dst: &mut D, max: usize) -> Result<usize, Error> {
        self.state.lock(|s| s.borrow_mut().pop_into(dst, max))
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.state.lock(|s| s.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of bytes the buffer can hold (`N - 1`).
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Discard everything buffered.
    pub fn clear(&self) {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.tail = s.head;
        });
    }

    /// Wait until at least one byte is buffered.
    ///
    /// Returns immediately if data is already there. Another reader may
    /// still drain the bytes first, so a following `read` can return zero.
    ///
    /// Any number of readers may wait at once. Past
    /// [`READ_WAITER_SLOTS`] concurrent waiters, registering one more wakes
    /// the parked ones so they re-register.
    pub async fn wait_readable(&self) {
        poll_fn(|cx| {
            self.state.lock(|s| {
                let mut s = s.borrow_mut();
                if s.head != s.tail {
                    return Poll::Ready(());
                }
                s.waiters.register(cx.waker());
                Poll::Pending
            })
        })
        .await
    }
}

impl<M: RawMutex, const N: usize> Default for CircularBuffer<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
