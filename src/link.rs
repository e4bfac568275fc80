//! Interrupt-driven Receive Pipeline
//!
//! [`RxLink`] is the state shared between the two execution contexts:
//! the data-ready and alarm interrupts on one side, the cooperative poll
//! loop on the other. It owns the receive ring and the watchdog.
//!
//! There is one radio per process, so exactly one `RxLink` is expected to
//! exist. It is built with a `const fn` so it can live in a `static` that
//! the interrupt trampolines reference directly:
//!
//! ```ignore
//! static LINK: RxLink<SoftAlarm> = RxLink::new(SoftAlarm::new());
//!
//! #[interrupt]
//! fn EXTI0() {
//!     LINK.on_data_ready(&mut RadioFifo);
//! }
//! ```
//!
//! The facade receives `&LINK` as an explicit handle.

pub mod ring;
pub mod watchdog;

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::RECV_BUFF_SIZE;
use crate::ssdo::packet::Frame;
pub use ring::RecvRing;
pub use watchdog::{AlarmTimer, Watchdog};

/// Chip-side frame source used from the data-ready interrupt
pub trait FrameReader {
    /// Read one received frame into `buf`, returning the bytes written
    fn read_frame(&mut self, buf: &mut [u8]) -> usize;
}

impl FrameReader for &[u8] {
    fn read_frame(&mut self, buf: &mut [u8]) -> usize {
        let len = self.len().min(buf.len());
        buf[..len].copy_from_slice(&self[..len]);
        len
    }
}

/// Receive state shared with interrupt context
pub struct RxLink<T, const N: usize = RECV_BUFF_SIZE> {
    ring: Mutex<RefCell<RecvRing<N>>>,
    watchdog: Watchdog<T>,
}

impl<T: AlarmTimer, const N: usize> RxLink<T, N> {
    /// Create the link around the watchdog alarm
    #[must_use]
    pub const fn new(timer: T) -> Self {
        Self {
            ring: Mutex::new(RefCell::new(RecvRing::new())),
            watchdog: Watchdog::new(timer),
        }
    }

    /// Data-ready interrupt handler
    ///
    /// Copies one frame from the chip into the ring and re-arms the
    /// watchdog. Never blocks and never allocates.
    pub fn on_data_ready<R: FrameReader>(&self, reader: &mut R) {
        critical_section::with(|cs| {
            self.ring.borrow_ref_mut(cs).produce_with(|slot| {
                reader.read_frame(slot);
            });
        });
        self.watchdog.kick();
    }

    /// Watchdog alarm interrupt handler
    pub fn on_watchdog_alarm(&self) {
        self.watchdog.on_alarm();
    }

    /// Take the oldest unread frame (poll context)
    pub fn pop_frame(&self) -> Option<Frame> {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).consume())
    }

    /// Unread frames held by the ring
    #[must_use]
    pub fn pending(&self) -> usize {
        critical_section::with(|cs| self.ring.borrow_ref(cs).pending())
    }

    /// Frames lost to ring overwrite
    #[must_use]
    pub fn overwritten(&self) -> u32 {
        critical_section::with(|cs| self.ring.borrow_ref(cs).overwritten())
    }

    /// Discard all unread frames
    pub fn flush(&self) {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).clear());
    }

    /// The receive watchdog
    pub fn watchdog(&self) -> &Watchdog<T> {
        &self.watchdog
    }
}
