//! Receive watchdog
//!
//! One-shot alarm re-armed on every received frame and on every applied
//! channel change. When it fires, the alarm handler raises a single
//! reset request that the poll loop consumes to revert the LoRa channel to
//! its stored defaults.

use core::sync::atomic::{AtomicBool, Ordering};

/// Hardware one-shot alarm
///
/// Methods take `&self` because the alarm is shared between the poll loop
/// and the data-ready interrupt. Implementations must be interrupt safe.
/// Firing must end up calling [`RxLink::on_watchdog_alarm`](super::RxLink::on_watchdog_alarm).
pub trait AlarmTimer {
    /// Program the alarm interval and auto-reload mode (does not enable)
    fn arm(&self, interval_us: u64, repeat: bool);
    /// Restart the countdown from zero
    fn rearm(&self);
    /// Enable alarm firing
    fn enable(&self);
    /// Disable alarm firing
    fn disable(&self);
}

/// Watchdog state shared with interrupt context
pub struct Watchdog<T> {
    timer: T,
    reset_requested: AtomicBool,
    running: AtomicBool,
}

impl<T: AlarmTimer> Watchdog<T> {
    /// Wrap an alarm timer
    #[must_use]
    pub const fn new(timer: T) -> Self {
        Self {
            timer,
            reset_requested: AtomicBool::new(false),
            running: AtomicBool::new(false),
        }
    }

    /// Underlying alarm
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Program the window without starting the countdown
    pub fn configure(&self, interval_us: u64) {
        self.timer.arm(interval_us, false);
    }

    /// Program the window and start the countdown from zero
    pub fn start(&self, interval_us: u64) {
        self.configure(interval_us);
        self.timer.rearm();
        self.timer.enable();
        self.running.store(true, Ordering::Release);
    }

    /// Restart the countdown (interrupt safe)
    pub fn kick(&self) {
        if self.running.load(Ordering::Acquire) {
            self.timer.rearm();
        }
    }

    /// Stop the countdown and drop any pending request
    pub fn stop(&self) {
        self.timer.disable();
        self.running.store(false, Ordering::Release);
        self.reset_requested.store(false, Ordering::Release);
    }

    /// Alarm handler (interrupt context)
    ///
    /// The alarm is one-shot, so it stops running until restarted.
    pub fn on_alarm(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            self.timer.disable();
            self.reset_requested.store(true, Ordering::Release);
        }
    }

    /// Consume the pending reset request
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    /// Check if a reset request is pending
    #[must_use]
    pub fn reset_requested(&self) -> bool {
        self.reset_requested.load(Ordering::Acquire)
    }

    /// Check if the countdown is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
