//! Software Watchdog Alarm
//!
//! [`SoftAlarm`] implements the one-shot alarm contract on the
//! `embassy-time` timebase. The countdown state lives behind a
//! critical-section mutex so the data-ready interrupt can re-arm it while
//! [`watchdog_task`] sleeps towards the deadline.

use core::cell::Cell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant, Timer};

use crate::link::{AlarmTimer, RxLink};

/// Longest the watchdog task sleeps before re-reading the deadline
const IDLE_POLL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug)]
struct AlarmState {
    interval_us: u64,
    repeat: bool,
    enabled: bool,
    deadline: Option<Instant>,
}

impl AlarmState {
    const IDLE: Self = Self {
        interval_us: 0,
        repeat: false,
        enabled: false,
        deadline: None,
    };
}

/// Alarm driven by the embassy timebase
pub struct SoftAlarm {
    state: Mutex<Cell<AlarmState>>,
}

impl SoftAlarm {
    /// Create a disabled alarm
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(AlarmState::IDLE)),
        }
    }

    fn update<F: FnOnce(&mut AlarmState)>(&self, f: F) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            f(&mut state);
            cell.set(state);
        });
    }

    /// Deadline of the enabled countdown
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        critical_section::with(|cs| {
            let state = self.state.borrow(cs).get();
            if state.enabled {
                state.deadline
            } else {
                None
            }
        })
    }

    /// Consume an expired deadline, returning true if the alarm fired
    pub fn fire(&self) -> bool {
        let now = Instant::now();
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let expired = state.enabled && state.deadline.is_some_and(|d| d <= now);
            if expired {
                if state.repeat {
                    state.deadline = Some(now + Duration::from_micros(state.interval_us));
                } else {
                    state.enabled = false;
                    state.deadline = None;
                }
                cell.set(state);
            }
            expired
        })
    }
}

impl Default for SoftAlarm {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmTimer for SoftAlarm {
    fn arm(&self, interval_us: u64, repeat: bool) {
        self.update(|s| {
            s.interval_us = interval_us;
            s.repeat = repeat;
        });
    }

    fn rearm(&self) {
        let now = Instant::now();
        self.update(|s| s.deadline = Some(now + Duration::from_micros(s.interval_us)));
    }

    fn enable(&self) {
        let now = Instant::now();
        self.update(|s| {
            s.enabled = true;
            if s.deadline.is_none() {
                s.deadline = Some(now + Duration::from_micros(s.interval_us));
            }
        });
    }

    fn disable(&self) {
        self.update(|s| s.enabled = false);
    }
}

/// Drive the receive watchdog of `link`
///
/// Spawn once; plays the role of the alarm interrupt.
pub async fn watchdog_task<const N: usize>(link: &'static RxLink<SoftAlarm, N>) -> ! {
    let alarm = link.watchdog().timer();
    loop {
        let wake = Instant::now() + IDLE_POLL;
        match alarm.deadline() {
            Some(deadline) => Timer::at(deadline.min(wake)).await,
            None => Timer::at(wake).await,
        }

        if alarm.fire() {
            warn!("receive watchdog fired");
            link.on_watchdog_alarm();
        }
    }
}
