//! System configuration and link constants
//!
//! This module defines compile-time constants for the radio link core.
//! Buffer geometry, protocol sizes and the hand-tuned timing windows are
//! centralized here. The timing windows are also grouped into
//! [`LinkTiming`] so a deployment can override them at runtime.

/// Number of frame slots in the receive ring buffer
pub const RECV_BUFF_SIZE: usize = 10;

/// Size of one SSDO radio frame in bytes (header + body)
pub const SSDO_PACKET_SIZE: usize = 64;

/// Watchdog window without an accepted frame before the channel is reset
pub const WATCHDOG_TIMEOUT_US: u64 = 30 * 1_000_000;

/// Grace window after a channel change request before reverting to defaults
pub const RECONFIG_GRACE_US: u64 = 30 * 1_000_000;

/// Delay between announcing a channel change and sending under it
pub const SETTLE_DELAY_MS: u32 = 1_000;

/// Idle carrier time before an RTTY line
pub const RTTY_IDLE_TIME_MS: u32 = 10;

/// Sync tone time before an SSTV image header
pub const SSTV_SYNC_TONE_MS: u32 = 10_000;

/// SSTV image width in pixels
pub const SSTV_WIDTH: usize = 320;

/// SSTV image height in lines
pub const SSTV_HEIGHT: usize = 240;

/// Highest fragment count an object assembler will track
pub const MAX_TRACKED_FRAGMENTS: usize = 1024;

/// Number of times a channel change is announced when not specified
pub const DEFAULT_CHANGE_RESEND: u32 = 1;

/// Runtime timing parameters for the link
///
/// Defaults mirror the constants above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkTiming {
    /// Watchdog window while receiving on the default channel (µs)
    pub watchdog_timeout_us: u64,
    /// Watchdog window after applying a received channel change (µs)
    pub reconfig_grace_us: u64,
    /// Settle delay after announcing a channel change (ms)
    pub settle_delay_ms: u32,
    /// RTTY idle carrier before each line (ms)
    pub rtty_idle_ms: u32,
    /// SSTV sync tone before each image (ms)
    pub sstv_sync_tone_ms: u32,
}

impl LinkTiming {
    /// Timing with the reference constants
    #[must_use]
    pub const fn new() -> Self {
        Self {
            watchdog_timeout_us: WATCHDOG_TIMEOUT_US,
            reconfig_grace_us: RECONFIG_GRACE_US,
            settle_delay_ms: SETTLE_DELAY_MS,
            rtty_idle_ms: RTTY_IDLE_TIME_MS,
            sstv_sync_tone_ms: SSTV_SYNC_TONE_MS,
        }
    }

    /// Override the watchdog window (returns new timing)
    #[must_use]
    pub const fn with_watchdog_timeout_us(self, watchdog_timeout_us: u64) -> Self {
        Self {
            watchdog_timeout_us,
            ..self
        }
    }

    /// Override the reconfiguration grace window (returns new timing)
    #[must_use]
    pub const fn with_reconfig_grace_us(self, reconfig_grace_us: u64) -> Self {
        Self {
            reconfig_grace_us,
            ..self
        }
    }

    /// Override the settle delay (returns new timing)
    #[must_use]
    pub const fn with_settle_delay_ms(self, settle_delay_ms: u32) -> Self {
        Self {
            settle_delay_ms,
            ..self
        }
    }
}

impl Default for LinkTiming {
    fn default() -> Self {
        Self::new()
    }
}
