//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --test config_tests

use sat_link::config::*;
use sat_link::ssdo::packet::{BODY_SIZE, HEADER_SIZE, PACKET_SIZE};
use sat_link::ssdo::ChangeDescriptor;

// =============================================================================
// Receive Pipeline
// =============================================================================

#[test]
fn ring_holds_ten_frames() {
    assert_eq!(RECV_BUFF_SIZE, 10);
}

#[test]
fn packet_size_matches_frame() {
    assert_eq!(SSDO_PACKET_SIZE, PACKET_SIZE);
    assert_eq!(PACKET_SIZE, 64);
}

#[test]
fn header_leaves_room_for_change_descriptor() {
    assert_eq!(HEADER_SIZE, 16);
    assert!(BODY_SIZE >= ChangeDescriptor::ENCODED_LEN);
}

#[test]
fn fragment_bitmap_covers_whole_words() {
    assert_eq!(MAX_TRACKED_FRAGMENTS % 32, 0);
}

// =============================================================================
// Timing
// =============================================================================

#[test]
fn watchdog_window_is_thirty_seconds() {
    assert_eq!(WATCHDOG_TIMEOUT_US, 30_000_000);
    assert_eq!(RECONFIG_GRACE_US, WATCHDOG_TIMEOUT_US);
}

#[test]
fn transmit_delays() {
    assert_eq!(SETTLE_DELAY_MS, 1_000);
    assert_eq!(RTTY_IDLE_TIME_MS, 10);
    assert_eq!(SSTV_SYNC_TONE_MS, 10_000);
}

#[test]
fn default_timing_uses_constants() {
    let timing = LinkTiming::default();
    assert_eq!(timing, LinkTiming::new());
    assert_eq!(timing.watchdog_timeout_us, WATCHDOG_TIMEOUT_US);
    assert_eq!(timing.reconfig_grace_us, RECONFIG_GRACE_US);
    assert_eq!(timing.settle_delay_ms, SETTLE_DELAY_MS);
    assert_eq!(timing.rtty_idle_ms, RTTY_IDLE_TIME_MS);
    assert_eq!(timing.sstv_sync_tone_ms, SSTV_SYNC_TONE_MS);
}

#[test]
fn timing_builders_override_one_field() {
    let timing = LinkTiming::new()
        .with_watchdog_timeout_us(1_000)
        .with_reconfig_grace_us(2_000)
        .with_settle_delay_ms(3);
    assert_eq!(timing.watchdog_timeout_us, 1_000);
    assert_eq!(timing.reconfig_grace_us, 2_000);
    assert_eq!(timing.settle_delay_ms, 3);
    assert_eq!(timing.rtty_idle_ms, RTTY_IDLE_TIME_MS);
}

// =============================================================================
// SSTV
// =============================================================================

#[test]
fn sstv_frame_is_qvga() {
    assert_eq!(SSTV_WIDTH, 320);
    assert_eq!(SSTV_HEIGHT, 240);
}

#[test]
fn change_announced_at_least_once() {
    assert!(DEFAULT_CHANGE_RESEND >= 1);
}
