//! Receive Pipeline Tests
//!
//! Frame ring ordering and overrun, the receive watchdog, and the
//! interrupt-facing `RxLink` entry points.

mod common;

use common::MockAlarm;
use sat_link::link::{AlarmTimer, RecvRing, RxLink, Watchdog};

fn tagged(tag: u8) -> [u8; 64] {
    let mut frame = [0u8; 64];
    frame[0] = tag;
    frame
}

// =============================================================================
// Ring Buffer
// =============================================================================

#[test]
fn ring_starts_empty() {
    let mut ring: RecvRing<4> = RecvRing::new();
    assert!(ring.is_empty());
    assert_eq!(ring.pending(), 0);
    assert_eq!(ring.consume(), None);
}

#[test]
fn ring_preserves_order() {
    let mut ring: RecvRing<4> = RecvRing::new();
    for tag in 1..=3 {
        ring.produce(&tagged(tag));
    }
    assert_eq!(ring.pending(), 3);
    assert_eq!(ring.consume().map(|f| f[0]), Some(1));
    assert_eq!(ring.consume().map(|f| f[0]), Some(2));
    assert_eq!(ring.consume().map(|f| f[0]), Some(3));
    assert_eq!(ring.consume(), None);
}

#[test]
fn ring_full_without_loss() {
    let mut ring: RecvRing<4> = RecvRing::new();
    for tag in 1..=4 {
        ring.produce(&tagged(tag));
    }
    let tags: Vec<u8> = std::iter::from_fn(|| ring.consume()).map(|f| f[0]).collect();
    assert_eq!(tags, vec![1, 2, 3, 4]);
    assert_eq!(ring.overwritten(), 0);
}

#[test]
fn ring_overrun_keeps_newest_frames() {
    let mut ring: RecvRing<4> = RecvRing::new();
    for tag in 1..=7 {
        ring.produce(&tagged(tag));
    }
    assert_eq!(ring.pending(), 4);
    let tags: Vec<u8> = std::iter::from_fn(|| ring.consume()).map(|f| f[0]).collect();
    assert_eq!(tags, vec![4, 5, 6, 7]);
    assert_eq!(ring.overwritten(), 3);
}

#[test]
fn ring_overrun_after_partial_drain() {
    let mut ring: RecvRing<3> = RecvRing::new();
    ring.produce(&tagged(1));
    ring.produce(&tagged(2));
    assert_eq!(ring.consume().map(|f| f[0]), Some(1));
    for tag in 3..=6 {
        ring.produce(&tagged(tag));
    }
    let tags: Vec<u8> = std::iter::from_fn(|| ring.consume()).map(|f| f[0]).collect();
    assert_eq!(tags, vec![4, 5, 6]);
    assert_eq!(ring.overwritten(), 2);
}

#[test]
fn ring_pads_short_frames() {
    let mut ring: RecvRing<2> = RecvRing::new();
    ring.produce(&[0xFF; 64]);
    ring.consume();
    ring.produce(&[0xFF; 64]);
    ring.consume();
    ring.produce(&[7, 8]);
    let frame = ring.consume().unwrap();
    assert_eq!(&frame[..2], &[7, 8]);
    assert!(frame[2..].iter().all(|&b| b == 0));
}

#[test]
fn ring_clear_discards_unread() {
    let mut ring: RecvRing<4> = RecvRing::new();
    ring.produce(&tagged(1));
    ring.produce(&tagged(2));
    ring.clear();
    assert!(ring.is_empty());
    ring.produce(&tagged(3));
    assert_eq!(ring.consume().map(|f| f[0]), Some(3));
}

// =============================================================================
// Watchdog
// =============================================================================

#[test]
fn watchdog_configure_does_not_start() {
    let wd = Watchdog::new(MockAlarm::default());
    wd.configure(5_000);
    assert_eq!(wd.timer().interval_us.get(), 5_000);
    assert!(!wd.timer().repeat.get());
    assert!(!wd.timer().enabled.get());
    assert!(!wd.is_running());
}

#[test]
fn watchdog_kick_ignored_while_stopped() {
    let wd = Watchdog::new(MockAlarm::default());
    wd.kick();
    assert_eq!(wd.timer().rearms.get(), 0);
}

#[test]
fn watchdog_start_then_kick_rearms() {
    let wd = Watchdog::new(MockAlarm::default());
    wd.start(1_000);
    assert!(wd.timer().enabled.get());
    let before = wd.timer().rearms.get();
    wd.kick();
    assert_eq!(wd.timer().rearms.get(), before + 1);
}

#[test]
fn watchdog_alarm_raises_single_request() {
    let wd = Watchdog::new(MockAlarm::default());
    wd.start(1_000);
    wd.on_alarm();
    assert!(wd.reset_requested());
    assert!(!wd.is_running());
    assert!(!wd.timer().enabled.get());

    // one-shot: a second alarm before restart is ignored
    wd.on_alarm();
    assert!(wd.take_reset_request());
    assert!(!wd.take_reset_request());
}

#[test]
fn watchdog_alarm_ignored_when_stopped() {
    let wd = Watchdog::new(MockAlarm::default());
    wd.start(1_000);
    wd.stop();
    wd.on_alarm();
    assert!(!wd.reset_requested());
}

#[test]
fn watchdog_stop_clears_pending_request() {
    let wd = Watchdog::new(MockAlarm::default());
    wd.start(1_000);
    wd.on_alarm();
    wd.stop();
    assert!(!wd.take_reset_request());
}

// =============================================================================
// RxLink
// =============================================================================

#[test]
fn data_ready_queues_frame_and_kicks() {
    let link: RxLink<MockAlarm, 4> = RxLink::new(MockAlarm::default());
    link.watchdog().start(1_000);
    let rearms = link.watchdog().timer().rearms.get();

    link.on_data_ready(&mut &tagged(9)[..]);

    assert_eq!(link.pending(), 1);
    assert_eq!(link.watchdog().timer().rearms.get(), rearms + 1);
    assert_eq!(link.pop_frame().map(|f| f[0]), Some(9));
    assert_eq!(link.pop_frame(), None);
}

#[test]
fn link_counts_overwritten_frames() {
    let link: RxLink<MockAlarm, 2> = RxLink::new(MockAlarm::default());
    for tag in 0..5 {
        link.on_data_ready(&mut &tagged(tag)[..]);
    }
    assert_eq!(link.pop_frame().map(|f| f[0]), Some(3));
    assert_eq!(link.overwritten(), 3);
}

#[test]
fn link_flush_empties_ring() {
    let link: RxLink<MockAlarm> = RxLink::new(MockAlarm::default());
    link.on_data_ready(&mut &tagged(1)[..]);
    link.flush();
    assert_eq!(link.pending(), 0);
}

#[test]
fn link_alarm_forwards_to_watchdog() {
    let link: RxLink<MockAlarm> = RxLink::new(MockAlarm::default());
    link.watchdog().start(10);
    link.on_watchdog_alarm();
    assert!(link.watchdog().take_reset_request());
}

#[test]
fn mock_alarm_contract() {
    let alarm = MockAlarm::default();
    alarm.arm(7, true);
    alarm.enable();
    alarm.disable();
    assert_eq!(alarm.interval_us.get(), 7);
    assert!(alarm.repeat.get());
    assert!(!alarm.enabled.get());
}
