//! Receive ring buffer
//!
//! Fixed number of frame slots filled by the data-ready interrupt and
//! drained one frame per poll tick.
//!
//! Cursors are free-running sequence numbers. The producer only ever
//! advances `write` and never looks at `read`, so it overwrites the oldest
//! unread slot when the consumer falls behind. The consumer only ever
//! advances `read`; when it finds itself more than `N` frames behind it
//! skips to the oldest frame that still survives and counts the rest as
//! lost.

use crate::ssdo::packet::{Frame, PACKET_SIZE};

/// Single-producer single-consumer frame ring
pub struct RecvRing<const N: usize> {
    slots: [Frame; N],
    /// Frames produced (producer-owned)
    write: u64,
    /// Frames consumed or skipped (consumer-owned)
    read: u64,
    /// Frames lost to overwrite
    overwritten: u32,
}

impl<const N: usize> RecvRing<N> {
    /// Create an empty ring
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [[0; PACKET_SIZE]; N],
            write: 0,
            read: 0,
            overwritten: 0,
        }
    }

    /// Ring capacity in frames
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Fill the slot at the write cursor and advance it
    ///
    /// The slot is zeroed before `fill` runs so short reads are padded.
    pub fn produce_with<F: FnOnce(&mut Frame)>(&mut self, fill: F) {
        let slot = &mut self.slots[Self::index(self.write)];
        slot.fill(0);
        fill(slot);
        self.write = self.write.wrapping_add(1);
    }

    /// Copy `frame` into the next slot
    pub fn produce(&mut self, frame: &[u8]) {
        self.produce_with(|slot| {
            let len = frame.len().min(PACKET_SIZE);
            slot[..len].copy_from_slice(&frame[..len]);
        });
    }

    /// Take the oldest unread frame, if any
    pub fn consume(&mut self) -> Option<Frame> {
        if self.write == self.read {
            return None;
        }

        let behind = self.write - self.read;
        if behind > N as u64 {
            let lost = behind - N as u64;
            self.overwritten = self.overwritten.saturating_add(lost as u32);
            self.read += lost;
            warn!("receive ring overrun, {} frames lost", lost);
        }

        let frame = self.slots[Self::index(self.read)];
        self.read += 1;
        Some(frame)
    }

    /// Check if no unread frame is available
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Unread frames still held by the ring
    #[must_use]
    pub fn pending(&self) -> usize {
        ((self.write - self.read) as usize).min(N)
    }

    /// Frames lost to overwrite so far
    #[must_use]
    pub const fn overwritten(&self) -> u32 {
        self.overwritten
    }

    /// Discard all unread frames
    pub fn clear(&mut self) {
        self.read = self.write;
    }

    const fn index(seq: u64) -> usize {
        (seq % N as u64) as usize
    }
}

impl<const N: usize> Default for RecvRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
