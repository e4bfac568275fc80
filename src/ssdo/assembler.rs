//! Object reassembly
//!
//! Collects the fragments of one SSDO object and hands the complete object
//! to an [`ObjectHandler`]. Only one object is assembled at a time: a
//! fragment belonging to another object discards the partial one.
//!
//! Late duplicates of a delivered object are ignored until its fragment 0
//! shows up again, which starts a fresh copy of the same object.

use heapless::Vec;

use super::packet::{SsdoHeader, BODY_SIZE};
use crate::config::MAX_TRACKED_FRAGMENTS;
use crate::radio::handler::{ObjectHandler, PacketHandler};
use crate::types::SenderId;

const BITMAP_WORDS: usize = MAX_TRACKED_FRAGMENTS / 32;

/// Identity of the object being assembled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ObjectKey {
    sender: SenderId,
    object_id: u32,
    fragment_count: u16,
}

impl ObjectKey {
    const fn of(header: &SsdoHeader) -> Self {
        Self {
            sender: header.sender,
            object_id: header.object_id,
            fragment_count: header.fragment_count,
        }
    }
}

/// Fragment reassembler holding objects up to `MAX` bytes
pub struct ObjectAssembler<H, const MAX: usize> {
    handler: H,
    key: Option<ObjectKey>,
    data: Vec<u8, MAX>,
    received: [u32; BITMAP_WORDS],
    received_count: u16,
    total_len: usize,
    completed: bool,
    completed_objects: u32,
}

impl<H: ObjectHandler, const MAX: usize> ObjectAssembler<H, MAX> {
    /// Create an assembler delivering complete objects to `handler`
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            key: None,
            data: Vec::new(),
            received: [0; BITMAP_WORDS],
            received_count: 0,
            total_len: 0,
            completed: false,
            completed_objects: 0,
        }
    }

    /// Access the wrapped handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the wrapped handler
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Objects delivered so far
    #[must_use]
    pub const fn completed_objects(&self) -> u32 {
        self.completed_objects
    }

    /// Fragments of the current object received so far
    #[must_use]
    pub const fn received_fragments(&self) -> u16 {
        self.received_count
    }

    /// Discard any partial object
    pub fn reset(&mut self) {
        self.key = None;
        self.data.clear();
        self.received = [0; BITMAP_WORDS];
        self.received_count = 0;
        self.total_len = 0;
        self.completed = false;
    }

    /// Feed one fragment; delivers the object when it completes
    pub fn accept(&mut self, body: &[u8], header: &SsdoHeader) {
        let count = usize::from(header.fragment_count);
        if count > MAX_TRACKED_FRAGMENTS || count * BODY_SIZE > MAX.saturating_add(BODY_SIZE - 1) {
            warn!("object {} too large to assemble", header.object_id);
            return;
        }

        let key = ObjectKey::of(header);
        if self.key != Some(key) {
            self.start(key, count);
        }
        if self.completed {
            // Fragment 0 of a finished object is a resend of the whole object
            if header.fragment != 0 {
                return;
            }
            self.start(key, count);
        }

        let index = usize::from(header.fragment);
        let (word, bit) = (index / 32, 1u32 << (index % 32));
        if self.received[word] & bit != 0 {
            trace!("duplicate fragment {}", header.fragment);
            return;
        }

        let offset = index * BODY_SIZE;
        let end = offset + body.len();
        if body.len() > BODY_SIZE || end > self.data.len() {
            warn!("fragment {} does not fit object {}", header.fragment, header.object_id);
            return;
        }
        self.data[offset..end].copy_from_slice(body);
        self.received[word] |= bit;
        self.received_count += 1;

        if header.is_last() {
            self.total_len = end;
        }

        if usize::from(self.received_count) == count {
            self.completed = true;
            self.completed_objects = self.completed_objects.wrapping_add(1);
            debug!("object {} complete ({} bytes)", header.object_id, self.total_len);
            self.handler.on_object(&self.data[..self.total_len], header);
        }
    }

    fn start(&mut self, key: ObjectKey, count: usize) {
        self.reset();
        self.key = Some(key);
        // count * BODY_SIZE was bounded above, clamp to MAX for the last partial fragment
        let capacity = (count * BODY_SIZE).min(MAX);
        let _ = self.data.resize(capacity, 0);
    }
}

impl<H: ObjectHandler, const MAX: usize> PacketHandler for ObjectAssembler<H, MAX> {
    fn on_packet(&mut self, body: &[u8], header: &SsdoHeader) {
        self.accept(body, header);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssdo::packet::{decode, Ssdo, PACKET_SIZE};
    use crate::types::ObjectType;

    fn frames(object: &[u8], object_id: u32) -> std::vec::Vec<[u8; PACKET_SIZE]> {
        let ssdo = Ssdo::new(SenderId(1), object_id, ObjectType::Raw);
        (0..Ssdo::fragment_count(object.len()))
            .map(|i| {
                let mut frame = [0u8; PACKET_SIZE];
                ssdo.encode(object, i, &mut frame).unwrap();
                frame
            })
            .collect()
    }

    #[test]
    fn out_of_order_fragments_complete_once() {
        let object: std::vec::Vec<u8> = (0..130u8).collect();
        let mut delivered = std::vec::Vec::new();
        let mut asm: ObjectAssembler<_, 256> =
            ObjectAssembler::new(|obj: &[u8], _: &SsdoHeader| delivered.push(obj.to_vec()));

        let frames = frames(&object, 3);
        for idx in [2, 0, 0, 1, 2] {
            let (header, body) = decode(&frames[idx]).unwrap();
            asm.accept(body, &header);
        }
        assert_eq!(asm.completed_objects(), 1);
        drop(asm);
        assert_eq!(delivered, std::vec![object]);
    }

    #[test]
    fn new_object_discards_partial() {
        let mut count = 0;
        let mut asm: ObjectAssembler<_, 256> =
            ObjectAssembler::new(|_: &[u8], _: &SsdoHeader| count += 1);

        let first = frames(&[1u8; 100], 1);
        let second = frames(&[2u8; 10], 2);
        let (h, b) = decode(&first[0]).unwrap();
        asm.accept(b, &h);
        let (h, b) = decode(&second[0]).unwrap();
        asm.accept(b, &h);
        let (h, b) = decode(&first[1]).unwrap();
        asm.accept(b, &h);
        assert_eq!(asm.received_fragments(), 1);
        assert_eq!(asm.completed_objects(), 1);
        drop(asm);
        assert_eq!(count, 1);
    }

    #[test]
    fn resent_object_is_delivered_again() {
        let mut count = 0;
        let mut asm: ObjectAssembler<_, 256> =
            ObjectAssembler::new(|_: &[u8], _: &SsdoHeader| count += 1);

        let frames = frames(&[7u8; 100], 4);
        for pass in 0..2 {
            for frame in &frames {
                let (h, b) = decode(frame).unwrap();
                asm.accept(b, &h);
            }
            // straggler from the pass just delivered
            let (h, b) = decode(&frames[1]).unwrap();
            asm.accept(b, &h);
            assert_eq!(asm.completed_objects(), pass + 1);
        }
        drop(asm);
        assert_eq!(count, 2);
    }

    #[test]
    fn oversized_object_is_dropped() {
        let mut asm: ObjectAssembler<_, 64> = ObjectAssembler::new(|_: &[u8], _: &SsdoHeader| {});
        let frames = frames(&[0u8; 200], 9);
        for frame in &frames {
            let (h, b) = decode(frame).unwrap();
            asm.accept(b, &h);
        }
        assert_eq!(asm.completed_objects(), 0);
    }
}
