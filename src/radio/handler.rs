//! Receive handler capabilities
//!
//! The three things an application can register to receive LoRa traffic.
//! All of them are invoked synchronously from the poll loop, never from
//! interrupt context. Closures with matching signatures implement them.

use crate::ssdo::packet::SsdoHeader;

/// Receives every raw frame, undecoded
pub trait FrameHandler {
    /// Handle one raw frame
    fn on_frame(&mut self, frame: &[u8]);
}

impl<F: FnMut(&[u8])> FrameHandler for F {
    fn on_frame(&mut self, frame: &[u8]) {
        self(frame);
    }
}

/// Receives every decoded SSDO fragment that is not a channel change
pub trait PacketHandler {
    /// Handle one fragment body with its header
    fn on_packet(&mut self, body: &[u8], header: &SsdoHeader);
}

impl<F: FnMut(&[u8], &SsdoHeader)> PacketHandler for F {
    fn on_packet(&mut self, body: &[u8], header: &SsdoHeader) {
        self(body, header);
    }
}

/// Receives complete reassembled SSDO objects
pub trait ObjectHandler {
    /// Handle one object; `header` is the fragment that completed it
    fn on_object(&mut self, object: &[u8], header: &SsdoHeader);
}

impl<F: FnMut(&[u8], &SsdoHeader)> ObjectHandler for F {
    fn on_object(&mut self, object: &[u8], header: &SsdoHeader) {
        self(object, header);
    }
}
