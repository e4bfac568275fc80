//! SSDO Object Transfer Protocol
//!
//! Fragmentation of objects into fixed-size radio frames, the channel
//! change descriptor carried by `Change` objects, and receive-side object
//! reassembly.

pub mod assembler;
pub mod change;
pub mod packet;

pub use assembler::ObjectAssembler;
pub use change::ChangeDescriptor;
pub use packet::{decode, DecodeError, EncodeError, Frame, Ssdo, SsdoHeader};
