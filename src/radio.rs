//! Radio Control Logic
//!
//! Mode state machine, collaborator interfaces, receive handler
//! capabilities and the control facade that ties them to the receive
//! pipeline and the SSDO protocol.

pub mod control;
pub mod driver;
pub mod handler;
pub mod mode;
pub mod sstv;

pub use control::{LinkStats, RadioControl};
pub use driver::{RadioDriver, RttyClient, SstvClient};
pub use handler::{FrameHandler, ObjectHandler, PacketHandler};
pub use mode::{apply_event, ModeEvent, Readiness};
