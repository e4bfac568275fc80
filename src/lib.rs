//! Satellite Radio Link Library
//!
//! Link-layer control core for a small satellite radio payload. A single
//! half-duplex transceiver is shared between four mutually exclusive
//! modes (LoRa, FSK, RTTY, SSTV). On LoRa the library carries SSDO, a
//! fragmenting object transfer protocol that can also move the channel
//! itself to new physical parameters and fall back to the defaults when
//! the link goes quiet.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RADIO CONTROL FACADE                      │
//! │  mode setup  │  sends  │  SSDO transfer  │  poll tick        │
//! ├─────────────────────────────────────────────────────────────┤
//! │      MODE STATE MACHINE      │        SSDO PROTOCOL          │
//! │  readiness, RTTY-on-FSK      │  fragments, change, assembly  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  RECEIVE PIPELINE (RxLink)                   │
//! │  interrupt-fed frame ring  │  receive watchdog               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   DRIVER / HAL CONTRACTS                     │
//! │  RadioDriver  │  RTTY/SSTV clients  │  AlarmTimer  │  DelayNs │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Execution contexts
//!
//! - **Interrupt**: [`link::RxLink::on_data_ready`] and
//!   [`link::RxLink::on_watchdog_alarm`]. Never block or allocate.
//! - **Poll loop**: everything on [`radio::RadioControl`], including
//!   [`radio::RadioControl::process_recv_buff`], which must be called
//!   repeatedly.
//!
//! # Design Principles
//!
//! - **Immutable-by-default**: mode transitions return new readiness values
//! - **Type-driven design**: settings and wire headers are plain typed values
//! - **No unsafe**: interrupt sharing goes through `critical-section` and atomics
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must stay first so the logging macros are visible to every module
mod fmt;

#[cfg(feature = "embedded")]
pub use embassy_time;

/// System configuration and constants
pub mod config;

/// Shared types used across modules
pub mod types;

/// Error types
pub mod error;

/// SSDO Object Transfer Protocol
///
/// Fragment codec, channel change descriptor, object reassembly.
pub mod ssdo;

/// Receive Pipeline
///
/// Interrupt-fed frame ring and receive watchdog.
pub mod link;

/// Radio Control Logic
///
/// Mode state machine and the control facade.
pub mod radio;

/// Hardware Abstraction Layer
///
/// Target implementations of the link's hardware contracts.
#[cfg(feature = "embedded")]
pub mod hal;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::error::{DriverError, DriverResult, RadioError, RadioResult};
    pub use crate::link::{AlarmTimer, FrameReader, RxLink};
    pub use crate::radio::{
        FrameHandler, ObjectHandler, PacketHandler, RadioControl, RadioDriver, Readiness,
        RttyClient, SstvClient,
    };
    pub use crate::ssdo::{ChangeDescriptor, ObjectAssembler, SsdoHeader};
    pub use crate::types::*;

    #[cfg(feature = "embedded")]
    pub use crate::hal::alarm::{watchdog_task, SoftAlarm};
}
