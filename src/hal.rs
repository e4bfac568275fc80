//! Hardware Abstraction Layer
//!
//! Target-side implementations of the link's hardware contracts.

pub mod alarm;
