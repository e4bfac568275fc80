//! Mode State Machine
//!
//! Tracks which physical-layer configuration is ready. The transceiver is
//! single-mode, so readiness is one value: making a mode ready replaces
//! whatever was ready before. RTTY rides on FSK and may only be entered
//! from an FSK-ready (or already RTTY-ready) radio.

use crate::error::{RadioError, RadioResult};
use crate::types::RadioMode;

/// Readiness of the transceiver (immutable)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Nothing configured yet
    #[default]
    None,
    /// LoRa configured
    LoraReady,
    /// FSK configured
    FskReady,
    /// RTTY configured on top of FSK
    RttyReady,
    /// SSTV configured
    SstvReady,
}

impl Readiness {
    /// Readiness after successfully configuring `mode`
    #[must_use]
    pub const fn ready(mode: RadioMode) -> Self {
        match mode {
            RadioMode::Lora => Self::LoraReady,
            RadioMode::Fsk => Self::FskReady,
            RadioMode::Rtty => Self::RttyReady,
            RadioMode::Sstv => Self::SstvReady,
        }
    }

    /// Mode that is ready, if any
    #[must_use]
    pub const fn mode(self) -> Option<RadioMode> {
        match self {
            Self::None => None,
            Self::LoraReady => Some(RadioMode::Lora),
            Self::FskReady => Some(RadioMode::Fsk),
            Self::RttyReady => Some(RadioMode::Rtty),
            Self::SstvReady => Some(RadioMode::Sstv),
        }
    }

    /// Check if `mode` is ready
    #[must_use]
    pub fn is_ready(self, mode: RadioMode) -> bool {
        self.mode() == Some(mode)
    }

    /// Check if the FSK physical layer is up (FSK itself or RTTY on it)
    #[must_use]
    pub const fn fsk_layer_up(self) -> bool {
        matches!(self, Self::FskReady | Self::RttyReady)
    }

    /// Check if a transition into `mode` may touch the hardware
    #[must_use]
    pub const fn can_enter(self, mode: RadioMode) -> bool {
        match mode {
            RadioMode::Rtty => self.fsk_layer_up(),
            RadioMode::Lora | RadioMode::Fsk | RadioMode::Sstv => true,
        }
    }

    /// Fail with [`RadioError::NotConfigured`] unless `mode` is ready
    pub fn require(self, mode: RadioMode) -> RadioResult {
        if self.is_ready(mode) {
            Ok(())
        } else {
            Err(RadioError::NotConfigured(mode))
        }
    }

    /// Fail with [`RadioError::NotConfigured`] unless `mode` may be entered
    pub fn require_enterable(self, mode: RadioMode) -> RadioResult {
        if self.can_enter(mode) {
            Ok(())
        } else {
            Err(RadioError::NotConfigured(RadioMode::Fsk))
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Readiness {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "NONE"),
            Self::LoraReady => defmt::write!(f, "LORA"),
            Self::FskReady => defmt::write!(f, "FSK"),
            Self::RttyReady => defmt::write!(f, "RTTY"),
            Self::SstvReady => defmt::write!(f, "SSTV"),
        }
    }
}

/// Outcome of one configuration attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeEvent {
    /// Hardware accepted the configuration for the mode
    Configured(RadioMode),
    /// Hardware rejected it
    Rejected(RadioMode),
}

/// Apply a configuration outcome, returning the new readiness
#[must_use]
pub const fn apply_event(state: Readiness, event: ModeEvent) -> Readiness {
    match event {
        ModeEvent::Configured(mode) => Readiness::ready(mode),
        ModeEvent::Rejected(_) => state,
    }
}
