//! LoRa channel change descriptor
//!
//! Body of a [`ObjectType::Change`](crate::types::ObjectType::Change)
//! object. Carries the channel-defining LoRa fields only; every other
//! field is taken from the receiver's stored defaults when applied.
//!
//! ```text
//! +-----------+-----------+----+----+------+
//! | frequency | bandwidth | sf | cr | sync |
//! | f32 BE    | f32 BE    | u8 | u8 | u8   |
//! +-----------+-----------+----+----+------+
//! ```

use super::packet::DecodeError;
use crate::types::LoraSettings;

/// Channel change request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChangeDescriptor {
    /// Carrier frequency in MHz
    pub frequency: f32,
    /// Bandwidth in kHz
    pub bandwidth: f32,
    /// Spreading factor
    pub spread_factor: u8,
    /// Coding rate denominator
    pub code_rate: u8,
    /// Sync word
    pub sync_word: u8,
}

impl ChangeDescriptor {
    /// Encoded size in bytes
    pub const ENCODED_LEN: usize = 11;

    /// Extract the channel fields of `settings`
    #[must_use]
    pub const fn from_settings(settings: &LoraSettings) -> Self {
        Self {
            frequency: settings.frequency,
            bandwidth: settings.bandwidth,
            spread_factor: settings.spread_factor,
            code_rate: settings.code_rate,
            sync_word: settings.sync_word,
        }
    }

    /// Merge over `defaults`, keeping every field the descriptor does not carry
    #[must_use]
    pub const fn apply_to(&self, defaults: &LoraSettings) -> LoraSettings {
        LoraSettings {
            frequency: self.frequency,
            bandwidth: self.bandwidth,
            spread_factor: self.spread_factor,
            code_rate: self.code_rate,
            sync_word: self.sync_word,
            ..*defaults
        }
    }

    /// Encode to wire bytes
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..4].copy_from_slice(&self.frequency.to_be_bytes());
        out[4..8].copy_from_slice(&self.bandwidth.to_be_bytes());
        out[8] = self.spread_factor;
        out[9] = self.code_rate;
        out[10] = self.sync_word;
        out
    }

    /// Decode from an object body
    pub fn from_bytes(body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < Self::ENCODED_LEN {
            return Err(DecodeError::BadLength);
        }
        Ok(Self {
            frequency: f32::from_be_bytes([body[0], body[1], body[2], body[3]]),
            bandwidth: f32::from_be_bytes([body[4], body[5], body[6], body[7]]),
            spread_factor: body[8],
            code_rate: body[9],
            sync_word: body[10],
        })
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChangeDescriptor {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Change({} MHz, BW {} kHz, SF{}, CR4/{}, sync 0x{:02X})",
            self.frequency,
            self.bandwidth,
            self.spread_factor,
            self.code_rate,
            self.sync_word
        );
    }
}
