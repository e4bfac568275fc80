//! Shared types used across the link core
//!
//! Physical-layer settings for each transmission mode, the mode
//! identifier and the SSDO identity types.

use core::fmt;

/// Transmission mode of the single half-duplex transceiver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RadioMode {
    /// LoRa packet radio
    Lora,
    /// Raw FSK
    Fsk,
    /// RTTY telemetry on the FSK physical layer
    Rtty,
    /// SSTV imagery
    Sstv,
}

impl fmt::Display for RadioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lora => write!(f, "LoRa"),
            Self::Fsk => write!(f, "FSK"),
            Self::Rtty => write!(f, "RTTY"),
            Self::Sstv => write!(f, "SSTV"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Lora => defmt::write!(f, "LoRa"),
            Self::Fsk => defmt::write!(f, "FSK"),
            Self::Rtty => defmt::write!(f, "RTTY"),
            Self::Sstv => defmt::write!(f, "SSTV"),
        }
    }
}

/// LoRa physical-layer settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoraSettings {
    /// Carrier frequency in MHz
    pub frequency: f32,
    /// Bandwidth in kHz
    pub bandwidth: f32,
    /// Spreading factor (6-12)
    pub spread_factor: u8,
    /// Coding rate denominator (5-8)
    pub code_rate: u8,
    /// Sync word
    pub sync_word: u8,
    /// Output power in dBm
    pub power: i8,
    /// Over-current protection limit in mA
    pub current_limit: u8,
    /// Preamble length in symbols
    pub preamble_length: u16,
    /// LNA gain (0 = automatic)
    pub gain: u8,
}

impl LoraSettings {
    /// Length of [`Self::to_bytes`]
    pub const ENCODED_LEN: usize = 16;

    /// Raw byte image used for exact comparison
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..4].copy_from_slice(&self.frequency.to_bits().to_be_bytes());
        out[4..8].copy_from_slice(&self.bandwidth.to_bits().to_be_bytes());
        out[8] = self.spread_factor;
        out[9] = self.code_rate;
        out[10] = self.sync_word;
        out[11] = self.power.to_be_bytes()[0];
        out[12] = self.current_limit;
        out[13..15].copy_from_slice(&self.preamble_length.to_be_bytes());
        out[15] = self.gain;
        out
    }

    /// Byte-for-byte comparison (unlike `==`, distinguishes `-0.0` and NaN payloads)
    #[must_use]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.to_bytes() != other.to_bytes()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LoraSettings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "LoRa({} MHz, BW {} kHz, SF{}, CR4/{}, sync 0x{:02X})",
            self.frequency,
            self.bandwidth,
            self.spread_factor,
            self.code_rate,
            self.sync_word
        );
    }
}

/// FSK physical-layer settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FskSettings {
    /// Carrier frequency in MHz
    pub frequency: f32,
    /// Bit rate in kbps
    pub bit_rate: f32,
    /// Frequency deviation in kHz
    pub freq_dev: f32,
    /// Receiver bandwidth in kHz
    pub rx_bandwidth: f32,
    /// Output power in dBm (2 - 17)
    pub power: i8,
    /// Preamble length in bits
    pub preamble_length: u16,
    /// Use OOK instead of FSK
    pub enable_ook: bool,
    /// Gaussian data shaping BT product (0 = off)
    pub data_shaping: f32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for FskSettings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "FSK({} MHz, {} kbps, dev {} kHz)",
            self.frequency,
            self.bit_rate,
            self.freq_dev
        );
    }
}

/// RTTY character encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RttyEncoding {
    /// 7-bit ASCII
    #[default]
    Ascii,
    /// 8-bit extended ASCII
    AsciiExtended,
    /// 5-bit Baudot (ITA2)
    Ita2,
}

impl RttyEncoding {
    /// Bits per character
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Ascii => 7,
            Self::AsciiExtended => 8,
            Self::Ita2 => 5,
        }
    }
}

/// RTTY settings (carried on the FSK physical layer)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RttySettings {
    /// Base (space) frequency in MHz
    pub frequency: f32,
    /// Mark/space shift in Hz
    pub shift: u32,
    /// Baud rate
    pub baud: u16,
    /// Character encoding
    pub encoding: RttyEncoding,
    /// Number of stop bits
    pub stop_bits: u8,
}

/// SSTV transmission mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SstvMode {
    /// Scottie 1
    #[default]
    Scottie1,
    /// Scottie 2
    Scottie2,
    /// Scottie DX
    ScottieDx,
    /// Martin 1
    Martin1,
    /// Martin 2
    Martin2,
    /// Wraase SC2-180
    Wraase,
    /// Pasokon P3
    PasokonP3,
    /// Pasokon P5
    PasokonP5,
    /// Pasokon P7
    PasokonP7,
}

/// SSTV settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SstvSettings {
    /// Base frequency in MHz
    pub frequency: f32,
    /// Clock correction factor to slow down or speed up line timing
    pub correction: f32,
    /// SSTV mode
    pub mode: SstvMode,
}

/// SSDO sender identity of this node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SenderId(pub u32);

impl SenderId {
    /// Raw identifier
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SenderId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "sender#{}", self.0);
    }
}

/// SSDO object type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ObjectType {
    /// Application payload
    #[default]
    Raw,
    /// LoRa channel change descriptor
    Change,
    /// Any other type value, passed through to handlers
    Other(u8),
}

impl ObjectType {
    /// Wire value of [`ObjectType::Raw`]
    pub const RAW: u8 = 0x00;
    /// Wire value of [`ObjectType::Change`]
    pub const CHANGE: u8 = 0x01;

    /// Decode from wire value
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            Self::RAW => Self::Raw,
            Self::CHANGE => Self::Change,
            other => Self::Other(other),
        }
    }

    /// Encode to wire value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Raw => Self::RAW,
            Self::Change => Self::CHANGE,
            Self::Other(value) => value,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ObjectType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Raw => defmt::write!(f, "RAW"),
            Self::Change => defmt::write!(f, "CHANGE"),
            Self::Other(v) => defmt::write!(f, "TYPE({})", v),
        }
    }
}
