//! Error types
//!
//! Every fallible facade operation returns [`RadioResult`]. Frame decode
//! failures never reach callers; they are dropped by the poll loop and
//! only show up in the link statistics.

use core::fmt;

use crate::ssdo::packet::EncodeError;
use crate::types::RadioMode;

/// Facade operation result
pub type RadioResult<T = ()> = Result<T, RadioError>;

/// Status code reported by a radio collaborator (chip driver, RTTY/SSTV client)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverError(pub i16);

impl DriverError {
    /// Raw chip status code
    #[must_use]
    pub const fn code(self) -> i16 {
        self.0
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver status {}", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DriverError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "status {}", self.0);
    }
}

/// Collaborator call result
pub type DriverResult<T = ()> = Result<T, DriverError>;

/// Link core error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioError {
    /// Hardware rejected the requested physical parameters
    Configuration {
        /// Mode being configured
        mode: RadioMode,
        /// Chip status code
        code: i16,
    },
    /// Operation attempted on a mode that is not ready
    NotConfigured(RadioMode),
    /// SSDO send attempted before the sender id was set
    SenderNotSet,
    /// Operation needs stored default LoRa settings and none exist yet
    NoDefaultLora,
    /// Chip rejected a transmission
    Transmit(i16),
    /// Object could not be fragmented
    Encode(EncodeError),
    /// Image buffer does not match the SSTV frame size
    InvalidImage {
        /// Expected pixel count
        expected: usize,
        /// Supplied pixel count
        actual: usize,
    },
}

impl RadioError {
    pub(crate) const fn configuration(mode: RadioMode, err: DriverError) -> Self {
        Self::Configuration {
            mode,
            code: err.code(),
        }
    }

    pub(crate) const fn transmit(err: DriverError) -> Self {
        Self::Transmit(err.code())
    }
}

impl From<EncodeError> for RadioError {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { mode, code } => {
                write!(f, "failed to configure {mode} (status {code})")
            }
            Self::NotConfigured(mode) => write!(f, "{mode} not configured"),
            Self::SenderNotSet => write!(f, "SSDO sender id not set"),
            Self::NoDefaultLora => write!(f, "no default LoRa settings stored"),
            Self::Transmit(code) => write!(f, "transmit failed (status {code})"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::InvalidImage { expected, actual } => {
                write!(f, "image has {actual} pixels, expected {expected}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Configuration { mode, code } => {
                defmt::write!(f, "Configuration({}, {})", mode, code);
            }
            Self::NotConfigured(mode) => defmt::write!(f, "NotConfigured({})", mode),
            Self::SenderNotSet => defmt::write!(f, "SenderNotSet"),
            Self::NoDefaultLora => defmt::write!(f, "NoDefaultLora"),
            Self::Transmit(code) => defmt::write!(f, "Transmit({})", code),
            Self::Encode(err) => defmt::write!(f, "Encode({})", err),
            Self::InvalidImage { expected, actual } => {
                defmt::write!(f, "InvalidImage({}/{})", actual, expected);
            }
        }
    }
}
