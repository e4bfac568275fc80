//! SSDO frame codec
//!
//! Encodes one fragment of an object into a fixed-size radio frame and
//! decodes frames back into header + body.
//!
//! # Wire Format
//!
//! ```text
//! +--------+--------+------+----------+----------+--------+-------+-----------------+
//! | sender | object | type | fragment | fragment | body   | crc16 | body            |
//! | u32    | u32    | u8   | index u16| count u16| len u8 | u16   | (zero padded)   |
//! +--------+--------+------+----------+----------+--------+-------+-----------------+
//!   0..4     4..8     8      9..11      11..13     13       14..16  16..64
//! ```
//!
//! All integers are big-endian. The CRC-16/CCITT-FALSE covers bytes 0..14
//! and the declared body bytes.

use core::fmt;

use crc::{Crc, CRC_16_IBM_3740};

use crate::config::SSDO_PACKET_SIZE;
use crate::types::{ObjectType, SenderId};

/// Frame size in bytes
pub const PACKET_SIZE: usize = SSDO_PACKET_SIZE;

/// Header size in bytes
pub const HEADER_SIZE: usize = 16;

/// Body capacity of a single fragment
pub const BODY_SIZE: usize = PACKET_SIZE - HEADER_SIZE;

/// One radio frame
pub type Frame = [u8; PACKET_SIZE];

/// CRC-16/CCITT-FALSE
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Offset of the CRC field (also the length of the CRC-covered header part)
const CRC_OFFSET: usize = 14;

/// Error encoding a fragment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// Object needs more fragments than the header can index
    ObjectTooLarge {
        /// Object size in bytes
        size: usize,
    },
    /// Fragment index past the last fragment of the object
    FragmentOutOfRange {
        /// Requested index
        index: usize,
        /// Fragments in the object
        count: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectTooLarge { size } => write!(f, "object of {size} bytes too large"),
            Self::FragmentOutOfRange { index, count } => {
                write!(f, "fragment {index} out of range ({count} fragments)")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for EncodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ObjectTooLarge { size } => defmt::write!(f, "ObjectTooLarge({})", size),
            Self::FragmentOutOfRange { index, count } => {
                defmt::write!(f, "FragmentOutOfRange({}/{})", index, count);
            }
        }
    }
}

/// Error decoding a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame shorter than the header
    Truncated,
    /// CRC does not match
    ChecksumMismatch,
    /// Declared body length exceeds the body capacity or the frame
    BadLength,
    /// Fragment index not below fragment count
    BadFragment,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated frame"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::BadLength => write!(f, "invalid body length"),
            Self::BadFragment => write!(f, "invalid fragment index"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DecodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Truncated => defmt::write!(f, "Truncated"),
            Self::ChecksumMismatch => defmt::write!(f, "ChecksumMismatch"),
            Self::BadLength => defmt::write!(f, "BadLength"),
            Self::BadFragment => defmt::write!(f, "BadFragment"),
        }
    }
}

/// Decoded frame metadata
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SsdoHeader {
    /// Sending node
    pub sender: SenderId,
    /// Object this fragment belongs to
    pub object_id: u32,
    /// Object type
    pub object_type: ObjectType,
    /// Fragment index within the object
    pub fragment: u16,
    /// Total fragments of the object
    pub fragment_count: u16,
    /// Body bytes carried by this fragment
    pub length: u8,
}

impl SsdoHeader {
    /// Check if this is the final fragment of its object
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.fragment + 1 == self.fragment_count
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SsdoHeader {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "SSDO({}, obj {}, {}, {}/{})",
            self.sender,
            self.object_id,
            self.object_type,
            self.fragment,
            self.fragment_count
        );
    }
}

/// Fragment encoder bound to one object
#[derive(Clone, Copy, Debug)]
pub struct Ssdo {
    sender: SenderId,
    object_id: u32,
    object_type: ObjectType,
}

impl Ssdo {
    /// Create an encoder for one object
    #[must_use]
    pub const fn new(sender: SenderId, object_id: u32, object_type: ObjectType) -> Self {
        Self {
            sender,
            object_id,
            object_type,
        }
    }

    /// Number of fragments needed for an object of `size` bytes
    #[must_use]
    pub const fn fragment_count(size: usize) -> usize {
        size.div_ceil(BODY_SIZE)
    }

    /// Encode fragment `index` of `object` into `frame`
    ///
    /// The body is zero padded to the fixed fragment size.
    pub fn encode(&self, object: &[u8], index: usize, frame: &mut Frame) -> Result<(), EncodeError> {
        let count = Self::fragment_count(object.len());
        let Ok(count16) = u16::try_from(count) else {
            return Err(EncodeError::ObjectTooLarge { size: object.len() });
        };
        if index >= count {
            return Err(EncodeError::FragmentOutOfRange { index, count });
        }

        let start = index * BODY_SIZE;
        let end = (start + BODY_SIZE).min(object.len());
        let body = &object[start..end];

        frame.fill(0);
        frame[0..4].copy_from_slice(&self.sender.get().to_be_bytes());
        frame[4..8].copy_from_slice(&self.object_id.to_be_bytes());
        frame[8] = self.object_type.as_u8();
        // index < count <= u16::MAX
        frame[9..11].copy_from_slice(&(index as u16).to_be_bytes());
        frame[11..13].copy_from_slice(&count16.to_be_bytes());
        frame[13] = body.len() as u8;
        frame[HEADER_SIZE..HEADER_SIZE + body.len()].copy_from_slice(body);

        let crc = checksum(&frame[..CRC_OFFSET], body);
        frame[CRC_OFFSET..HEADER_SIZE].copy_from_slice(&crc.to_be_bytes());
        Ok(())
    }
}

/// Decode a frame into its header and body
///
/// The body borrows from `frame` and holds exactly the declared bytes.
pub fn decode(frame: &[u8]) -> Result<(SsdoHeader, &[u8]), DecodeError> {
    if frame.len() < HEADER_SIZE {
        return Err(DecodeError::Truncated);
    }

    let length = frame[13];
    let body_len = usize::from(length);
    if body_len > BODY_SIZE || HEADER_SIZE + body_len > frame.len() {
        return Err(DecodeError::BadLength);
    }
    let body = &frame[HEADER_SIZE..HEADER_SIZE + body_len];

    let expected = u16::from_be_bytes([frame[CRC_OFFSET], frame[CRC_OFFSET + 1]]);
    if checksum(&frame[..CRC_OFFSET], body) != expected {
        return Err(DecodeError::ChecksumMismatch);
    }

    let fragment = u16::from_be_bytes([frame[9], frame[10]]);
    let fragment_count = u16::from_be_bytes([frame[11], frame[12]]);
    if fragment >= fragment_count {
        return Err(DecodeError::BadFragment);
    }

    let header = SsdoHeader {
        sender: SenderId(u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]])),
        object_id: u32::from_be_bytes([frame[4], frame[5], frame[6], frame[7]]),
        object_type: ObjectType::from_u8(frame[8]),
        fragment,
        fragment_count,
        length,
    };
    Ok((header, body))
}

fn checksum(header: &[u8], body: &[u8]) -> u16 {
    let mut digest = CRC16.digest();
    digest.update(header);
    digest.update(body);
    digest.finalize()
}
