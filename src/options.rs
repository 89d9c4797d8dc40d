/// Option kinds and the common record envelope for IPv4 header options.
///
/// This module provides the closed set of option kinds, a zero-copy wrapper
/// around the type/length header every record starts with, the owned
/// [`Envelope`] each decoded option carries, and [`RawOption`], a generic
/// undecoded record that can be converted into a specific option kind.

use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};
use crate::field;
use crate::route::RouteOptionRepr;
use crate::security::SecurityOptionRepr;
use crate::stream_id::StreamIdOptionRepr;
use crate::timestamp::TimestampOptionRepr;

/// Option kind enumeration for IPv4 header options.
///
/// Defines the type octet at the start of every option record, which
/// determines how to interpret the rest of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OptionKind {
    /// End of option list (0) - terminates the option list
    EndOfList = 0,
    /// No operation (1) - single-octet padding between options
    NoOp = 1,
    /// Record route (7) - records the route of a datagram
    RecordRoute = 7,
    /// Internet timestamp (68) - records timestamps along the path
    Timestamp = 68,
    /// Security (130) - security, compartmentation and handling restrictions
    Security = 130,
    /// Loose source and record route (131)
    LooseSourceRoute = 131,
    /// Stream identifier (136) - carries a 16-bit SATNET stream identifier
    StreamId = 136,
    /// Strict source and record route (137)
    StrictSourceRoute = 137,
}

impl OptionKind {
    /// Convert a type octet to an OptionKind.
    ///
    /// # Parameters
    /// * `value` - The type octet to convert
    ///
    /// # Returns
    /// * `Some(OptionKind)` if value matches a known option kind exactly
    /// * `None` if value is not a known option kind
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OptionKind::EndOfList),
            1 => Some(OptionKind::NoOp),
            7 => Some(OptionKind::RecordRoute),
            68 => Some(OptionKind::Timestamp),
            130 => Some(OptionKind::Security),
            131 => Some(OptionKind::LooseSourceRoute),
            136 => Some(OptionKind::StreamId),
            137 => Some(OptionKind::StrictSourceRoute),
            _ => None,
        }
    }

    /// Convert the OptionKind to its type octet.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// True for the single-octet records that carry no length octet.
    pub fn is_single_octet(&self) -> bool {
        matches!(self, OptionKind::EndOfList | OptionKind::NoOp)
    }

    /// True for the three kinds sharing the route record layout.
    pub fn is_route(&self) -> bool {
        matches!(
            self,
            OptionKind::RecordRoute | OptionKind::LooseSourceRoute | OptionKind::StrictSourceRoute
        )
    }

    /// Whether the option is copied into every fragment (high bit of the type octet).
    pub fn is_copied(&self) -> bool {
        self.as_u8() & 0x80 != 0
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OptionKind::EndOfList => "EOL",
            OptionKind::NoOp => "NOP",
            OptionKind::RecordRoute => "RR",
            OptionKind::Timestamp => "TS",
            OptionKind::Security => "SEC",
            OptionKind::LooseSourceRoute => "LSRR",
            OptionKind::StreamId => "SID",
            OptionKind::StrictSourceRoute => "SSRR",
        };
        f.write_str(name)
    }
}

/// Zero-copy wrapper around an option record header (type + length octets).
///
/// Wire format (2 bytes, single-octet kinds only carry the first):
/// ```text
/// +--------+--------+
/// |  Type  | Length |
/// +--------+--------+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OptionHeader<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> OptionHeader<T> {
    /// Create an OptionHeader without validation.
    ///
    /// # Safety
    /// This does not validate buffer length. Use `new_checked` for validation.
    pub fn new_unchecked(buffer: T) -> Self {
        OptionHeader { buffer }
    }

    /// Create an OptionHeader from a buffer, checking the type octet and,
    /// for multi-octet kinds, that the length octet is present.
    ///
    /// # Returns
    /// * `Ok(OptionHeader)` if the header is readable
    /// * `Err(Error::NotEnoughData)` if the buffer is too short
    /// * `Err(Error::InvalidOptionType)` if the type octet is unknown
    pub fn new_checked(buffer: T) -> Result<Self> {
        let header = Self::new_unchecked(buffer);
        header.check_len()?;
        Ok(header)
    }

    /// Validate that the header octets this kind requires are present.
    ///
    /// # Returns
    /// * `Ok(OptionKind)` with the classified type octet
    pub fn check_len(&self) -> Result<OptionKind> {
        let buf = self.buffer.as_ref();
        if buf.is_empty() {
            return Err(Error::NotEnoughData);
        }
        let kind = self.check_option_kind()?;
        if !kind.is_single_octet() && buf.len() < field::option::HEADER_LEN {
            return Err(Error::NotEnoughData);
        }
        Ok(kind)
    }

    /// Validate the type octet against the known option kinds.
    ///
    /// # Returns
    /// * `Ok(OptionKind)` if the type octet is known
    /// * `Err(Error::InvalidOptionType)` otherwise
    pub fn check_option_kind(&self) -> Result<OptionKind> {
        let type_val = self.option_type();
        OptionKind::from_u8(type_val).ok_or(Error::InvalidOptionType(type_val))
    }

    /// Get the type octet (offset 0).
    pub fn option_type(&self) -> u8 {
        self.buffer.as_ref()[field::option::TYPE.start]
    }

    /// Get the length octet (offset 1).
    ///
    /// Counts the type and length octets themselves.
    pub fn length(&self) -> u8 {
        self.buffer.as_ref()[field::option::LENGTH.start]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> OptionHeader<T> {
    /// Set the type octet (offset 0).
    pub fn set_option_type(&mut self, value: u8) {
        self.buffer.as_mut()[field::option::TYPE.start] = value;
    }

    /// Set the length octet (offset 1).
    pub fn set_length(&mut self, value: u8) {
        self.buffer.as_mut()[field::option::LENGTH.start] = value;
    }
}

/// Common envelope carried by every decoded option.
///
/// Holds the option kind, its declared length and an owned copy of the full
/// record including the type and length octets. For every multi-octet kind
/// `raw().len() == length()`; End-of-List and No-Operation have a fixed
/// length of 1 that is not carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    kind: OptionKind,
    length: u8,
    raw: Vec<u8>,
}

impl Envelope {
    /// Build an envelope from a complete record whose type octet has
    /// already been classified as `kind`.
    pub(crate) fn from_record(kind: OptionKind, record: &[u8]) -> Self {
        let length = if kind.is_single_octet() {
            1
        } else {
            record[field::option::LENGTH.start]
        };
        Envelope {
            kind,
            length,
            raw: record.to_vec(),
        }
    }

    /// The option kind.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The declared record length (1 for End-of-List and No-Operation).
    pub fn length(&self) -> u8 {
        self.length
    }

    /// The record bytes including the type and length octets.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// A generic, undecoded option record borrowed from the options field.
///
/// Produced by [`crate::span::OptionSpan::iter`]. Only the type octet and the
/// record extent have been validated; use one of the `to_*` conversions to
/// decode the record as a specific kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOption<'a> {
    kind: OptionKind,
    record: &'a [u8],
}

impl<'a> RawOption<'a> {
    /// Split the first record off `bytes`.
    ///
    /// # Returns
    /// * `Ok((RawOption, rest))` with the record and the bytes that follow it
    /// * `Err(Error::InvalidOptionType)` if the type octet is unknown
    /// * `Err(Error::NotEnoughData)` if the declared length runs past `bytes`
    /// * `Err(Error::InvalidLength)` if the declared length is shorter than
    ///   the type and length octets
    pub fn split(bytes: &'a [u8]) -> Result<(Self, &'a [u8])> {
        let header = OptionHeader::new_unchecked(bytes);
        let kind = header.check_len()?;
        let len = if kind.is_single_octet() {
            1
        } else {
            let len = header.length() as usize;
            if len < field::option::HEADER_LEN {
                return Err(Error::InvalidLength);
            }
            if len > bytes.len() {
                return Err(Error::NotEnoughData);
            }
            len
        };
        let (record, rest) = bytes.split_at(len);
        Ok((RawOption { kind, record }, rest))
    }

    /// The option kind.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The declared length (1 for End-of-List and No-Operation).
    pub fn length(&self) -> u8 {
        if self.kind.is_single_octet() {
            1
        } else {
            self.record[field::option::LENGTH.start]
        }
    }

    /// The record bytes including type and length octets.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.record
    }

    /// The record payload following the type and length octets.
    pub fn data(&self) -> &'a [u8] {
        if self.kind.is_single_octet() {
            &[]
        } else {
            &self.record[field::option::HEADER_LEN..]
        }
    }

    /// Decode as a Security option.
    pub fn to_security(&self) -> Result<SecurityOptionRepr> {
        if self.kind != OptionKind::Security {
            return Err(Error::OptionTypeMismatch);
        }
        SecurityOptionRepr::decode(self.record).map(|(repr, _)| repr)
    }

    /// Decode as a Record Route, Loose Source Route or Strict Source Route option.
    pub fn to_route(&self) -> Result<RouteOptionRepr> {
        if !self.kind.is_route() {
            return Err(Error::OptionTypeMismatch);
        }
        RouteOptionRepr::decode(self.record).map(|(repr, _)| repr)
    }

    /// Decode as a Stream Identifier option.
    pub fn to_stream_id(&self) -> Result<StreamIdOptionRepr> {
        if self.kind != OptionKind::StreamId {
            return Err(Error::OptionTypeMismatch);
        }
        StreamIdOptionRepr::decode(self.record).map(|(repr, _)| repr)
    }

    /// Decode as an Internet Timestamp option.
    pub fn to_timestamp(&self) -> Result<TimestampOptionRepr> {
        if self.kind != OptionKind::Timestamp {
            return Err(Error::OptionTypeMismatch);
        }
        TimestampOptionRepr::decode(self.record).map(|(repr, _)| repr)
    }
}
