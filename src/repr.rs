use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};
use crate::field;
use crate::options::{Envelope, OptionHeader, OptionKind};
use crate::route::RouteOptionRepr;
use crate::security::SecurityOptionRepr;
use crate::stream_id::StreamIdOptionRepr;
use crate::timestamp::TimestampOptionRepr;

const END_OF_LIST: &[u8] = &[OptionKind::EndOfList as u8];
const NO_OP: &[u8] = &[OptionKind::NoOp as u8];

/// A single decoded IPv4 option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedOption {
    /// End of option list marker
    EndOfList,
    /// No operation (padding) marker
    NoOp,
    /// Security option
    Security(SecurityOptionRepr),
    /// Record Route, Loose Source Route or Strict Source Route option
    Route(RouteOptionRepr),
    /// Stream Identifier option
    StreamId(StreamIdOptionRepr),
    /// Internet Timestamp option
    Timestamp(TimestampOptionRepr),
}

impl DecodedOption {
    /// Decode the record starting at the type octet `bytes[0]`.
    ///
    /// # Returns
    /// The decoded option and the number of bytes it consumed
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let kind = OptionHeader::new_unchecked(bytes).check_len()?;
        match kind {
            OptionKind::EndOfList => Ok((DecodedOption::EndOfList, 1)),
            OptionKind::NoOp => Ok((DecodedOption::NoOp, 1)),
            OptionKind::Security => {
                SecurityOptionRepr::decode(bytes).map(|(o, n)| (DecodedOption::Security(o), n))
            }
            OptionKind::RecordRoute | OptionKind::LooseSourceRoute | OptionKind::StrictSourceRoute => {
                RouteOptionRepr::decode(bytes).map(|(o, n)| (DecodedOption::Route(o), n))
            }
            OptionKind::StreamId => {
                StreamIdOptionRepr::decode(bytes).map(|(o, n)| (DecodedOption::StreamId(o), n))
            }
            OptionKind::Timestamp => {
                TimestampOptionRepr::decode(bytes).map(|(o, n)| (DecodedOption::Timestamp(o), n))
            }
        }
    }

    /// The option kind.
    pub fn kind(&self) -> OptionKind {
        match self {
            DecodedOption::EndOfList => OptionKind::EndOfList,
            DecodedOption::NoOp => OptionKind::NoOp,
            DecodedOption::Security(o) => o.envelope().kind(),
            DecodedOption::Route(o) => o.envelope().kind(),
            DecodedOption::StreamId(o) => o.envelope().kind(),
            DecodedOption::Timestamp(o) => o.envelope().kind(),
        }
    }

    /// The envelope of a multi-octet option; `None` for the single-octet markers.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            DecodedOption::EndOfList | DecodedOption::NoOp => None,
            DecodedOption::Security(o) => Some(o.envelope()),
            DecodedOption::Route(o) => Some(o.envelope()),
            DecodedOption::StreamId(o) => Some(o.envelope()),
            DecodedOption::Timestamp(o) => Some(o.envelope()),
        }
    }

    /// The declared length (1 for End-of-List and No-Operation).
    pub fn length(&self) -> u8 {
        self.envelope().map_or(1, Envelope::length)
    }

    /// The record bytes including type and length octets.
    pub fn raw(&self) -> &[u8] {
        match self {
            DecodedOption::EndOfList => END_OF_LIST,
            DecodedOption::NoOp => NO_OP,
            _ => self.envelope().map_or(&[][..], Envelope::raw),
        }
    }

    /// Emit this option into a buffer.
    ///
    /// # Returns
    /// Number of bytes written
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        match self {
            DecodedOption::EndOfList | DecodedOption::NoOp => {
                OptionHeader::new_unchecked(&mut buffer[..]).set_option_type(self.kind().as_u8());
                1
            }
            DecodedOption::Security(o) => o.emit(buffer),
            DecodedOption::Route(o) => o.emit(buffer),
            DecodedOption::StreamId(o) => o.emit(buffer),
            DecodedOption::Timestamp(o) => o.emit(buffer),
        }
    }

    /// Get the wire format size of this option.
    pub fn buffer_len(&self) -> usize {
        match self {
            DecodedOption::EndOfList | DecodedOption::NoOp => 1,
            DecodedOption::Security(_) => SecurityOptionRepr::buffer_len(),
            DecodedOption::Route(o) => o.buffer_len(),
            DecodedOption::StreamId(_) => StreamIdOptionRepr::buffer_len(),
            DecodedOption::Timestamp(o) => o.buffer_len(),
        }
    }
}

impl fmt::Display for DecodedOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodedOption::EndOfList | DecodedOption::NoOp => write!(f, "{}", self.kind()),
            DecodedOption::Security(o) => write!(f, "SEC(level=0x{:04X})", o.level()),
            DecodedOption::Route(o) => {
                write!(f, "{}(ptr={}, routes={})", o.kind(), o.pointer(), o.routes().len())
            }
            DecodedOption::StreamId(o) => write!(f, "SID({})", o.id()),
            DecodedOption::Timestamp(o) => write!(
                f,
                "TS(ptr={}, oflw={}, flg={}, stamps={})",
                o.pointer(),
                o.overflow(),
                o.flag_raw(),
                o.stamps().len()
            ),
        }
    }
}

/// Parse an IPv4 options field into its decoded options.
///
/// Records are decoded in wire order. End-of-List terminates the list and any
/// bytes after it are discarded. Any error aborts the whole parse; a damaged
/// options field never yields a partial list.
///
/// # Example
/// ```
/// use ipv4_options_wire::options::OptionKind;
/// use ipv4_options_wire::repr::{parse, DecodedOption};
///
/// let options = parse(&[1, 136, 4, 0x12, 0x34, 0, 0, 0]).unwrap();
/// assert_eq!(options.len(), 3);
/// assert_eq!(options[0], DecodedOption::NoOp);
/// assert_eq!(options[1].kind(), OptionKind::StreamId);
/// assert_eq!(options[2], DecodedOption::EndOfList);
/// ```
pub fn parse(bytes: &[u8]) -> Result<Vec<DecodedOption>> {
    if bytes.len() > field::MAX_OPTIONS_LEN {
        return Err(Error::OptionsTooLarge);
    }

    let mut options = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let (option, consumed) = match DecodedOption::decode(&bytes[i..]) {
            Ok(decoded) => decoded,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(offset = i, error = %err, "rejected IPv4 options field");
                return Err(err);
            }
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(offset = i, consumed, option = %option, "decoded IPv4 option");

        let end = matches!(option, DecodedOption::EndOfList);
        options.push(option);
        if end {
            break;
        }
        i += consumed;
    }

    Ok(options)
}

/// A high-level representation of a complete IPv4 options field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Repr {
    /// Options in wire order
    pub options: Vec<DecodedOption>,
}

impl Repr {
    /// Create a representation from a list of options.
    pub fn new(options: Vec<DecodedOption>) -> Self {
        Repr { options }
    }

    /// Parse an options field into a high-level representation.
    ///
    /// # Returns
    /// * `Result<Repr>` - The parsed representation or an error
    pub fn parse(bytes: &[u8]) -> Result<Repr> {
        parse(bytes).map(Repr::new)
    }

    /// Emit all options back to back into the provided buffer.
    ///
    /// No padding is added; the caller pads to a 32-bit boundary if needed.
    ///
    /// # Returns
    /// * `Err(Error::OptionsTooLarge)` if the options exceed the options field capacity
    /// * `Err(Error::NotEnoughData)` if `buffer` is shorter than `buffer_len()`
    pub fn emit(&self, buffer: &mut [u8]) -> Result<usize> {
        let len = self.buffer_len();
        if len > field::MAX_OPTIONS_LEN {
            return Err(Error::OptionsTooLarge);
        }
        if buffer.len() < len {
            return Err(Error::NotEnoughData);
        }

        let mut pos = 0;
        for option in &self.options {
            pos += option.emit(&mut buffer[pos..]);
        }
        Ok(pos)
    }

    /// Get the total wire format size of all options.
    pub fn buffer_len(&self) -> usize {
        self.options.iter().map(DecodedOption::buffer_len).sum()
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IPv4 Options:")?;
        for option in &self.options {
            write!(f, " {}", option)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::TimestampFlag;

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_too_large() {
        let bytes = [1u8; 41];
        assert_eq!(parse(&bytes), Err(Error::OptionsTooLarge));
    }

    #[test]
    fn test_parse_end_of_list_discards_trailing() {
        let options = parse(&[1, 0, 0xFF, 0xFF]).unwrap();
        assert_eq!(options, alloc::vec![DecodedOption::NoOp, DecodedOption::EndOfList]);
    }

    #[test]
    fn test_parse_invalid_type_discards_decoded() {
        assert_eq!(parse(&[1, 1, 136, 4, 0, 1, 99]), Err(Error::InvalidOptionType(99)));
    }

    #[test]
    fn test_parse_mixed_options() {
        let bytes = [
            130, 11, 0xD7, 0x88, 0, 0, 0, 0, 0, 0, 0, // security
            1, // nop
            131, 7, 4, 10, 0, 0, 1, // loose source route
            68, 8, 5, 0, 0, 0, 0, 42, // timestamp only
            136, 4, 0, 7, // stream id
            0, // end of list
        ];
        let repr = Repr::parse(&bytes).unwrap();
        let kinds: Vec<OptionKind> = repr.options.iter().map(DecodedOption::kind).collect();
        assert_eq!(
            kinds,
            alloc::vec![
                OptionKind::Security,
                OptionKind::NoOp,
                OptionKind::LooseSourceRoute,
                OptionKind::Timestamp,
                OptionKind::StreamId,
                OptionKind::EndOfList,
            ]
        );
        assert_eq!(repr.buffer_len(), bytes.len());

        match &repr.options[3] {
            DecodedOption::Timestamp(ts) => {
                assert_eq!(ts.flag(), Some(TimestampFlag::TsOnly));
                assert_eq!(ts.stamps()[0].time, 42);
            }
            other => panic!("expected timestamp, got {:?}", other),
        }

        let mut buffer = [0u8; 40];
        let written = repr.emit(&mut buffer).unwrap();
        assert_eq!(&buffer[..written], &bytes[..]);
    }

    #[test]
    fn test_parse_error_aborts() {
        // Valid stream id followed by a truncated security option
        assert_eq!(parse(&[136, 4, 0, 1, 130, 11, 0, 0]), Err(Error::NotEnoughData));
    }

    #[test]
    fn test_decoded_option_accessors() {
        let (option, consumed) = DecodedOption::decode(&[136, 4, 0, 9]).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(option.length(), 4);
        assert_eq!(option.raw(), &[136, 4, 0, 9]);
        assert_eq!(option.buffer_len(), 4);

        assert_eq!(DecodedOption::NoOp.length(), 1);
        assert_eq!(DecodedOption::NoOp.raw(), &[1]);
        assert_eq!(DecodedOption::EndOfList.raw(), &[0]);
        assert!(DecodedOption::EndOfList.envelope().is_none());
    }

    #[test]
    fn test_repr_emit_rejects_short_buffer() {
        let repr = Repr::new(alloc::vec![DecodedOption::StreamId(StreamIdOptionRepr::new(1))]);
        let mut buffer = [0u8; 3];
        assert_eq!(repr.emit(&mut buffer), Err(Error::NotEnoughData));
    }

    #[test]
    fn test_repr_display() {
        let repr = Repr::parse(&[1, 136, 4, 0, 7, 0]).unwrap();
        assert_eq!(format!("{}", repr), "IPv4 Options: NOP SID(7) EOL");
    }
}
