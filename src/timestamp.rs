/// Internet Timestamp option (type 68).
///
/// The record carries a pointer, a 4-bit overflow counter, a 4-bit flag and a
/// list of stamps whose layout the flag selects: timestamps only (4 bytes per
/// stamp) or address followed by timestamp (8 bytes per stamp).

use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};
use core::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::field;
use crate::options::{Envelope, OptionHeader, OptionKind};

/// Stamp layout selector carried in the low nibble of the fourth octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimestampFlag {
    /// Timestamps only (0)
    TsOnly = 0,
    /// Each timestamp is preceded by the address of the registering entity (1)
    TsAndAddr = 1,
    /// Addresses are prespecified; a node stamps only when its address matches (3)
    TsPrespec = 3,
}

impl TimestampFlag {
    /// Convert a flag nibble to a TimestampFlag.
    ///
    /// # Returns
    /// * `Some(TimestampFlag)` for 0, 1 and 3
    /// * `None` for every other value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value & 0x0F {
            0 => Some(TimestampFlag::TsOnly),
            1 => Some(TimestampFlag::TsAndAddr),
            3 => Some(TimestampFlag::TsPrespec),
            _ => None,
        }
    }

    /// Convert the TimestampFlag to its nibble value.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Wire size of a single stamp under this flag.
    pub fn stamp_len(&self) -> usize {
        match self {
            TimestampFlag::TsOnly => 4,
            TimestampFlag::TsAndAddr | TimestampFlag::TsPrespec => 8,
        }
    }
}

/// A single timestamp record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    /// Milliseconds since midnight UT
    pub time: u32,
    /// Registering (or prespecified) address, absent for timestamp-only records
    pub address: Option<u32>,
}

impl Stamp {
    /// The address as an [`Ipv4Addr`], for presentation.
    pub fn ipv4_addr(&self) -> Option<Ipv4Addr> {
        self.address.map(Ipv4Addr::from)
    }
}

/// Zero-copy wrapper around an Internet Timestamp option.
///
/// Wire format:
/// ```text
/// +--------+--------+--------+--------+
/// |   68   | Length | Pointer|oflw|flg|
/// +--------+--------+--------+--------+
/// |    internet address (flag 1, 3)   |
/// +--------+--------+--------+--------+
/// |             timestamp             |
/// +--------+--------+--------+--------+
/// |                 .                 |
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimestampOption<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> TimestampOption<T> {
    /// Create a TimestampOption without validation.
    ///
    /// # Safety
    /// This does not validate buffer length. Use `new_checked` for validation.
    pub fn new_unchecked(buffer: T) -> Self {
        TimestampOption { buffer }
    }

    /// Create a TimestampOption with validation.
    ///
    /// # Returns
    /// * `Err(Error::OptionsTooLarge)` if the declared length exceeds 40
    /// * `Err(Error::NotEnoughData)` if the declared length runs past the buffer
    /// * `Err(Error::TsLengthIncorrect)` if the stamp data does not match the flag
    pub fn new_checked(buffer: T) -> Result<Self> {
        let option = Self::new_unchecked(buffer);
        option.check_len()?;
        option.check_stamp_length()?;
        Ok(option)
    }

    /// Validate the declared length against the options capacity and the buffer.
    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < field::option::HEADER_LEN {
            return Err(Error::NotEnoughData);
        }
        let declared = self.length() as usize;
        if declared > field::MAX_OPTIONS_LEN {
            return Err(Error::OptionsTooLarge);
        }
        if len < declared {
            return Err(Error::NotEnoughData);
        }
        Ok(())
    }

    /// Validate that the stamp data is a whole number of stamps for the flag.
    ///
    /// Records with an unknown flag only need their 4-byte header.
    pub fn check_stamp_length(&self) -> Result<()> {
        let declared = self.length() as usize;
        if declared < field::timestamp::HEADER_LEN {
            return Err(Error::TsLengthIncorrect);
        }
        if let Some(flag) = self.flag() {
            if (declared - field::timestamp::HEADER_LEN) % flag.stamp_len() != 0 {
                return Err(Error::TsLengthIncorrect);
            }
        }
        Ok(())
    }

    /// Get a view of the option header (first 2 bytes).
    pub fn header(&self) -> OptionHeader<&[u8]> {
        OptionHeader::new_unchecked(&self.buffer.as_ref()[..field::option::HEADER_LEN])
    }

    /// Get the declared record length.
    pub fn length(&self) -> u8 {
        self.buffer.as_ref()[field::option::LENGTH.start]
    }

    /// Get the pointer (offset 2).
    pub fn pointer(&self) -> u8 {
        self.buffer.as_ref()[field::timestamp::POINTER.start]
    }

    /// Get the overflow count (high nibble of offset 3).
    pub fn overflow(&self) -> u8 {
        self.buffer.as_ref()[field::timestamp::OVERFLOW_FLAG.start] >> 4
    }

    /// Get the raw flag nibble (low nibble of offset 3).
    pub fn flag_raw(&self) -> u8 {
        self.buffer.as_ref()[field::timestamp::OVERFLOW_FLAG.start] & 0x0F
    }

    /// Get the flag, if it is one of the defined values.
    pub fn flag(&self) -> Option<TimestampFlag> {
        TimestampFlag::from_u8(self.flag_raw())
    }

    /// Get the stamp data following the 4-byte header.
    pub fn stamp_data(&self) -> &[u8] {
        &self.buffer.as_ref()[field::timestamp::STAMPS(self.length() as usize)]
    }

    /// Decode all stamps in wire order. Yields nothing for an unknown flag.
    pub fn stamps(&self) -> impl Iterator<Item = Stamp> + '_ {
        let (data, stamp_len) = match self.flag() {
            Some(flag) => (self.stamp_data(), flag.stamp_len()),
            None => (&[][..], 4),
        };
        data.chunks_exact(stamp_len).map(move |chunk| {
            if stamp_len == 4 {
                Stamp {
                    time: NetworkEndian::read_u32(chunk),
                    address: None,
                }
            } else {
                Stamp {
                    time: NetworkEndian::read_u32(&chunk[4..8]),
                    address: Some(NetworkEndian::read_u32(&chunk[0..4])),
                }
            }
        })
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> TimestampOption<T> {
    /// Set the pointer (offset 2).
    pub fn set_pointer(&mut self, value: u8) {
        self.buffer.as_mut()[field::timestamp::POINTER.start] = value;
    }

    /// Set the overflow count and raw flag nibble (offset 3).
    ///
    /// Only the low 4 bits of each value are written.
    pub fn set_overflow_flag(&mut self, overflow: u8, flag: u8) {
        self.buffer.as_mut()[field::timestamp::OVERFLOW_FLAG.start] =
            ((overflow & 0x0F) << 4) | (flag & 0x0F);
    }

    /// Set stamp `index` using the layout selected by `flag`.
    ///
    /// A missing address is written as 0.0.0.0 for the address-carrying layouts.
    pub fn set_stamp(&mut self, index: usize, flag: TimestampFlag, stamp: &Stamp) {
        let start = field::timestamp::HEADER_LEN + index * flag.stamp_len();
        let buf = self.buffer.as_mut();
        match flag {
            TimestampFlag::TsOnly => NetworkEndian::write_u32(&mut buf[start..start + 4], stamp.time),
            TimestampFlag::TsAndAddr | TimestampFlag::TsPrespec => {
                NetworkEndian::write_u32(&mut buf[start..start + 4], stamp.address.unwrap_or(0));
                NetworkEndian::write_u32(&mut buf[start + 4..start + 8], stamp.time);
            }
        }
    }
}

/// High-level representation of an Internet Timestamp option.
///
/// Fields are read through accessors so the decoded values always agree with
/// the record bytes held in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampOptionRepr {
    envelope: Envelope,
    pointer: u8,
    overflow: u8,
    flag: u8,
    stamps: Vec<Stamp>,
}

impl TimestampOptionRepr {
    /// Build a timestamp option.
    ///
    /// Stamps are normalised to the flag's layout: addresses are dropped for
    /// [`TimestampFlag::TsOnly`] and default to 0.0.0.0 otherwise.
    ///
    /// # Returns
    /// * `Err(Error::OptionsTooLarge)` if the record would not fit the options field
    pub fn new(pointer: u8, overflow: u8, flag: TimestampFlag, stamps: Vec<Stamp>) -> Result<Self> {
        let len = field::timestamp::HEADER_LEN + stamps.len() * flag.stamp_len();
        if len > field::MAX_OPTIONS_LEN {
            return Err(Error::OptionsTooLarge);
        }

        let stamps = stamps
            .into_iter()
            .map(|stamp| Stamp {
                time: stamp.time,
                address: match flag {
                    TimestampFlag::TsOnly => None,
                    _ => Some(stamp.address.unwrap_or(0)),
                },
            })
            .collect();
        let mut repr = TimestampOptionRepr {
            envelope: Envelope::from_record(OptionKind::Timestamp, &[OptionKind::Timestamp.as_u8(), len as u8]),
            pointer,
            overflow: overflow & 0x0F,
            flag: flag.as_u8(),
            stamps,
        };
        let mut buffer = [0u8; field::MAX_OPTIONS_LEN];
        let written = repr.emit(&mut buffer);
        repr.envelope = Envelope::from_record(OptionKind::Timestamp, &buffer[..written]);
        Ok(repr)
    }

    /// Parse a TimestampOption into a high-level representation.
    ///
    /// # Returns
    /// * `Err(Error::OptionTypeMismatch)` if the type octet is not Internet Timestamp
    pub fn parse<T: AsRef<[u8]>>(option: &TimestampOption<T>) -> Result<Self> {
        if option.header().option_type() != OptionKind::Timestamp.as_u8() {
            return Err(Error::OptionTypeMismatch);
        }
        let len = option.length() as usize;

        Ok(TimestampOptionRepr {
            envelope: Envelope::from_record(OptionKind::Timestamp, &option.buffer.as_ref()[..len]),
            pointer: option.pointer(),
            overflow: option.overflow(),
            flag: option.flag_raw(),
            stamps: option.stamps().collect(),
        })
    }

    /// Decode a timestamp record at the start of `bytes`.
    ///
    /// # Returns
    /// The representation and the number of bytes consumed (the declared length)
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let option = TimestampOption::new_checked(bytes)?;
        let repr = Self::parse(&option)?;
        Ok((repr, option.length() as usize))
    }

    /// Kind, declared length and a copy of the record bytes.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Byte offset (1-based) of the next free stamp slot.
    pub fn pointer(&self) -> u8 {
        self.pointer
    }

    /// Number of hops that could not register a stamp (0..=15).
    pub fn overflow(&self) -> u8 {
        self.overflow
    }

    /// The raw flag nibble, defined or not.
    pub fn flag_raw(&self) -> u8 {
        self.flag
    }

    /// The flag, if it is one of the defined values.
    pub fn flag(&self) -> Option<TimestampFlag> {
        TimestampFlag::from_u8(self.flag)
    }

    /// Stamps in wire order (empty when the flag is not a defined value).
    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    /// Emit this representation into a buffer.
    ///
    /// Records with an unknown flag are written back with their undecoded
    /// stamp data.
    ///
    /// # Returns
    /// Number of bytes written
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let len = self.buffer_len();
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);
        header.set_option_type(OptionKind::Timestamp.as_u8());
        header.set_length(len as u8);

        let mut option = TimestampOption::new_unchecked(&mut buffer[..]);
        option.set_pointer(self.pointer);
        option.set_overflow_flag(self.overflow, self.flag);
        match self.flag() {
            Some(flag) => {
                for (index, stamp) in self.stamps.iter().enumerate() {
                    option.set_stamp(index, flag, stamp);
                }
            }
            None => {
                let raw = &self.envelope.raw()[field::timestamp::HEADER_LEN..];
                buffer[field::timestamp::STAMPS(len)].copy_from_slice(raw);
            }
        }

        len
    }

    /// Get the wire format size of this option.
    pub fn buffer_len(&self) -> usize {
        match self.flag() {
            Some(flag) => field::timestamp::HEADER_LEN + self.stamps.len() * flag.stamp_len(),
            None => self.envelope.raw().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS_ONLY: [u8; 40] = [
        68, 40, 41, 64, 3, 238, 171, 55, 3, 238, 171, 49, 3, 238, 171, 44, 3, 238, 171, 44, 3,
        238, 171, 46, 3, 238, 171, 48, 3, 238, 171, 130, 3, 238, 171, 118, 3, 238, 171, 118,
    ];

    const TS_PRESPEC: [u8; 12] = [68, 12, 13, 67, 66, 109, 38, 50, 2, 208, 113, 237];

    #[test]
    fn test_timestamp_flag() {
        assert_eq!(TimestampFlag::from_u8(0), Some(TimestampFlag::TsOnly));
        assert_eq!(TimestampFlag::from_u8(1), Some(TimestampFlag::TsAndAddr));
        assert_eq!(TimestampFlag::from_u8(3), Some(TimestampFlag::TsPrespec));
        assert_eq!(TimestampFlag::from_u8(2), None);
        assert_eq!(TimestampFlag::TsOnly.stamp_len(), 4);
        assert_eq!(TimestampFlag::TsPrespec.stamp_len(), 8);
    }

    #[test]
    fn test_timestamp_only() {
        let (repr, consumed) = TimestampOptionRepr::decode(&TS_ONLY).unwrap();
        assert_eq!(consumed, 40);
        assert_eq!(repr.pointer(), 41);
        assert_eq!(repr.overflow(), 4);
        assert_eq!(repr.flag(), Some(TimestampFlag::TsOnly));
        assert_eq!(repr.stamps().len(), 9);
        assert!(repr.stamps().iter().all(|stamp| stamp.address.is_none()));
        assert_eq!(repr.stamps()[0].time, u32::from_be_bytes([3, 238, 171, 55]));
        assert_eq!(repr.stamps()[8].time, u32::from_be_bytes([3, 238, 171, 118]));
    }

    #[test]
    fn test_timestamp_prespecified() {
        let (repr, consumed) = TimestampOptionRepr::decode(&TS_PRESPEC).unwrap();
        assert_eq!(consumed, 12);
        assert_eq!(repr.overflow(), 4);
        assert_eq!(repr.flag(), Some(TimestampFlag::TsPrespec));
        assert_eq!(
            repr.stamps(),
            &[Stamp {
                time: u32::from_be_bytes([2, 208, 113, 237]),
                address: Some(u32::from_be_bytes([66, 109, 38, 50])),
            }][..]
        );
        assert_eq!(repr.stamps()[0].ipv4_addr(), Some(Ipv4Addr::new(66, 109, 38, 50)));
    }

    #[test]
    fn test_timestamp_length_incorrect() {
        // Timestamp only with a 5-byte payload
        let bytes = [68u8, 9, 5, 0, 0, 0, 0, 1, 2];
        assert_eq!(TimestampOptionRepr::decode(&bytes).err(), Some(Error::TsLengthIncorrect));

        // Address and timestamp with a 4-byte payload
        let bytes = [68u8, 8, 5, 1, 0, 0, 0, 1];
        assert_eq!(TimestampOptionRepr::decode(&bytes).err(), Some(Error::TsLengthIncorrect));

        // Declared length shorter than the header
        let bytes = [68u8, 3, 5];
        assert_eq!(TimestampOptionRepr::decode(&bytes).err(), Some(Error::TsLengthIncorrect));
    }

    #[test]
    fn test_timestamp_too_large() {
        let mut bytes = [0u8; 44];
        bytes[0] = 68;
        bytes[1] = 44;
        bytes[2] = 5;
        assert_eq!(TimestampOptionRepr::decode(&bytes).err(), Some(Error::OptionsTooLarge));
    }

    #[test]
    fn test_timestamp_not_enough_data() {
        assert_eq!(TimestampOptionRepr::decode(&TS_ONLY[..39]).err(), Some(Error::NotEnoughData));
        assert_eq!(TimestampOptionRepr::decode(&[68u8]).err(), Some(Error::NotEnoughData));
    }

    #[test]
    fn test_timestamp_unknown_flag_yields_no_stamps() {
        let bytes = [68u8, 9, 5, 0x12, 1, 2, 3, 4, 5];
        let (repr, consumed) = TimestampOptionRepr::decode(&bytes).unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(repr.flag_raw(), 2);
        assert_eq!(repr.overflow(), 1);
        assert_eq!(repr.flag(), None);
        assert!(repr.stamps().is_empty());

        let mut buffer = [0u8; 9];
        assert_eq!(repr.emit(&mut buffer), 9);
        assert_eq!(buffer, bytes);
    }

    #[test]
    fn test_timestamp_new_and_emit() {
        let stamps = alloc::vec![
            Stamp { time: 1000, address: None },
            Stamp { time: 2000, address: Some(0x0A00_0001) },
        ];
        let repr = TimestampOptionRepr::new(5, 0, TimestampFlag::TsAndAddr, stamps).unwrap();
        assert_eq!(repr.buffer_len(), 20);
        assert_eq!(repr.stamps()[0].address, Some(0));
        assert_eq!(repr.envelope().length(), 20);

        let mut buffer = [0u8; 20];
        assert_eq!(repr.emit(&mut buffer), 20);
        let (decoded, _) = TimestampOptionRepr::decode(&buffer).unwrap();
        assert_eq!(decoded, repr);
    }

    #[test]
    fn test_timestamp_overflow_setter_masks() {
        let mut buffer = [0u8; 4];
        let mut option = TimestampOption::new_unchecked(&mut buffer[..]);
        option.set_overflow_flag(0x1F, 0x13);
        assert_eq!(option.overflow(), 0x0F);
        assert_eq!(option.flag_raw(), 0x03);
    }

    #[test]
    fn test_timestamp_envelope_matches_emit() {
        let (repr, _) = TimestampOptionRepr::decode(&TS_PRESPEC).unwrap();
        let mut buffer = [0u8; 12];
        assert_eq!(repr.emit(&mut buffer), repr.envelope().raw().len());
        assert_eq!(&buffer[..], repr.envelope().raw());
        assert_eq!(repr.buffer_len(), repr.envelope().length() as usize);

        // Rebuilding under another flag re-derives the record instead of
        // leaving the decoded envelope behind.
        let rebuilt = TimestampOptionRepr::new(
            repr.pointer(),
            repr.overflow(),
            TimestampFlag::TsOnly,
            repr.stamps().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt.envelope().raw(), &[68, 8, 13, 0x40, 2, 208, 113, 237]);
        let (reparsed, _) = TimestampOptionRepr::decode(rebuilt.envelope().raw()).unwrap();
        assert_eq!(reparsed, rebuilt);
        assert!(reparsed.stamps().iter().all(|stamp| stamp.address.is_none()));
    }

    #[test]
    fn test_timestamp_new_too_large() {
        let stamps = alloc::vec![Stamp { time: 0, address: None }; 5];
        assert_eq!(
            TimestampOptionRepr::new(5, 0, TimestampFlag::TsPrespec, stamps).err(),
            Some(Error::OptionsTooLarge)
        );
    }
}
