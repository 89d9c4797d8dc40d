/// Security option (type 130).
///
/// Provides a zero-copy wrapper around the 11-byte security option record and
/// a high-level representation carrying the level, compartment, handling
/// restriction and transmission control code fields.

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::field;
use crate::options::{Envelope, OptionHeader, OptionKind};

/// Classification levels defined for the security option's level field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SecurityLevel {
    /// Unclassified (0x0000)
    Unclassified = 0x0000,
    /// Confidential (0xF135)
    Confidential = 0xF135,
    /// EFTO (0x789A)
    Efto = 0x789A,
    /// MMMM (0xBC4D)
    Mmmm = 0xBC4D,
    /// PROG (0x5E26)
    Prog = 0x5E26,
    /// Restricted (0xAF13)
    Restricted = 0xAF13,
    /// Secret (0xD788)
    Secret = 0xD788,
    /// Top Secret (0x6BC5)
    TopSecret = 0x6BC5,
    /// Reserved for future use (0x35E2)
    Reserved0 = 0x35E2,
    /// Reserved for future use (0x9AF1)
    Reserved1 = 0x9AF1,
    /// Reserved for future use (0x4D78)
    Reserved2 = 0x4D78,
    /// Reserved for future use (0x24BD)
    Reserved3 = 0x24BD,
    /// Reserved for future use (0x135E)
    Reserved4 = 0x135E,
    /// Reserved for future use (0x89AF)
    Reserved5 = 0x89AF,
    /// Reserved for future use (0xC4D6)
    Reserved6 = 0xC4D6,
    /// Reserved for future use (0xE26B)
    Reserved7 = 0xE26B,
}

impl SecurityLevel {
    /// Convert a level field value to a SecurityLevel.
    ///
    /// # Returns
    /// * `Some(SecurityLevel)` if value is one of the defined codes
    /// * `None` otherwise
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0000 => Some(SecurityLevel::Unclassified),
            0xF135 => Some(SecurityLevel::Confidential),
            0x789A => Some(SecurityLevel::Efto),
            0xBC4D => Some(SecurityLevel::Mmmm),
            0x5E26 => Some(SecurityLevel::Prog),
            0xAF13 => Some(SecurityLevel::Restricted),
            0xD788 => Some(SecurityLevel::Secret),
            0x6BC5 => Some(SecurityLevel::TopSecret),
            0x35E2 => Some(SecurityLevel::Reserved0),
            0x9AF1 => Some(SecurityLevel::Reserved1),
            0x4D78 => Some(SecurityLevel::Reserved2),
            0x24BD => Some(SecurityLevel::Reserved3),
            0x135E => Some(SecurityLevel::Reserved4),
            0x89AF => Some(SecurityLevel::Reserved5),
            0xC4D6 => Some(SecurityLevel::Reserved6),
            0xE26B => Some(SecurityLevel::Reserved7),
            _ => None,
        }
    }

    /// Convert the SecurityLevel to its level field value.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Zero-copy wrapper around a Security option (11 bytes).
///
/// Wire format (11 bytes):
/// ```text
/// +--------+--------+--------+--------+--------+--------+--------+--------+
/// |  130   |   11   |      Level      |   Compartment   |   Restriction   |
/// +--------+--------+--------+--------+--------+--------+--------+--------+
/// |   Transmission Control Code (24)  |
/// +--------+--------+--------+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SecurityOption<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> SecurityOption<T> {
    /// Security option wire format size in bytes.
    pub const LENGTH: usize = field::security::LENGTH;

    /// Create a SecurityOption without validation.
    ///
    /// # Safety
    /// This does not validate buffer length. Use `new_checked` for validation.
    pub fn new_unchecked(buffer: T) -> Self {
        SecurityOption { buffer }
    }

    /// Create a SecurityOption with validation.
    ///
    /// # Returns
    /// * `Ok(SecurityOption)` if the buffer holds a complete, 11-byte record
    /// * `Err(Error::NotEnoughData)` if fewer than 11 bytes are available
    /// * `Err(Error::InvalidLength)` if the length octet is not 11
    pub fn new_checked(buffer: T) -> Result<Self> {
        let option = Self::new_unchecked(buffer);
        option.check_len()?;
        option.check_length_field()?;
        Ok(option)
    }

    /// Validate that the buffer is at least 11 bytes long.
    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < Self::LENGTH {
            return Err(Error::NotEnoughData);
        }
        Ok(())
    }

    /// Validate that the declared length is exactly 11.
    pub fn check_length_field(&self) -> Result<()> {
        if self.header().length() as usize != Self::LENGTH {
            return Err(Error::InvalidLength);
        }
        Ok(())
    }

    /// Get a view of the option header (first 2 bytes).
    pub fn header(&self) -> OptionHeader<&[u8]> {
        OptionHeader::new_unchecked(&self.buffer.as_ref()[..field::option::HEADER_LEN])
    }

    /// Get the security level (2 bytes at offset 2-3, network byte order).
    pub fn level(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::security::LEVEL])
    }

    /// Get the compartment (2 bytes at offset 4-5, network byte order).
    pub fn compartment(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::security::COMPARTMENT])
    }

    /// Get the handling restriction (2 bytes at offset 6-7, network byte order).
    pub fn restriction(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::security::RESTRICTION])
    }

    /// Get the transmission control code (3 bytes at offset 8-10, network byte order).
    ///
    /// # Returns
    /// The 24-bit code in the low bits of a u32
    pub fn tcc(&self) -> u32 {
        NetworkEndian::read_u24(&self.buffer.as_ref()[field::security::TCC])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> SecurityOption<T> {
    /// Set the security level (2 bytes at offset 2-3).
    pub fn set_level(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::security::LEVEL], value);
    }

    /// Set the compartment (2 bytes at offset 4-5).
    pub fn set_compartment(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::security::COMPARTMENT], value);
    }

    /// Set the handling restriction (2 bytes at offset 6-7).
    pub fn set_restriction(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::security::RESTRICTION], value);
    }

    /// Set the transmission control code (3 bytes at offset 8-10).
    ///
    /// Only the low 24 bits of `value` are written.
    pub fn set_tcc(&mut self, value: u32) {
        NetworkEndian::write_u24(&mut self.buffer.as_mut()[field::security::TCC], value & 0x00FF_FFFF);
    }
}

/// High-level representation of a Security option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityOptionRepr {
    envelope: Envelope,
    level: u16,
    compartment: u16,
    restriction: u16,
    tcc: u32,
}

impl SecurityOptionRepr {
    /// Build a Security option from its field values.
    pub fn new(level: u16, compartment: u16, restriction: u16, tcc: u32) -> Self {
        let mut buffer = [0u8; field::security::LENGTH];
        let mut option = SecurityOption::new_unchecked(&mut buffer[..]);
        option.set_level(level);
        option.set_compartment(compartment);
        option.set_restriction(restriction);
        option.set_tcc(tcc);
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);
        header.set_option_type(OptionKind::Security.as_u8());
        header.set_length(field::security::LENGTH as u8);

        SecurityOptionRepr {
            envelope: Envelope::from_record(OptionKind::Security, &buffer),
            level,
            compartment,
            restriction,
            tcc: tcc & 0x00FF_FFFF,
        }
    }

    /// Parse a SecurityOption into a high-level representation.
    ///
    /// # Returns
    /// * `Ok(SecurityOptionRepr)` with all fields populated
    /// * `Err(Error::OptionTypeMismatch)` if the type octet is not Security
    pub fn parse<T: AsRef<[u8]>>(option: &SecurityOption<T>) -> Result<Self> {
        if option.header().option_type() != OptionKind::Security.as_u8() {
            return Err(Error::OptionTypeMismatch);
        }
        Ok(SecurityOptionRepr {
            envelope: Envelope::from_record(
                OptionKind::Security,
                &option.buffer.as_ref()[..field::security::LENGTH],
            ),
            level: option.level(),
            compartment: option.compartment(),
            restriction: option.restriction(),
            tcc: option.tcc(),
        })
    }

    /// Decode a Security record at the start of `bytes`.
    ///
    /// # Returns
    /// The representation and the number of bytes consumed (always 11)
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let option = SecurityOption::new_checked(bytes)?;
        let repr = Self::parse(&option)?;
        Ok((repr, field::security::LENGTH))
    }

    /// Kind, declared length and a copy of the record bytes.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Security level (see [`SecurityLevel`] for the defined codes).
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Compartments.
    pub fn compartment(&self) -> u16 {
        self.compartment
    }

    /// Handling restrictions.
    pub fn restriction(&self) -> u16 {
        self.restriction
    }

    /// Transmission control code (24 bits).
    pub fn tcc(&self) -> u32 {
        self.tcc
    }

    /// The level field as a named classification, if it is one.
    pub fn level_kind(&self) -> Option<SecurityLevel> {
        SecurityLevel::from_u16(self.level)
    }

    /// Emit this representation into a buffer.
    ///
    /// # Parameters
    /// * `buffer` - 11-byte buffer to write the option into
    ///
    /// # Returns
    /// Number of bytes written (always 11)
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);
        header.set_option_type(OptionKind::Security.as_u8());
        header.set_length(field::security::LENGTH as u8);

        let mut option = SecurityOption::new_unchecked(buffer);
        option.set_level(self.level);
        option.set_compartment(self.compartment);
        option.set_restriction(self.restriction);
        option.set_tcc(self.tcc);

        Self::buffer_len()
    }

    /// Get the wire format size of this option (always 11 bytes).
    pub const fn buffer_len() -> usize {
        field::security::LENGTH
    }
}
