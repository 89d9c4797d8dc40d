/// Stream Identifier option (type 136).

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::field;
use crate::options::{Envelope, OptionHeader, OptionKind};

/// Zero-copy wrapper around a Stream Identifier option (4 bytes).
///
/// Wire format (4 bytes):
/// ```text
/// +--------+--------+--------+--------+
/// |  136   |    4   |    Stream ID    |
/// +--------+--------+--------+--------+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StreamIdOption<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> StreamIdOption<T> {
    /// Stream Identifier option wire format size in bytes.
    pub const LENGTH: usize = field::stream_id::LENGTH;

    /// Create a StreamIdOption without validation.
    ///
    /// # Safety
    /// This does not validate buffer length. Use `new_checked` for validation.
    pub fn new_unchecked(buffer: T) -> Self {
        StreamIdOption { buffer }
    }

    /// Create a StreamIdOption with validation.
    ///
    /// The declared length is checked before the buffer size.
    ///
    /// # Returns
    /// * `Err(Error::StreamIdLengthIncorrect)` if the length octet is not 4
    /// * `Err(Error::NotEnoughData)` if fewer than 4 bytes are available
    pub fn new_checked(buffer: T) -> Result<Self> {
        let option = Self::new_unchecked(buffer);
        if option.buffer.as_ref().len() < field::option::HEADER_LEN {
            return Err(Error::NotEnoughData);
        }
        option.check_length_field()?;
        option.check_len()?;
        Ok(option)
    }

    /// Validate that the buffer is at least 4 bytes long.
    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < Self::LENGTH {
            return Err(Error::NotEnoughData);
        }
        Ok(())
    }

    /// Validate that the declared length is exactly 4.
    pub fn check_length_field(&self) -> Result<()> {
        if self.header().length() as usize != Self::LENGTH {
            return Err(Error::StreamIdLengthIncorrect);
        }
        Ok(())
    }

    /// Get a view of the option header (first 2 bytes).
    pub fn header(&self) -> OptionHeader<&[u8]> {
        OptionHeader::new_unchecked(&self.buffer.as_ref()[..field::option::HEADER_LEN])
    }

    /// Get the stream identifier (2 bytes at offset 2-3, network byte order).
    pub fn id(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::stream_id::ID])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> StreamIdOption<T> {
    /// Set the stream identifier (2 bytes at offset 2-3).
    pub fn set_id(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::stream_id::ID], value);
    }
}

/// High-level representation of a Stream Identifier option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamIdOptionRepr {
    envelope: Envelope,
    id: u16,
}

impl StreamIdOptionRepr {
    /// Build a Stream Identifier option.
    pub fn new(id: u16) -> Self {
        let mut buffer = [0u8; field::stream_id::LENGTH];
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);
        header.set_option_type(OptionKind::StreamId.as_u8());
        header.set_length(field::stream_id::LENGTH as u8);
        StreamIdOption::new_unchecked(&mut buffer[..]).set_id(id);

        StreamIdOptionRepr {
            envelope: Envelope::from_record(OptionKind::StreamId, &buffer),
            id,
        }
    }

    /// Parse a StreamIdOption into a high-level representation.
    ///
    /// # Returns
    /// * `Err(Error::OptionTypeMismatch)` if the type octet is not Stream Identifier
    pub fn parse<T: AsRef<[u8]>>(option: &StreamIdOption<T>) -> Result<Self> {
        if option.header().option_type() != OptionKind::StreamId.as_u8() {
            return Err(Error::OptionTypeMismatch);
        }
        Ok(StreamIdOptionRepr {
            envelope: Envelope::from_record(
                OptionKind::StreamId,
                &option.buffer.as_ref()[..field::stream_id::LENGTH],
            ),
            id: option.id(),
        })
    }

    /// Decode a Stream Identifier record at the start of `bytes`.
    ///
    /// # Returns
    /// The representation and the number of bytes consumed (always 4)
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let option = StreamIdOption::new_checked(bytes)?;
        let repr = Self::parse(&option)?;
        Ok((repr, field::stream_id::LENGTH))
    }

    /// Kind, declared length and a copy of the record bytes.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// SATNET stream identifier.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Emit this representation into a buffer.
    ///
    /// # Returns
    /// Number of bytes written (always 4)
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);
        header.set_option_type(OptionKind::StreamId.as_u8());
        header.set_length(field::stream_id::LENGTH as u8);
        StreamIdOption::new_unchecked(buffer).set_id(self.id);

        Self::buffer_len()
    }

    /// Get the wire format size of this option (always 4 bytes).
    pub const fn buffer_len() -> usize {
        field::stream_id::LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_id_decode() {
        let (repr, consumed) = StreamIdOptionRepr::decode(&[136, 4, 0xBE, 0xEF, 0]).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(repr.id(), 0xBEEF);
        assert_eq!(repr.envelope().raw(), &[136, 4, 0xBE, 0xEF]);
    }

    #[test]
    fn test_stream_id_length_incorrect() {
        assert_eq!(
            StreamIdOptionRepr::decode(&[136, 5, 0, 1, 0]).err(),
            Some(Error::StreamIdLengthIncorrect)
        );
        // Declared length is checked before the available data
        assert_eq!(
            StreamIdOptionRepr::decode(&[136, 3, 0]).err(),
            Some(Error::StreamIdLengthIncorrect)
        );
    }

    #[test]
    fn test_stream_id_not_enough_data() {
        assert_eq!(StreamIdOptionRepr::decode(&[136, 4, 0]).err(), Some(Error::NotEnoughData));
        assert_eq!(StreamIdOptionRepr::decode(&[136]).err(), Some(Error::NotEnoughData));
    }

    #[test]
    fn test_stream_id_new_and_emit() {
        let repr = StreamIdOptionRepr::new(0x0102);
        let mut buffer = [0u8; 4];
        assert_eq!(repr.emit(&mut buffer), 4);
        assert_eq!(buffer, [136, 4, 1, 2]);
        assert_eq!(repr.envelope().raw(), &buffer[..]);

        let (decoded, consumed) = StreamIdOptionRepr::decode(&buffer).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(decoded.id(), 0x0102);
        assert_eq!(decoded, repr);
    }
}
