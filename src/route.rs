/// Route record options: Record Route (7), Loose Source and Record Route
/// (131) and Strict Source and Record Route (137).
///
/// The three kinds share one layout and differ only in their type octet.

use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};
use core::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::field;
use crate::options::{Envelope, OptionHeader, OptionKind};

/// Zero-copy wrapper around a route record option.
///
/// Wire format (3 + 4*N bytes):
/// ```text
/// +--------+--------+--------+---------//--------+
/// |  Type  | Length | Pointer|     route data    |
/// +--------+--------+--------+---------//--------+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteOption<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> RouteOption<T> {
    /// Create a RouteOption without validation.
    ///
    /// # Safety
    /// This does not validate buffer length. Use `new_checked` for validation.
    pub fn new_unchecked(buffer: T) -> Self {
        RouteOption { buffer }
    }

    /// Create a RouteOption with validation.
    ///
    /// # Returns
    /// * `Ok(RouteOption)` if the declared record fits and holds whole addresses
    /// * `Err(Error::NotEnoughData)` if the declared length runs past the buffer
    /// * `Err(Error::RouteLengthIncorrect)` if route data is not a multiple of 4
    pub fn new_checked(buffer: T) -> Result<Self> {
        let option = Self::new_unchecked(buffer);
        option.check_len()?;
        option.check_route_length()?;
        Ok(option)
    }

    /// Validate that the buffer holds the length octet and the whole declared record.
    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < field::option::HEADER_LEN || len < self.length() as usize {
            return Err(Error::NotEnoughData);
        }
        Ok(())
    }

    /// Validate that the declared length covers the pointer plus whole 4-byte addresses.
    pub fn check_route_length(&self) -> Result<()> {
        let len = self.length() as usize;
        if len < field::route::HEADER_LEN
            || (len - field::route::HEADER_LEN) % field::route::ADDRESS_LEN != 0
        {
            return Err(Error::RouteLengthIncorrect);
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

    /// Get the pointer (offset 2), 1-based from the type octet.
    pub fn pointer(&self) -> u8 {
        self.buffer.as_ref()[field::route::POINTER.start]
    }

    /// Number of route slots in the record.
    pub fn route_count(&self) -> usize {
        (self.length() as usize - field::route::HEADER_LEN) / field::route::ADDRESS_LEN
    }

    /// Get route `index` (4 bytes, network byte order).
    pub fn route(&self, index: usize) -> u32 {
        let start = field::route::HEADER_LEN + index * field::route::ADDRESS_LEN;
        NetworkEndian::read_u32(&self.buffer.as_ref()[start..start + field::route::ADDRESS_LEN])
    }

    /// Iterate over all route slots in wire order.
    pub fn routes(&self) -> impl Iterator<Item = u32> + '_ {
        self.buffer.as_ref()[field::route::ROUTES(self.length() as usize)]
            .chunks_exact(field::route::ADDRESS_LEN)
            .map(NetworkEndian::read_u32)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> RouteOption<T> {
    /// Set the pointer (offset 2).
    pub fn set_pointer(&mut self, value: u8) {
        self.buffer.as_mut()[field::route::POINTER.start] = value;
    }

    /// Set route `index` (4 bytes, network byte order).
    pub fn set_route(&mut self, index: usize, addr: u32) {
        let start = field::route::HEADER_LEN + index * field::route::ADDRESS_LEN;
        NetworkEndian::write_u32(
            &mut self.buffer.as_mut()[start..start + field::route::ADDRESS_LEN],
            addr,
        );
    }
}

/// High-level representation of a route record option.
///
/// Decoded values are read-only; build a new representation with
/// [`RouteOptionRepr::new`] to change them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOptionRepr {
    envelope: Envelope,
    pointer: u8,
    routes: Vec<u32>,
}

impl RouteOptionRepr {
    /// Build a route record option.
    ///
    /// # Returns
    /// * `Err(Error::OptionTypeMismatch)` if `kind` is not one of the route kinds
    /// * `Err(Error::OptionsTooLarge)` if the record would not fit the options field
    pub fn new(kind: OptionKind, pointer: u8, routes: Vec<u32>) -> Result<Self> {
        if !kind.is_route() {
            return Err(Error::OptionTypeMismatch);
        }
        let len = field::route::HEADER_LEN + routes.len() * field::route::ADDRESS_LEN;
        if len > field::MAX_OPTIONS_LEN {
            return Err(Error::OptionsTooLarge);
        }

        let mut repr = RouteOptionRepr {
            envelope: Envelope::from_record(kind, &[kind.as_u8(), len as u8]),
            pointer,
            routes,
        };
        let mut buffer = [0u8; field::MAX_OPTIONS_LEN];
        let written = repr.emit(&mut buffer);
        repr.envelope = Envelope::from_record(kind, &buffer[..written]);
        Ok(repr)
    }

    /// Parse a RouteOption into a high-level representation.
    ///
    /// # Returns
    /// * `Ok(RouteOptionRepr)` with all routes decoded
    /// * `Err(Error::OptionTypeMismatch)` if the type octet is not a route kind
    pub fn parse<T: AsRef<[u8]>>(option: &RouteOption<T>) -> Result<Self> {
        let kind = OptionKind::from_u8(option.header().option_type())
            .filter(OptionKind::is_route)
            .ok_or(Error::OptionTypeMismatch)?;
        let len = option.length() as usize;

        Ok(RouteOptionRepr {
            envelope: Envelope::from_record(kind, &option.buffer.as_ref()[..len]),
            pointer: option.pointer(),
            routes: option.routes().collect(),
        })
    }

    /// Decode a route record at the start of `bytes`.
    ///
    /// # Returns
    /// The representation and the number of bytes consumed (the declared length)
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let option = RouteOption::new_checked(bytes)?;
        let repr = Self::parse(&option)?;
        Ok((repr, option.length() as usize))
    }

    /// The option kind (Record Route, Loose or Strict Source Route).
    pub fn kind(&self) -> OptionKind {
        self.envelope.kind()
    }

    /// Kind, declared length and a copy of the record bytes.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Byte offset (1-based) of the next free route slot.
    pub fn pointer(&self) -> u8 {
        self.pointer
    }

    /// Route addresses in wire order.
    pub fn routes(&self) -> &[u32] {
        &self.routes
    }

    /// Route addresses as [`Ipv4Addr`] values, for presentation.
    pub fn route_addrs(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.routes.iter().map(|&addr| Ipv4Addr::from(addr))
    }

    /// Emit this representation into a buffer.
    ///
    /// # Parameters
    /// * `buffer` - Buffer of at least `buffer_len()` bytes
    ///
    /// # Returns
    /// Number of bytes written
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let len = self.buffer_len();
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);
        header.set_option_type(self.kind().as_u8());
        header.set_length(len as u8);

        let mut option = RouteOption::new_unchecked(buffer);
        option.set_pointer(self.pointer);
        for (index, &addr) in self.routes.iter().enumerate() {
            option.set_route(index, addr);
        }

        len
    }

    /// Get the wire format size of this option (3 + 4 bytes per route).
    pub fn buffer_len(&self) -> usize {
        field::route::HEADER_LEN + self.routes.len() * field::route::ADDRESS_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD_ROUTE: [u8; 39] = [
        7, 39, 40, 137, 165, 1, 25, 66, 109, 38, 50, 66, 109, 52, 166, 66, 109, 52, 165, 198, 32,
        160, 59, 109, 105, 96, 13, 109, 105, 102, 45, 10, 32, 67, 205, 10, 32, 67, 218,
    ];

    #[test]
    fn test_route_option_fields() {
        let option = RouteOption::new_checked(&RECORD_ROUTE[..]).unwrap();
        assert_eq!(option.length(), 39);
        assert_eq!(option.pointer(), 40);
        assert_eq!(option.route_count(), 9);
        assert_eq!(option.route(0), u32::from_be_bytes([137, 165, 1, 25]));
        assert_eq!(option.route(8), u32::from_be_bytes([10, 32, 67, 218]));
        assert_eq!(option.routes().count(), 9);
    }

    #[test]
    fn test_route_decode() {
        let (repr, consumed) = RouteOptionRepr::decode(&RECORD_ROUTE).unwrap();
        assert_eq!(consumed, 39);
        assert_eq!(repr.kind(), OptionKind::RecordRoute);
        assert_eq!(repr.pointer(), 40);
        assert_eq!(repr.routes().len(), 9);
        assert_eq!(repr.envelope().length(), 39);
        assert_eq!(repr.envelope().raw(), &RECORD_ROUTE[..]);
        assert_eq!(repr.route_addrs().next(), Some(Ipv4Addr::new(137, 165, 1, 25)));
    }

    #[test]
    fn test_route_length_incorrect() {
        let bytes = [131u8, 6, 4, 10, 0, 0];
        assert_eq!(RouteOptionRepr::decode(&bytes).err(), Some(Error::RouteLengthIncorrect));

        let too_short = [137u8, 2, 0];
        assert_eq!(RouteOptionRepr::decode(&too_short).err(), Some(Error::RouteLengthIncorrect));
    }

    #[test]
    fn test_route_not_enough_data() {
        assert_eq!(RouteOptionRepr::decode(&RECORD_ROUTE[..38]).err(), Some(Error::NotEnoughData));
        assert_eq!(RouteOptionRepr::decode(&[7u8]).err(), Some(Error::NotEnoughData));
    }

    #[test]
    fn test_route_without_addresses() {
        let (repr, consumed) = RouteOptionRepr::decode(&[131u8, 3, 4]).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(repr.kind(), OptionKind::LooseSourceRoute);
        assert!(repr.routes().is_empty());
    }

    #[test]
    fn test_route_new_and_emit() {
        let repr = RouteOptionRepr::new(
            OptionKind::StrictSourceRoute,
            4,
            alloc::vec![0xC0A8_0001, 0x0A00_0001],
        )
        .unwrap();
        assert_eq!(repr.buffer_len(), 11);
        assert_eq!(
            repr.envelope().raw(),
            &[137, 11, 4, 192, 168, 0, 1, 10, 0, 0, 1]
        );

        let mut buffer = [0u8; 11];
        assert_eq!(repr.emit(&mut buffer), 11);
        let (decoded, _) = RouteOptionRepr::decode(&buffer).unwrap();
        assert_eq!(decoded, repr);
    }

    #[test]
    fn test_route_extended_copy_stays_consistent() {
        let (repr, _) = RouteOptionRepr::decode(&[7u8, 7, 4, 10, 0, 0, 1]).unwrap();
        let mut routes = repr.routes().to_vec();
        routes.push(0x0A00_0002);
        let extended = RouteOptionRepr::new(repr.kind(), repr.pointer(), routes).unwrap();

        assert_eq!(extended.buffer_len(), 11);
        assert_eq!(extended.envelope().length(), 11);
        assert_eq!(extended.envelope().raw().len(), 11);

        let mut buffer = [0u8; 11];
        extended.emit(&mut buffer);
        assert_eq!(&buffer[..], extended.envelope().raw());
        let (reparsed, _) = RouteOptionRepr::decode(&buffer).unwrap();
        assert_eq!(reparsed, extended);

        // The decoded value is untouched.
        assert_eq!(repr.envelope().raw(), &[7, 7, 4, 10, 0, 0, 1]);
    }

    #[test]
    fn test_route_new_rejects() {
        assert_eq!(
            RouteOptionRepr::new(OptionKind::Timestamp, 4, alloc::vec![]).err(),
            Some(Error::OptionTypeMismatch)
        );
        assert_eq!(
            RouteOptionRepr::new(OptionKind::RecordRoute, 4, alloc::vec![0; 10]).err(),
            Some(Error::OptionsTooLarge)
        );
    }
}
