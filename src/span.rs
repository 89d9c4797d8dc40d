//! Options span module
//!
//! This module contains the `OptionSpan` type, a read-only wrapper around the
//! raw options field of an IPv4 header, and an iterator over its undecoded
//! option records.

use crate::error::{Error, Result};
use crate::field;
use crate::options::{OptionKind, RawOption};
use crate::repr::{self, DecodedOption};
use alloc::vec::Vec;

/// A read-only wrapper around the IPv4 options field.
///
/// The options field is the part of the IPv4 header between byte 20 and
/// `4 * IHL`, so it holds at most 40 bytes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OptionSpan<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> OptionSpan<T> {
    /// Creates a new unchecked `OptionSpan`.
    pub const fn new_unchecked(buffer: T) -> OptionSpan<T> {
        OptionSpan { buffer }
    }

    /// Creates a new checked `OptionSpan`.
    ///
    /// # Returns
    ///
    /// * `Err(Error::OptionsTooLarge)` if the buffer exceeds 40 bytes
    pub fn new_checked(buffer: T) -> Result<OptionSpan<T>> {
        let span = Self::new_unchecked(buffer);
        span.check_len()?;
        Ok(span)
    }

    /// Checks the span fits the options field.
    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() > field::MAX_OPTIONS_LEN {
            return Err(Error::OptionsTooLarge);
        }
        Ok(())
    }

    /// Returns the inner buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Returns a reference to the inner buffer.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Returns true when the span holds no options at all.
    pub fn is_empty(&self) -> bool {
        self.buffer.as_ref().is_empty()
    }

    /// Iterate over the undecoded option records.
    ///
    /// Iteration stops after an End-of-List record or at the end of the span.
    /// After an error the iterator is exhausted.
    pub fn iter(&self) -> RawOptionIter<'_> {
        RawOptionIter::new(self.buffer.as_ref())
    }

    /// Decode every option in the span.
    ///
    /// See [`repr::parse`].
    pub fn decode(&self) -> Result<Vec<DecodedOption>> {
        repr::parse(self.buffer.as_ref())
    }
}

/// Iterator over the undecoded records of an options field.
pub struct RawOptionIter<'a> {
    data: &'a [u8],
}

impl<'a> RawOptionIter<'a> {
    /// Create a new iterator over raw options data.
    pub fn new(data: &'a [u8]) -> Self {
        RawOptionIter { data }
    }
}

impl<'a> Iterator for RawOptionIter<'a> {
    type Item = Result<RawOption<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }

        match RawOption::split(self.data) {
            Ok((option, rest)) => {
                self.data = if option.kind() == OptionKind::EndOfList { &[] } else { rest };
                Some(Ok(option))
            }
            Err(err) => {
                self.data = &[];
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_checked() {
        assert!(OptionSpan::new_checked(&[0u8; 40][..]).is_ok());
        assert_eq!(OptionSpan::new_checked(&[0u8; 41][..]).err(), Some(Error::OptionsTooLarge));
        assert!(OptionSpan::new_checked(&[0u8; 0][..]).unwrap().is_empty());
    }

    #[test]
    fn test_span_iter() {
        let bytes = [1u8, 7, 7, 4, 10, 0, 0, 1, 0, 0xAA];
        let span = OptionSpan::new_checked(&bytes[..]).unwrap();
        let kinds: Vec<OptionKind> = span.iter().map(|o| o.unwrap().kind()).collect();
        assert_eq!(
            kinds,
            alloc::vec![OptionKind::NoOp, OptionKind::RecordRoute, OptionKind::EndOfList]
        );

        let route = span.iter().nth(1).unwrap().unwrap().to_route().unwrap();
        assert_eq!(route.routes(), &[0x0A00_0001]);
    }

    #[test]
    fn test_span_iter_stops_on_error() {
        let bytes = [1u8, 99, 1];
        let span = OptionSpan::new_checked(&bytes[..]).unwrap();
        let mut iter = span.iter();
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(iter.next().unwrap().err(), Some(Error::InvalidOptionType(99)));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_span_decode() {
        let span = OptionSpan::new_checked(&[136u8, 4, 0, 5][..]).unwrap();
        let options = span.decode().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].kind(), OptionKind::StreamId);
    }
}
