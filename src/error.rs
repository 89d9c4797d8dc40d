/// Error type for IPv4 option parsing and validation operations.
///
/// Every variant is terminal for the current parse: the options field as a
/// whole is treated as unparseable and no partial result is returned.
///
/// # Examples
///
/// ```
/// use ipv4_options_wire::error::Error;
/// use ipv4_options_wire::repr::parse;
///
/// let buffer = [1u8; 41]; // One byte past the options field capacity
/// assert_eq!(parse(&buffer[..]), Err(Error::OptionsTooLarge));
/// ```
#[derive(PartialEq, Debug, Clone, Copy, Eq)]
pub enum Error {
    /// The options span, or a record's declared length, exceeds the
    /// 40-byte options capacity of an IPv4 header.
    OptionsTooLarge,

    /// Invalid option type octet.
    ///
    /// Option type must be one of:
    /// - 0: End of Option List
    /// - 1: No Operation
    /// - 7: Record Route
    /// - 68: Internet Timestamp
    /// - 130: Security
    /// - 131: Loose Source and Record Route
    /// - 136: Stream Identifier
    /// - 137: Strict Source and Record Route
    InvalidOptionType(u8),

    /// A decoder needs more bytes than remain in the buffer.
    NotEnoughData,

    /// A fixed-length option's declared length does not match its mandated
    /// value (Security, 11 octets).
    InvalidLength,

    /// Route data is not a whole number of 4-byte addresses.
    RouteLengthIncorrect,

    /// Timestamp data is not a whole number of 4-byte (timestamp only) or
    /// 8-byte (address + timestamp) stamps.
    TsLengthIncorrect,

    /// Stream identifier declared length is not 4.
    StreamIdLengthIncorrect,

    /// A generic option was converted into the wrong specific kind.
    OptionTypeMismatch,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OptionsTooLarge => write!(f, "options data larger than the maximum options length"),
            Error::InvalidOptionType(t) => write!(f, "invalid option type: {}", t),
            Error::NotEnoughData => write!(f, "not enough data left to parse option"),
            Error::InvalidLength => write!(f, "option length is incorrect"),
            Error::RouteLengthIncorrect => write!(f, "route data length is not a multiple of 4"),
            Error::TsLengthIncorrect => write!(f, "timestamp data length does not match its flag"),
            Error::StreamIdLengthIncorrect => write!(f, "stream identifier length is not 4"),
            Error::OptionTypeMismatch => write!(f, "option type mismatch"),
        }
    }
}

impl core::error::Error for Error {}

/// Result type alias using the crate's Error type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", Error::OptionsTooLarge),
            "options data larger than the maximum options length"
        );
        assert_eq!(format!("{}", Error::InvalidOptionType(0xFF)), "invalid option type: 255");
        assert_eq!(format!("{}", Error::NotEnoughData), "not enough data left to parse option");
        assert_eq!(format!("{}", Error::InvalidLength), "option length is incorrect");
        assert_eq!(
            format!("{}", Error::RouteLengthIncorrect),
            "route data length is not a multiple of 4"
        );
        assert_eq!(
            format!("{}", Error::TsLengthIncorrect),
            "timestamp data length does not match its flag"
        );
        assert_eq!(format!("{}", Error::StreamIdLengthIncorrect), "stream identifier length is not 4");
        assert_eq!(format!("{}", Error::OptionTypeMismatch), "option type mismatch");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::NotEnoughData, Error::NotEnoughData);
        assert_ne!(Error::NotEnoughData, Error::InvalidLength);
        assert_eq!(Error::InvalidOptionType(0x05), Error::InvalidOptionType(0x05));
        assert_ne!(Error::InvalidOptionType(0x05), Error::InvalidOptionType(0x06));
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: core::error::Error>(_: &E) {}
        assert_error(&Error::TsLengthIncorrect);
    }
}
