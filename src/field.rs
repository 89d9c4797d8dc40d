//! Field offset definitions for IPv4 header option records.
//!
//! This module defines all byte offset ranges used to parse and construct IPv4
//! options. Following the smoltcp pattern, all offsets are defined as const
//! ranges or const functions to enable compile-time optimization. Every offset
//! is relative to the record's type octet.
//!
//! # Wire Format Structure
//!
//! Options field (0..=40 bytes, header bytes 20 through `4 * IHL`):
//! ```text
//! +--------+--------+---------...---+--------+--------+---...
//! |  TYPE  | LENGTH |    PAYLOAD    |  TYPE  | LENGTH |
//! +--------+--------+---------...---+--------+--------+---...
//! ```
//!
//! End-of-List (0) and No-Operation (1) are single-octet records without a
//! length octet. For every other kind the length octet counts the type and
//! length octets themselves.

#![allow(non_snake_case)]
#![allow(dead_code)]

/// Type alias for a byte range (slice index range).
pub type Field = ::core::ops::Range<usize>;

/// Maximum size of the IPv4 options field (60 byte header - 20 mandatory bytes).
pub const MAX_OPTIONS_LEN: usize = 40;

/// Generic option record header offsets.
pub mod option {
    use crate::field::Field;

    /// Type octet (1 byte at offset 0).
    pub const TYPE: Field = 0..1;

    /// Length octet (1 byte at offset 1), absent for End-of-List and No-Operation.
    pub const LENGTH: Field = 1..2;

    /// Size of the type + length header.
    pub const HEADER_LEN: usize = LENGTH.end;
}

/// Security option field offsets (11 bytes total).
///
/// ```text
/// +--------+--------+--------+--------+--------+--------+
/// |10000010|00001011|SSS  SSS|CCC  CCC|HHH  HHH|  TCC   |
/// +--------+--------+--------+--------+--------+--------+
///  Type=130 Length=11
/// ```
pub mod security {
    use crate::field::Field;

    /// Security level / classification (2 bytes at offset 2-3).
    pub const LEVEL: Field = 2..4;

    /// Compartments (2 bytes at offset 4-5).
    pub const COMPARTMENT: Field = 4..6;

    /// Handling restrictions (2 bytes at offset 6-7).
    pub const RESTRICTION: Field = 6..8;

    /// Transmission control code (3 bytes at offset 8-10).
    pub const TCC: Field = 8..11;

    /// Mandated record length.
    pub const LENGTH: usize = TCC.end;
}

/// Loose source, strict source and record route field offsets.
pub mod route {
    use crate::field::Field;

    /// Pointer to the next free route slot, 1-based from the type octet (offset 2).
    pub const POINTER: Field = 2..3;

    /// Route data (4 bytes per address, offset 3 up to the declared length).
    ///
    /// # Parameters
    ///
    /// * `length` - The declared record length (from the LENGTH octet)
    pub const fn ROUTES(length: usize) -> Field {
        POINTER.end..length
    }

    /// Size of type + length + pointer.
    pub const HEADER_LEN: usize = POINTER.end;

    /// Size of a single route entry.
    pub const ADDRESS_LEN: usize = 4;
}

/// Stream identifier field offsets (4 bytes total).
pub mod stream_id {
    use crate::field::Field;

    /// Stream identifier (2 bytes at offset 2-3).
    pub const ID: Field = 2..4;

    /// Mandated record length.
    pub const LENGTH: usize = ID.end;
}

/// Internet timestamp field offsets.
///
/// ```text
/// +--------+--------+--------+--------+
/// |01000100| length | pointer|oflw|flg|
/// +--------+--------+--------+--------+
/// |         internet address          |
/// +--------+--------+--------+--------+
/// |             timestamp             |
/// +--------+--------+--------+--------+
/// |                 .                 |
/// ```
pub mod timestamp {
    use crate::field::Field;

    /// Pointer to the next free stamp slot (offset 2).
    pub const POINTER: Field = 2..3;

    /// Overflow (high nibble) and flag (low nibble) packed (offset 3).
    pub const OVERFLOW_FLAG: Field = 3..4;

    /// Stamp records (offset 4 up to the declared length).
    ///
    /// # Parameters
    ///
    /// * `length` - The declared record length (from the LENGTH octet)
    pub const fn STAMPS(length: usize) -> Field {
        OVERFLOW_FLAG.end..length
    }

    /// Size of type + length + pointer + overflow/flag.
    pub const HEADER_LEN: usize = OVERFLOW_FLAG.end;
}
