//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate,
//! allowing for convenient glob imports:
//!
//! ```
//! use ipv4_options_wire::prelude::*;
//! ```

pub use crate::error::Error;
pub use crate::options::{Envelope, OptionHeader, OptionKind, RawOption};
pub use crate::repr::{parse, DecodedOption, Repr};
pub use crate::route::{RouteOption, RouteOptionRepr};
pub use crate::security::{SecurityLevel, SecurityOption, SecurityOptionRepr};
pub use crate::span::OptionSpan;
pub use crate::stream_id::{StreamIdOption, StreamIdOptionRepr};
pub use crate::timestamp::{Stamp, TimestampFlag, TimestampOption, TimestampOptionRepr};
