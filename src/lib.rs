#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! # IPv4-options-wire
//!
//! This crate provides the means for parsing the options field of an IPv4
//! header into strongly-typed option representations, and vice versa. It is
//! designed to be used in embedded environments and is a `no_std` crate that
//! only needs `alloc` for the decoded option lists.
//!
//! ## Features
//!
//! - `no_std` + `alloc` compatible
//! - Zero-copy wrappers for every option record layout
//! - Owned, validated representations for Security, Record Route,
//!   Loose/Strict Source Route, Stream Identifier and Internet Timestamp
//! - All-or-nothing parsing: a damaged options field never yields a partial list
//! - Optional `tracing` feature for diagnostics
//!
//! ## Architecture
//!
//! Following the smoltcp/someip-wire pattern:
//! - `span` - Zero-copy wrapper around the raw options field
//! - `repr` - Option list walker and high-level representation for parsing/emitting
//! - `options` - Option kinds, record header and envelope
//! - `security`, `route`, `stream_id`, `timestamp` - Per-kind wrappers and representations
//! - `field` - Field offset definitions
//!
//! ## Example
//!
//! ```
//! use ipv4_options_wire::prelude::*;
//!
//! let bytes = [68, 12, 13, 0x43, 66, 109, 38, 50, 2, 208, 113, 237];
//! let options = parse(&bytes).unwrap();
//! match &options[0] {
//!     DecodedOption::Timestamp(ts) => {
//!         assert_eq!(ts.flag(), Some(TimestampFlag::TsPrespec));
//!         assert_eq!(ts.stamps().len(), 1);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

extern crate alloc;

/// Error type for parsing and validation failures.
pub mod error;

/// Field offset definitions for all option record layouts.
pub mod field;

/// Option kinds, record header and the common option envelope.
pub mod options;

/// Option list walker and high-level representation for parse/emit operations.
pub mod repr;

/// Record Route, Loose Source Route and Strict Source Route options.
pub mod route;

/// Security option.
pub mod security;

/// Zero-copy wrapper for the options field of an IPv4 header.
pub mod span;

/// Stream Identifier option.
pub mod stream_id;

/// Internet Timestamp option.
pub mod timestamp;

/// Prelude module for convenient imports.
pub mod prelude;

pub use repr::parse;
