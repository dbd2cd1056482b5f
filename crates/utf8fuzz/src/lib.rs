//! A UTF-8 decoding engine with maximal-subpart error recovery, and an oracle
//! that checks its call shapes agree with each other.
//!
//! The engine decodes bytes into Unicode scalar values and UTF-16 through
//! several APIs (counting, single-step, bulk, incremental, custom
//! replacement), all built on one table-driven decode step. The [`Oracle`]
//! runs every API over the same input and reports the first disagreement as
//! a [`Violation`]. Malformed input is never a violation; it must just be
//! replaced the same way everywhere.
//!
//! ```rust
//! use utf8fuzz::{Oracle, OracleOptions, count_utf16_len, decode_utf16_lossy};
//!
//! let input = b"caf\xC3\xA9 \xED\xA0\x80";
//! assert_eq!(count_utf16_len(input), 8);
//! assert_eq!(
//!     String::from_utf16(&decode_utf16_lossy(input)).unwrap(),
//!     "café \u{FFFD}\u{FFFD}\u{FFFD}"
//! );
//!
//! let report = Oracle::new(input, OracleOptions::default()).run().unwrap();
//! assert_eq!(report.replacements, 3);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod engine;
mod error;
mod oracle;
mod utf8;

#[cfg(test)]
mod tests;

pub use engine::{Engine, StdEngine};
pub use error::{Check, Excerpt, Mismatch, Violation};
pub use oracle::{Oracle, OracleOptions, Report};
pub use utf8::{
    ConversionOutcome, ConversionStatus, DecodedScalar, REPLACEMENT_CHARACTER,
    ScalarDecodeResult, Scalars, Utf16Run, Utf8Decoder, convert_block, convert_to_utf16,
    convert_with_replacement, count_utf16_len, decode_next_scalar, decode_utf16_lossy, scalars,
};
