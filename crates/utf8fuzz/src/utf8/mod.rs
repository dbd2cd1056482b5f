//! UTF-8 decoding engine.
//!
//! Everything here is built on one primitive, [`decode_step`], which runs the
//! table-driven state machine in [`table`] over the front of a byte slice. The
//! public functions are thin call shapes over it:
//!
//! - [`decode_next_scalar`]: one scalar (or one replacement) at a time.
//! - [`count_utf16_len`]: UTF-16 length without materializing output.
//! - [`convert_to_utf16`] / [`convert_block`]: bulk conversion into a caller
//!   buffer, either replacing malformed input or stopping at it.
//! - [`convert_with_replacement`]: non-replacing conversion with a
//!   caller-chosen placeholder spliced in at each malformed subpart.
//! - [`Utf8Decoder`]: chunked input with state carried across chunks.
//!
//! Malformed input is never an error. Each maximal subpart (the longest prefix
//! of a would-be sequence that is still well-formed) becomes exactly one
//! U+FFFD, and decoding resumes at the byte that broke the sequence.

mod stream;
pub(crate) mod table;

use alloc::vec::Vec;
use core::fmt;

pub use stream::Utf8Decoder;

use self::table::{ACCEPT, BYTE_CLASS, LEAD_MASK, REJECT, START, TRANSITIONS};

/// U+FFFD REPLACEMENT CHARACTER.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// What a single decode step produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodedScalar {
    /// A well-formed scalar value, which may itself be U+FFFD.
    Scalar(char),
    /// A maximal malformed subpart, to be shown as U+FFFD.
    Replacement,
}

impl DecodedScalar {
    /// The character this step contributes to decoded text.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            DecodedScalar::Scalar(ch) => ch,
            DecodedScalar::Replacement => REPLACEMENT_CHARACTER,
        }
    }

    /// Number of UTF-16 code units needed for [`Self::as_char`].
    #[must_use]
    pub const fn utf16_len(self) -> usize {
        self.as_char().len_utf16()
    }
}

/// Result of decoding the leading scalar of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarDecodeResult {
    /// The decoded scalar, or the replacement marker.
    pub value: DecodedScalar,
    /// Bytes consumed by this step. Always at least 1.
    pub bytes_consumed: usize,
}

impl ScalarDecodeResult {
    /// Whether the consumed bytes formed a well-formed sequence.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        matches!(self.value, DecodedScalar::Scalar(_))
    }

    /// The character this step contributes to decoded text.
    #[must_use]
    pub const fn as_char(&self) -> char {
        self.value.as_char()
    }
}

/// The UTF-16 code units of one scalar value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Utf16Run {
    units: [u16; 2],
    len: u8,
}

impl Utf16Run {
    /// Units of this run: one for the BMP, a surrogate pair otherwise.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.units[..usize::from(self.len)]
    }

    /// Number of code units (1 or 2).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`; a run holds at least one unit.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<char> for Utf16Run {
    fn from(ch: char) -> Self {
        let mut units = [0u16; 2];
        ch.encode_utf16(&mut units);
        let len = if ch.len_utf16() == 2 { 2 } else { 1 };
        Self { units, len }
    }
}

impl From<DecodedScalar> for Utf16Run {
    fn from(value: DecodedScalar) -> Self {
        Utf16Run::from(value.as_char())
    }
}

/// A code unit rendered as `0xD83D`.
struct HexUnit(u16);

impl fmt::Debug for HexUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

impl fmt::Debug for Utf16Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.as_slice().iter().map(|&unit| HexUnit(unit)))
            .finish()
    }
}

/// How a conversion call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionStatus {
    /// All input was converted.
    Complete,
    /// The next scalar did not fit in the output buffer.
    OutputFull,
    /// Input ends in a valid but truncated sequence and more input may
    /// follow. Only returned when the block is not final.
    InputIncomplete,
    /// Conversion stopped in front of a malformed subpart. Only returned when
    /// replacement is disabled.
    InvalidData,
}

/// Progress made by a conversion call.
///
/// Both counters only ever cover whole scalars; a sequence is never split
/// across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Input bytes consumed.
    pub bytes_read: usize,
    /// Output units written.
    pub units_written: usize,
    /// Why the call returned.
    pub status: ConversionStatus,
}

/// One step of the state machine, before the end-of-input policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// A well-formed scalar and its length.
    Scalar(char, usize),
    /// A malformed maximal subpart of the given length.
    Invalid(usize),
    /// The whole remaining input is a valid but truncated prefix.
    Incomplete(usize),
}

/// Runs the state machine over the front of `src`.
///
/// Returns `None` only for empty input. Every other result covers at least
/// one byte.
pub(crate) fn decode_step(src: &[u8]) -> Option<Step> {
    if src.is_empty() {
        return None;
    }

    let mut state = START;
    let mut code_point = 0u32;
    for (idx, &byte) in src.iter().enumerate() {
        let class = BYTE_CLASS[usize::from(byte)];
        let next = TRANSITIONS[usize::from(state)][usize::from(class)];

        if next == REJECT {
            // A rejected lead byte is its own subpart.
            return Some(Step::Invalid(idx.max(1)));
        }

        code_point = if state == START {
            u32::from(byte & LEAD_MASK[usize::from(class)])
        } else {
            (code_point << 6) | u32::from(byte & 0x3F)
        };

        if next == ACCEPT {
            return Some(match char::from_u32(code_point) {
                Some(ch) => Step::Scalar(ch, idx + 1),
                // The transition table never accepts a non-scalar.
                None => Step::Invalid(idx + 1),
            });
        }
        state = next;
    }

    Some(Step::Incomplete(src.len()))
}

/// Decodes the leading scalar value of `src`.
///
/// Returns `None` when `src` is empty. Otherwise the result consumes at least
/// one byte: a whole well-formed sequence, or the maximal subpart of a
/// malformed one.
///
/// ```rust
/// use utf8fuzz::{DecodedScalar, decode_next_scalar};
///
/// let step = decode_next_scalar(b"\xF0\x9F\x98\x80").unwrap();
/// assert_eq!(step.value, DecodedScalar::Scalar('\u{1F600}'));
/// assert_eq!(step.bytes_consumed, 4);
///
/// // An overlong NUL is caught at its lead byte.
/// let step = decode_next_scalar(b"\xC0\x80").unwrap();
/// assert_eq!(step.value, DecodedScalar::Replacement);
/// assert_eq!(step.bytes_consumed, 1);
/// ```
#[must_use]
pub fn decode_next_scalar(src: &[u8]) -> Option<ScalarDecodeResult> {
    Some(match decode_step(src)? {
        Step::Scalar(ch, len) => ScalarDecodeResult {
            value: DecodedScalar::Scalar(ch),
            bytes_consumed: len,
        },
        Step::Invalid(len) | Step::Incomplete(len) => ScalarDecodeResult {
            value: DecodedScalar::Replacement,
            bytes_consumed: len,
        },
    })
}

/// Iterator over the decode steps of a byte slice.
///
/// Yields `(byte_offset, step)` pairs. Returned by [`scalars`].
#[derive(Debug, Clone)]
pub struct Scalars<'a> {
    src: &'a [u8],
    offset: usize,
}

impl Iterator for Scalars<'_> {
    type Item = (usize, ScalarDecodeResult);

    fn next(&mut self) -> Option<Self::Item> {
        let step = decode_next_scalar(&self.src[self.offset..])?;
        let at = self.offset;
        self.offset += step.bytes_consumed;
        Some((at, step))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.src.len() - self.offset;
        (remaining.div_ceil(4), Some(remaining))
    }
}

/// Iterates the decode steps of `src`, replacing malformed subparts.
#[must_use]
pub fn scalars(src: &[u8]) -> Scalars<'_> {
    Scalars { src, offset: 0 }
}

/// Counts the UTF-16 code units `src` decodes to, with malformed subparts
/// counted as one U+FFFD each.
#[must_use]
pub fn count_utf16_len(src: &[u8]) -> usize {
    scalars(src).map(|(_, step)| step.value.utf16_len()).sum()
}

/// Converts a final block of UTF-8 into UTF-16.
///
/// With `replace_invalid`, malformed subparts become U+FFFD and the call ends
/// with [`ConversionStatus::Complete`] or [`ConversionStatus::OutputFull`].
/// Without it, the call stops in front of the first malformed subpart with
/// [`ConversionStatus::InvalidData`]; skip it with [`decode_next_scalar`] and
/// call again to resume.
pub fn convert_to_utf16(src: &[u8], dst: &mut [u16], replace_invalid: bool) -> ConversionOutcome {
    convert_block(src, dst, replace_invalid, true)
}

/// Converts one block of a possibly longer UTF-8 stream into UTF-16.
///
/// When `is_final` is `false`, a valid but truncated sequence at the end of
/// `src` is left unread and the call returns
/// [`ConversionStatus::InputIncomplete`]; the caller prepends those bytes to
/// the next block. When `is_final` is `true`, that tail is malformed like any
/// other.
pub fn convert_block(
    src: &[u8],
    dst: &mut [u16],
    replace_invalid: bool,
    is_final: bool,
) -> ConversionOutcome {
    let mut bytes_read = 0;
    let mut units_written = 0;
    let outcome = |bytes_read, units_written, status| ConversionOutcome {
        bytes_read,
        units_written,
        status,
    };

    while let Some(step) = decode_step(&src[bytes_read..]) {
        let (ch, consumed) = match step {
            Step::Scalar(ch, len) => (ch, len),
            Step::Incomplete(_) if !is_final => {
                return outcome(bytes_read, units_written, ConversionStatus::InputIncomplete);
            }
            Step::Invalid(len) | Step::Incomplete(len) => {
                if !replace_invalid {
                    return outcome(bytes_read, units_written, ConversionStatus::InvalidData);
                }
                (REPLACEMENT_CHARACTER, len)
            }
        };

        let run = Utf16Run::from(ch);
        let Some(slot) = dst.get_mut(units_written..units_written + run.len()) else {
            return outcome(bytes_read, units_written, ConversionStatus::OutputFull);
        };
        slot.copy_from_slice(run.as_slice());
        units_written += run.len();
        bytes_read += consumed;
    }

    outcome(bytes_read, units_written, ConversionStatus::Complete)
}

/// Decodes `src` into a freshly allocated UTF-16 buffer, replacing malformed
/// subparts with U+FFFD.
#[must_use]
pub fn decode_utf16_lossy(src: &[u8]) -> Vec<u16> {
    let mut out = alloc::vec![0u16; count_utf16_len(src)];
    let outcome = convert_to_utf16(src, &mut out, true);
    debug_assert_eq!(outcome.status, ConversionStatus::Complete);
    out.truncate(outcome.units_written);
    out
}

const SCRATCH_UNITS: usize = 256;

/// Converts `src` to UTF-16, splicing `placeholder` in place of every
/// malformed subpart.
///
/// This drives [`convert_to_utf16`] without replacement and resynchronizes
/// with [`decode_next_scalar`] after each stop, the way a caller with its own
/// replacement policy would.
///
/// ```rust
/// use utf8fuzz::convert_with_replacement;
///
/// let placeholder: Vec<u16> = "{BAD}".encode_utf16().collect();
/// let out = convert_with_replacement(b"a\xFFb", &placeholder);
/// assert_eq!(String::from_utf16(&out).unwrap(), "a{BAD}b");
/// ```
#[must_use]
pub fn convert_with_replacement(src: &[u8], placeholder: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(src.len());
    let mut scratch = [0u16; SCRATCH_UNITS];
    let mut input = src;

    while !input.is_empty() {
        let outcome = convert_to_utf16(input, &mut scratch, false);
        out.extend_from_slice(&scratch[..outcome.units_written]);
        input = &input[outcome.bytes_read..];

        if outcome.status == ConversionStatus::InvalidData {
            let Some(skip) = decode_next_scalar(input) else {
                break;
            };
            input = &input[skip.bytes_consumed..];
            out.extend_from_slice(placeholder);
        }
    }

    out
}
