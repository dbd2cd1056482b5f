use alloc::vec::Vec;
use core::fmt;

use bstr::BStr;
use thiserror::Error;

use crate::utf8::ConversionStatus;

/// The oracle's checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Counted UTF-16 length against scalar-by-scalar decoding.
    ScalarCount,
    /// Replacing bulk output decoded back into scalars.
    Utf16RoundTrip,
    /// Replacing bulk conversion into an exact-size buffer.
    BulkExact,
    /// Replacing bulk conversion into a buffer with slack.
    BulkOversized,
    /// Non-replacing conversion with caller resynchronization.
    StreamingResync,
    /// Non-replacing conversion with a custom placeholder.
    CustomPlaceholder,
}

impl Check {
    /// Every check, in run order.
    pub const ALL: [Check; 6] = [
        Check::ScalarCount,
        Check::Utf16RoundTrip,
        Check::BulkExact,
        Check::BulkOversized,
        Check::StreamingResync,
        Check::CustomPlaceholder,
    ];

    /// Short kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Check::ScalarCount => "scalar-count",
            Check::Utf16RoundTrip => "utf16-round-trip",
            Check::BulkExact => "bulk-exact",
            Check::BulkOversized => "bulk-oversized",
            Check::StreamingResync => "streaming-resync",
            Check::CustomPlaceholder => "custom-placeholder",
        }
    }

    /// One-line description used in progress output.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Check::ScalarCount => "counting UTF-16 length and comparing with scalar iteration",
            Check::Utf16RoundTrip => "decoding the UTF-16 output back into scalars",
            Check::BulkExact => "converting with replacement into an exact-size buffer",
            Check::BulkOversized => "converting with replacement into an oversized buffer",
            Check::StreamingResync => "converting without replacement, resynchronizing on errors",
            Check::CustomPlaceholder => "converting with a custom placeholder",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How two decoding strategies disagreed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    /// A decode step returned zero consumed bytes.
    #[error("decode step at byte {offset} consumed no input")]
    NoProgress {
        /// Where the step started.
        offset: usize,
    },
    /// Decode steps ran past, or stopped short of, the end of the input.
    #[error("decode steps covered {consumed} of {input_len} bytes")]
    BytesConsumed {
        /// Bytes covered by the steps.
        consumed: usize,
        /// Length of the input.
        input_len: usize,
    },
    /// Two ways of measuring UTF-16 output disagreed on its length.
    #[error("expected {expected} UTF-16 units, got {actual}")]
    Utf16Len {
        /// Length from the reference decoding.
        expected: usize,
        /// Length the engine reported or produced.
        actual: usize,
    },
    /// A conversion ended with the wrong status.
    #[error("expected status {expected:?}, got {actual:?}")]
    Status {
        /// Status the call should have returned.
        expected: ConversionStatus,
        /// Status it returned.
        actual: ConversionStatus,
    },
    /// A conversion did not read the input it should have.
    #[error("read {bytes_read} of {input_len} input bytes")]
    BytesRead {
        /// Input offset the conversion reached.
        bytes_read: usize,
        /// Length of the input.
        input_len: usize,
    },
    /// An output unit differs from the reference.
    #[error("unit {index} is {actual:#06X}, expected {expected:#06X}")]
    Unit {
        /// Index of the first differing unit.
        index: usize,
        /// Reference unit.
        expected: u16,
        /// Engine unit.
        actual: u16,
    },
    /// A conversion wrote past the units it reported.
    #[error("slack unit {index} was overwritten with {actual:#06X}")]
    SlackWritten {
        /// Index of the first overwritten unit.
        index: usize,
        /// What was written there.
        actual: u16,
    },
    /// A decoded scalar differs from the reference.
    #[error("scalar {index} at byte {offset} is {actual:?}, expected {expected:?}")]
    Scalar {
        /// Position in the scalar sequence.
        index: usize,
        /// Input offset of the reference step.
        offset: usize,
        /// Reference scalar.
        expected: char,
        /// Decoded scalar.
        actual: char,
    },
    /// The number of decoded scalars differs from the reference.
    #[error("expected {expected} scalars, got {actual}")]
    ScalarCount {
        /// Reference scalar count.
        expected: usize,
        /// Decoded scalar count.
        actual: usize,
    },
    /// UTF-16 output held a surrogate without its partner.
    #[error("unpaired surrogate {unit:#06X} in place of scalar {index}")]
    UnpairedSurrogate {
        /// Position in the scalar sequence.
        index: usize,
        /// The lone surrogate.
        unit: u16,
    },
    /// Input a non-replacing conversion accepted is not well-formed.
    #[error("converted prefix is ill-formed at byte {offset}")]
    IllFormedPrefix {
        /// Offset of the ill-formed sequence.
        offset: usize,
    },
    /// A non-replacing conversion stopped in front of well-formed input.
    #[error("resynchronizing at byte {offset} found a well-formed sequence")]
    ResyncOnWellFormed {
        /// Where the conversion stopped.
        offset: usize,
    },
    /// A converted chunk's input and output did not pair up scalar for scalar.
    #[error("chunk ending at byte {offset} left {bytes} bytes and {scalars} scalars unmatched")]
    Unmatched {
        /// Offset where pairing stopped.
        offset: usize,
        /// Input bytes left over.
        bytes: usize,
        /// Output scalars left over.
        scalars: usize,
    },
}

impl Mismatch {
    /// Input byte offset named by the mismatch itself, if any.
    #[must_use]
    pub fn byte_offset(&self) -> Option<usize> {
        match *self {
            Mismatch::NoProgress { offset }
            | Mismatch::Scalar { offset, .. }
            | Mismatch::IllFormedPrefix { offset }
            | Mismatch::ResyncOnWellFormed { offset }
            | Mismatch::Unmatched { offset, .. } => Some(offset),
            Mismatch::BytesConsumed { consumed, .. } => Some(consumed),
            Mismatch::BytesRead { bytes_read, .. } => Some(bytes_read),
            _ => None,
        }
    }
}

/// A few input bytes starting where a violation was located.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Excerpt {
    offset: Option<usize>,
    bytes: Vec<u8>,
}

const EXCERPT_LEN: usize = 12;

impl Excerpt {
    pub(crate) fn at(input: &[u8], offset: usize) -> Self {
        let start = offset.min(input.len());
        let end = (start + EXCERPT_LEN).min(input.len());
        Self {
            offset: Some(offset),
            bytes: input[start..end].to_vec(),
        }
    }

    /// Byte offset of the excerpt, if the violation could be located.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// The excerpted bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, " (input at byte {offset}: {:?})", BStr::new(&self.bytes)),
            None => Ok(()),
        }
    }
}

/// Two decoding strategies disagreed on the same input.
///
/// This is always a defect in the engine, never a property of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{check} check failed: {mismatch}{near}")]
pub struct Violation {
    /// The check that observed the divergence.
    pub check: Check,
    /// What diverged.
    pub mismatch: Mismatch,
    /// Where in the input, when known.
    pub near: Excerpt,
}

impl Violation {
    pub(crate) fn new(check: Check, mismatch: Mismatch) -> Self {
        Self {
            check,
            mismatch,
            near: Excerpt::default(),
        }
    }

    pub(crate) fn located(mut self, input: &[u8], offset: Option<usize>) -> Self {
        if let Some(offset) = offset.or_else(|| self.mismatch.byte_offset()) {
            self.near = Excerpt::at(input, offset);
        }
        self
    }

    /// Input byte offset of the divergence, if it could be located.
    #[must_use]
    pub fn byte_offset(&self) -> Option<usize> {
        self.near.offset()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, a) in Check::ALL.iter().enumerate() {
            for b in &Check::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn violation_renders_excerpt_with_escapes() {
        let v = Violation::new(
            Check::StreamingResync,
            Mismatch::ResyncOnWellFormed { offset: 1 },
        )
        .located(b"a\xE2\x82\xACz", None);
        assert_eq!(v.byte_offset(), Some(1));
        assert_eq!(
            v.to_string(),
            "streaming-resync check failed: resynchronizing at byte 1 found a \
             well-formed sequence (input at byte 1: \"€z\")"
        );
    }

    #[test]
    fn unlocated_violation_has_no_excerpt() {
        let v = Violation::new(
            Check::ScalarCount,
            Mismatch::Utf16Len {
                expected: 3,
                actual: 4,
            },
        )
        .located(b"abc", None);
        assert_eq!(v.byte_offset(), None);
        assert_eq!(
            v.to_string(),
            "scalar-count check failed: expected 3 UTF-16 units, got 4"
        );
    }

    #[test]
    fn excerpt_is_clamped_to_input() {
        let e = Excerpt::at(b"\xFF\xFE", 1);
        assert_eq!(e.bytes(), b"\xFE");
        let e = Excerpt::at(b"ab", 5);
        assert!(e.bytes().is_empty());
    }
}
