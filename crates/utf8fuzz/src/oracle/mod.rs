//! Consistency oracle.
//!
//! An [`Oracle`] runs a fixed sequence of checks over one input, each driving
//! a different call shape of an [`Engine`] and comparing it with the
//! scalar-by-scalar reference decoding:
//!
//! 1. [`Check::ScalarCount`]
//! 2. [`Check::Utf16RoundTrip`]
//! 3. [`Check::BulkExact`]
//! 4. [`Check::BulkOversized`]
//! 5. [`Check::StreamingResync`]
//! 6. [`Check::CustomPlaceholder`]
//!
//! The first divergence ends the run with a [`Violation`]. Malformed input is
//! not a divergence; every call shape must simply agree on how it is replaced.

mod options;
mod reference;
mod report;

use alloc::{vec, vec::Vec};
use core::char::decode_utf16;

use tracing::{debug, info};

pub use options::OracleOptions;
pub use report::Report;

use self::reference::Reference;
use crate::{
    engine::{Engine, StdEngine},
    error::{Check, Mismatch, Violation},
    utf8::{ConversionStatus, REPLACEMENT_CHARACTER},
};

/// Cross-checks every decoding call shape of an engine over one input.
///
/// # Examples
///
/// ```rust
/// use utf8fuzz::{Oracle, OracleOptions};
///
/// let report = Oracle::new(b"\xF0\x9F\x98\x80\xC0\x80", OracleOptions::default())
///     .run()
///     .unwrap();
/// assert_eq!(report.scalars, 3);
/// assert_eq!(report.replacements, 2);
/// assert_eq!(report.utf16_len, 4);
/// ```
#[derive(Debug, Clone)]
pub struct Oracle<'a, E = StdEngine> {
    engine: E,
    input: &'a [u8],
    options: OracleOptions,
}

impl<'a> Oracle<'a> {
    /// Creates an oracle over `input` for this crate's engine.
    #[must_use]
    pub fn new(input: &'a [u8], options: OracleOptions) -> Self {
        Self::with_engine(StdEngine, input, options)
    }
}

impl<'a, E: Engine> Oracle<'a, E> {
    /// Creates an oracle over `input` for any engine.
    #[must_use]
    pub fn with_engine(engine: E, input: &'a [u8], options: OracleOptions) -> Self {
        Self {
            engine,
            input,
            options,
        }
    }

    /// Runs every check in order and stops at the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] observed. There is no partial result.
    pub fn run(&self) -> Result<Report, Violation> {
        self.run_checks().inspect_err(|violation| self.escalate(violation))
    }

    fn run_checks(&self) -> Result<Report, Violation> {
        info!(bytes = self.input.len(), "{}", Check::ScalarCount.description());
        let reference = Reference::trace(&self.engine, self.input)
            .map_err(|m| self.fail(Check::ScalarCount, m, None))?;
        let utf16_len = self.check_scalar_count(&reference)?;

        for check in &Check::ALL[1..] {
            info!(check = %check, "{}", check.description());
            match check {
                Check::Utf16RoundTrip => self.check_round_trip(&reference)?,
                Check::BulkExact => self.check_bulk_exact(&reference)?,
                Check::BulkOversized => self.check_bulk_oversized(&reference)?,
                Check::StreamingResync => self.check_streaming_resync(&reference)?,
                Check::CustomPlaceholder => self.check_custom_placeholder(&reference)?,
                Check::ScalarCount => {}
            }
        }

        Ok(Report {
            input_len: self.input.len(),
            scalars: reference.steps.len(),
            replacements: reference.replacements(),
            utf16_len,
        })
    }

    fn fail(&self, check: Check, mismatch: Mismatch, offset: Option<usize>) -> Violation {
        Violation::new(check, mismatch).located(self.input, offset)
    }

    fn check_scalar_count(&self, reference: &Reference) -> Result<usize, Violation> {
        let counted = self.engine.count_utf16_len(self.input);
        let iterated = reference.units.len();
        info!(counted, iterated, scalars = reference.steps.len(), "UTF-16 length");

        if counted != iterated {
            return Err(self.fail(
                Check::ScalarCount,
                Mismatch::Utf16Len {
                    expected: iterated,
                    actual: counted,
                },
                None,
            ));
        }
        Ok(counted)
    }

    fn check_round_trip(&self, reference: &Reference) -> Result<(), Violation> {
        let check = Check::Utf16RoundTrip;
        let mut materialized = vec![0u16; reference.units.len()];
        let outcome = self
            .engine
            .convert_to_utf16(self.input, &mut materialized, true);
        let written = outcome.units_written.min(materialized.len());
        info!(units_written = written, "materialized UTF-16 output");

        let mut decoded = decode_utf16(materialized[..written].iter().copied());

        for (index, step) in reference.steps.iter().enumerate() {
            let expected = step.result.as_char();
            let mismatch = match decoded.next() {
                Some(Ok(actual)) if actual == expected => continue,
                Some(Ok(actual)) => Mismatch::Scalar {
                    index,
                    offset: step.offset,
                    expected,
                    actual,
                },
                Some(Err(err)) => Mismatch::UnpairedSurrogate {
                    index,
                    unit: err.unpaired_surrogate(),
                },
                None => Mismatch::ScalarCount {
                    expected: reference.steps.len(),
                    actual: index,
                },
            };
            return Err(self.fail(check, mismatch, Some(step.offset)));
        }

        let extra = decoded.count();
        if extra > 0 {
            return Err(self.fail(
                check,
                Mismatch::ScalarCount {
                    expected: reference.steps.len(),
                    actual: reference.steps.len() + extra,
                },
                None,
            ));
        }
        Ok(())
    }

    fn check_bulk_exact(&self, reference: &Reference) -> Result<(), Violation> {
        let check = Check::BulkExact;
        let mut dst = vec![0u16; reference.units.len()];
        let outcome = self.engine.convert_to_utf16(self.input, &mut dst, true);
        debug!(
            bytes_read = outcome.bytes_read,
            units_written = outcome.units_written,
            status = ?outcome.status,
            "exact-size conversion"
        );

        self.expect_complete(check, outcome.status, outcome.bytes_read)?;
        if outcome.units_written != dst.len() {
            return Err(self.fail(
                check,
                Mismatch::Utf16Len {
                    expected: dst.len(),
                    actual: outcome.units_written,
                },
                None,
            ));
        }
        self.compare_units(check, &dst, &reference.units, reference, None)
    }

    fn check_bulk_oversized(&self, reference: &Reference) -> Result<(), Violation> {
        let check = Check::BulkOversized;
        let expected_len = reference.units.len();
        let mut dst = vec![0u16; expected_len + self.options.slack];
        let outcome = self.engine.convert_to_utf16(self.input, &mut dst, true);
        debug!(
            bytes_read = outcome.bytes_read,
            units_written = outcome.units_written,
            capacity = dst.len(),
            "oversized conversion"
        );

        self.expect_complete(check, outcome.status, outcome.bytes_read)?;
        if outcome.units_written != expected_len {
            return Err(self.fail(
                check,
                Mismatch::Utf16Len {
                    expected: expected_len,
                    actual: outcome.units_written,
                },
                None,
            ));
        }

        let (written, slack) = dst.split_at(expected_len);
        self.compare_units(check, written, &reference.units, reference, None)?;
        if let Some(pos) = slack.iter().position(|&unit| unit != 0) {
            return Err(self.fail(
                check,
                Mismatch::SlackWritten {
                    index: expected_len + pos,
                    actual: slack[pos],
                },
                Some(self.input.len()),
            ));
        }
        Ok(())
    }

    fn check_streaming_resync(&self, reference: &Reference) -> Result<(), Violation> {
        let check = Check::StreamingResync;
        let input_len = self.input.len();
        let mut out = vec![0u16; reference.units.len() + self.options.slack];
        let mut produced = Vec::with_capacity(reference.steps.len());
        let mut input = self.input;
        let mut offset = 0;
        let mut resyncs = 0usize;

        while !input.is_empty() {
            let outcome = self.engine.convert_to_utf16(input, &mut out, false);
            if outcome.bytes_read > input.len() {
                return Err(self.fail(
                    check,
                    Mismatch::BytesRead {
                        bytes_read: offset + outcome.bytes_read,
                        input_len,
                    },
                    None,
                ));
            }
            if outcome.units_written > out.len() {
                return Err(self.fail(
                    check,
                    Mismatch::Utf16Len {
                        expected: out.len(),
                        actual: outcome.units_written,
                    },
                    Some(offset),
                ));
            }

            self.match_chunk(
                &input[..outcome.bytes_read],
                &out[..outcome.units_written],
                offset,
                &mut produced,
            )?;
            input = &input[outcome.bytes_read..];
            offset += outcome.bytes_read;

            match outcome.status {
                ConversionStatus::Complete if input.is_empty() => {}
                ConversionStatus::Complete => {
                    return Err(self.fail(
                        check,
                        Mismatch::BytesRead {
                            bytes_read: offset,
                            input_len,
                        },
                        None,
                    ));
                }
                ConversionStatus::InvalidData => {
                    let skipped = self.resync(input, offset)?;
                    produced.push(REPLACEMENT_CHARACTER);
                    input = &input[skipped..];
                    offset += skipped;
                    resyncs += 1;
                }
                actual => {
                    return Err(self.fail(
                        check,
                        Mismatch::Status {
                            expected: ConversionStatus::InvalidData,
                            actual,
                        },
                        Some(offset),
                    ));
                }
            }
        }
        debug!(resyncs, scalars = produced.len(), "streaming conversion");

        for (index, (step, &actual)) in reference.steps.iter().zip(&produced).enumerate() {
            let expected = step.result.as_char();
            if actual != expected {
                return Err(self.fail(
                    check,
                    Mismatch::Scalar {
                        index,
                        offset: step.offset,
                        expected,
                        actual,
                    },
                    None,
                ));
            }
        }
        if produced.len() != reference.steps.len() {
            return Err(self.fail(
                check,
                Mismatch::ScalarCount {
                    expected: reference.steps.len(),
                    actual: produced.len(),
                },
                None,
            ));
        }
        Ok(())
    }

    /// Skips the malformed subpart at the front of `input`, returning its
    /// length.
    fn resync(&self, input: &[u8], offset: usize) -> Result<usize, Violation> {
        let check = Check::StreamingResync;
        let Some(skip) = self.engine.decode_next_scalar(input) else {
            return Err(self.fail(
                check,
                Mismatch::BytesConsumed {
                    consumed: offset,
                    input_len: self.input.len(),
                },
                None,
            ));
        };
        if skip.is_well_formed() {
            return Err(self.fail(check, Mismatch::ResyncOnWellFormed { offset }, None));
        }
        if skip.bytes_consumed == 0 {
            return Err(self.fail(check, Mismatch::NoProgress { offset }, None));
        }
        if skip.bytes_consumed > input.len() {
            return Err(self.fail(
                check,
                Mismatch::BytesConsumed {
                    consumed: offset + skip.bytes_consumed,
                    input_len: self.input.len(),
                },
                Some(offset),
            ));
        }
        Ok(skip.bytes_consumed)
    }

    /// Pairs the scalars of a converted prefix with the scalars of its
    /// output. Every byte-decoded scalar must be well-formed.
    fn match_chunk(
        &self,
        read: &[u8],
        written: &[u16],
        offset: usize,
        produced: &mut Vec<char>,
    ) -> Result<(), Violation> {
        let check = Check::StreamingResync;
        let mut units = decode_utf16(written.iter().copied());
        let mut bytes = read;
        let mut at = offset;

        while let Some(step) = self.engine.decode_next_scalar(bytes) {
            if !step.is_well_formed() {
                return Err(self.fail(check, Mismatch::IllFormedPrefix { offset: at }, None));
            }
            if step.bytes_consumed == 0 || step.bytes_consumed > bytes.len() {
                return Err(self.fail(check, Mismatch::NoProgress { offset: at }, None));
            }

            let expected = step.as_char();
            let index = produced.len();
            let mismatch = match units.next() {
                Some(Ok(actual)) if actual == expected => {
                    produced.push(actual);
                    bytes = &bytes[step.bytes_consumed..];
                    at += step.bytes_consumed;
                    continue;
                }
                Some(Ok(actual)) => Mismatch::Scalar {
                    index,
                    offset: at,
                    expected,
                    actual,
                },
                Some(Err(err)) => Mismatch::UnpairedSurrogate {
                    index,
                    unit: err.unpaired_surrogate(),
                },
                None => Mismatch::Unmatched {
                    offset: at,
                    bytes: bytes.len(),
                    scalars: 0,
                },
            };
            return Err(self.fail(check, mismatch, Some(at)));
        }

        let scalars = units.count();
        if !bytes.is_empty() || scalars > 0 {
            return Err(self.fail(
                check,
                Mismatch::Unmatched {
                    offset: at,
                    bytes: bytes.len(),
                    scalars,
                },
                None,
            ));
        }
        Ok(())
    }

    fn check_custom_placeholder(&self, reference: &Reference) -> Result<(), Violation> {
        let placeholder: Vec<u16> = self.options.placeholder.encode_utf16().collect();
        let expected = reference.with_placeholder(&placeholder);
        let actual = self
            .engine
            .convert_with_replacement(self.input, &placeholder);
        debug!(
            placeholder_units = placeholder.len(),
            units = actual.len(),
            "custom placeholder conversion"
        );

        self.compare_units(
            Check::CustomPlaceholder,
            &actual,
            &expected,
            reference,
            Some(placeholder.len()),
        )
    }

    fn expect_complete(
        &self,
        check: Check,
        status: ConversionStatus,
        bytes_read: usize,
    ) -> Result<(), Violation> {
        if status != ConversionStatus::Complete {
            return Err(self.fail(
                check,
                Mismatch::Status {
                    expected: ConversionStatus::Complete,
                    actual: status,
                },
                Some(bytes_read.min(self.input.len())),
            ));
        }
        if bytes_read != self.input.len() {
            return Err(self.fail(
                check,
                Mismatch::BytesRead {
                    bytes_read,
                    input_len: self.input.len(),
                },
                None,
            ));
        }
        Ok(())
    }

    fn compare_units(
        &self,
        check: Check,
        actual: &[u16],
        expected: &[u16],
        reference: &Reference,
        placeholder_len: Option<usize>,
    ) -> Result<(), Violation> {
        let differs = actual.iter().zip(expected).position(|(a, e)| a != e);
        if let Some(index) = differs {
            let offset = reference.offset_of_unit(index, placeholder_len, self.input.len());
            return Err(self.fail(
                check,
                Mismatch::Unit {
                    index,
                    expected: expected[index],
                    actual: actual[index],
                },
                Some(offset),
            ));
        }
        if actual.len() != expected.len() {
            let index = actual.len().min(expected.len());
            let offset = reference.offset_of_unit(index, placeholder_len, self.input.len());
            return Err(self.fail(
                check,
                Mismatch::Utf16Len {
                    expected: expected.len(),
                    actual: actual.len(),
                },
                Some(offset),
            ));
        }
        Ok(())
    }

    #[cfg(any(test, feature = "fuzzing"))]
    fn escalate(&self, violation: &Violation) {
        if self.options.panic_on_violation {
            panic!("{violation}");
        }
    }

    #[cfg(not(any(test, feature = "fuzzing")))]
    #[allow(clippy::unused_self)]
    fn escalate(&self, _violation: &Violation) {}
}
