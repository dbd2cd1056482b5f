use alloc::vec::Vec;

use crate::{
    engine::Engine,
    error::Mismatch,
    utf8::{DecodedScalar, ScalarDecodeResult, Utf16Run},
};

/// One decode step and where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TraceStep {
    pub offset: usize,
    pub result: ScalarDecodeResult,
}

/// Scalar-by-scalar decoding of the input, used as the baseline every other
/// call shape is compared against.
#[derive(Debug, Clone, Default)]
pub(crate) struct Reference {
    pub steps: Vec<TraceStep>,
    pub units: Vec<u16>,
}

impl Reference {
    /// Iterates `decode_next_scalar` over the whole input.
    pub fn trace<E: Engine>(engine: &E, input: &[u8]) -> Result<Self, Mismatch> {
        let mut reference = Reference::default();
        let mut offset = 0;

        while let Some(result) = engine.decode_next_scalar(&input[offset..]) {
            if result.bytes_consumed == 0 {
                return Err(Mismatch::NoProgress { offset });
            }
            let end = offset + result.bytes_consumed;
            if end > input.len() {
                return Err(Mismatch::BytesConsumed {
                    consumed: end,
                    input_len: input.len(),
                });
            }
            reference
                .units
                .extend_from_slice(Utf16Run::from(result.value).as_slice());
            reference.steps.push(TraceStep { offset, result });
            offset = end;
        }

        if offset != input.len() {
            return Err(Mismatch::BytesConsumed {
                consumed: offset,
                input_len: input.len(),
            });
        }
        Ok(reference)
    }

    pub fn replacements(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| !step.result.is_well_formed())
            .count()
    }

    /// Reference output with `placeholder` in place of every inserted
    /// replacement. Well-formed U+FFFD in the input stays as is.
    pub fn with_placeholder(&self, placeholder: &[u16]) -> Vec<u16> {
        let mut out = Vec::with_capacity(self.units.len());
        for step in &self.steps {
            match step.result.value {
                DecodedScalar::Replacement => out.extend_from_slice(placeholder),
                value @ DecodedScalar::Scalar(_) => {
                    out.extend_from_slice(Utf16Run::from(value).as_slice());
                }
            }
        }
        out
    }

    /// Input offset of the step that produced output unit `index`.
    ///
    /// `placeholder_len` sizes replacements when the output used a custom
    /// placeholder. Past the end of the output this is the input length.
    pub fn offset_of_unit(
        &self,
        index: usize,
        placeholder_len: Option<usize>,
        input_len: usize,
    ) -> usize {
        let mut end = 0;
        for step in &self.steps {
            end += match (step.result.value, placeholder_len) {
                (DecodedScalar::Replacement, Some(len)) => len,
                (value, _) => value.utf16_len(),
            };
            if index < end {
                return step.offset;
            }
        }
        input_len
    }
}
