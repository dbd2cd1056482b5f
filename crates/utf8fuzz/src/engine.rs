use alloc::vec::Vec;

use crate::utf8::{self, ConversionOutcome, ScalarDecodeResult};

/// The decoding API surface the oracle cross-checks.
///
/// [`StdEngine`] forwards to the functions in this crate. Other
/// implementations let the oracle be pointed at a different decoder, or at a
/// deliberately broken one to see which check catches it.
pub trait Engine {
    /// See [`utf8::count_utf16_len`].
    fn count_utf16_len(&self, src: &[u8]) -> usize;

    /// See [`utf8::decode_next_scalar`].
    fn decode_next_scalar(&self, src: &[u8]) -> Option<ScalarDecodeResult>;

    /// See [`utf8::convert_to_utf16`].
    fn convert_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        replace_invalid: bool,
    ) -> ConversionOutcome;

    /// See [`utf8::convert_with_replacement`].
    fn convert_with_replacement(&self, src: &[u8], placeholder: &[u16]) -> Vec<u16>;
}

/// The engine implemented by this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdEngine;

impl Engine for StdEngine {
    #[inline]
    fn count_utf16_len(&self, src: &[u8]) -> usize {
        utf8::count_utf16_len(src)
    }

    #[inline]
    fn decode_next_scalar(&self, src: &[u8]) -> Option<ScalarDecodeResult> {
        utf8::decode_next_scalar(src)
    }

    #[inline]
    fn convert_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        replace_invalid: bool,
    ) -> ConversionOutcome {
        utf8::convert_to_utf16(src, dst, replace_invalid)
    }

    #[inline]
    fn convert_with_replacement(&self, src: &[u8], placeholder: &[u16]) -> Vec<u16> {
        utf8::convert_with_replacement(src, placeholder)
    }
}

impl<E: Engine + ?Sized> Engine for &E {
    fn count_utf16_len(&self, src: &[u8]) -> usize {
        (**self).count_utf16_len(src)
    }

    fn decode_next_scalar(&self, src: &[u8]) -> Option<ScalarDecodeResult> {
        (**self).decode_next_scalar(src)
    }

    fn convert_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        replace_invalid: bool,
    ) -> ConversionOutcome {
        (**self).convert_to_utf16(src, dst, replace_invalid)
    }

    fn convert_with_replacement(&self, src: &[u8], placeholder: &[u16]) -> Vec<u16> {
        (**self).convert_with_replacement(src, placeholder)
    }
}
