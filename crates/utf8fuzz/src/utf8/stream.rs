use alloc::vec::Vec;

use super::{
    ConversionStatus, REPLACEMENT_CHARACTER, Step, Utf16Run, convert_block, decode_next_scalar,
    decode_step,
};

/// Incremental UTF-8 to UTF-16 decoder for input that arrives in chunks.
///
/// A sequence split across chunks is held back (at most three bytes) until
/// the next chunk completes or breaks it. For any chunking of the same bytes
/// the concatenated output equals [`super::decode_utf16_lossy`].
///
/// ```rust
/// use utf8fuzz::Utf8Decoder;
///
/// let mut decoder = Utf8Decoder::new();
/// let mut out = Vec::new();
/// decoder.feed(b"\xF0\x9F", &mut out);
/// assert!(out.is_empty());
/// decoder.feed(b"\x98\x80", &mut out);
/// decoder.finish(&mut out);
/// assert_eq!(out, [0xD83D, 0xDE00]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    pending: [u8; 4],
    pending_len: usize,
}

impl Utf8Decoder {
    /// Creates a decoder with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of an unfinished sequence carried over from earlier chunks.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending[..self.pending_len]
    }

    /// Decodes `chunk`, appending UTF-16 units to `out`.
    pub fn feed(&mut self, mut chunk: &[u8], out: &mut Vec<u16>) {
        if self.pending_len > 0 {
            let held = self.pending_len;
            let take = (self.pending.len() - held).min(chunk.len());
            let mut stitched = self.pending;
            stitched[held..held + take].copy_from_slice(&chunk[..take]);

            let (ch, len) = match decode_step(&stitched[..held + take]) {
                Some(Step::Scalar(ch, len)) => (ch, len),
                Some(Step::Invalid(len)) => (REPLACEMENT_CHARACTER, len),
                Some(Step::Incomplete(_)) | None => {
                    self.pending = stitched;
                    self.pending_len = held + take;
                    return;
                }
            };
            out.extend_from_slice(Utf16Run::from(ch).as_slice());
            // The held bytes are a valid prefix, so the step ends inside `chunk`.
            chunk = &chunk[len.saturating_sub(held)..];
            self.pending_len = 0;
        }

        // One unit per input byte is always enough.
        let start = out.len();
        out.resize(start + chunk.len(), 0);
        let outcome = convert_block(chunk, &mut out[start..], true, false);
        out.truncate(start + outcome.units_written);
        debug_assert_ne!(outcome.status, ConversionStatus::OutputFull);

        let rest = &chunk[outcome.bytes_read..];
        debug_assert!(rest.len() < self.pending.len());
        let held = rest.len().min(self.pending.len());
        self.pending[..held].copy_from_slice(&rest[..held]);
        self.pending_len = held;
    }

    /// Ends the stream. A held-back truncated sequence becomes one U+FFFD.
    pub fn finish(self, out: &mut Vec<u16>) {
        let mut rest = self.pending();
        while let Some(step) = decode_next_scalar(rest) {
            out.extend_from_slice(Utf16Run::from(step.value).as_slice());
            rest = &rest[step.bytes_consumed..];
        }
    }
}
