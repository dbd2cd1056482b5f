use alloc::vec::Vec;

use quickcheck::QuickCheck;

use super::{arbitrary::MixedBytes, quickcheck_tests};
use crate::{Utf8Decoder, decode_utf16_lossy};

/// Property: feeding input in arbitrary chunks yields the bulk output.
#[test]
fn chunked_decoding_matches_bulk() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedBytes, splits: Vec<usize>) -> bool {
        let bytes = &input.0;
        let mut decoder = Utf8Decoder::new();
        let mut out = Vec::new();
        let mut idx = 0;

        for s in splits {
            let remaining = bytes.len() - idx;
            if remaining == 0 {
                break;
            }
            // Zero-length chunks are allowed and must be no-ops.
            let size = s % (remaining + 1);
            decoder.feed(&bytes[idx..idx + size], &mut out);
            if decoder.pending().len() > 3 {
                return false;
            }
            idx += size;
        }
        decoder.feed(&bytes[idx..], &mut out);
        decoder.finish(&mut out);

        out == decode_utf16_lossy(bytes)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(MixedBytes, Vec<usize>) -> bool);
}
